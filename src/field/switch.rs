use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use serde_json::Value;

use crate::domain::FieldDescriptor;
use crate::form::FormController;

use super::FieldComponent;

#[derive(Debug, Clone)]
pub struct SwitchComponent {
    descriptor: FieldDescriptor,
}

impl SwitchComponent {
    pub fn new(descriptor: FieldDescriptor) -> Self {
        Self { descriptor }
    }

    fn is_on(&self, controller: &dyn FormController) -> bool {
        controller
            .value(&self.descriptor.name)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl FieldComponent for SwitchComponent {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn render_body(&self, controller: &dyn FormController, _focused: bool) -> Vec<Line<'static>> {
        let span = if self.is_on(controller) {
            Span::styled("[■ ] On", Style::default().fg(Color::Green))
        } else {
            Span::styled("[ □] Off", Style::default().fg(Color::Gray))
        };
        vec![Line::from(span)]
    }

    fn handle_key(&mut self, key: &KeyEvent, controller: &mut dyn FormController) -> bool {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                let next = !self.is_on(controller);
                controller.set_value(&self.descriptor.name, Some(Value::Bool(next)));
                true
            }
            _ => false,
        }
    }
}
