use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::Modifier,
    text::{Line, Span},
};

use crate::domain::FieldDescriptor;
use crate::form::FormController;

use super::FieldComponent;
use super::choice::{cycle, list_value, option_values, selected_values, toggle_member};
use super::helpers::{highlight_style, value_style};

/// A row of checkboxes, one per option. Left/Right move the option cursor and
/// Space adds or removes the option value.
#[derive(Debug, Clone)]
pub struct CheckboxGroupComponent {
    descriptor: FieldDescriptor,
    cursor: usize,
}

impl CheckboxGroupComponent {
    pub fn new(descriptor: FieldDescriptor) -> Self {
        Self {
            descriptor,
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl FieldComponent for CheckboxGroupComponent {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn render_body(&self, controller: &dyn FormController, focused: bool) -> Vec<Line<'static>> {
        let values = selected_values(controller.value(&self.descriptor.name));
        let mut spans = Vec::new();
        for (idx, option) in self.descriptor.options.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw("  "));
            }
            let mark = if values.contains(&option.value) { "x" } else { " " };
            let style = if focused && idx == self.cursor {
                highlight_style().add_modifier(Modifier::UNDERLINED)
            } else {
                value_style()
            };
            spans.push(Span::styled(format!("[{mark}] {}", option.display_label()), style));
        }
        vec![Line::from(spans)]
    }

    fn handle_key(&mut self, key: &KeyEvent, controller: &mut dyn FormController) -> bool {
        let len = self.descriptor.options.len();
        if len == 0 {
            return false;
        }
        match key.code {
            KeyCode::Left => {
                self.cursor = cycle(self.cursor, len, -1);
                true
            }
            KeyCode::Right => {
                self.cursor = cycle(self.cursor, len, 1);
                true
            }
            KeyCode::Char(' ') => {
                let Some(option) = self.descriptor.options.get(self.cursor) else {
                    return false;
                };
                let current = selected_values(controller.value(&self.descriptor.name));
                let order = option_values(&self.descriptor);
                let next = toggle_member(&current, &option.value, &order);
                controller.set_value(&self.descriptor.name, list_value(next));
                true
            }
            _ => false,
        }
    }
}
