use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};
use serde_json::{Number, Value};

use crate::domain::{FieldDescriptor, FieldKind};
use crate::form::FormController;

use super::FieldComponent;
use super::helpers::{
    cursor_span, handle_text_edit, muted_style, step_number, value_style, value_to_string,
};

/// Single-line input for `text`, `password` and `number` fields.
#[derive(Debug, Clone)]
pub struct TextComponent {
    descriptor: FieldDescriptor,
    buffer: String,
}

impl TextComponent {
    pub fn new(descriptor: FieldDescriptor) -> Self {
        Self {
            descriptor,
            buffer: String::new(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    fn normalized(&self) -> Option<Value> {
        if self.buffer.is_empty() {
            return None;
        }
        match self.descriptor.kind {
            FieldKind::Number => Some(number_value(&self.buffer)),
            _ => Some(Value::String(self.buffer.clone())),
        }
    }
}

/// Parsed number, or the raw text when it does not parse so validation can
/// report it.
fn number_value(raw: &str) -> Value {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

impl FieldComponent for TextComponent {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn sync(&mut self, controller: &dyn FormController) {
        self.buffer = controller
            .value(&self.descriptor.name)
            .map(value_to_string)
            .unwrap_or_default();
    }

    fn render_body(&self, _controller: &dyn FormController, focused: bool) -> Vec<Line<'static>> {
        let mut spans = Vec::new();
        if self.buffer.is_empty() {
            if let Some(placeholder) = self.descriptor.prop_str("placeholder") {
                spans.push(Span::styled(placeholder.to_string(), muted_style()));
            }
        } else if self.descriptor.kind == FieldKind::Password {
            spans.push(Span::styled(
                "•".repeat(self.buffer.chars().count()),
                value_style(),
            ));
        } else {
            spans.push(Span::styled(self.buffer.clone(), value_style()));
        }
        spans.extend(cursor_span(focused));
        vec![Line::from(spans)]
    }

    fn handle_key(&mut self, key: &KeyEvent, controller: &mut dyn FormController) -> bool {
        let changed = match (self.descriptor.kind, key.code) {
            (FieldKind::Number, KeyCode::Left) => step_number(&mut self.buffer, -1.0),
            (FieldKind::Number, KeyCode::Right) => step_number(&mut self.buffer, 1.0),
            _ => handle_text_edit(&mut self.buffer, key),
        };
        if changed {
            controller.set_value(&self.descriptor.name, self.normalized());
        }
        changed
    }
}
