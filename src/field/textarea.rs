use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};
use serde_json::Value;

use crate::domain::FieldDescriptor;
use crate::form::FormController;

use super::FieldComponent;
use super::helpers::{cursor_span, handle_text_edit, muted_style, value_style, value_to_string};

const DEFAULT_ROWS: u16 = 4;

/// Multi-line input. Enter inserts a newline; the body shows the last
/// `rows` lines of the buffer.
#[derive(Debug, Clone)]
pub struct TextareaComponent {
    descriptor: FieldDescriptor,
    buffer: String,
    rows: u16,
}

impl TextareaComponent {
    pub fn new(descriptor: FieldDescriptor) -> Self {
        let rows = descriptor
            .prop_u64("rows")
            .filter(|rows| *rows > 0)
            .map(|rows| rows.min(u64::from(u16::MAX)) as u16)
            .unwrap_or(DEFAULT_ROWS);
        Self {
            descriptor,
            buffer: String::new(),
            rows,
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }
}

impl FieldComponent for TextareaComponent {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn sync(&mut self, controller: &dyn FormController) {
        self.buffer = controller
            .value(&self.descriptor.name)
            .map(value_to_string)
            .unwrap_or_default();
    }

    fn body_height(&self) -> u16 {
        self.rows
    }

    fn render_body(&self, _controller: &dyn FormController, focused: bool) -> Vec<Line<'static>> {
        if self.buffer.is_empty() {
            let mut spans = Vec::new();
            if let Some(placeholder) = self.descriptor.prop_str("placeholder") {
                spans.push(Span::styled(placeholder.to_string(), muted_style()));
            }
            spans.extend(cursor_span(focused));
            return vec![Line::from(spans)];
        }
        let lines: Vec<&str> = self.buffer.split('\n').collect();
        let skip = lines.len().saturating_sub(self.rows as usize);
        let last = lines.len() - 1;
        lines
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(idx, line)| {
                let mut spans = vec![Span::styled(line.to_string(), value_style())];
                if idx == last {
                    spans.extend(cursor_span(focused));
                }
                Line::from(spans)
            })
            .collect()
    }

    fn handle_key(&mut self, key: &KeyEvent, controller: &mut dyn FormController) -> bool {
        let changed = match key.code {
            KeyCode::Enter => {
                self.buffer.push('\n');
                true
            }
            _ => handle_text_edit(&mut self.buffer, key),
        };
        if changed {
            let value = (!self.buffer.is_empty()).then(|| Value::String(self.buffer.clone()));
            controller.set_value(&self.descriptor.name, value);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKind;
    use crate::field::test_support::{key, plain, typed};
    use crate::form::FormState;
    use serde_json::json;

    #[test]
    fn enter_inserts_newline_and_rows_limit_view() {
        let mut state = FormState::new();
        let mut component = TextareaComponent::new(
            FieldDescriptor::new("notes", "Notes", FieldKind::Textarea).with_prop("rows", 2),
        );
        component.bind(&mut state);
        for event in typed("a")
            .into_iter()
            .chain([key(KeyCode::Enter)])
            .chain(typed("b"))
            .chain([key(KeyCode::Enter)])
            .chain(typed("c"))
        {
            component.handle_key(&event, &mut state);
        }
        assert_eq!(state.value("notes"), Some(&json!("a\nb\nc")));
        assert_eq!(component.body_height(), 2);
        assert_eq!(plain(&component.render_body(&state, false)), "b\nc");
    }

    #[test]
    fn default_row_count() {
        let component =
            TextareaComponent::new(FieldDescriptor::new("notes", "Notes", FieldKind::Textarea));
        assert_eq!(component.rows(), 4);
    }
}
