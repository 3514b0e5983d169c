use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};

use crate::domain::FieldDescriptor;
use crate::form::FormController;

use super::FieldComponent;
use super::choice::cycle;
use super::helpers::{highlight_style, value_style};

/// One radio button per option, stacked unless `props.row` is set.
#[derive(Debug, Clone)]
pub struct RadioGroupComponent {
    descriptor: FieldDescriptor,
    cursor: usize,
    row: bool,
}

impl RadioGroupComponent {
    pub fn new(descriptor: FieldDescriptor) -> Self {
        let row = descriptor.prop_bool("row").unwrap_or(false);
        Self {
            descriptor,
            cursor: 0,
            row,
        }
    }

    fn option_span(&self, idx: usize, selected: Option<usize>, focused: bool) -> Span<'static> {
        let option = &self.descriptor.options[idx];
        let mark = if selected == Some(idx) { "•" } else { " " };
        let style = if focused && idx == self.cursor {
            highlight_style()
        } else {
            value_style()
        };
        Span::styled(format!("({mark}) {}", option.display_label()), style)
    }
}

impl FieldComponent for RadioGroupComponent {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn sync(&mut self, controller: &dyn FormController) {
        self.cursor = controller
            .value(&self.descriptor.name)
            .and_then(|value| self.descriptor.option_index(value))
            .unwrap_or(0);
    }

    fn body_height(&self) -> u16 {
        if self.row {
            1
        } else {
            self.descriptor.options.len().clamp(1, u16::MAX as usize) as u16
        }
    }

    fn render_body(&self, controller: &dyn FormController, focused: bool) -> Vec<Line<'static>> {
        let selected = controller
            .value(&self.descriptor.name)
            .and_then(|value| self.descriptor.option_index(value));
        let count = self.descriptor.options.len();
        if self.row {
            let mut spans = Vec::new();
            for idx in 0..count {
                if idx > 0 {
                    spans.push(Span::raw("  "));
                }
                spans.push(self.option_span(idx, selected, focused));
            }
            vec![Line::from(spans)]
        } else {
            (0..count)
                .map(|idx| Line::from(self.option_span(idx, selected, focused)))
                .collect()
        }
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
                let value = self.descriptor.options[self.cursor].value.clone();
                controller.set_value(&self.descriptor.name, Some(value));
                true
            }
            _ => false,
        }
    }
}
