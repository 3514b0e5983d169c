use chrono::{
    Days, Local, NaiveDate,
    format::{Item, StrftimeItems},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span};
use serde_json::Value;
use tracing::warn;

use crate::domain::FieldDescriptor;
use crate::form::FormController;

use super::FieldComponent;
use super::helpers::{cursor_span, muted_style, value_style, value_to_string};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_DISPLAY_FORMAT: &str = "%a %d %b %Y";

/// Date input stored as `YYYY-MM-DD`. Up/Down move one day, `t` jumps to
/// today and Delete clears the value.
#[derive(Debug, Clone)]
pub struct DateComponent {
    descriptor: FieldDescriptor,
    buffer: String,
    display_format: String,
}

impl DateComponent {
    pub fn new(descriptor: FieldDescriptor) -> Self {
        let display_format = match descriptor.prop_str("format") {
            Some(format) if is_valid_format(format) => format.to_string(),
            Some(format) => {
                warn!(
                    field = %descriptor.name,
                    format,
                    "invalid date display format, using {DEFAULT_DISPLAY_FORMAT}"
                );
                DEFAULT_DISPLAY_FORMAT.to_string()
            }
            None => DEFAULT_DISPLAY_FORMAT.to_string(),
        };
        Self {
            descriptor,
            buffer: String::new(),
            display_format,
        }
    }

    pub fn display_format(&self) -> &str {
        &self.display_format
    }

    pub fn parsed(&self) -> Option<NaiveDate> {
        parse_date(&self.buffer)
    }

    fn set_date(&mut self, date: NaiveDate) {
        self.buffer = date.format(DATE_FORMAT).to_string();
    }

    fn step(&mut self, forward: bool) {
        let base = self.parsed().unwrap_or_else(today);
        let next = if forward {
            base.checked_add_days(Days::new(1))
        } else {
            base.checked_sub_days(Days::new(1))
        };
        self.set_date(next.unwrap_or(base));
    }

    fn value(&self) -> Option<Value> {
        if self.buffer.is_empty() {
            return None;
        }
        let text = match self.parsed() {
            Some(date) => date.format(DATE_FORMAT).to_string(),
            None => self.buffer.clone(),
        };
        Some(Value::String(text))
    }
}

fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl FieldComponent for DateComponent {
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
            spans.push(Span::styled("YYYY-MM-DD", muted_style()));
        } else {
            spans.push(Span::styled(self.buffer.clone(), value_style()));
        }
        spans.extend(cursor_span(focused));
        if let Some(date) = self.parsed() {
            spans.push(Span::styled(
                format!("  ({})", date.format(&self.display_format)),
                muted_style(),
            ));
        }
        vec![Line::from(spans)]
    }

    fn handle_key(&mut self, key: &KeyEvent, controller: &mut dyn FormController) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        let changed = match key.code {
            KeyCode::Up => {
                self.step(true);
                true
            }
            KeyCode::Down => {
                self.step(false);
                true
            }
            KeyCode::Char('t') => {
                self.set_date(today());
                true
            }
            KeyCode::Char(ch) if ch.is_ascii_digit() || ch == '-' => {
                self.buffer.push(ch);
                true
            }
            KeyCode::Backspace => self.buffer.pop().is_some(),
            KeyCode::Delete => {
                let changed = !self.buffer.is_empty();
                self.buffer.clear();
                changed
            }
            _ => false,
        };
        if changed {
            controller.set_value(&self.descriptor.name, self.value());
        }
        changed
    }
}
