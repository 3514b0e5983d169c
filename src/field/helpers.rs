use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};
use serde_json::Value;

pub(crate) fn handle_text_edit(buffer: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(ch) => {
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                return false;
            }
            buffer.push(ch);
            true
        }
        KeyCode::Backspace => buffer.pop().is_some(),
        KeyCode::Delete => {
            let changed = !buffer.is_empty();
            buffer.clear();
            changed
        }
        _ => false,
    }
}

pub(crate) fn step_number(buffer: &mut String, delta: f64) -> bool {
    let current = buffer.trim().parse::<f64>().unwrap_or(0.0);
    let next = current + delta;
    *buffer = if next.fract() == 0.0 && next.abs() < 1e15 {
        format!("{}", next as i64)
    } else {
        next.to_string()
    };
    true
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(num) => match num.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{}", float as i64)
            }
            _ => num.to_string(),
        },
        Value::Bool(flag) => flag.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

pub(crate) fn value_style() -> Style {
    Style::default().fg(Color::White)
}

pub(crate) fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub(crate) fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn cursor_span(focused: bool) -> Option<Span<'static>> {
    focused.then(|| Span::styled("▏", Style::default().fg(Color::Yellow)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(value_to_string(&json!(3.0)), "3");
        assert_eq!(value_to_string(&json!(2.5)), "2.5");
        assert_eq!(value_to_string(&json!(["a", 1])), "a, 1");
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut buffer = String::new();
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert!(!handle_text_edit(&mut buffer, &ctrl_a));
        assert!(buffer.is_empty());
    }

    #[test]
    fn stepping_starts_from_zero() {
        let mut buffer = String::new();
        step_number(&mut buffer, -1.0);
        assert_eq!(buffer, "-1");
        let mut buffer = "1.5".to_string();
        step_number(&mut buffer, 1.0);
        assert_eq!(buffer, "2.5");
    }
}
