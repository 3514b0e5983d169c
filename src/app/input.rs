use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Global meaning of a key press before it reaches the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Submit,
    Reset,
    Quit,
    ResetStatus,
    Form(KeyEvent),
    None,
}

pub fn classify(key: &KeyEvent) -> KeyCommand {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => KeyCommand::Submit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyCommand::Reset,
            KeyCode::Char('q') | KeyCode::Char('Q') => KeyCommand::Quit,
            KeyCode::Char('c') | KeyCode::Char('C') => KeyCommand::Quit,
            _ => KeyCommand::None,
        };
    }

    match key.code {
        KeyCode::Esc => KeyCommand::ResetStatus,
        _ => KeyCommand::Form(*key),
    }
}
