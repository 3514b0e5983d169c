use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    domain::FormSpec,
    field::ComponentContext,
    form::{FormController, FormEvent, FormView, SubmitHandlers, SubmitOutcome},
    presentation::{self, UiContext},
};

use super::{
    input::{KeyCommand, classify},
    options::UiOptions,
    popup::PopupState,
    status::StatusLine,
    terminal::TerminalGuard,
};

pub(crate) struct App {
    view: FormView,
    controller: Box<dyn FormController>,
    handlers: SubmitHandlers,
    options: UiOptions,
    status: StatusLine,
    error_count: usize,
    exit_armed: bool,
    should_quit: bool,
    result: Option<Value>,
    popup: Option<PopupState>,
}

impl App {
    pub fn new(
        spec: FormSpec,
        mut controller: Box<dyn FormController>,
        context: ComponentContext,
        handlers: SubmitHandlers,
        options: UiOptions,
    ) -> Self {
        let view = FormView::with_context(spec, context, controller.as_mut());
        Self {
            view,
            controller,
            handlers,
            options,
            status: StatusLine::new(),
            error_count: 0,
            exit_armed: false,
            should_quit: false,
            result: None,
            popup: None,
        }
    }

    /// Runs the event loop until the user quits or a submit ends it. Returns
    /// the last submitted values, if any.
    pub fn run(&mut self) -> Result<Option<Value>> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(width, height) => {
                    terminal.resize(Rect::new(0, 0, width, height))?;
                }
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
        Ok(self.result.take())
    }

    /// Changes made since the last accepted submit.
    fn has_unsubmitted_changes(&self) -> bool {
        if !self.controller.is_dirty() {
            return false;
        }
        self.result.as_ref() != Some(&self.controller.values())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        presentation::draw(
            frame,
            UiContext {
                form: &self.view,
                controller: self.controller.as_ref(),
                status_message: self.status.message(),
                dirty: self.has_unsubmitted_changes(),
                error_count: self.error_count,
                focus_label: self.view.focused_label(),
                help: self.options.help_text(),
                popup: self.popup.as_ref().map(PopupState::as_render),
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.handle_popup_key(&key) {
            return;
        }

        match classify(&key) {
            KeyCommand::Submit => self.on_submit(),
            KeyCommand::Reset => self.on_reset(),
            KeyCommand::Quit => self.on_exit(),
            KeyCommand::ResetStatus => {
                self.exit_armed = false;
                self.status.ready();
            }
            KeyCommand::Form(key) => self.handle_form_key(&key),
            KeyCommand::None => {}
        }
    }

    fn handle_form_key(&mut self, key: &KeyEvent) {
        match self.view.handle_key(key, self.controller.as_mut()) {
            FormEvent::Edited(name) => self.after_edit(&name),
            FormEvent::SubmitRequested => self.on_submit(),
            FormEvent::ResetRequested => self.on_reset(),
            FormEvent::ChoicesRequested(choices) => {
                let message = if choices.multi {
                    "Use ↑/↓ to move, Space to toggle, Enter to apply"
                } else {
                    "Use ↑/↓ and Enter to choose"
                };
                self.status.set_raw(message);
                self.popup = Some(PopupState::new(choices));
            }
            FormEvent::FocusMoved | FormEvent::Ignored => {}
        }
    }

    fn handle_popup_key(&mut self, key: &KeyEvent) -> bool {
        let Some(popup) = self.popup.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                self.popup = None;
                self.status.ready();
            }
            KeyCode::Up => popup.select_previous(),
            KeyCode::Down => popup.select_next(),
            KeyCode::Char(' ') if popup.is_multi() => popup.toggle_current(),
            KeyCode::Enter => {
                let field = popup.field().to_string();
                let selection = popup.selection();
                let active = popup.active().to_vec();
                self.popup = None;
                if self
                    .view
                    .apply_choices(&field, selection, &active, self.controller.as_mut())
                {
                    self.after_edit(&field);
                }
            }
            _ => {}
        }
        true
    }

    fn after_edit(&mut self, name: &str) {
        self.exit_armed = false;
        let label = self
            .view
            .spec()
            .field(name)
            .map(|field| field.label.clone())
            .unwrap_or_else(|| name.to_string());
        self.status.editing(&label);
        if self.options.auto_validate && self.error_count > 0 {
            let _ = self.controller.validate();
        }
        self.error_count = self.controller.errors().len();
    }

    fn on_submit(&mut self) {
        self.exit_armed = false;
        match self.view.submit(self.controller.as_mut(), &mut self.handlers) {
            SubmitOutcome::Submitted(values) => {
                info!("form submitted");
                self.result = Some(values);
                self.error_count = 0;
                self.status.submitted(self.options.exit_on_submit);
                if self.options.exit_on_submit {
                    self.should_quit = true;
                }
            }
            SubmitOutcome::Rejected(errors) => {
                self.error_count = errors.len();
                self.status.issues_remaining(errors.len());
            }
        }
    }

    fn on_reset(&mut self) {
        self.popup = None;
        self.view.reset(self.controller.as_mut());
        self.error_count = 0;
        self.exit_armed = false;
        self.status.form_reset();
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.has_unsubmitted_changes() && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        debug!(submitted = self.result.is_some(), "leaving form");
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crossterm::event::KeyModifiers;
    use serde_json::json;

    use super::*;
    use crate::domain::{FieldDescriptor, FieldKind, FieldOption};
    use crate::form::FormState;

    fn spec() -> FormSpec {
        FormSpec::new(vec![vec![
            FieldDescriptor::new("name", "Name", FieldKind::Text).required(),
            FieldDescriptor::new("size", "Size", FieldKind::SingleSelect).with_options(vec![
                FieldOption::new("Small", "s"),
                FieldOption::new("Large", "l"),
            ]),
        ]])
    }

    fn app(handlers: SubmitHandlers, options: UiOptions) -> App {
        let spec = spec();
        let state = FormState::for_spec(&spec).unwrap();
        App::new(
            spec,
            Box::new(state),
            ComponentContext::default(),
            handlers,
            options,
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, ch: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL));
    }

    #[test]
    fn rejected_submit_counts_issues_and_keeps_running() {
        let failures = Rc::new(RefCell::new(0));
        let handlers = {
            let failures = Rc::clone(&failures);
            SubmitHandlers::noop().with_failure(move |_| *failures.borrow_mut() += 1)
        };
        let mut app = app(handlers, UiOptions::default());
        ctrl(&mut app, 's');
        assert_eq!(*failures.borrow(), 1);
        assert_eq!(app.error_count, 1);
        assert_eq!(app.status.message(), "1 issue(s) remaining");
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.error_count, 0, "edit revalidates once errors are shown");
    }

    #[test]
    fn accepted_submit_stores_result_and_quits() {
        let submitted = Rc::new(RefCell::new(None));
        let handlers = {
            let submitted = Rc::clone(&submitted);
            SubmitHandlers::new(move |values| *submitted.borrow_mut() = Some(values.clone()))
        };
        let mut app = app(handlers, UiOptions::default());
        press(&mut app, KeyCode::Char('A'));
        ctrl(&mut app, 's');
        assert_eq!(*submitted.borrow(), Some(json!({"name": "A"})));
        assert_eq!(app.result, Some(json!({"name": "A"})));
        assert!(app.should_quit);
    }

    #[test]
    fn popup_applies_choice() {
        let mut app = app(SubmitHandlers::noop(), UiOptions::default());
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert!(app.popup.is_some());
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(app.popup.is_none());
        assert_eq!(app.controller.value("size"), Some(&json!("l")));
        assert_eq!(app.status.message(), "Editing Size");
    }

    #[test]
    fn quitting_dirty_form_needs_confirmation() {
        let mut app = app(SubmitHandlers::noop(), UiOptions::default());
        press(&mut app, KeyCode::Char('A'));
        ctrl(&mut app, 'q');
        assert!(app.exit_armed);
        assert!(!app.should_quit);
        ctrl(&mut app, 'q');
        assert!(app.should_quit);
        assert!(app.result.is_none());
    }

    #[test]
    fn reset_clears_values_and_errors() {
        let options = UiOptions::default().with_exit_on_submit(false);
        let mut app = app(SubmitHandlers::noop(), options);
        press(&mut app, KeyCode::Char('A'));
        ctrl(&mut app, 'r');
        assert!(app.controller.value("name").is_none());
        assert!(!app.controller.is_dirty());
        assert_eq!(app.status.message(), "Form reset to defaults");
        ctrl(&mut app, 'q');
        assert!(app.should_quit, "clean form quits at once");
    }

    #[test]
    fn submitted_form_quits_without_confirmation() {
        let options = UiOptions::default().with_exit_on_submit(false);
        let mut app = app(SubmitHandlers::noop(), options);
        press(&mut app, KeyCode::Char('A'));
        ctrl(&mut app, 's');
        assert!(!app.should_quit);
        assert_eq!(app.status.message(), "Submitted. Press Ctrl+Q to exit.");
        ctrl(&mut app, 'q');
        assert!(app.should_quit);
    }
}
