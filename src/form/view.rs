use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{Frame, layout::Rect};
use tracing::debug;

use crate::domain::FormSpec;
use crate::field::{ChoiceList, ComponentContext, FieldComponent, PreviewRegistry, build_component};
use crate::layout::allocate_spans;
use crate::presentation::render_form;

use super::{
    controller::FormController,
    submit::{SubmitHandlers, SubmitOutcome},
};

/// Where keyboard input currently goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field { row: usize, column: usize },
    Submit,
    Reset,
}

/// Result of routing one key through the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Ignored,
    /// The named field wrote the controller.
    Edited(String),
    FocusMoved,
    SubmitRequested,
    ResetRequested,
    /// A choice field asked for its picker.
    ChoicesRequested(ChoiceList),
}

/// Rows of field renderers built from a [`FormSpec`], plus focus.
///
/// The view keeps no form data of its own: every value and error lives in the
/// controller passed to each call.
#[derive(Debug)]
pub struct FormView {
    spec: FormSpec,
    rows: Vec<Vec<Box<dyn FieldComponent>>>,
    spans: Vec<Vec<u16>>,
    focus: usize,
    context: ComponentContext,
}

impl FormView {
    pub fn new(spec: FormSpec, controller: &mut dyn FormController) -> Self {
        Self::with_context(spec, ComponentContext::default(), controller)
    }

    pub fn with_context(
        spec: FormSpec,
        context: ComponentContext,
        controller: &mut dyn FormController,
    ) -> Self {
        let spans = spec.groups.iter().map(|group| allocate_spans(group)).collect();
        let rows = spec
            .groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|descriptor| {
                        let mut component = build_component(descriptor, &context);
                        component.bind(controller);
                        component
                    })
                    .collect()
            })
            .collect();
        debug!(groups = spec.groups.len(), "form view bound");
        Self {
            spec,
            rows,
            spans,
            focus: 0,
            context,
        }
    }

    pub fn spec(&self) -> &FormSpec {
        &self.spec
    }

    /// Allocated spans, one list per group.
    pub fn spans(&self) -> &[Vec<u16>] {
        &self.spans
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.context.previews
    }

    pub(crate) fn rows(&self) -> &[Vec<Box<dyn FieldComponent>>] {
        &self.rows
    }

    fn targets(&self) -> Vec<Focus> {
        let mut targets: Vec<Focus> = self
            .rows
            .iter()
            .enumerate()
            .flat_map(|(row, fields)| {
                (0..fields.len()).map(move |column| Focus::Field { row, column })
            })
            .collect();
        if self.spec.reset().visible {
            targets.push(Focus::Reset);
        }
        if self.spec.submit().visible {
            targets.push(Focus::Submit);
        }
        targets
    }

    pub fn focus(&self) -> Option<Focus> {
        self.targets().get(self.focus).copied()
    }

    pub fn focused_name(&self) -> Option<&str> {
        match self.focus()? {
            Focus::Field { row, column } => Some(self.rows[row][column].descriptor().name.as_str()),
            _ => None,
        }
    }

    pub fn focused_label(&self) -> Option<&str> {
        match self.focus()? {
            Focus::Field { row, column } => {
                Some(self.rows[row][column].descriptor().label.as_str())
            }
            Focus::Submit | Focus::Reset => None,
        }
    }

    pub fn focus_next(&mut self) {
        let len = self.targets().len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn focus_prev(&mut self) {
        let len = self.targets().len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    /// Moves focus to the named field; returns `false` when it is unknown.
    pub fn focus_field(&mut self, name: &str) -> bool {
        let position = self.targets().iter().position(|target| match target {
            Focus::Field { row, column } => self.rows[*row][*column].descriptor().name == name,
            _ => false,
        });
        match position {
            Some(index) => {
                self.focus = index;
                true
            }
            None => false,
        }
    }

    fn component_mut(&mut self, name: &str) -> Option<&mut Box<dyn FieldComponent>> {
        self.rows
            .iter_mut()
            .flatten()
            .find(|component| component.descriptor().name == name)
    }

    pub fn handle_key(&mut self, key: &KeyEvent, controller: &mut dyn FormController) -> FormEvent {
        match key.code {
            KeyCode::Tab => {
                self.focus_next();
                return FormEvent::FocusMoved;
            }
            KeyCode::BackTab => {
                self.focus_prev();
                return FormEvent::FocusMoved;
            }
            _ => {}
        }

        let Some(target) = self.focus() else {
            return FormEvent::Ignored;
        };
        match target {
            Focus::Submit | Focus::Reset => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') if target == Focus::Submit => {
                    FormEvent::SubmitRequested
                }
                KeyCode::Enter | KeyCode::Char(' ') => FormEvent::ResetRequested,
                KeyCode::Down | KeyCode::Right => {
                    self.focus_next();
                    FormEvent::FocusMoved
                }
                KeyCode::Up | KeyCode::Left => {
                    self.focus_prev();
                    FormEvent::FocusMoved
                }
                _ => FormEvent::Ignored,
            },
            Focus::Field { row, column } => {
                let component = &mut self.rows[row][column];
                if key.code == KeyCode::Enter
                    && let Some(choices) = component.choices(controller)
                {
                    return FormEvent::ChoicesRequested(choices);
                }
                if component.handle_key(key, controller) {
                    return FormEvent::Edited(component.descriptor().name.clone());
                }
                match key.code {
                    KeyCode::Down | KeyCode::Enter => {
                        self.focus_next();
                        FormEvent::FocusMoved
                    }
                    KeyCode::Up => {
                        self.focus_prev();
                        FormEvent::FocusMoved
                    }
                    _ => FormEvent::Ignored,
                }
            }
        }
    }

    /// Writes a picker result back through the owning renderer.
    pub fn apply_choices(
        &mut self,
        field: &str,
        selection: usize,
        active: &[bool],
        controller: &mut dyn FormController,
    ) -> bool {
        self.component_mut(field)
            .map(|component| component.apply_choices(selection, active, controller))
            .unwrap_or(false)
    }

    /// Validates through the controller and dispatches to one callback. On
    /// rejection the first invalid field takes focus.
    pub fn submit(
        &mut self,
        controller: &mut dyn FormController,
        handlers: &mut SubmitHandlers,
    ) -> SubmitOutcome {
        let outcome = controller.handle_submit(handlers);
        if let SubmitOutcome::Rejected(errors) = &outcome
            && let Some((name, _)) = errors.first()
        {
            let name = name.to_string();
            self.focus_field(&name);
        }
        outcome
    }

    /// Resets the controller and reloads every renderer's local state.
    pub fn reset(&mut self, controller: &mut dyn FormController) {
        controller.reset();
        for component in self.rows.iter_mut().flatten() {
            component.sync(controller);
        }
        debug!("form reset");
    }

    pub fn draw(&self, frame: &mut Frame<'_>, area: Rect, controller: &dyn FormController) {
        render_form(frame, area, self, controller);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{ButtonSetting, FieldDescriptor, FieldKind, FieldOption};
    use crate::field::test_support::{key, temp_file, typed};
    use crate::form::{FieldErrors, FormState};

    fn spec() -> FormSpec {
        FormSpec::new(vec![
            vec![
                FieldDescriptor::new("first", "First name", FieldKind::Text).required(),
                FieldDescriptor::new("last", "Last name", FieldKind::Text),
            ],
            vec![
                FieldDescriptor::new("plan", "Plan", FieldKind::SingleSelect).with_options(vec![
                    FieldOption::new("Free", "free"),
                    FieldOption::new("Pro", "pro"),
                ]),
            ],
        ])
        .with_reset_button(ButtonSetting::Flag(true))
    }

    fn type_into(view: &mut FormView, state: &mut FormState, text: &str) {
        for event in typed(text) {
            view.handle_key(&event, state);
        }
    }

    #[test]
    fn focus_walks_fields_then_buttons() {
        let mut state = FormState::for_spec(&spec()).unwrap();
        let mut view = FormView::new(spec(), &mut state);
        assert_eq!(view.focused_name(), Some("first"));
        view.handle_key(&key(KeyCode::Tab), &mut state);
        assert_eq!(view.focused_name(), Some("last"));
        view.handle_key(&key(KeyCode::Tab), &mut state);
        view.handle_key(&key(KeyCode::Tab), &mut state);
        assert_eq!(view.focus(), Some(Focus::Reset));
        view.handle_key(&key(KeyCode::Tab), &mut state);
        assert_eq!(view.focus(), Some(Focus::Submit));
        view.handle_key(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), &mut state);
        assert_eq!(view.focus(), Some(Focus::Reset));
        view.handle_key(&key(KeyCode::Tab), &mut state);
        assert_eq!(view.handle_key(&key(KeyCode::Enter), &mut state), FormEvent::SubmitRequested);
    }

    #[test]
    fn typing_edits_focused_field() {
        let mut state = FormState::for_spec(&spec()).unwrap();
        let mut view = FormView::new(spec(), &mut state);
        let event = view.handle_key(&key(KeyCode::Char('A')), &mut state);
        assert_eq!(event, FormEvent::Edited("first".into()));
        assert_eq!(state.value("first"), Some(&json!("A")));
    }

    #[test]
    fn enter_on_select_requests_choices() {
        let mut state = FormState::for_spec(&spec()).unwrap();
        let mut view = FormView::new(spec(), &mut state);
        view.focus_field("plan");
        let FormEvent::ChoicesRequested(choices) = view.handle_key(&key(KeyCode::Enter), &mut state)
        else {
            panic!("expected a picker request");
        };
        assert_eq!(choices.options, vec!["Free", "Pro"]);
        assert!(view.apply_choices("plan", 1, &[], &mut state));
        assert_eq!(state.value("plan"), Some(&json!("pro")));
    }

    #[test]
    fn submit_dispatches_exactly_one_callback() {
        let successes = Rc::new(RefCell::new(Vec::<Value>::new()));
        let failures = Rc::new(RefCell::new(Vec::<FieldErrors>::new()));
        let mut handlers = {
            let successes = Rc::clone(&successes);
            let failures = Rc::clone(&failures);
            SubmitHandlers::new(move |values| successes.borrow_mut().push(values.clone()))
                .with_failure(move |errors| failures.borrow_mut().push(errors.clone()))
        };

        let mut state = FormState::for_spec(&spec()).unwrap();
        let mut view = FormView::new(spec(), &mut state);
        view.focus_field("last");

        let outcome = view.submit(&mut state, &mut handlers);
        assert!(!outcome.is_submitted());
        assert!(successes.borrow().is_empty());
        assert_eq!(failures.borrow().len(), 1);
        assert_eq!(failures.borrow()[0].get("first"), Some("First name is required"));
        assert_eq!(view.focused_name(), Some("first"), "focus jumps to first error");

        type_into(&mut view, &mut state, "Ada");
        assert!(view.submit(&mut state, &mut handlers).is_submitted());
        assert_eq!(successes.borrow().as_slice(), &[json!({"first": "Ada"})]);
        assert_eq!(failures.borrow().len(), 1);
    }

    #[test]
    fn reset_restores_defaults_and_buffers() {
        let mut state = FormState::for_spec(&spec())
            .unwrap()
            .with_defaults(json!({"first": "Grace"}));
        let mut view = FormView::new(spec(), &mut state);
        type_into(&mut view, &mut state, "!");
        assert_eq!(state.value("first"), Some(&json!("Grace!")));
        assert!(state.is_dirty());

        view.reset(&mut state);
        assert_eq!(state.value("first"), Some(&json!("Grace")));
        assert!(!state.is_dirty());
        view.handle_key(&key(KeyCode::Backspace), &mut state);
        assert_eq!(state.value("first"), Some(&json!("Grac")));
    }

    #[test]
    fn reset_releases_file_previews() {
        let path = temp_file(".txt", b"preview me");
        let spec = FormSpec::new(vec![vec![FieldDescriptor::new(
            "doc",
            "Doc",
            FieldKind::File,
        )]]);
        let mut state = FormState::for_spec(&spec).unwrap();
        let mut view = FormView::new(spec, &mut state);
        type_into(&mut view, &mut state, &path.display().to_string());
        view.handle_key(&key(KeyCode::Enter), &mut state);
        assert_eq!(view.previews().live_count(), 1);
        view.reset(&mut state);
        assert_eq!(view.previews().live_count(), 0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn draw_renders_labels_and_buttons() {
        let mut state = FormState::for_spec(&spec()).unwrap();
        let view = FormView::new(spec(), &mut state);
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        terminal
            .draw(|frame| view.draw(frame, frame.area(), &state))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("First name *"));
        assert!(text.contains("Last name"));
        assert!(text.contains("Submit"));
        assert!(text.contains("Reset"));
    }
}
