use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};

use crate::domain::{FieldDescriptor, FieldKind, FieldOption};
use crate::form::FormController;

use super::FieldComponent;
use super::choice::{ChoiceList, active_flags, cycle, list_value, selected_values};
use super::helpers::{muted_style, value_style};

/// `single-select` and `multi-select`. Left/Right cycle a single selection;
/// both variants open a picker on Enter.
#[derive(Debug, Clone)]
pub struct SelectComponent {
    descriptor: FieldDescriptor,
}

impl SelectComponent {
    pub fn new(descriptor: FieldDescriptor) -> Self {
        Self { descriptor }
    }

    fn is_multi(&self) -> bool {
        self.descriptor.kind == FieldKind::MultiSelect
    }

    fn selected_index(&self, controller: &dyn FormController) -> Option<usize> {
        controller
            .value(&self.descriptor.name)
            .and_then(|value| self.descriptor.option_index(value))
    }

    fn label_for(&self, value: &serde_json::Value) -> String {
        self.descriptor
            .option_index(value)
            .map(|idx| self.descriptor.options[idx].display_label())
            .unwrap_or_else(|| super::helpers::value_to_string(value))
    }
}

impl FieldComponent for SelectComponent {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn render_body(&self, controller: &dyn FormController, focused: bool) -> Vec<Line<'static>> {
        let value = controller.value(&self.descriptor.name);
        let text = if self.is_multi() {
            let labels = selected_values(value)
                .iter()
                .map(|value| self.label_for(value))
                .collect::<Vec<_>>();
            (!labels.is_empty()).then(|| labels.join(", "))
        } else {
            value.map(|value| self.label_for(value))
        };
        let mut spans = match text {
            Some(text) => vec![Span::styled(text, value_style())],
            None => vec![Span::styled("<none>", muted_style())],
        };
        if focused {
            spans.push(Span::styled(" ▾", muted_style()));
        }
        vec![Line::from(spans)]
    }

    fn handle_key(&mut self, key: &KeyEvent, controller: &mut dyn FormController) -> bool {
        if self.is_multi() || self.descriptor.options.is_empty() {
            return false;
        }
        let delta = match key.code {
            KeyCode::Left => -1,
            KeyCode::Right => 1,
            _ => return false,
        };
        let next = match self.selected_index(controller) {
            Some(current) => cycle(current, self.descriptor.options.len(), delta),
            None if delta > 0 => 0,
            None => self.descriptor.options.len() - 1,
        };
        let value = self.descriptor.options[next].value.clone();
        controller.set_value(&self.descriptor.name, Some(value));
        true
    }

    fn choices(&self, controller: &dyn FormController) -> Option<ChoiceList> {
        if self.descriptor.options.is_empty() {
            return None;
        }
        let values = selected_values(controller.value(&self.descriptor.name));
        let active = active_flags(&self.descriptor, &values);
        let selected = if self.is_multi() {
            active.iter().position(|flag| *flag).unwrap_or(0)
        } else {
            self.selected_index(controller).unwrap_or(0)
        };
        Some(ChoiceList {
            field: self.descriptor.name.clone(),
            title: self.descriptor.label.clone(),
            options: self
                .descriptor
                .options
                .iter()
                .map(FieldOption::display_label)
                .collect(),
            selected,
            multi: self.is_multi(),
            active,
        })
    }

    fn apply_choices(
        &mut self,
        selection: usize,
        active: &[bool],
        controller: &mut dyn FormController,
    ) -> bool {
        let options = &self.descriptor.options;
        if self.is_multi() {
            if active.len() != options.len() {
                return false;
            }
            let values = options
                .iter()
                .zip(active)
                .filter(|(_, flag)| **flag)
                .map(|(option, _)| option.value.clone())
                .collect();
            controller.set_value(&self.descriptor.name, list_value(values));
            return true;
        }
        let Some(option) = options.get(selection) else {
            return false;
        };
        controller.set_value(&self.descriptor.name, Some(option.value.clone()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldOption;
    use crate::field::test_support::{key, plain};
    use crate::form::FormState;
    use serde_json::json;

    fn options() -> Vec<FieldOption> {
        vec![
            FieldOption::new("Red", "red"),
            FieldOption::new("Green", "green"),
            FieldOption::new("Blue", "blue"),
        ]
    }

    #[test]
    fn single_select_cycles_through_options() {
        let mut state = FormState::new();
        let mut component = SelectComponent::new(
            FieldDescriptor::new("color", "Color", FieldKind::SingleSelect)
                .with_options(options()),
        );
        component.bind(&mut state);
        assert!(component.handle_key(&key(KeyCode::Left), &mut state));
        assert_eq!(state.value("color"), Some(&json!("blue")));
        assert!(component.handle_key(&key(KeyCode::Right), &mut state));
        assert_eq!(state.value("color"), Some(&json!("red")));
        assert_eq!(plain(&component.render_body(&state, false)), "Red");
    }

    #[test]
    fn choices_expose_exactly_the_options() {
        let state = FormState::new().with_defaults(json!({"color": ["green"]}));
        let component = SelectComponent::new(
            FieldDescriptor::new("color", "Color", FieldKind::MultiSelect)
                .with_options(options()),
        );
        let choices = component.choices(&state).unwrap();
        assert_eq!(choices.options, vec!["Red", "Green", "Blue"]);
        assert_eq!(choices.active, vec![false, true, false]);
        assert_eq!(choices.selected, 1);
        assert!(choices.multi);
    }

    #[test]
    fn option_icons_prefix_labels() {
        let state = FormState::new().with_defaults(json!({"pet": "cat"}));
        let component = SelectComponent::new(
            FieldDescriptor::new("pet", "Pet", FieldKind::SingleSelect).with_options(vec![
                FieldOption::new("Cat", "cat").with_icon("🐈"),
                FieldOption::new("Dog", "dog"),
            ]),
        );
        assert_eq!(plain(&component.render_body(&state, false)), "🐈 Cat");
        let choices = component.choices(&state).unwrap();
        assert_eq!(choices.options, vec!["🐈 Cat", "Dog"]);
    }

    #[test]
    fn multi_selection_follows_option_order() {
        let mut state = FormState::new();
        let mut component = SelectComponent::new(
            FieldDescriptor::new("color", "Color", FieldKind::MultiSelect)
                .with_options(options()),
        );
        component.bind(&mut state);
        assert!(component.apply_choices(0, &[true, false, true], &mut state));
        assert_eq!(state.value("color"), Some(&json!(["red", "blue"])));
        assert_eq!(plain(&component.render_body(&state, false)), "Red, Blue");
        assert!(component.apply_choices(0, &[false, false, false], &mut state));
        assert_eq!(state.value("color"), None);
    }
}
