use std::{fmt, rc::Rc};

use crossterm::event::{KeyCode, KeyEvent};
use indexmap::IndexMap;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::FieldDescriptor;
use crate::form::FormController;

use super::FieldComponent;
use super::helpers::muted_style;

/// What a custom widget wants done with the field value after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetChange {
    Unchanged,
    Set(Value),
    Clear,
}

/// Caller-supplied renderer for `custom` fields. The widget never owns the
/// value: it receives the current one and answers with a [`WidgetChange`].
pub trait CustomWidget {
    fn render(&self, value: Option<&Value>, props: &Map<String, Value>) -> Vec<Line<'static>>;

    fn handle_key(
        &mut self,
        value: Option<&Value>,
        key: &KeyEvent,
        props: &Map<String, Value>,
    ) -> WidgetChange;

    fn height(&self, props: &Map<String, Value>) -> u16 {
        let _ = props;
        1
    }
}

type WidgetFactory = Rc<dyn Fn() -> Box<dyn CustomWidget>>;

/// Named custom widget factories. `rating` is registered by default.
#[derive(Clone)]
pub struct WidgetRegistry {
    factories: IndexMap<String, WidgetFactory>,
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("rating", || RatingWidget);
        registry
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    pub fn register<W, F>(&mut self, name: impl Into<String>, factory: F)
    where
        W: CustomWidget + 'static,
        F: Fn() -> W + 'static,
    {
        self.factories.insert(
            name.into(),
            Rc::new(move || Box::new(factory()) as Box<dyn CustomWidget>),
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn CustomWidget>> {
        let widget = self.factories.get(name).map(|factory| factory());
        if widget.is_none() {
            warn!(component = name, "no custom widget registered under this name");
        }
        widget
    }
}

/// Star rating from 0 to `props.max` (default 5). Left/Right step, digits jump.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingWidget;

impl RatingWidget {
    fn max(props: &Map<String, Value>) -> u64 {
        props
            .get("max")
            .and_then(Value::as_u64)
            .filter(|max| *max > 0)
            .unwrap_or(5)
    }
}

impl CustomWidget for RatingWidget {
    fn render(&self, value: Option<&Value>, props: &Map<String, Value>) -> Vec<Line<'static>> {
        let max = Self::max(props);
        let current = value.and_then(Value::as_u64).unwrap_or(0).min(max);
        let filled = "★".repeat(current as usize);
        let empty = "☆".repeat((max - current) as usize);
        vec![Line::from(vec![
            Span::styled(filled, Style::default().fg(Color::Yellow)),
            Span::styled(empty, muted_style()),
            Span::styled(format!(" {current}/{max}"), muted_style()),
        ])]
    }

    fn handle_key(
        &mut self,
        value: Option<&Value>,
        key: &KeyEvent,
        props: &Map<String, Value>,
    ) -> WidgetChange {
        let max = Self::max(props);
        let current = value.and_then(Value::as_u64).unwrap_or(0).min(max);
        let next = match key.code {
            KeyCode::Left => current.saturating_sub(1),
            KeyCode::Right => (current + 1).min(max),
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                u64::from(ch.to_digit(10).unwrap_or(0)).min(max)
            }
            KeyCode::Delete => return WidgetChange::Clear,
            _ => return WidgetChange::Unchanged,
        };
        if value.is_some() && next == current {
            WidgetChange::Unchanged
        } else {
            WidgetChange::Set(Value::from(next))
        }
    }
}

/// Adapter between a [`CustomWidget`] and the controller. Without a widget it
/// renders a placeholder and ignores input.
pub struct CustomComponent {
    descriptor: FieldDescriptor,
    widget: Option<Box<dyn CustomWidget>>,
}

impl fmt::Debug for CustomComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomComponent")
            .field("descriptor", &self.descriptor.name)
            .field("widget", &self.widget.is_some())
            .finish()
    }
}

impl CustomComponent {
    pub fn new(descriptor: FieldDescriptor, widget: Option<Box<dyn CustomWidget>>) -> Self {
        Self { descriptor, widget }
    }

    pub fn has_widget(&self) -> bool {
        self.widget.is_some()
    }
}

impl FieldComponent for CustomComponent {
    fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn body_height(&self) -> u16 {
        self.widget
            .as_ref()
            .map(|widget| widget.height(&self.descriptor.props).max(1))
            .unwrap_or(1)
    }

    fn render_body(&self, controller: &dyn FormController, _focused: bool) -> Vec<Line<'static>> {
        match &self.widget {
            Some(widget) => widget.render(
                controller.value(&self.descriptor.name),
                &self.descriptor.props,
            ),
            None => {
                let name = self.descriptor.component.as_deref().unwrap_or("?");
                vec![Line::from(Span::styled(
                    format!("<unknown component: {name}>"),
                    Style::default().fg(Color::Red),
                ))]
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, controller: &mut dyn FormController) -> bool {
        let Some(widget) = self.widget.as_mut() else {
            return false;
        };
        let name = self.descriptor.name.clone();
        let change = widget.handle_key(controller.value(&name), key, &self.descriptor.props);
        match change {
            WidgetChange::Unchanged => false,
            WidgetChange::Set(value) => {
                controller.set_value(&name, Some(value));
                true
            }
            WidgetChange::Clear => {
                controller.set_value(&name, None);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldKind;
    use crate::field::test_support::{key, plain};
    use crate::form::FormState;
    use serde_json::json;

    fn rating_field() -> FieldDescriptor {
        FieldDescriptor::new("stars", "Stars", FieldKind::Custom)
            .with_component("rating")
            .with_prop("max", 3)
    }

    #[test]
    fn default_registry_knows_rating() {
        let registry = WidgetRegistry::default();
        assert!(registry.contains("rating"));
        assert!(registry.create("rating").is_some());
        assert!(registry.create("slider").is_none());
    }

    #[test]
    fn rating_steps_within_bounds() {
        let registry = WidgetRegistry::default();
        let mut state = FormState::new();
        let mut component = CustomComponent::new(rating_field(), registry.create("rating"));
        component.bind(&mut state);

        for _ in 0..5 {
            component.handle_key(&key(KeyCode::Right), &mut state);
        }
        assert_eq!(state.value("stars"), Some(&json!(3)));
        assert_eq!(plain(&component.render_body(&state, false)), "★★★ 3/3");
        assert!(!component.handle_key(&key(KeyCode::Right), &mut state));

        component.handle_key(&key(KeyCode::Char('1')), &mut state);
        assert_eq!(state.value("stars"), Some(&json!(1)));
        component.handle_key(&key(KeyCode::Delete), &mut state);
        assert_eq!(state.value("stars"), None);
    }

    #[test]
    fn missing_widget_renders_placeholder() {
        let mut state = FormState::new();
        let mut component = CustomComponent::new(
            FieldDescriptor::new("x", "X", FieldKind::Custom).with_component("slider"),
            None,
        );
        component.bind(&mut state);
        assert!(!component.has_widget());
        assert!(!component.handle_key(&key(KeyCode::Right), &mut state));
        assert_eq!(
            plain(&component.render_body(&state, false)),
            "<unknown component: slider>"
        );
    }

    #[test]
    fn registered_widgets_receive_props() {
        struct Echo;
        impl CustomWidget for Echo {
            fn render(&self, _: Option<&Value>, props: &Map<String, Value>) -> Vec<Line<'static>> {
                vec![Line::from(props.get("tag").map(Value::to_string).unwrap_or_default())]
            }
            fn handle_key(
                &mut self,
                _: Option<&Value>,
                _: &KeyEvent,
                _: &Map<String, Value>,
            ) -> WidgetChange {
                WidgetChange::Set(json!("pressed"))
            }
        }

        let mut registry = WidgetRegistry::empty();
        registry.register("echo", || Echo);
        let descriptor = FieldDescriptor::new("e", "E", FieldKind::Custom)
            .with_component("echo")
            .with_prop("tag", "hi");
        let mut state = FormState::new();
        let mut component = CustomComponent::new(descriptor, registry.create("echo"));
        component.bind(&mut state);
        assert_eq!(plain(&component.render_body(&state, false)), "\"hi\"");
        assert!(component.handle_key(&key(KeyCode::Enter), &mut state));
        assert_eq!(state.value("e"), Some(&json!("pressed")));
    }
}
