use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type tag of a field. Serialized in kebab-case (`single-select`, `checkbox-group`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Password,
    Number,
    Textarea,
    SingleSelect,
    MultiSelect,
    Date,
    File,
    Switch,
    CheckboxGroup,
    RadioGroup,
    Custom,
}

impl FieldKind {
    /// Kinds backed by an enumerated options list.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            FieldKind::SingleSelect
                | FieldKind::MultiSelect
                | FieldKind::CheckboxGroup
                | FieldKind::RadioGroup
        )
    }

    /// Kinds whose value is a list of option values.
    pub fn is_multi(self) -> bool {
        matches!(self, FieldKind::MultiSelect | FieldKind::CheckboxGroup)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Password => "password",
            FieldKind::Number => "number",
            FieldKind::Textarea => "textarea",
            FieldKind::SingleSelect => "single-select",
            FieldKind::MultiSelect => "multi-select",
            FieldKind::Date => "date",
            FieldKind::File => "file",
            FieldKind::Switch => "switch",
            FieldKind::CheckboxGroup => "checkbox-group",
            FieldKind::RadioGroup => "radio-group",
            FieldKind::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: Value,
    /// Glyph drawn before the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Label as drawn, prefixed by the icon when there is one.
    pub fn display_label(&self) -> String {
        match self.icon.as_deref() {
            Some(icon) if !icon.is_empty() => format!("{icon} {}", self.label),
            _ => self.label.clone(),
        }
    }
}

/// One form field: what it binds to and how it is presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field-path key into the value tree; dots address nested objects.
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, alias = "list", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<u16>,
    #[serde(
        default,
        alias = "otherProps",
        skip_serializing_if = "Map::is_empty"
    )]
    pub props: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
            span: None,
            props: Map::new(),
            component: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_span(mut self, span: u16) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Explicit span, with `0` meaning "unspecified".
    pub fn explicit_span(&self) -> Option<u16> {
        self.span.filter(|span| *span > 0)
    }

    pub fn display_label(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        }
    }

    pub fn prop_bool(&self, key: &str) -> Option<bool> {
        self.props.get(key).and_then(Value::as_bool)
    }

    pub fn prop_u64(&self, key: &str) -> Option<u64> {
        self.props.get(key).and_then(Value::as_u64)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    pub fn option_index(&self, value: &Value) -> Option<usize> {
        self.options.iter().position(|option| &option.value == value)
    }
}

/// Descriptors rendered together as one layout row.
pub type FieldGroup = Vec<FieldDescriptor>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_kebab_case_kinds_and_aliases() {
        let descriptor: FieldDescriptor = serde_json::from_value(json!({
            "name": "colors",
            "label": "Colors",
            "type": "checkbox-group",
            "list": [{"label": "Red", "value": "red"}],
            "otherProps": {"row": true}
        }))
        .unwrap();
        assert_eq!(descriptor.kind, FieldKind::CheckboxGroup);
        assert_eq!(descriptor.options.len(), 1);
        assert_eq!(descriptor.prop_bool("row"), Some(true));
        assert!(!descriptor.required);
    }

    #[test]
    fn option_icon_is_optional() {
        let options: Vec<FieldOption> = serde_json::from_value(json!([
            {"label": "Light", "value": "light", "icon": "☀"},
            {"label": "Dark", "value": "dark"}
        ]))
        .unwrap();
        assert_eq!(options[0].display_label(), "☀ Light");
        assert_eq!(options[1].icon, None);
        assert_eq!(options[1].display_label(), "Dark");
    }

    #[test]
    fn zero_span_counts_as_unspecified() {
        let descriptor = FieldDescriptor::new("a", "A", FieldKind::Text).with_span(0);
        assert_eq!(descriptor.explicit_span(), None);
    }
}
