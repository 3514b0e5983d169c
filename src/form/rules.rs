use indexmap::IndexMap;
use serde_json::Value;

/// Validation rules a renderer registers for its field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules {
    pub required: bool,
    pub label: String,
}

impl FieldRules {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            required: false,
            label: label.into(),
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub(crate) fn check(&self, value: Option<&Value>) -> Option<String> {
        if self.required && is_empty(value) {
            Some(format!("{} is required", self.label))
        } else {
            None
        }
    }
}

/// A field counts as empty when it is missing, an empty string or an empty list.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Error messages keyed by field name, in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct FieldErrors(IndexMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.0.insert(name.into(), message.into());
    }

    /// Keeps the first message raised for a field.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.0.entry(name.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn first(&self) -> Option<(&str, &str)> {
        self.0
            .first()
            .map(|(name, message)| (name.as_str(), message.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, message)| (name.as_str(), message.as_str()))
    }
}
