use std::fmt;

use anyhow::{Context, Result};
use indexmap::{IndexMap, IndexSet};
use jsonschema::Validator;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::FormSpec;

use super::{
    controller::FormController,
    path::{insert_at, pointer_to_name, remove_at, value_at},
    rules::{FieldErrors, FieldRules},
    schema::form_schema,
};

/// In-memory [`FormController`]: a value tree, its defaults, registered rules
/// and an optional JSON Schema validator.
pub struct FormState {
    values: Value,
    defaults: Value,
    rules: IndexMap<String, FieldRules>,
    errors: FieldErrors,
    dirty: IndexSet<String>,
    touched: IndexSet<String>,
    validator: Option<Validator>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            values: Value::Object(Map::new()),
            defaults: Value::Object(Map::new()),
            rules: IndexMap::new(),
            errors: FieldErrors::new(),
            dirty: IndexSet::new(),
            touched: IndexSet::new(),
            validator: None,
        }
    }
}

impl fmt::Debug for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("dirty", &self.dirty)
            .field("touched", &self.touched)
            .field("schema", &self.validator.is_some())
            .finish()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state whose validator checks the value shapes the form's field types
    /// produce.
    pub fn for_spec(spec: &FormSpec) -> Result<Self> {
        Self::new().with_schema(&form_schema(spec))
    }

    pub fn with_schema(mut self, schema: &Value) -> Result<Self> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(schema)
            .context("failed to compile form schema")?;
        self.validator = Some(validator);
        Ok(self)
    }

    /// Sets the values `reset` returns to and makes them current.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        let defaults = match defaults {
            Value::Object(_) => defaults,
            _ => Value::Object(Map::new()),
        };
        self.values = defaults.clone();
        self.defaults = defaults;
        self
    }

    pub fn is_field_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    pub fn rules(&self, name: &str) -> Option<&FieldRules> {
        self.rules.get(name)
    }

    fn field_for_pointer(&self, pointer: &str) -> String {
        let mut name = pointer_to_name(pointer);
        while !name.is_empty() && !self.rules.contains_key(&name) {
            match name.rfind('.') {
                Some(idx) => name.truncate(idx),
                None => return pointer_to_name(pointer),
            }
        }
        name
    }
}

impl FormController for FormState {
    fn value(&self, name: &str) -> Option<&Value> {
        value_at(&self.values, name)
    }

    fn set_value(&mut self, name: &str, value: Option<Value>) {
        match value {
            Some(value) => insert_at(&mut self.values, name, value),
            None => {
                remove_at(&mut self.values, name);
            }
        }
        if value_at(&self.values, name) == value_at(&self.defaults, name) {
            self.dirty.shift_remove(name);
        } else {
            self.dirty.insert(name.to_string());
        }
        self.touched.insert(name.to_string());
        self.errors.remove(name);
    }

    fn values(&self) -> Value {
        self.values.clone()
    }

    fn register(&mut self, name: &str, rules: FieldRules) {
        debug!(field = name, required = rules.required, "field registered");
        self.rules.insert(name.to_string(), rules);
    }

    fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    fn set_error(&mut self, name: &str, message: String) {
        self.errors.insert(name, message);
    }

    fn clear_errors(&mut self) {
        self.errors.clear();
    }

    fn errors(&self) -> FieldErrors {
        self.errors.clone()
    }

    fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    fn validate(&mut self) -> Result<Value, FieldErrors> {
        let mut errors = FieldErrors::new();
        for (name, rules) in &self.rules {
            if let Some(message) = rules.check(value_at(&self.values, name)) {
                errors.insert(name.clone(), message);
            }
        }
        if let Some(validator) = &self.validator {
            for error in validator.iter_errors(&self.values) {
                let pointer = error.instance_path.to_string();
                let name = self.field_for_pointer(&pointer);
                let label = self
                    .rules
                    .get(&name)
                    .map(|rules| rules.label.as_str())
                    .unwrap_or("<form>");
                debug!(field = %name, "schema violation: {error}");
                errors.insert_if_absent(name.clone(), format!("{label}: {error}"));
            }
        }
        self.errors = errors.clone();
        if errors.is_empty() {
            Ok(self.values.clone())
        } else {
            Err(errors)
        }
    }

    fn reset(&mut self) {
        debug!("form reset");
        self.values = self.defaults.clone();
        self.errors.clear();
        self.dirty.clear();
        self.touched.clear();
    }
}
