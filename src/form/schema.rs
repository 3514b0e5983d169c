use serde_json::{Map, Value, json};

use crate::domain::{FieldDescriptor, FieldKind, FormSpec};

use super::path::segments;

const JSON_SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

/// Builds a JSON Schema describing the value shape each field type produces.
///
/// `required` is left out on purpose: required-ness is checked by the field
/// rules so that the message can name the field label.
pub fn form_schema(spec: &FormSpec) -> Value {
    let mut root = object_schema();
    for field in spec.fields() {
        let Some(schema) = field_schema(field) else {
            continue;
        };
        let path: Vec<&str> = segments(&field.name).collect();
        insert_property(&mut root, &path, schema);
    }
    if let Value::Object(map) = &mut root {
        map.insert(
            "$schema".to_string(),
            Value::String(JSON_SCHEMA_DRAFT.to_string()),
        );
    }
    root
}

fn field_schema(field: &FieldDescriptor) -> Option<Value> {
    let schema = match field.kind {
        FieldKind::Text | FieldKind::Password | FieldKind::Textarea => json!({"type": "string"}),
        FieldKind::Number => json!({"type": "number"}),
        FieldKind::Date => json!({"type": "string", "format": "date"}),
        FieldKind::Switch => json!({"type": "boolean"}),
        FieldKind::SingleSelect | FieldKind::RadioGroup => {
            if field.options.is_empty() {
                return None;
            }
            json!({"enum": option_values(field)})
        }
        FieldKind::MultiSelect | FieldKind::CheckboxGroup => {
            let mut schema = json!({"type": "array", "uniqueItems": true});
            if !field.options.is_empty()
                && let Value::Object(map) = &mut schema
            {
                map.insert("items".to_string(), json!({"enum": option_values(field)}));
            }
            schema
        }
        FieldKind::File => {
            let mut schema = json!({
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": ["name", "path"],
                    "properties": {
                        "name": {"type": "string"},
                        "path": {"type": "string"},
                        "size": {"type": "integer", "minimum": 0},
                        "mime": {"type": "string"}
                    }
                }
            });
            if field.prop_bool("multiple") != Some(true)
                && let Value::Object(map) = &mut schema
            {
                map.insert("maxItems".to_string(), json!(1));
            }
            schema
        }
        FieldKind::Custom => return None,
    };
    Some(schema)
}

fn option_values(field: &FieldDescriptor) -> Vec<Value> {
    field
        .options
        .iter()
        .map(|option| option.value.clone())
        .collect()
}

fn object_schema() -> Value {
    json!({"type": "object", "properties": {}})
}

fn insert_property(node: &mut Value, path: &[&str], schema: Value) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    let Some(properties) = node
        .as_object_mut()
        .and_then(|map| {
            map.entry("properties")
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()
        })
    else {
        return;
    };
    if rest.is_empty() {
        properties.insert(head.to_string(), schema);
        return;
    }
    let child = properties
        .entry(head.to_string())
        .or_insert_with(object_schema);
    insert_property(child, rest, schema);
}
