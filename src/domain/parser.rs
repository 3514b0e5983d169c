use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use super::descriptor::FieldKind;
use super::spec::FormSpec;

/// A descriptor that breaks one of the model invariants. Such descriptors are
/// still rendered; the issue only ends up in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecIssue {
    pub field: String,
    pub message: String,
}

pub fn parse_form_spec(value: &Value) -> Result<FormSpec> {
    let spec: FormSpec =
        serde_json::from_value(value.clone()).context("failed to parse form description")?;
    for issue in inspect_form_spec(&spec) {
        warn!(field = %issue.field, "{}", issue.message);
    }
    Ok(spec)
}

pub fn inspect_form_spec(spec: &FormSpec) -> Vec<SpecIssue> {
    inspect_form_spec_with(spec, |_| true)
}

/// Like [`inspect_form_spec`], also reporting custom fields whose component
/// `is_known_component` rejects.
pub fn inspect_form_spec_with(
    spec: &FormSpec,
    is_known_component: impl Fn(&str) -> bool,
) -> Vec<SpecIssue> {
    let mut issues = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for (row, group) in spec.groups.iter().enumerate() {
        let defined: u32 = group
            .iter()
            .filter_map(|field| field.explicit_span())
            .map(u32::from)
            .sum();
        if defined > 12 {
            issues.push(SpecIssue {
                field: format!("<group {row}>"),
                message: format!("explicit spans add up to {defined}, the row will overflow"),
            });
        }
        for field in group {
            let mut push = |message: String| {
                issues.push(SpecIssue {
                    field: field.name.clone(),
                    message,
                })
            };
            if !seen.insert(field.name.as_str()) {
                push("duplicate field name".to_string());
            }
            if field.kind.is_choice() && field.options.is_empty() {
                push(format!("{} field has no options", field.kind.as_str()));
            }
            if !field.kind.is_choice() && !field.options.is_empty() {
                push(format!(
                    "options are ignored for {} fields",
                    field.kind.as_str()
                ));
            }
            match (field.kind, field.component.as_ref()) {
                (FieldKind::Custom, None) => push("custom field has no component".to_string()),
                (FieldKind::Custom, Some(component)) if !is_known_component(component) => {
                    push(format!("unknown custom component `{component}`"))
                }
                (kind, Some(_)) if kind != FieldKind::Custom => {
                    push("component is only used by custom fields".to_string())
                }
                _ => {}
            }
            if let Some(span) = field.explicit_span()
                && span > 12
            {
                push(format!("span {span} exceeds the 12 column grid"));
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reports_choice_field_without_options() {
        let spec = parse_form_spec(&json!({
            "groups": [[
                {"name": "role", "label": "Role", "type": "single-select"},
                {"name": "bio", "label": "Bio", "type": "custom"}
            ]]
        }))
        .unwrap();
        let issues = inspect_form_spec(&spec);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "role");
        assert_eq!(issues[1].message, "custom field has no component");
    }

    #[test]
    fn reports_overflowing_rows_and_duplicates() {
        let spec = parse_form_spec(&json!({
            "groups": [[
                {"name": "a", "label": "A", "type": "text", "span": 8},
                {"name": "a", "label": "A again", "type": "text", "span": 8}
            ]]
        }))
        .unwrap();
        let issues = inspect_form_spec(&spec);
        assert!(issues.iter().any(|issue| issue.field == "<group 0>"));
        assert!(issues.iter().any(|issue| issue.message == "duplicate field name"));
    }

    #[test]
    fn reports_unregistered_components() {
        let spec = parse_form_spec(&json!({
            "groups": [[
                {"name": "stars", "label": "Stars", "type": "custom", "component": "rating"},
                {"name": "hue", "label": "Hue", "type": "custom", "component": "palette"}
            ]]
        }))
        .unwrap();
        assert!(inspect_form_spec(&spec).is_empty());
        let issues = inspect_form_spec_with(&spec, |name| name == "rating");
        assert_eq!(
            issues,
            vec![SpecIssue {
                field: "hue".to_string(),
                message: "unknown custom component `palette`".to_string(),
            }]
        );
    }

    #[test]
    fn rejects_unknown_field_type() {
        let err = parse_form_spec(&json!({
            "groups": [[{"name": "a", "label": "A", "type": "slider"}]]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("form description"));
    }
}
