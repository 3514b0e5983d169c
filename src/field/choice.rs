use serde_json::Value;

use crate::domain::FieldDescriptor;

/// Options of a choice field as shown in a picker popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceList {
    pub field: String,
    pub title: String,
    pub options: Vec<String>,
    pub selected: usize,
    pub multi: bool,
    pub active: Vec<bool>,
}

/// Values of a list-valued field; a scalar counts as a one-element list.
pub(crate) fn selected_values(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

/// Adds `value` when absent, removes every occurrence otherwise. Members are
/// kept in `order`; values missing from it trail in their current order.
pub fn toggle_member(current: &[Value], value: &Value, order: &[Value]) -> Vec<Value> {
    if current.contains(value) {
        return current
            .iter()
            .filter(|item| *item != value)
            .cloned()
            .collect();
    }
    let mut next = current.to_vec();
    next.push(value.clone());
    next.sort_by_key(|item| {
        order
            .iter()
            .position(|candidate| candidate == item)
            .unwrap_or(usize::MAX)
    });
    next
}

pub(crate) fn option_values(descriptor: &FieldDescriptor) -> Vec<Value> {
    descriptor
        .options
        .iter()
        .map(|option| option.value.clone())
        .collect()
}

/// Empty lists are stored as missing.
pub(crate) fn list_value(values: Vec<Value>) -> Option<Value> {
    (!values.is_empty()).then_some(Value::Array(values))
}

pub(crate) fn active_flags(descriptor: &FieldDescriptor, values: &[Value]) -> Vec<bool> {
    descriptor
        .options
        .iter()
        .map(|option| values.contains(&option.value))
        .collect()
}

pub(crate) fn cycle(index: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as i64;
    (((index as i64 + i64::from(delta)) % len + len) % len) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn toggling_twice_is_identity() {
        let order = vec![json!("a"), json!("b"), json!("c")];
        let original = vec![json!("a"), json!("c")];
        for value in &order {
            let once = toggle_member(&original, value, &order);
            assert_ne!(once, original);
            assert_eq!(toggle_member(&once, value, &order), original);
        }
    }

    #[test]
    fn added_members_follow_option_order() {
        let order = vec![json!(1), json!(2), json!(3)];
        assert_eq!(
            toggle_member(&[json!(3)], &json!(1), &order),
            vec![json!(1), json!(3)]
        );
        assert_eq!(
            toggle_member(&[json!("stray")], &json!(2), &order),
            vec![json!(2), json!("stray")]
        );
    }

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(cycle(0, 3, -1), 2);
        assert_eq!(cycle(2, 3, 1), 0);
        assert_eq!(cycle(0, 0, 1), 0);
    }
}
