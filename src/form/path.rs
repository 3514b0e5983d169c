use serde_json::{Map, Value};

pub(crate) fn segments(name: &str) -> impl Iterator<Item = &str> {
    name.split('.').filter(|segment| !segment.is_empty())
}

pub(crate) fn value_at<'a>(root: &'a Value, name: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments(name) {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            Value::Array(items) => {
                let index = segment.parse::<usize>().ok()?;
                current = items.get(index)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

pub(crate) fn insert_at(root: &mut Value, name: &str, value: Value) {
    let path: Vec<&str> = segments(name).collect();
    insert_path(root, &path, value);
}

fn insert_path(root: &mut Value, path: &[&str], value: Value) {
    if path.is_empty() {
        *root = value;
        return;
    }

    if !root.is_object() {
        *root = Value::Object(Map::new());
    }

    if let Value::Object(obj) = root {
        if path.len() == 1 {
            obj.insert(path[0].to_string(), value);
            return;
        }

        let entry = obj
            .entry(path[0].to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        insert_path(entry, &path[1..], value);
    }
}

/// Removes the value at `name`, pruning objects left empty on the way up.
pub(crate) fn remove_at(root: &mut Value, name: &str) -> Option<Value> {
    let path: Vec<&str> = segments(name).collect();
    remove_path(root, &path)
}

fn remove_path(root: &mut Value, path: &[&str]) -> Option<Value> {
    let Value::Object(obj) = root else {
        return None;
    };
    match path {
        [] => None,
        [last] => obj.shift_remove(*last),
        [head, rest @ ..] => {
            let child = obj.get_mut(*head)?;
            let removed = remove_path(child, rest);
            if child.as_object().is_some_and(Map::is_empty) {
                obj.shift_remove(*head);
            }
            removed
        }
    }
}

/// Maps a JSON pointer reported by the validator back to a dotted field name.
pub(crate) fn pointer_to_name(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}
