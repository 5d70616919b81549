/// RFC 6901 JSON Pointer construction, shared by the interpreter and the
/// JDT engine so both build paths the same way.

/// Escape one reference-token per RFC 6901: `~` -> `~0`, `/` -> `~1`.
/// Order matters -- `~` must be escaped first, or a literal `~1` in the
/// input would be mistaken for an escaped `/`.
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Append a property-name segment to a pointer, escaping it.
pub fn push_key(pointer: &str, key: &str) -> String {
    format!("{pointer}/{}", escape_token(key))
}

/// Append an array-index segment to a pointer (decimal, unescaped).
pub fn push_index(pointer: &str, index: usize) -> String {
    format!("{pointer}/{index}")
}

/// Append a bare, already-escaped literal segment (e.g. a schema keyword).
pub fn push_segment(pointer: &str, segment: &str) -> String {
    format!("{pointer}/{segment}")
}

/// Reverse of [`escape_token`].
fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn tokens(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        Vec::new()
    } else {
        pointer.split('/').skip(1).map(unescape_token).collect()
    }
}

/// Resolve a JSON Pointer against a value. `""` resolves to the whole value.
pub fn get<'a>(value: &'a serde_json::Value, pointer: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for token in tokens(pointer) {
        current = match current {
            serde_json::Value::Object(map) => map.get(&token)?,
            serde_json::Value::Array(arr) => arr.get(token.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve a JSON Pointer mutably.
pub fn get_mut<'a>(
    value: &'a mut serde_json::Value,
    pointer: &str,
) -> Option<&'a mut serde_json::Value> {
    let mut current = value;
    for token in tokens(pointer) {
        current = match current {
            serde_json::Value::Object(map) => map.get_mut(&token)?,
            serde_json::Value::Array(arr) => arr.get_mut(token.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Replace the value at `pointer`. Returns `false` if the pointer does not
/// resolve to an existing node.
pub fn set(root: &mut serde_json::Value, pointer: &str, new_value: serde_json::Value) -> bool {
    match get_mut(root, pointer) {
        Some(slot) => {
            *slot = new_value;
            true
        }
        None => false,
    }
}

/// Remove the node at `pointer` from its parent container. Returns the
/// removed value, or `None` if the pointer does not resolve.
pub fn remove(root: &mut serde_json::Value, pointer: &str) -> Option<serde_json::Value> {
    let toks = tokens(pointer);
    if toks.is_empty() {
        return None;
    }
    let (last, parents) = toks.split_last().unwrap();
    let mut current = root;
    for token in parents {
        current = match current {
            serde_json::Value::Object(map) => map.get_mut(token)?,
            serde_json::Value::Array(arr) => arr.get_mut(token.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match current {
        serde_json::Value::Object(map) => map.shift_remove(last),
        serde_json::Value::Array(arr) => {
            let idx: usize = last.parse().ok()?;
            if idx < arr.len() {
                Some(arr.remove(idx))
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_tilde_and_slash() {
        assert_eq!(escape_token("a~b"), "a~0b");
        assert_eq!(escape_token("a/b"), "a~1b");
        assert_eq!(escape_token("a~1b"), "a~01b");
    }

    #[test]
    fn push_key_builds_pointer() {
        assert_eq!(push_key("", "name"), "/name");
        assert_eq!(push_key("/a", "b/c"), "/a/b~1c");
    }

    #[test]
    fn push_index_is_decimal() {
        assert_eq!(push_index("/tags", 0), "/tags/0");
        assert_eq!(push_index("", 42), "/42");
    }

    #[test]
    fn push_segment_is_literal() {
        assert_eq!(push_segment("", "type"), "/type");
        assert_eq!(push_segment("/properties", "name"), "/properties/name");
    }

    #[test]
    fn get_resolves_nested_object_and_array() {
        let v = serde_json::json!({"a": {"b": [1, 2, 3]}});
        assert_eq!(get(&v, "/a/b/1"), Some(&serde_json::json!(2)));
        assert_eq!(get(&v, ""), Some(&v));
        assert_eq!(get(&v, "/a/missing"), None);
    }

    #[test]
    fn set_replaces_existing_node() {
        let mut v = serde_json::json!({"a": 1});
        assert!(set(&mut v, "/a", serde_json::json!(2)));
        assert_eq!(v, serde_json::json!({"a": 2}));
        assert!(!set(&mut v, "/b", serde_json::json!(3)));
    }

    #[test]
    fn remove_drops_object_key_and_array_element() {
        let mut v = serde_json::json!({"a": 1, "b": 2});
        assert_eq!(remove(&mut v, "/a"), Some(serde_json::json!(1)));
        assert_eq!(v, serde_json::json!({"b": 2}));

        let mut arr = serde_json::json!([1, 2, 3]);
        assert_eq!(remove(&mut arr, "/1"), Some(serde_json::json!(2)));
        assert_eq!(arr, serde_json::json!([1, 3]));
    }
}
