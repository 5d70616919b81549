/// The JDT transform interpreter (Section 4.4): walks a [`JdtNode`] tree
/// alongside a source document, applying the rename -> remove -> merge ->
/// replace directive pipeline at each directive node and a structural
/// deep-merge everywhere else.
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::ast::{self, as_path_targeted, JdtNode};
use super::error::TransformError;
use super::resolver::{default_resolver, PathResolver};
use crate::pointer;

/// Transform `source` under `transform_doc` using the default, JSON-Pointer
/// -only path resolver.
pub fn transform(source: &Value, transform_doc: &Value) -> Result<Value, TransformError> {
    transform_with_resolver(source, transform_doc, &default_resolver())
}

/// Transform `source` under `transform_doc`, resolving any `@jdt.path`
/// expressions with a caller-supplied resolver.
pub fn transform_with_resolver(
    source: &Value,
    transform_doc: &Value,
    resolver: &dyn PathResolver,
) -> Result<Value, TransformError> {
    let node = ast::parse(transform_doc)?;
    apply(source, &node, resolver)
}

fn apply(source: &Value, node: &JdtNode, resolver: &dyn PathResolver) -> Result<Value, TransformError> {
    match node {
        // Default semantics: a parallel pair of arrays concatenates rather
        // than being replaced wholesale; everything else (scalar vs.
        // scalar, array vs. non-array, ...) is a direct replacement.
        JdtNode::Replacement(v) => Ok(deep_merge(source, v)),
        JdtNode::Merge(children) => apply_merge_children(source, children, resolver),
        JdtNode::Directive {
            rename,
            remove,
            merge,
            replace,
            children,
        } => {
            let mut current = source.clone();
            if let Some(r) = rename {
                current = apply_rename(&current, r)?;
            }
            if let Some(r) = remove {
                current = apply_remove(&current, r, resolver)?;
            }
            if let Some(m) = merge {
                current = apply_merge_directive(&current, m, resolver)?;
            }
            if let Some(r) = replace {
                current = apply_replace_directive(&current, r, resolver)?;
            }
            if !children.is_empty() {
                current = apply_merge_children(&current, children, resolver)?;
            }
            Ok(current)
        }
    }
}

/// Default merge semantics: recurse into each child against the matching
/// source key (or `null` if source is not an object / lacks the key),
/// carrying through every source key the transform doesn't mention.
fn apply_merge_children(
    source: &Value,
    children: &IndexMap<String, JdtNode>,
    resolver: &dyn PathResolver,
) -> Result<Value, TransformError> {
    let mut result = match source.as_object() {
        Some(map) => map.clone(),
        None => Map::new(),
    };
    for (key, child) in children {
        let child_source = result.get(key).cloned().unwrap_or(Value::Null);
        let child_result = apply(&child_source, child, resolver)?;
        result.insert(key.clone(), child_result);
    }
    Ok(Value::Object(result))
}

/// Generic structural merge used by `@jdt.merge` when its value is a plain
/// (non-path, non-array) object: recurse key by key, concatenate parallel
/// arrays, and otherwise let the patch value win.
fn deep_merge(current: &Value, patch: &Value) -> Value {
    match (current, patch) {
        (Value::Object(cur), Value::Object(pat)) => {
            let mut result = cur.clone();
            for (k, v) in pat {
                let merged = match result.get(k) {
                    Some(existing) => deep_merge(existing, v),
                    None => v.clone(),
                };
                result.insert(k.clone(), merged);
            }
            Value::Object(result)
        }
        (Value::Array(cur), Value::Array(pat)) => {
            let mut result = cur.clone();
            result.extend(pat.clone());
            Value::Array(result)
        }
        (_, patch) => patch.clone(),
    }
}

fn unwrap_double_bracket(value: &Value) -> Option<&Value> {
    let arr = value.as_array()?;
    if arr.len() == 1 && arr[0].is_array() {
        Some(&arr[0])
    } else {
        None
    }
}

fn apply_merge_directive(
    current: &Value,
    merge_value: &Value,
    resolver: &dyn PathResolver,
) -> Result<Value, TransformError> {
    if let Some(pt) = as_path_targeted(merge_value) {
        let payload = pt.value.ok_or(TransformError::MalformedMerge)?;
        return apply_at_path(current, &pt.path_expr, resolver, |node| Ok(deep_merge(node, &payload)));
    }
    if let Some(literal_array) = unwrap_double_bracket(merge_value) {
        return Ok(literal_array.clone());
    }
    match merge_value {
        Value::Array(items) => {
            let mut result = current.clone();
            for item in items {
                result = apply_merge_directive(&result, item, resolver)?;
            }
            Ok(result)
        }
        Value::Object(_) => Ok(deep_merge(current, merge_value)),
        other => Ok(other.clone()),
    }
}

fn apply_replace_directive(
    current: &Value,
    replace_value: &Value,
    resolver: &dyn PathResolver,
) -> Result<Value, TransformError> {
    if let Some(pt) = as_path_targeted(replace_value) {
        let payload = pt.value.ok_or(TransformError::MalformedReplace)?;
        return apply_at_path(current, &pt.path_expr, resolver, |_| Ok(payload.clone()));
    }
    if let Some(literal_array) = unwrap_double_bracket(replace_value) {
        return Ok(literal_array.clone());
    }
    Ok(replace_value.clone())
}

fn apply_remove(
    current: &Value,
    remove_value: &Value,
    resolver: &dyn PathResolver,
) -> Result<Value, TransformError> {
    if let Some(pt) = as_path_targeted(remove_value) {
        return remove_at_path(current, &pt.path_expr, resolver);
    }
    match remove_value {
        Value::String(key) => {
            let mut map = current.as_object().cloned().unwrap_or_default();
            map.shift_remove(key);
            Ok(Value::Object(map))
        }
        Value::Bool(true) => Ok(Value::Null),
        Value::Bool(false) => Ok(current.clone()),
        Value::Array(items) => {
            let mut result = current.clone();
            for item in items {
                result = apply_remove(&result, item, resolver)?;
            }
            Ok(result)
        }
        _ => Err(TransformError::MalformedRemove),
    }
}

fn apply_rename(current: &Value, rename_value: &Value) -> Result<Value, TransformError> {
    if as_path_targeted(rename_value).is_some() {
        return Err(TransformError::PathRenameUnsupported);
    }
    match rename_value {
        Value::Object(pairs) => rename_once(current, pairs),
        Value::Array(items) => {
            let mut result = current.clone();
            for item in items {
                let pairs = item.as_object().ok_or(TransformError::MalformedRename)?;
                result = rename_once(&result, pairs)?;
            }
            Ok(result)
        }
        _ => Err(TransformError::MalformedRename),
    }
}

fn rename_once(current: &Value, pairs: &Map<String, Value>) -> Result<Value, TransformError> {
    let map = match current.as_object() {
        Some(map) => map,
        None => return Ok(current.clone()),
    };
    let mut renamed: IndexMap<String, String> = IndexMap::new();
    for (old, new) in pairs {
        let new_name = new.as_str().ok_or(TransformError::MalformedRename)?;
        renamed.insert(old.clone(), new_name.to_string());
    }
    let mut result = Map::new();
    for (key, value) in map {
        let out_key = renamed.get(key).cloned().unwrap_or_else(|| key.clone());
        result.insert(out_key, value.clone());
    }
    Ok(Value::Object(result))
}

/// Resolve `path_expr` against `current` and apply `f` to every matched
/// node, writing the result back in place.
fn apply_at_path(
    current: &Value,
    path_expr: &str,
    resolver: &dyn PathResolver,
    f: impl Fn(&Value) -> Result<Value, TransformError>,
) -> Result<Value, TransformError> {
    let hits = resolver.resolve(current, path_expr);
    if hits.is_empty() {
        return Err(TransformError::PathNotFound(path_expr.to_string()));
    }
    let mut result = current.clone();
    for hit in hits {
        let node = pointer::get(&result, &hit).ok_or_else(|| TransformError::PathNotFound(hit.clone()))?;
        let replacement = f(node)?;
        pointer::set(&mut result, &hit, replacement);
    }
    Ok(result)
}

fn remove_at_path(
    current: &Value,
    path_expr: &str,
    resolver: &dyn PathResolver,
) -> Result<Value, TransformError> {
    let hits = resolver.resolve(current, path_expr);
    if hits.is_empty() {
        return Err(TransformError::PathNotFound(path_expr.to_string()));
    }
    let mut result = current.clone();
    for hit in hits {
        pointer::remove(&mut result, &hit);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_merge_recurses_and_carries_source_keys() {
        let source = json!({"Settings": {"A": 1, "B": 2}});
        let patch = json!({"Settings": {"A": 10, "C": 3}});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"Settings": {"A": 10, "B": 2, "C": 3}}));
    }

    #[test]
    fn default_merge_concatenates_parallel_arrays() {
        let source = json!({"tags": [1, 2]});
        let patch = json!({"tags": [3, 4]});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"tags": [1, 2, 3, 4]}));
    }

    #[test]
    fn default_merge_replaces_when_source_is_not_an_array() {
        let source = json!({"tags": "none"});
        let patch = json!({"tags": [1, 2]});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"tags": [1, 2]}));
    }

    #[test]
    fn rename_then_remove() {
        let source = json!({"A": 1, "B": 2, "C": 3});
        let patch = json!({"@jdt.rename": {"A": "Astar"}, "@jdt.remove": "B"});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"Astar": 1, "C": 3}));
    }

    #[test]
    fn rename_array_form_applies_in_sequence() {
        let source = json!({"A": 1, "B": 2});
        let patch = json!({"@jdt.rename": [{"A": "X"}, {"B": "Y"}]});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"X": 1, "Y": 2}));
    }

    #[test]
    fn path_targeted_rename_is_rejected() {
        let source = json!({"A": 1});
        let patch = json!({"@jdt.rename": {"@jdt.path": "/A", "@jdt.value": "X"}});
        let err = transform(&source, &patch).unwrap_err();
        assert_eq!(err, TransformError::PathRenameUnsupported);
    }

    #[test]
    fn remove_true_nulls_the_node() {
        let source = json!({"a": {"b": 1}});
        let patch = json!({"a": {"@jdt.remove": true}});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"a": null}));
    }

    #[test]
    fn remove_array_of_keys() {
        let source = json!({"a": 1, "b": 2, "c": 3});
        let patch = json!({"@jdt.remove": ["a", "c"]});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"b": 2}));
    }

    #[test]
    fn merge_primitive_replaces_wholesale() {
        let source = json!({"a": 1});
        let patch = json!({"@jdt.merge": 42});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!(42));
    }

    #[test]
    fn merge_double_bracket_uses_literal_array() {
        let source = json!({"a": [1, 2]});
        let patch = json!({"a": {"@jdt.merge": [[9, 9, 9]]}});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"a": [9, 9, 9]}));
    }

    #[test]
    fn replace_object_uses_value_literally_no_structural_merge() {
        let source = json!({"a": {"x": 1, "y": 2}});
        let patch = json!({"a": {"@jdt.replace": {"y": 99}}});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"a": {"y": 99}}));
    }

    #[test]
    fn path_targeted_merge_patches_matched_node() {
        let source = json!({"a": {"b": {"x": 1}}});
        let patch = json!({
            "@jdt.merge": {"@jdt.path": "/a/b", "@jdt.value": {"y": 2}}
        });
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"a": {"b": {"x": 1, "y": 2}}}));
    }

    #[test]
    fn unknown_directive_propagates_as_error() {
        let err = transform(&json!({}), &json!({"@jdt.bogus": 1})).unwrap_err();
        assert_eq!(err, TransformError::UnknownDirective("bogus".to_string()));
    }

    #[test]
    fn non_object_source_under_merge_node_builds_from_children_only() {
        let source = json!(null);
        let patch = json!({"a": 1, "b": 2});
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn scalar_transform_replaces_wholesale_regardless_of_source() {
        let source = json!({"a": 1});
        let patch = json!("replaced");
        let result = transform(&source, &patch).unwrap();
        assert_eq!(result, json!("replaced"));
    }
}
