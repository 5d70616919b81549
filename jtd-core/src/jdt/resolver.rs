use serde_json::Value;

use crate::pointer;

/// Resolves a `@jdt.path` expression against a JSON value, returning the
/// JSON Pointers (RFC 6901) of every node the expression matches.
///
/// Callers with a richer path language (JSONPath, a query DSL) implement
/// this trait themselves and pass it to [`crate::jdt::transform`]. The
/// engine never interprets path syntax on its own.
pub trait PathResolver {
    fn resolve(&self, value: &Value, path_expr: &str) -> Vec<String>;
}

/// The resolver used when the caller supplies none: `path_expr` is itself
/// taken to be a JSON Pointer. Matches at most one node.
pub struct JsonPointerResolver;

impl PathResolver for JsonPointerResolver {
    fn resolve(&self, value: &Value, path_expr: &str) -> Vec<String> {
        if pointer::get(value, path_expr).is_some() {
            vec![path_expr.to_string()]
        } else {
            Vec::new()
        }
    }
}

pub fn default_resolver() -> JsonPointerResolver {
    JsonPointerResolver
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_resolver_matches_existing_pointer() {
        let v = json!({"a": {"b": 1}});
        let hits = default_resolver().resolve(&v, "/a/b");
        assert_eq!(hits, vec!["/a/b".to_string()]);
    }

    #[test]
    fn default_resolver_misses_absent_pointer() {
        let v = json!({"a": 1});
        let hits = default_resolver().resolve(&v, "/a/b");
        assert!(hits.is_empty());
    }
}
