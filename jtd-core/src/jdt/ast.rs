/// The JDT transform AST (Section 3): a small tagged union parsed from a
/// transform document before the engine walks it, mirroring the
/// parse-then-interpret split of the schema compiler and validator.
use indexmap::IndexMap;
use serde_json::Value;

use super::error::TransformError;

const DIRECTIVE_PREFIX: &str = "@jdt.";

/// A path-targeted directive payload: `{"@jdt.path": "...", "@jdt.value": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTargeted {
    pub path_expr: String,
    pub value: Option<Value>,
}

/// One parsed transform node.
#[derive(Debug, Clone, PartialEq)]
pub enum JdtNode {
    /// A primitive, array, or directive-free object used as a direct value.
    Replacement(Value),
    /// A directive-free object: recurse key-by-key, merging against source.
    Merge(IndexMap<String, JdtNode>),
    /// An object carrying one or more `@jdt.*` directives.
    Directive {
        rename: Option<Value>,
        remove: Option<Value>,
        merge: Option<Value>,
        replace: Option<Value>,
        children: IndexMap<String, JdtNode>,
    },
}

/// Parse a transform document into its AST.
pub fn parse(value: &Value) -> Result<JdtNode, TransformError> {
    let map = match value.as_object() {
        Some(map) => map,
        None => return Ok(JdtNode::Replacement(value.clone())),
    };

    let mut rename = None;
    let mut remove = None;
    let mut merge = None;
    let mut replace = None;
    let mut has_directive = false;
    let mut children = IndexMap::new();

    for (key, val) in map {
        if let Some(name) = key.strip_prefix(DIRECTIVE_PREFIX) {
            has_directive = true;
            match name {
                "rename" => rename = Some(val.clone()),
                "remove" => remove = Some(val.clone()),
                "merge" => merge = Some(val.clone()),
                "replace" => replace = Some(val.clone()),
                other => return Err(TransformError::UnknownDirective(other.to_string())),
            }
        } else {
            children.insert(key.clone(), parse(val)?);
        }
    }

    if has_directive {
        Ok(JdtNode::Directive {
            rename,
            remove,
            merge,
            replace,
            children,
        })
    } else {
        Ok(JdtNode::Merge(children))
    }
}

/// Recognize the path-targeted payload shape used inside directive values.
pub fn as_path_targeted(value: &Value) -> Option<PathTargeted> {
    let map = value.as_object()?;
    let path_expr = map.get("@jdt.path")?.as_str()?.to_string();
    let known: std::collections::HashSet<&str> = ["@jdt.path", "@jdt.value"].into_iter().collect();
    if !map.keys().all(|k| known.contains(k.as_str())) {
        return None;
    }
    Some(PathTargeted {
        path_expr,
        value: map.get("@jdt.value").cloned(),
    })
}
