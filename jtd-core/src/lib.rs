/// JSON Type Definition (RFC 8927) schema compiler and validator, plus a
/// directive-based JSON document transform engine.
///
/// ```no_run
/// use jtd_core::{compile, validate};
/// use serde_json::json;
///
/// let root = compile(&json!({"properties": {"name": {"type": "string"}}})).unwrap();
/// let errors = validate(&root, &json!({"name": 1}));
/// assert_eq!(errors.len(), 1);
/// ```
pub mod ast;
pub mod compiler;
pub mod interpreter;
pub mod jdt;
pub mod pointer;
pub mod value;

pub use ast::{Node, Root, TypeKeyword};
pub use compiler::{compile, CompileError};
pub use interpreter::{validate, validate_with_limit, ValidationError};
pub use jdt::{transform, transform_with_resolver, JdtNode, PathResolver, TransformError};
pub use value::{Kind, ValueExt};
