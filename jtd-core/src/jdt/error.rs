/// JDT transform errors (Section 7.3): fatal, raised before any output
/// document is produced.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TransformError {
    #[error("unknown directive '@jdt.{0}'")]
    UnknownDirective(String),
    #[error("@jdt.rename value must be an object, array of objects, or {{old: new}} pairs")]
    MalformedRename,
    #[error("path-targeted rename is unsupported")]
    PathRenameUnsupported,
    #[error("@jdt.remove value must be a string, boolean, or array of keys")]
    MalformedRemove,
    #[error("@jdt.merge value must be an object, array, or primitive")]
    MalformedMerge,
    #[error("@jdt.replace value is malformed")]
    MalformedReplace,
    #[error("path expression '{0}' did not match any node")]
    PathNotFound(String),
}
