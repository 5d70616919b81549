/// The compiled schema AST: a tagged union over the eight JTD forms plus
/// the nullable modifier. Nodes are immutable once the compiler produces
/// them and may be shared across many concurrent validations.
use indexmap::IndexMap;

/// The 12 type keywords defined in RFC 8927 Section 2.2.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKeyword {
    Boolean,
    String,
    Timestamp,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl TypeKeyword {
    pub fn parse(s: &str) -> Option<TypeKeyword> {
        match s {
            "boolean" => Some(TypeKeyword::Boolean),
            "string" => Some(TypeKeyword::String),
            "timestamp" => Some(TypeKeyword::Timestamp),
            "int8" => Some(TypeKeyword::Int8),
            "uint8" => Some(TypeKeyword::Uint8),
            "int16" => Some(TypeKeyword::Int16),
            "uint16" => Some(TypeKeyword::Uint16),
            "int32" => Some(TypeKeyword::Int32),
            "uint32" => Some(TypeKeyword::Uint32),
            "float32" => Some(TypeKeyword::Float32),
            "float64" => Some(TypeKeyword::Float64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKeyword::Boolean => "boolean",
            TypeKeyword::String => "string",
            TypeKeyword::Timestamp => "timestamp",
            TypeKeyword::Int8 => "int8",
            TypeKeyword::Uint8 => "uint8",
            TypeKeyword::Int16 => "int16",
            TypeKeyword::Uint16 => "uint16",
            TypeKeyword::Int32 => "int32",
            TypeKeyword::Uint32 => "uint32",
            TypeKeyword::Float32 => "float32",
            TypeKeyword::Float64 => "float64",
        }
    }

    /// Inclusive range for the integer keywords. `None` for non-integer
    /// keywords (boolean, string, timestamp, float32, float64).
    pub fn int_range(&self) -> Option<(i64, i64)> {
        match self {
            TypeKeyword::Int8 => Some((-128, 127)),
            TypeKeyword::Uint8 => Some((0, 255)),
            TypeKeyword::Int16 => Some((-32768, 32767)),
            TypeKeyword::Uint16 => Some((0, 65535)),
            TypeKeyword::Int32 => Some((-2_147_483_648, 2_147_483_647)),
            TypeKeyword::Uint32 => Some((0, 4_294_967_295)),
            _ => None,
        }
    }
}

/// An immutable AST node representing one compiled schema form.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `{}` -- accepts any value
    Empty,
    /// `{"ref": "..."}` -- references a definition
    Ref { name: String },
    /// `{"type": "..."}` -- type check
    Type { type_kw: TypeKeyword },
    /// `{"enum": [...]}` -- set membership
    Enum { values: Vec<String> },
    /// `{"elements": ...}` -- array with element schema
    Elements { schema: Box<Node> },
    /// `{"properties": ..., "optionalProperties": ..., "additionalProperties": ...}`
    Properties {
        required: IndexMap<String, Node>,
        optional: IndexMap<String, Node>,
        additional: bool,
    },
    /// `{"values": ...}` -- object with uniform value schema
    Values { schema: Box<Node> },
    /// `{"discriminator": ..., "mapping": ...}` -- tagged union
    Discriminator {
        tag: String,
        mapping: IndexMap<String, Node>,
    },
    /// Any form + `"nullable": true`
    Nullable { inner: Box<Node> },
}

/// A compiled JTD schema: top-level node + flat definitions namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub top: Node,
    pub definitions: IndexMap<String, Node>,
}
