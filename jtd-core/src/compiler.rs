/// Schema compiler: parses a JTD JSON schema (RFC 8927) into the
/// immutable AST of [`crate::ast`]. Implements Section 4.2.
use crate::ast::{Node, Root, TypeKeyword};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CompileError {
    #[error("schema must be a JSON object")]
    BadSchemaType,
    #[error("definitions must be a JSON object")]
    DefinitionsNotObject,
    #[error("non-root schema must not have 'definitions'")]
    NestedDefinitions,
    #[error("schema has multiple forms: {0:?}")]
    MultipleForms(Vec<&'static str>),
    #[error("unknown key for this form: '{0}'")]
    UnknownFormKey(String),
    #[error("ref must be a string")]
    RefNotString,
    #[error("ref '{0}' not found in definitions")]
    RefNotFound(String),
    #[error("type must be a string")]
    TypeNotString,
    #[error("unknown type keyword: '{0}'")]
    UnknownType(String),
    #[error("enum must be a non-empty array of strings")]
    InvalidEnum,
    #[error("enum contains duplicate values")]
    EnumDuplicates,
    #[error("properties must be a JSON object")]
    PropertiesNotObject,
    #[error("required and optional properties must not overlap: '{0}'")]
    OverlappingProperties(String),
    #[error("discriminator must be a string")]
    DiscriminatorNotString,
    #[error("discriminator schema must have 'mapping'")]
    MissingMapping,
    #[error("mapping must be a JSON object")]
    MappingNotObject,
    #[error("mapping present without 'discriminator'")]
    MappingWithoutDiscriminator,
    #[error("discriminator mapping value must be an object")]
    MappingValueNotObject,
    #[error("discriminator mapping values must not be nullable")]
    MappingValueNullable,
    #[error("discriminator mapping values must be Properties forms")]
    MappingNotProperties,
    #[error("discriminator tag '{0}' must not appear in mapping variant properties")]
    TagInVariant(String),
    #[error("'nullable' must be a literal boolean")]
    NonBooleanNullable,
}

/// Compile a JTD schema from a JSON value. Entry point for Section 4.2.
pub fn compile(schema: &Value) -> Result<Root, CompileError> {
    let obj = schema.as_object().ok_or(CompileError::BadSchemaType)?;

    let mut definitions: IndexMap<String, Node> = IndexMap::new();
    let mut def_keys = Vec::new();

    // Pass 1: register definition keys as placeholders so forward refs
    // (including mutually-recursive ones) resolve during pass 2.
    if let Some(defs_val) = obj.get("definitions") {
        let defs_obj = defs_val
            .as_object()
            .ok_or(CompileError::DefinitionsNotObject)?;
        for key in defs_obj.keys() {
            def_keys.push(key.clone());
            definitions.insert(key.clone(), Node::Empty);
        }
    }

    // Pass 2: compile each definition body against the placeholder map.
    if let Some(defs_val) = obj.get("definitions") {
        let defs_obj = defs_val.as_object().unwrap();
        for key in &def_keys {
            let node = compile_node(defs_obj.get(key).unwrap(), false, &definitions)?;
            definitions.insert(key.clone(), node);
        }
    }

    let top = compile_node(schema, true, &definitions)?;

    Ok(Root { top, definitions })
}

fn compile_node(
    json: &Value,
    is_root: bool,
    definitions: &IndexMap<String, Node>,
) -> Result<Node, CompileError> {
    let obj = json.as_object().ok_or(CompileError::BadSchemaType)?;

    if !is_root && obj.contains_key("definitions") {
        return Err(CompileError::NestedDefinitions);
    }

    let mut forms: Vec<&'static str> = Vec::new();
    if obj.contains_key("ref") {
        forms.push("ref");
    }
    if obj.contains_key("type") {
        forms.push("type");
    }
    if obj.contains_key("enum") {
        forms.push("enum");
    }
    if obj.contains_key("elements") {
        forms.push("elements");
    }
    if obj.contains_key("values") {
        forms.push("values");
    }
    if obj.contains_key("discriminator") {
        forms.push("discriminator");
    }
    if obj.contains_key("properties") || obj.contains_key("optionalProperties") {
        forms.push("properties");
    }

    if forms.len() > 1 {
        return Err(CompileError::MultipleForms(forms));
    }

    // A lone `mapping` with no `discriminator` isn't "no form" (Empty) --
    // it's a discriminator schema missing its required sibling key. Catch
    // this before the stray-key scan below, which would otherwise reject
    // `mapping` itself as an unknown key and mask the more specific error.
    if forms.is_empty() && obj.contains_key("mapping") {
        return Err(CompileError::MappingWithoutDiscriminator);
    }

    // Keys this form consumes; anything else (besides nullable/metadata/
    // definitions-at-root) is a stray key for this form.
    let consumed: &[&str] = match forms.first() {
        None => &[],
        Some(&"ref") => &["ref"],
        Some(&"type") => &["type"],
        Some(&"enum") => &["enum"],
        Some(&"elements") => &["elements"],
        Some(&"values") => &["values"],
        Some(&"discriminator") => &["discriminator", "mapping"],
        Some(&"properties") => &["properties", "optionalProperties", "additionalProperties"],
        Some(_) => unreachable!(),
    };
    let mut allowed: HashSet<&str> = consumed.iter().copied().collect();
    allowed.insert("nullable");
    allowed.insert("metadata");
    if is_root {
        allowed.insert("definitions");
    }
    if let Some(stray) = obj.keys().find(|k| !allowed.contains(k.as_str())) {
        return Err(CompileError::UnknownFormKey(stray.clone()));
    }

    let node = match forms.first() {
        None => Node::Empty,
        Some(&"ref") => compile_ref(obj, definitions)?,
        Some(&"type") => compile_type(obj)?,
        Some(&"enum") => compile_enum(obj)?,
        Some(&"elements") => compile_elements(obj, definitions)?,
        Some(&"properties") => compile_properties(obj, definitions)?,
        Some(&"values") => compile_values(obj, definitions)?,
        Some(&"discriminator") => compile_discriminator(obj, definitions)?,
        Some(_) => unreachable!(),
    };

    match obj.get("nullable") {
        None => Ok(node),
        Some(Value::Bool(true)) => Ok(Node::Nullable {
            inner: Box::new(node),
        }),
        Some(Value::Bool(false)) => Ok(node),
        Some(_) => Err(CompileError::NonBooleanNullable),
    }
}

fn compile_ref(
    obj: &serde_json::Map<String, Value>,
    definitions: &IndexMap<String, Node>,
) -> Result<Node, CompileError> {
    let name = obj
        .get("ref")
        .and_then(|v| v.as_str())
        .ok_or(CompileError::RefNotString)?;
    if !definitions.contains_key(name) {
        return Err(CompileError::RefNotFound(name.to_string()));
    }
    Ok(Node::Ref {
        name: name.to_string(),
    })
}

fn compile_type(obj: &serde_json::Map<String, Value>) -> Result<Node, CompileError> {
    let type_str = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(CompileError::TypeNotString)?;
    let type_kw =
        TypeKeyword::parse(type_str).ok_or_else(|| CompileError::UnknownType(type_str.into()))?;
    Ok(Node::Type { type_kw })
}

fn compile_enum(obj: &serde_json::Map<String, Value>) -> Result<Node, CompileError> {
    let arr = obj
        .get("enum")
        .and_then(|v| v.as_array())
        .ok_or(CompileError::InvalidEnum)?;
    if arr.is_empty() {
        return Err(CompileError::InvalidEnum);
    }
    let mut values = Vec::new();
    let mut seen = HashSet::new();
    for v in arr {
        let s = v.as_str().ok_or(CompileError::InvalidEnum)?;
        if !seen.insert(s) {
            return Err(CompileError::EnumDuplicates);
        }
        values.push(s.to_string());
    }
    Ok(Node::Enum { values })
}

fn compile_elements(
    obj: &serde_json::Map<String, Value>,
    definitions: &IndexMap<String, Node>,
) -> Result<Node, CompileError> {
    let inner_val = obj.get("elements").unwrap();
    let inner = compile_node(inner_val, false, definitions)?;
    Ok(Node::Elements {
        schema: Box::new(inner),
    })
}

fn compile_properties(
    obj: &serde_json::Map<String, Value>,
    definitions: &IndexMap<String, Node>,
) -> Result<Node, CompileError> {
    let mut required = IndexMap::new();
    let mut optional = IndexMap::new();

    if let Some(props) = obj.get("properties") {
        let props_obj = props.as_object().ok_or(CompileError::PropertiesNotObject)?;
        for (key, schema) in props_obj {
            let node = compile_node(schema, false, definitions)?;
            required.insert(key.clone(), node);
        }
    }

    if let Some(opt_props) = obj.get("optionalProperties") {
        let opt_obj = opt_props
            .as_object()
            .ok_or(CompileError::PropertiesNotObject)?;
        for (key, schema) in opt_obj {
            if required.contains_key(key) {
                return Err(CompileError::OverlappingProperties(key.clone()));
            }
            let node = compile_node(schema, false, definitions)?;
            optional.insert(key.clone(), node);
        }
    }

    let additional = obj
        .get("additionalProperties")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    Ok(Node::Properties {
        required,
        optional,
        additional,
    })
}

fn compile_values(
    obj: &serde_json::Map<String, Value>,
    definitions: &IndexMap<String, Node>,
) -> Result<Node, CompileError> {
    let inner_val = obj.get("values").unwrap();
    let inner = compile_node(inner_val, false, definitions)?;
    Ok(Node::Values {
        schema: Box::new(inner),
    })
}

fn compile_discriminator(
    obj: &serde_json::Map<String, Value>,
    definitions: &IndexMap<String, Node>,
) -> Result<Node, CompileError> {
    let tag = obj
        .get("discriminator")
        .and_then(|v| v.as_str())
        .ok_or(CompileError::DiscriminatorNotString)?
        .to_string();

    let mapping_val = obj.get("mapping").ok_or(CompileError::MissingMapping)?;
    let mapping_obj = mapping_val.as_object().ok_or(CompileError::MappingNotObject)?;

    let mut mapping = IndexMap::new();
    for (key, schema) in mapping_obj {
        let variant_obj = schema.as_object().ok_or(CompileError::MappingValueNotObject)?;
        if variant_obj.get("nullable") == Some(&Value::Bool(true)) {
            return Err(CompileError::MappingValueNullable);
        }
        let node = compile_node(schema, false, definitions)?;
        match &node {
            Node::Properties {
                required, optional, ..
            } => {
                if required.contains_key(&tag) || optional.contains_key(&tag) {
                    return Err(CompileError::TagInVariant(tag));
                }
            }
            _ => return Err(CompileError::MappingNotProperties),
        }
        mapping.insert(key.clone(), node);
    }

    Ok(Node::Discriminator { tag, mapping })
}
