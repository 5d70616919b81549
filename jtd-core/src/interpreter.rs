/// The validator interpreter: a single-threaded, non-recursive stack
/// machine over a compiled [`Root`]. Implements Section 4.3.
///
/// The frame carries its own accumulated instance/schema paths (and an
/// optional breadcrumb), exactly the way the sibling code-generation
/// layer's `EmitContext` threads JS-expression strings through each
/// descent -- only here the "expression" being built is a path, and the
/// "emission" is appending to an error list instead of writing source text.
use crate::ast::{Node, Root, TypeKeyword};
use crate::pointer::{push_index, push_key, push_segment};
use crate::value::ValueExt;
use serde_json::Value;

/// One validation failure: a pointer into the instance and a pointer
/// into the schema, per Section 4.3 / RFC 6901.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub instance_path: String,
    pub schema_path: String,
    /// Optional human-readable breadcrumb (e.g. `#→field:foo→item:3`).
    /// Never required by callers; present only to aid debugging.
    pub breadcrumb: Option<String>,
}

#[derive(Clone)]
struct Frame<'a> {
    node: &'a Node,
    instance: &'a Value,
    instance_path: String,
    schema_path: String,
    breadcrumb: String,
    discrim_tag: Option<&'a str>,
}

impl<'a> Frame<'a> {
    fn root(node: &'a Node, instance: &'a Value) -> Self {
        Frame {
            node,
            instance,
            instance_path: String::new(),
            schema_path: String::new(),
            breadcrumb: "#".to_string(),
            discrim_tag: None,
        }
    }

    fn with_node(&self, node: &'a Node) -> Self {
        Frame {
            node,
            instance: self.instance,
            instance_path: self.instance_path.clone(),
            schema_path: self.schema_path.clone(),
            breadcrumb: self.breadcrumb.clone(),
            discrim_tag: self.discrim_tag,
        }
    }

    fn required_prop(&self, node: &'a Node, key: &str, value: &'a Value) -> Self {
        Frame {
            node,
            instance: value,
            instance_path: push_key(&self.instance_path, key),
            schema_path: format!("{}/properties{}", self.schema_path, push_key("", key)),
            breadcrumb: format!("{}→field:{key}", self.breadcrumb),
            discrim_tag: None,
        }
    }

    fn optional_prop(&self, node: &'a Node, key: &str, value: &'a Value) -> Self {
        Frame {
            node,
            instance: value,
            instance_path: push_key(&self.instance_path, key),
            schema_path: format!("{}/optionalProperties{}", self.schema_path, push_key("", key)),
            breadcrumb: format!("{}→field:{key}", self.breadcrumb),
            discrim_tag: None,
        }
    }

    fn element(&self, node: &'a Node, idx: usize, value: &'a Value) -> Self {
        Frame {
            node,
            instance: value,
            instance_path: push_index(&self.instance_path, idx),
            schema_path: push_segment(&self.schema_path, "elements"),
            breadcrumb: format!("{}→item:{idx}", self.breadcrumb),
            discrim_tag: None,
        }
    }

    fn values_entry(&self, node: &'a Node, key: &str, value: &'a Value) -> Self {
        Frame {
            node,
            instance: value,
            instance_path: push_key(&self.instance_path, key),
            schema_path: push_segment(&self.schema_path, "values"),
            breadcrumb: format!("{}→field:{key}", self.breadcrumb),
            discrim_tag: None,
        }
    }

    fn discrim_variant(&self, node: &'a Node, tag: &'a str, variant_key: &str) -> Self {
        Frame {
            node,
            instance: self.instance,
            instance_path: self.instance_path.clone(),
            schema_path: format!("{}/mapping{}", self.schema_path, push_key("", variant_key)),
            breadcrumb: format!("{}→variant:{variant_key}", self.breadcrumb),
            discrim_tag: Some(tag),
        }
    }

    fn error_here(&self, schema_path_suffix: &str) -> ValidationError {
        self.error_at(&self.instance_path, schema_path_suffix)
    }

    fn error_at(&self, instance_path: &str, schema_path_suffix: &str) -> ValidationError {
        let schema_path = if schema_path_suffix.is_empty() {
            self.schema_path.clone()
        } else {
            push_segment(&self.schema_path, schema_path_suffix)
        };
        ValidationError {
            instance_path: instance_path.to_string(),
            schema_path,
            breadcrumb: Some(self.breadcrumb.clone()),
        }
    }
}

/// Validate `instance` against `root`, accumulating every error (never
/// short-circuiting). Equivalent to `validate_with_limit(root, instance, None)`.
pub fn validate(root: &Root, instance: &Value) -> Vec<ValidationError> {
    validate_with_limit(root, instance, None)
}

/// Validate with an optional cap on the number of accumulated errors.
/// Once the cap is reached, validation returns immediately with exactly
/// `max_errors` entries; this is the validator's only configuration knob
/// (Section 6).
pub fn validate_with_limit(
    root: &Root,
    instance: &Value,
    max_errors: Option<usize>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut stack: Vec<Frame> = vec![Frame::root(&root.top, instance)];

    while let Some(frame) = stack.pop() {
        step(root, frame, &mut stack, &mut errors);
        if let Some(limit) = max_errors {
            if errors.len() >= limit {
                errors.truncate(limit);
                return errors;
            }
        }
    }

    errors
}

/// Execute one frame. Handles `Nullable` and `Ref` by re-dispatching in
/// place (a local loop, never host recursion, never growing the work
/// stack) rather than pushing a duplicate frame.
fn step<'a>(
    root: &'a Root,
    mut frame: Frame<'a>,
    stack: &mut Vec<Frame<'a>>,
    errors: &mut Vec<ValidationError>,
) {
    loop {
        match frame.node {
            Node::Nullable { inner } => {
                if frame.instance.is_null() {
                    return;
                }
                frame = frame.with_node(inner);
                continue;
            }
            Node::Ref { name } => {
                let target = root
                    .definitions
                    .get(name)
                    .unwrap_or_else(|| panic!("compiler invariant violated: ref '{name}' unresolved"));
                frame = frame.with_node(target);
                continue;
            }
            _ => break,
        }
    }

    match frame.node {
        Node::Empty => {}
        Node::Nullable { .. } | Node::Ref { .. } => unreachable!("unwrapped above"),
        Node::Type { type_kw } => step_type(&frame, *type_kw, errors),
        Node::Enum { values } => step_enum(&frame, values, errors),
        Node::Elements { schema } => step_elements(&frame, schema, stack, errors),
        Node::Properties {
            required,
            optional,
            additional,
        } => step_properties(&frame, required, optional, *additional, stack, errors),
        Node::Values { schema } => step_values(&frame, schema, stack, errors),
        Node::Discriminator { tag, mapping } => step_discriminator(&frame, tag, mapping, stack, errors),
    }
}

fn step_type(frame: &Frame, type_kw: TypeKeyword, errors: &mut Vec<ValidationError>) {
    if !type_matches(frame.instance, type_kw) {
        errors.push(frame.error_here("type"));
    }
}

fn type_matches(instance: &Value, type_kw: TypeKeyword) -> bool {
    match type_kw {
        TypeKeyword::Boolean => instance.is_boolean(),
        TypeKeyword::String => instance.is_string(),
        TypeKeyword::Timestamp => instance
            .as_str()
            .map(is_valid_rfc3339)
            .unwrap_or(false),
        TypeKeyword::Float32 | TypeKeyword::Float64 => instance.is_number(),
        _ => match type_kw.int_range() {
            Some((lo, hi)) => {
                instance.is_number()
                    && instance.is_integral()
                    && instance
                        .to_long()
                        .map(|n| n >= lo && n <= hi)
                        .unwrap_or(false)
            }
            None => unreachable!("boolean/string/timestamp/float* handled above"),
        },
    }
}

/// A minimal RFC 3339 date-time check. A leap second (`:60`) is accepted
/// in place of the normal `:59` -- equivalent to normalizing it before
/// parsing, since the only thing the numeric check does with the second
/// field is bound it.
fn is_valid_rfc3339(s: &str) -> bool {
    parse_rfc3339(s).is_some()
}

/// Parses `full-date "T" full-time` per RFC 3339 Section 5.6, returning
/// `Some(())` on a structurally valid date-time. Deliberately hand-rolled
/// rather than pulling in a chrono-class dependency: JTD only needs the
/// production to be *recognized*, not the value to be usable as a
/// calendar type.
fn parse_rfc3339(s: &str) -> Option<()> {
    let bytes = s.as_bytes();
    if bytes.len() < 20 {
        return None;
    }
    let digit = |b: u8| b.is_ascii_digit();
    let at = |i: usize| bytes.get(i).copied();

    for &i in &[0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18] {
        if !at(i).map(digit).unwrap_or(false) {
            return None;
        }
    }
    if at(4) != Some(b'-') || at(7) != Some(b'-') {
        return None;
    }
    if at(10) != Some(b'T') && at(10) != Some(b't') {
        return None;
    }
    if at(13) != Some(b':') || at(16) != Some(b':') {
        return None;
    }

    let month: u32 = s[5..7].parse().ok()?;
    let day: u32 = s[8..10].parse().ok()?;
    let hour: u32 = s[11..13].parse().ok()?;
    let minute: u32 = s[14..16].parse().ok()?;
    // 60 is the leap second, normalized to a valid bound rather than
    // rejected.
    let second: u32 = s[17..19].parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    if hour > 23 || minute > 59 || second > 60 {
        return None;
    }

    let mut rest = &s[19..];
    if let Some(stripped) = rest.strip_prefix('.') {
        let frac_len = stripped.bytes().take_while(|b| b.is_ascii_digit()).count();
        if frac_len == 0 {
            return None;
        }
        rest = &stripped[frac_len..];
    }

    if rest == "Z" || rest == "z" {
        return Some(());
    }
    let rest_bytes = rest.as_bytes();
    if rest_bytes.len() == 6
        && (rest_bytes[0] == b'+' || rest_bytes[0] == b'-')
        && rest_bytes[1..3].iter().all(|b| b.is_ascii_digit())
        && rest_bytes[3] == b':'
        && rest_bytes[4..6].iter().all(|b| b.is_ascii_digit())
    {
        return Some(());
    }
    None
}

fn step_enum(frame: &Frame, values: &[String], errors: &mut Vec<ValidationError>) {
    let ok = frame
        .instance
        .as_str()
        .map(|s| values.iter().any(|v| v == s))
        .unwrap_or(false);
    if !ok {
        errors.push(frame.error_here("enum"));
    }
}

fn step_elements<'a>(
    frame: &Frame<'a>,
    schema: &'a Node,
    stack: &mut Vec<Frame<'a>>,
    errors: &mut Vec<ValidationError>,
) {
    match frame.instance.as_array() {
        None => errors.push(frame.error_here("elements")),
        Some(arr) => {
            for (idx, value) in arr.iter().enumerate() {
                stack.push(frame.element(schema, idx, value));
            }
        }
    }
}

fn step_properties<'a>(
    frame: &Frame<'a>,
    required: &'a indexmap::IndexMap<String, Node>,
    optional: &'a indexmap::IndexMap<String, Node>,
    additional: bool,
    stack: &mut Vec<Frame<'a>>,
    errors: &mut Vec<ValidationError>,
) {
    let obj = match frame.instance.as_object() {
        Some(obj) => obj,
        None => {
            let guard = if !required.is_empty() {
                "properties"
            } else {
                "optionalProperties"
            };
            errors.push(frame.error_here(guard));
            return;
        }
    };

    for key in required.keys() {
        if !obj.contains_key(key) {
            errors.push(frame.error_at(
                &frame.instance_path,
                &format!("properties{}", push_key("", key)),
            ));
        }
    }

    if !additional {
        for key in obj.keys() {
            let is_tag = frame.discrim_tag == Some(key.as_str());
            if !required.contains_key(key) && !optional.contains_key(key) && !is_tag {
                errors.push(ValidationError {
                    instance_path: push_key(&frame.instance_path, key),
                    schema_path: frame.schema_path.clone(),
                    breadcrumb: Some(format!("{}→field:{key}", frame.breadcrumb)),
                });
            }
        }
    }

    for (key, child) in required.iter() {
        if frame.discrim_tag == Some(key.as_str()) {
            continue;
        }
        if let Some(value) = obj.get(key) {
            stack.push(frame.required_prop(child, key, value));
        }
    }

    for (key, child) in optional.iter() {
        if let Some(value) = obj.get(key) {
            stack.push(frame.optional_prop(child, key, value));
        }
    }
}

fn step_values<'a>(
    frame: &Frame<'a>,
    schema: &'a Node,
    stack: &mut Vec<Frame<'a>>,
    errors: &mut Vec<ValidationError>,
) {
    match frame.instance.as_object() {
        None => errors.push(frame.error_here("values")),
        Some(obj) => {
            for (key, value) in obj.iter() {
                stack.push(frame.values_entry(schema, key, value));
            }
        }
    }
}

fn step_discriminator<'a>(
    frame: &Frame<'a>,
    tag: &'a str,
    mapping: &'a indexmap::IndexMap<String, Node>,
    stack: &mut Vec<Frame<'a>>,
    errors: &mut Vec<ValidationError>,
) {
    let obj = match frame.instance.as_object() {
        Some(obj) => obj,
        None => {
            errors.push(frame.error_here("discriminator"));
            return;
        }
    };
    let tag_value = match obj.get(tag) {
        Some(v) => v,
        None => {
            errors.push(frame.error_here("discriminator"));
            return;
        }
    };
    let tag_str = match tag_value.as_str() {
        Some(s) => s,
        None => {
            errors.push(frame.error_at(&push_key(&frame.instance_path, tag), "discriminator"));
            return;
        }
    };
    match mapping.get(tag_str) {
        Some(variant) => stack.push(frame.discrim_variant(variant, tag, tag_str)),
        None => errors.push(frame.error_at(&push_key(&frame.instance_path, tag), "mapping")),
    }
}
