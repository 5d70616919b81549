/// The value model: a thin extension trait over `serde_json::Value`.
///
/// `serde_json::Value`, built with the `preserve_order` feature, already
/// satisfies every structural requirement of Section 3's value model: a
/// tagged union over null/bool/number/string/array/object, with object
/// members held in an insertion-ordered map. Rather than introduce a
/// parallel hand-rolled enum (and a conversion boundary nothing else in
/// this crate needs), we add the handful of operations the compiler and
/// interpreter actually call.
use serde_json::Value;

/// The six JSON value kinds, used where callers want to `match` on shape
/// without immediately caring about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

/// Extension methods on `serde_json::Value` implementing Section 4.1.
pub trait ValueExt {
    fn kind(&self) -> Kind;
    fn is_integral(&self) -> bool;
    fn to_long(&self) -> Option<i64>;
    fn members(&self) -> Option<Vec<(&str, &Value)>>;
    fn get_member(&self, key: &str) -> Option<&Value>;
}

impl ValueExt for Value {
    fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// True iff this is a number with zero fractional component.
    /// Operates on the numeric value, not the source text: 3, 3.0, and
    /// 3.000 are all integral.
    fn is_integral(&self) -> bool {
        match self.as_f64() {
            Some(f) => f.is_finite() && f.fract() == 0.0,
            None => false,
        }
    }

    /// Signed 64-bit extraction; fails when not integral or out of range.
    fn to_long(&self) -> Option<i64> {
        if !self.is_integral() {
            return None;
        }
        if let Some(i) = self.as_i64() {
            return Some(i);
        }
        // Integral but outside i64::as_i64's fast path (e.g. came in as u64
        // or f64); fall back through as_f64 and re-check the range.
        let f = self.as_f64()?;
        if f >= i64::MIN as f64 && f <= i64::MAX as f64 {
            Some(f as i64)
        } else {
            None
        }
    }

    fn members(&self) -> Option<Vec<(&str, &Value)>> {
        self.as_object()
            .map(|m| m.iter().map(|(k, v)| (k.as_str(), v)).collect())
    }

    fn get_member(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }
}
