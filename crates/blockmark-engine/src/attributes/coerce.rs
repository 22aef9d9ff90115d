use serde_json::{Number, Value};

use super::schema::AttributeKind;

impl AttributeKind {
    /// Whether `value` already has this kind.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (AttributeKind::String, Value::String(_)) => true,
            (AttributeKind::Number, Value::Number(_)) => true,
            (AttributeKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (AttributeKind::Boolean, Value::Bool(_)) => true,
            (AttributeKind::Array, Value::Array(_)) => true,
            (AttributeKind::Object, Value::Object(_)) => true,
            _ => false,
        }
    }

    /// Converts `value` to this kind, or `None` when it cannot be.
    ///
    /// Strings parse into numbers and booleans; numbers and booleans format
    /// into strings. `null` never coerces.
    pub fn coerce(self, value: Value) -> Option<Value> {
        if self.accepts(&value) {
            return Some(value);
        }
        match (self, value) {
            (AttributeKind::String, Value::Number(n)) => Some(Value::String(n.to_string())),
            (AttributeKind::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
            (AttributeKind::Integer, Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| Value::from(f as i64)),
            (AttributeKind::Number, Value::String(s)) => parse_number(s.trim()),
            (AttributeKind::Integer, Value::String(s)) => {
                s.trim().parse::<i64>().ok().map(Value::from)
            }
            (AttributeKind::Boolean, Value::String(s)) => match s.trim() {
                t if t.eq_ignore_ascii_case("true") => Some(Value::Bool(true)),
                t if t.eq_ignore_ascii_case("false") => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        }
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::from(i));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
