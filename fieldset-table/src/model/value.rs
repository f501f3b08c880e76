//! Value enum for dynamic field values

use serde::Serialize;

use super::Record;

/// A dynamic value held by a record field.
///
/// Platform records arrive as loosely typed JSON. Every scalar number is kept
/// as `f64`, related records from lookups are kept as nested [`Record`]s and
/// anything else (arrays, mostly) is carried through untouched.
///
/// # Type Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | true/false | `Bool` |
/// | number | `Number` |
/// | string | `String` |
/// | object | `Record` |
/// | array | `Json` |
///
/// # Example
///
/// ```
/// use fieldset_table::model::Value;
///
/// let name = Value::from("Acme");
/// let amount = Value::from(1250.5);
/// assert!(name.is_truthy());
/// assert!(!Value::from(0.0).is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Any numeric value.
    Number(f64),
    /// String value (also used for Ids and dates).
    String(String),
    /// Related record from a lookup relationship.
    Record(Box<Record>),
    /// Fallback for arrays and other unmapped JSON values.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Record(_) => "record",
            Value::Json(_) => "json",
        }
    }

    /// Returns whether the value counts as "set" for display purposes.
    ///
    /// Null, `false`, zero, NaN and the empty string are falsy. This is the
    /// rule the row builder uses to decide whether to format a number, so a
    /// zero amount stays unformatted.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Record(_) => true,
            Value::Json(json) => !json.is_null(),
        }
    }

    /// Coerces the value to a number.
    ///
    /// Strings are parsed after trimming, booleans map to 1 and 0. Returns
    /// `None` for values with no numeric reading.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the nested record if this is a related record.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r.as_ref()),
            _ => None,
        }
    }

    /// Renders the value the way a table cell shows it.
    ///
    /// Whole numbers print without a fractional part and related records
    /// print their `Name` (or `Id` when unnamed).
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Record(r) => r
                .get("Name")
                .or_else(|| r.get("Id"))
                .map(Value::to_display_string)
                .unwrap_or_default(),
            Value::Json(json) => json.to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(Box::new(v))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Object(map) => Value::Record(Box::new(Record::from_json_map(map))),
            other => Value::Json(other),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}
