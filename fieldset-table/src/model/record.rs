//! Dynamic platform record

use std::collections::HashMap;

use super::Value;
use crate::error::FieldError;

/// Field holding the record identifier.
pub const ID_FIELD: &str = "Id";

/// A dynamic record as returned by the record query service.
///
/// Records hold field values as a `HashMap<String, Value>`. The identifier is
/// an ordinary field (`Id`) so it can be sorted and displayed like any other.
/// Related records from lookups are nested under their relationship name
/// (`Account`, `Parent__r`, ...).
///
/// # Example
///
/// ```
/// use fieldset_table::model::Record;
///
/// let record = Record::new("Opportunity")
///     .set("Id", "006000000000001")
///     .set("Amount", 1500.0);
///
/// assert_eq!(record.id(), Some("006000000000001"));
/// assert_eq!(record.get_number("Amount").unwrap(), Some(1500.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// The object type name, from the `attributes.type` member.
    pub(crate) object_name: Option<String>,

    /// The field values.
    pub(crate) fields: HashMap<String, Value>,
}

impl Record {
    /// Creates a new empty record for the given object type.
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: Some(object_name.into()),
            fields: HashMap::new(),
        }
    }

    /// Creates a new record with no object type.
    pub fn untyped() -> Self {
        Self::default()
    }

    /// Builds a record from a decoded JSON object.
    pub fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let mut record = Record::untyped();
        for (key, value) in map {
            if key == super::record_serde::ATTRIBUTES_KEY {
                record.object_name = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .map(str::to_string);
                continue;
            }
            record.fields.insert(key, Value::from(value));
        }
        record
    }

    // =========================================================================
    // Metadata accessors
    // =========================================================================

    /// Returns the object type name, if known.
    pub fn object_name(&self) -> Option<&str> {
        self.object_name.as_deref()
    }

    /// Returns the record Id, if set.
    pub fn id(&self) -> Option<&str> {
        self.fields.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Sets the object type name.
    pub fn set_object_name(&mut self, name: impl Into<String>) {
        self.object_name = Some(name.into());
    }

    /// Sets the record Id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.fields.insert(ID_FIELD.to_string(), Value::String(id.into()));
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns a reference to all fields.
    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Returns a mutable reference to all fields.
    pub fn fields_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.fields
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Removes a field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    //
    // Return Err if field is missing or wrong type.
    // Return Ok(None) only if the field exists and is Value::Null.
    // =========================================================================

    /// Gets a string field value.
    pub fn get_string(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "string",
                other.type_name(),
            )),
        }
    }

    /// Gets a numeric field value.
    pub fn get_number(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(Some(*n)),
            Some(other) => Err(FieldError::type_mismatch(field, "number", other.type_name())),
        }
    }

    /// Gets a related record (from a lookup relationship).
    pub fn get_record(&self, field: &str) -> Result<Option<&Record>, FieldError> {
        match self.fields.get(field) {
            None => Err(FieldError::missing(field)),
            Some(Value::Null) => Ok(None),
            Some(Value::Record(r)) => Ok(Some(r.as_ref())),
            Some(other) => Err(FieldError::type_mismatch(
                field,
                "record",
                other.type_name(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters_distinguish_missing_null_and_mismatch() {
        let record = Record::new("Account")
            .set("Name", "Acme")
            .set("Rating", Value::Null);

        assert_eq!(record.get_string("Name").unwrap(), Some("Acme"));
        assert_eq!(record.get_string("Rating").unwrap(), None);
        assert!(matches!(
            record.get_string("Missing"),
            Err(FieldError::Missing { .. })
        ));
        assert!(matches!(
            record.get_number("Name"),
            Err(FieldError::TypeMismatch { expected: "number", actual: "string", .. })
        ));
    }

    #[test]
    fn test_id_lives_in_fields() {
        let mut record = Record::untyped();
        assert_eq!(record.id(), None);
        record.set_id("001A");
        assert_eq!(record.id(), Some("001A"));
        assert!(record.contains("Id"));
    }
}
