//! Field set member metadata

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Metadata for one field set member (one table column).
///
/// Field sets come from the field set service as a JSON array:
///
/// ```json
/// [{"fieldPath": "Amount", "label": "Amount", "typeApex": "DOUBLE", "required": false}]
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// The API path of the field (e.g., "Amount", "Account__c").
    #[serde(default)]
    pub field_path: Option<String>,

    /// Fallback name used when `field_path` is unset.
    #[serde(default)]
    pub field_name: Option<String>,

    /// Column header label.
    #[serde(default)]
    pub label: Option<String>,

    /// The platform display type of the field.
    #[serde(default)]
    pub type_apex: FieldType,

    /// Whether the field set marks the field as required.
    #[serde(default)]
    pub required: bool,

    /// Whether the field is required at the database level.
    #[serde(default)]
    pub db_required: bool,
}

impl FieldDescriptor {
    /// Creates a descriptor for a field path and type.
    pub fn new(field_path: impl Into<String>, type_apex: FieldType) -> Self {
        Self {
            field_path: Some(field_path.into()),
            type_apex,
            ..Default::default()
        }
    }

    /// Sets the column label (builder pattern).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the field path, falling back to the field name.
    pub fn path(&self) -> &str {
        self.field_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(self.field_name.as_deref())
            .unwrap_or_default()
    }
}

/// Platform display type of a field.
///
/// Only `DOUBLE`, `DATE` and `REFERENCE` change how the table treats a
/// column. Unrecognized type names are preserved in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Single-line text.
    #[default]
    String,
    /// Multi-line text.
    TextArea,
    /// Boolean checkbox.
    Boolean,
    /// Floating point number. Numeric formatting and sorting apply.
    Double,
    /// Integer number.
    Integer,
    /// Currency amount.
    Currency,
    /// Percentage.
    Percent,
    /// Calendar date. Date sorting and date cells apply.
    Date,
    /// Date and time.
    DateTime,
    /// Lookup to another record. Rendered as a link.
    Reference,
    /// Record identifier.
    Id,
    /// Single-select picklist.
    Picklist,
    /// Multi-select picklist.
    MultiPicklist,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// URL.
    Url,
    /// Any other display type.
    Other(String),
}

impl FieldType {
    /// Returns the platform name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "STRING",
            FieldType::TextArea => "TEXTAREA",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Double => "DOUBLE",
            FieldType::Integer => "INTEGER",
            FieldType::Currency => "CURRENCY",
            FieldType::Percent => "PERCENT",
            FieldType::Date => "DATE",
            FieldType::DateTime => "DATETIME",
            FieldType::Reference => "REFERENCE",
            FieldType::Id => "ID",
            FieldType::Picklist => "PICKLIST",
            FieldType::MultiPicklist => "MULTIPICKLIST",
            FieldType::Email => "EMAIL",
            FieldType::Phone => "PHONE",
            FieldType::Url => "URL",
            FieldType::Other(name) => name,
        }
    }

    /// Returns true if values of this type are formatted and summed as numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Double)
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "STRING" => FieldType::String,
            "TEXTAREA" => FieldType::TextArea,
            "BOOLEAN" => FieldType::Boolean,
            "DOUBLE" => FieldType::Double,
            "INTEGER" => FieldType::Integer,
            "CURRENCY" => FieldType::Currency,
            "PERCENT" => FieldType::Percent,
            "DATE" => FieldType::Date,
            "DATETIME" => FieldType::DateTime,
            "REFERENCE" => FieldType::Reference,
            "ID" => FieldType::Id,
            "PICKLIST" => FieldType::Picklist,
            "MULTIPICKLIST" => FieldType::MultiPicklist,
            "EMAIL" => FieldType::Email,
            "PHONE" => FieldType::Phone,
            "URL" => FieldType::Url,
            _ => FieldType::Other(name),
        }
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        FieldType::from(name.to_string())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
