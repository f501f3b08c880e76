//! Row builder: records and columns to display rows

use super::Column;
use super::RowClasses;
use super::TableCell;
use super::TableConfig;
use super::TableRow;
use super::number::to_fixed;
use super::row::CellKind;
use super::threshold::ThresholdAccumulator;
use super::threshold::stamp_row;
use crate::model::FieldType;
use crate::model::Record;
use crate::model::Value;

/// The primary name field, always rendered as a link to its own record.
pub const NAME_FIELD: &str = "Name";

// Lookup to the record type; shown as text even though it is a reference.
const RECORD_TYPE_FIELD: &str = "RecordTypeId";

/// Derives the relationship name of a lookup field from its path.
///
/// Custom lookups swap `__c` for `__r` (`Parent__c` -> `Parent__r`),
/// standard lookups drop the trailing `Id` (`AccountId` -> `Account`).
/// Paths matching neither convention have no relationship.
///
/// # Example
///
/// ```
/// use fieldset_table::table::relationship_name;
///
/// assert_eq!(relationship_name("Parent__c").as_deref(), Some("Parent__r"));
/// assert_eq!(relationship_name("AccountId").as_deref(), Some("Account"));
/// assert_eq!(relationship_name("Owner"), None);
/// ```
pub fn relationship_name(field_path: &str) -> Option<String> {
    if let Some(stem) = field_path.strip_suffix("__c") {
        Some(format!("{stem}__r"))
    } else {
        field_path.strip_suffix("Id").map(str::to_string)
    }
}

/// Reads the `Name` of the related record behind a lookup field.
fn reference_name(record: &Record, field_path: &str) -> Option<Value> {
    let relationship = relationship_name(field_path)?;
    record
        .get_record(&relationship)
        .ok()
        .flatten()
        .and_then(|related| related.get(NAME_FIELD))
        .filter(|name| name.is_truthy())
        .cloned()
}

/// Builds the cell for one column of a record.
pub(crate) fn build_cell(record: &Record, column: &Column, accuracy: u32) -> TableCell {
    let field_path = column.field_path.as_str();
    let field_type = column.field_type();
    let is_name = field_path == NAME_FIELD;
    let is_reference = *field_type == FieldType::Reference;

    let mut value = record.get(field_path).cloned().unwrap_or_default();
    let raw_id = value.is_truthy().then(|| value.to_display_string());

    // Zero and empty values are deliberately left unformatted.
    if field_type.is_numeric() && value.is_truthy() {
        if let Some(n) = value.as_f64() {
            value = Value::String(to_fixed(n, accuracy));
        }
    }

    let reference = if is_reference {
        reference_name(record, field_path)
    } else {
        None
    };

    let url = if is_name {
        record.id().map(|id| format!("/{id}"))
    } else if is_reference {
        raw_id.map(|id| format!("/{id}"))
    } else {
        None
    };

    let kind = if (is_reference || is_name) && field_path != RECORD_TYPE_FIELD {
        CellKind::Url
    } else if *field_type == FieldType::Date {
        CellKind::Date
    } else {
        CellKind::Text
    };

    TableCell {
        value: reference.unwrap_or(value),
        field_path: field_path.to_string(),
        field_type: field_type.clone(),
        kind,
        url,
        is_threshold: column.is_threshold,
    }
}

/// Builds a display row from a record.
///
/// The record is copied so the caller's data is never aliased. The row's
/// threshold cell is fed to `acc`; pass the same accumulator for every row of
/// one build pass.
pub fn build_row(
    record: &Record,
    columns: &[Column],
    config: &TableConfig,
    acc: &mut ThresholdAccumulator,
) -> TableRow {
    let rank = config
        .rank_field
        .as_deref()
        .and_then(|field| record.get(field))
        .and_then(Value::as_f64);

    let cells = columns
        .iter()
        .map(|column| build_cell(record, column, config.number_accuracy))
        .collect();

    let mut row = TableRow {
        record: record.clone(),
        cells,
        index: rank,
        initial_index: rank,
        is_changed: false,
        classes: RowClasses::base(config.enable_drag_drop),
        running_sum: None,
    };
    stamp_row(&mut row, acc);
    row
}

/// Copies the field set into fresh columns for one build.
pub(crate) fn build_columns(fields: &[crate::model::FieldDescriptor], config: &TableConfig) -> Vec<Column> {
    fields
        .iter()
        .map(|descriptor| Column::new(descriptor, config.is_threshold_field(descriptor.path())))
        .collect()
}
