//! Record create/update from the edit form

use std::collections::HashMap;

use log::debug;
use log::warn;
use serde::Deserialize;

use super::TableViewModel;
use super::build::build_row;
use super::threshold::ThresholdAccumulator;
use super::threshold::classify_rows;
use crate::error::FieldError;
use crate::model::ID_FIELD;
use crate::model::Record;
use crate::model::Value;

/// Completion payload of the record edit form.
///
/// ```json
/// {
///   "record": {
///     "id": "006A",
///     "apiName": "Opportunity",
///     "fields": {
///       "Amount": { "value": 1200, "displayValue": "$1,200.00" },
///       "Account": { "value": { "fields": { "Name": { "value": "Acme" } } } }
///     }
///   },
///   "isUpdate": true
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSavedEvent {
    pub record: RecordForm,
    #[serde(default)]
    pub is_update: bool,
}

/// Saved record as reported by the edit form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub api_name: Option<String>,
    #[serde(default)]
    pub fields: HashMap<String, FormField>,
}

/// One field of a saved record: its raw value and formatted display value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub display_value: serde_json::Value,
}

impl RecordForm {
    /// Flattens the form into a single-level record.
    ///
    /// A value carrying its own `fields` becomes a nested record of those
    /// fields' raw values. Otherwise the raw value is used when truthy and
    /// the display value when not. Nested values that cannot be read are
    /// logged and left out.
    pub fn flatten(&self) -> Record {
        let mut record = match &self.api_name {
            Some(api_name) => Record::new(api_name.as_str()),
            None => Record::untyped(),
        };
        if let Some(id) = &self.id {
            record.set_id(id.as_str());
        }

        for (name, field) in &self.fields {
            match field.value.get("fields") {
                Some(serde_json::Value::Object(nested)) => {
                    let mut related = Record::untyped();
                    for (nested_name, nested_field) in nested {
                        let value = nested_field.get("value").cloned().unwrap_or_default();
                        related.insert(nested_name.as_str(), value);
                    }
                    if let Some(api_name) = field.value.get("apiName").and_then(|v| v.as_str()) {
                        related.set_object_name(api_name);
                    }
                    record.insert(name.as_str(), related);
                }
                Some(other) => {
                    let err = FieldError::malformed(name.as_str(), format!("expected an object, found {other}"));
                    warn!("dropping field from saved record: {err}");
                }
                _ => {
                    let value = Value::from(field.value.clone());
                    let value = if value.is_truthy() {
                        value
                    } else {
                        Value::from(field.display_value.clone())
                    };
                    record.insert(name.as_str(), value);
                }
            }
        }
        record
    }
}

/// Where an upserted record landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// An existing row with the same Id was replaced at this position.
    Replaced(usize),
    /// The record was appended at this position.
    Appended(usize),
}

impl Upsert {
    /// Returns the row position.
    pub fn position(self) -> usize {
        match self {
            Upsert::Replaced(position) | Upsert::Appended(position) => position,
        }
    }
}

impl TableViewModel {
    /// Inserts a created record or replaces an updated one.
    ///
    /// The row with the same Id is replaced in place; a record with no match
    /// is appended. Columns are left as they are. Thresholds are then
    /// reclassified over the current order and the table returns to page 1.
    pub fn upsert_record(&mut self, record: &Record, is_update: bool) -> Upsert {
        // Classification is redone for the whole table below.
        let mut acc = ThresholdAccumulator::new(self.config.threshold, self.config.number_accuracy);
        let row = build_row(record, &self.columns, &self.config, &mut acc);

        let existing = record
            .id()
            .and_then(|id| self.rows.iter().position(|r| r.id() == Some(id)));
        let outcome = match existing {
            Some(position) => {
                self.rows[position] = row;
                Upsert::Replaced(position)
            }
            None => {
                if is_update {
                    warn!(
                        "updated record {:?} not found in table, appending",
                        record.get(ID_FIELD)
                    );
                }
                self.rows.push(row);
                Upsert::Appended(self.rows.len() - 1)
            }
        };
        debug!("upserted record {:?}: {outcome:?}", record.id());

        classify_rows(
            &mut self.rows,
            self.config.threshold,
            self.config.number_accuracy,
            self.config.enable_drag_drop,
        );
        self.setup_pagination();
        outcome
    }

    /// Applies an edit-form completion.
    pub fn handle_record_saved(&mut self, event: &RecordSavedEvent) -> Upsert {
        let record = event.record.flatten();
        self.upsert_record(&record, event.is_update)
    }
}
