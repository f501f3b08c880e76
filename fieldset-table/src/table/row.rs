//! Display rows and cells

use std::fmt;

use serde::Serialize;
use serde::Serializer;

use crate::model::FieldType;
use crate::model::Record;
use crate::model::Value;

/// How a cell is rendered. Exactly one kind applies to every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// Link to a record (`Name` or a lookup).
    Url,
    /// Calendar date.
    Date,
    /// Plain text.
    Text,
}

/// One rendered cell of a [`TableRow`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    /// Display value: related record name, formatted number or raw value.
    pub value: Value,
    /// Path of the field this cell shows.
    pub field_path: String,
    /// Display type of the field.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Rendering kind.
    pub kind: CellKind,
    /// Link target, `/` followed by a record Id.
    pub url: Option<String>,
    /// Whether this cell feeds the threshold running sum.
    pub is_threshold: bool,
}

impl TableCell {
    /// Returns true if the cell renders as a link.
    pub fn is_url(&self) -> bool {
        self.kind == CellKind::Url
    }

    /// Returns true if the cell renders as a date.
    pub fn is_date(&self) -> bool {
        self.kind == CellKind::Date
    }

    /// Returns true if the cell renders as plain text.
    pub fn is_text(&self) -> bool {
        self.kind == CellKind::Text
    }
}

/// Style flags applied to a row.
///
/// Renders as a space separated class list (`"draggable threshold"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowClasses {
    /// Row can be dragged.
    pub draggable: bool,
    /// Row is where the running sum crossed the threshold.
    pub threshold: bool,
}

impl RowClasses {
    /// Returns the base classes for a table, before threshold classification.
    pub fn base(draggable: bool) -> Self {
        Self {
            draggable,
            threshold: false,
        }
    }
}

impl fmt::Display for RowClasses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes = Vec::with_capacity(2);
        if self.draggable {
            classes.push("draggable");
        }
        if self.threshold {
            classes.push("threshold");
        }
        f.write_str(&classes.join(" "))
    }
}

impl Serialize for RowClasses {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A display row built from one record.
///
/// Serializes as the record's fields plus the table bookkeeping
/// (`tableData`, `index`, `initialIndex`, `isChanged`, `classList`,
/// `runningSum`), which is the payload listeners of the drop event receive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(flatten)]
    pub(crate) record: Record,
    #[serde(rename = "tableData")]
    pub(crate) cells: Vec<TableCell>,
    pub(crate) index: Option<f64>,
    pub(crate) initial_index: Option<f64>,
    pub(crate) is_changed: bool,
    #[serde(rename = "classList")]
    pub(crate) classes: RowClasses,
    pub(crate) running_sum: Option<f64>,
}

impl TableRow {
    /// Returns the source record (a private copy).
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Returns the record Id.
    pub fn id(&self) -> Option<&str> {
        self.record.id()
    }

    /// Returns the cells in column order.
    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    /// Returns the cell for a field path.
    pub fn cell(&self, field_path: &str) -> Option<&TableCell> {
        self.cells.iter().find(|c| c.field_path == field_path)
    }

    /// Returns the current rank.
    pub fn index(&self) -> Option<f64> {
        self.index
    }

    /// Returns the rank the row had when it was built.
    pub fn initial_index(&self) -> Option<f64> {
        self.initial_index
    }

    /// Returns true once a reorder moved the row off its initial rank.
    pub fn is_changed(&self) -> bool {
        self.is_changed
    }

    /// Returns the row's style flags.
    pub fn classes(&self) -> RowClasses {
        self.classes
    }

    /// Returns the row's class list as rendered.
    pub fn class_list(&self) -> String {
        self.classes.to_string()
    }

    /// Returns true if this row is where the running sum crossed the threshold.
    pub fn is_threshold(&self) -> bool {
        self.classes.threshold
    }

    /// Returns the running sum up to and including this row, if the row contributed.
    pub fn running_sum(&self) -> Option<f64> {
        self.running_sum
    }

    /// Returns the display values of the cells in column order.
    pub fn display_values(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.value.to_display_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_rendering() {
        assert_eq!(RowClasses::default().to_string(), "");
        assert_eq!(RowClasses::base(true).to_string(), "draggable");
        let classes = RowClasses {
            draggable: true,
            threshold: true,
        };
        assert_eq!(classes.to_string(), "draggable threshold");
        assert_eq!(
            RowClasses {
                draggable: false,
                threshold: true
            }
            .to_string(),
            "threshold"
        );
    }
}
