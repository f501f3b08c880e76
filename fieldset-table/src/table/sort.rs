//! Column sort state and row ordering

use std::cmp::Ordering;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;

use super::TableRow;
use crate::model::FieldDescriptor;
use crate::model::FieldType;
use crate::model::Record;
use crate::model::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest value first.
    #[serde(rename = "asc")]
    Ascending,
    /// Largest value first.
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Arrow shown in a sorted column's header.
///
/// The arrow points the way values grow down the table: `ArrowDown` is an
/// ascending sort, `ArrowUp` a descending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortIcon {
    /// Ascending sort.
    #[serde(rename = "utility:arrowdown")]
    ArrowDown,
    /// Descending sort.
    #[serde(rename = "utility:arrowup")]
    ArrowUp,
}

impl SortIcon {
    /// Returns the icon for a sort direction.
    pub fn for_direction(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => SortIcon::ArrowDown,
            SortDirection::Descending => SortIcon::ArrowUp,
        }
    }

    /// Returns the sort direction this icon stands for.
    pub fn direction(self) -> SortDirection {
        match self {
            SortIcon::ArrowDown => SortDirection::Ascending,
            SortIcon::ArrowUp => SortDirection::Descending,
        }
    }

    /// Returns the other arrow.
    pub fn flipped(self) -> Self {
        match self {
            SortIcon::ArrowDown => SortIcon::ArrowUp,
            SortIcon::ArrowUp => SortIcon::ArrowDown,
        }
    }

    /// Returns the icon resource name.
    pub fn icon_name(self) -> &'static str {
        match self {
            SortIcon::ArrowDown => "utility:arrowdown",
            SortIcon::ArrowUp => "utility:arrowup",
        }
    }
}

/// A column of the table: a field set member plus its sort and threshold flags.
///
/// Columns are copied from the field set on every rebuild, so header state
/// never leaks back into the host's descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub(crate) descriptor: FieldDescriptor,
    pub(crate) field_path: String,
    pub(crate) is_sort: bool,
    pub(crate) is_threshold: bool,
    pub(crate) sort_icon: SortIcon,
}

impl Column {
    pub(crate) fn new(descriptor: &FieldDescriptor, is_threshold: bool) -> Self {
        Self {
            field_path: descriptor.path().to_string(),
            descriptor: descriptor.clone(),
            is_sort: false,
            is_threshold,
            sort_icon: SortIcon::ArrowDown,
        }
    }

    /// Returns the resolved field path.
    pub fn field_path(&self) -> &str {
        &self.field_path
    }

    /// Returns the field's display type.
    pub fn field_type(&self) -> &FieldType {
        &self.descriptor.type_apex
    }

    /// Returns the header label, falling back to the field path.
    pub fn label(&self) -> &str {
        self.descriptor.label.as_deref().unwrap_or(&self.field_path)
    }

    /// Returns true if the table is currently sorted by this column.
    pub fn is_sort(&self) -> bool {
        self.is_sort
    }

    /// Returns true if this column feeds the threshold running sum.
    pub fn is_threshold(&self) -> bool {
        self.is_threshold
    }

    /// Returns the header arrow.
    pub fn sort_icon(&self) -> SortIcon {
        self.sort_icon
    }
}

/// Updates header state for a sort request and returns the effective direction.
///
/// A first request on a column marks it sorted ascending, later requests flip
/// the arrow, and every other column loses its sorted mark. A `forced`
/// direction wins over the arrow and the arrow is set to match it.
pub(crate) fn toggle_columns(
    columns: &mut [Column],
    field_path: &str,
    forced: Option<SortDirection>,
) -> SortDirection {
    let mut direction = forced.unwrap_or(SortDirection::Ascending);
    for column in columns.iter_mut() {
        if column.field_path != field_path {
            column.is_sort = false;
            continue;
        }

        if !column.is_sort {
            column.is_sort = true;
            column.sort_icon = SortIcon::ArrowDown;
        } else {
            column.sort_icon = column.sort_icon.flipped();
        }

        if let Some(forced) = forced {
            column.sort_icon = SortIcon::for_direction(forced);
        }
        direction = column.sort_icon.direction();
    }
    direction
}

/// Clears the sorted mark on every column.
pub(crate) fn clear_sort(columns: &mut [Column]) {
    for column in columns.iter_mut() {
        column.is_sort = false;
    }
}

/// Sorts rows by a record field.
///
/// The sort is stable, so rows with equal keys keep their previous order.
/// A descending sort reverses the whole ascending order, unreadable values
/// included.
pub(crate) fn sort_rows(rows: &mut [TableRow], field: &str, field_type: &FieldType, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = compare_records(&a.record, &b.record, field, field_type);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Compares two records on one field, type-aware.
///
/// Missing and falsy values compare as empty: zero for numbers and dates,
/// the empty string for text. Values that cannot be read as a number or a
/// date compare greater than every readable one, so they come last in an
/// ascending sort and first in a descending one.
pub fn compare_records(a: &Record, b: &Record, field: &str, field_type: &FieldType) -> Ordering {
    let a = a.get(field).filter(|v| v.is_truthy());
    let b = b.get(field).filter(|v| v.is_truthy());

    match field_type {
        FieldType::Double => compare_keys(numeric_key(a), numeric_key(b)),
        FieldType::Date => compare_keys(date_key(a), date_key(b)),
        _ => locale_compare(&text_key(a), &text_key(b)),
    }
}

fn compare_keys(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn numeric_key(value: Option<&Value>) -> Option<f64> {
    match value {
        None => Some(0.0),
        Some(v) => v.as_f64().filter(|n| !n.is_nan()),
    }
}

fn date_key(value: Option<&Value>) -> Option<f64> {
    match value {
        None => Some(0.0),
        Some(Value::Number(n)) => Some(*n),
        Some(v) => parse_date_millis(&v.to_display_string()).map(|ms| ms as f64),
    }
}

fn text_key(value: Option<&Value>) -> String {
    value.map(Value::to_display_string).unwrap_or_default()
}

/// Parses a platform date or datetime string to milliseconds since the epoch.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339 timestamps and the
/// platform's `+0000` offset form.
pub fn parse_date_millis(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Compares strings case-insensitively, lowercase first on ties.
///
/// Ordering is by lowercased code point, not a locale collation: accented
/// letters sort after `z` (`"é" > "z"`).
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column::new(&FieldDescriptor::new("Name", FieldType::String), false),
            Column::new(&FieldDescriptor::new("Amount", FieldType::Double), false),
        ]
    }

    #[test]
    fn test_first_click_sorts_ascending_then_flips() {
        let mut columns = columns();

        assert_eq!(toggle_columns(&mut columns, "Amount", None), SortDirection::Ascending);
        assert!(columns[1].is_sort());
        assert_eq!(columns[1].sort_icon(), SortIcon::ArrowDown);

        assert_eq!(toggle_columns(&mut columns, "Amount", None), SortDirection::Descending);
        assert_eq!(columns[1].sort_icon(), SortIcon::ArrowUp);

        assert_eq!(toggle_columns(&mut columns, "Amount", None), SortDirection::Ascending);
    }

    #[test]
    fn test_clicking_another_column_clears_the_old_one() {
        let mut columns = columns();
        toggle_columns(&mut columns, "Amount", None);
        toggle_columns(&mut columns, "Name", None);

        assert!(columns[0].is_sort());
        assert!(!columns[1].is_sort());
        assert_eq!(columns.iter().filter(|c| c.is_sort()).count(), 1);
    }

    #[test]
    fn test_forced_direction_overrides_icon() {
        let mut columns = columns();
        let direction = toggle_columns(&mut columns, "Amount", Some(SortDirection::Descending));
        assert_eq!(direction, SortDirection::Descending);
        assert_eq!(columns[1].sort_icon(), SortIcon::ArrowUp);

        // Field that is not a column still honours the forced direction.
        let direction = toggle_columns(&mut columns, "Rank__c", Some(SortDirection::Descending));
        assert_eq!(direction, SortDirection::Descending);
        assert!(columns.iter().all(|c| !c.is_sort()));
    }

    #[test]
    fn test_numeric_compare_treats_missing_as_zero() {
        let a = Record::untyped().set("Amount", 5.0);
        let b = Record::untyped();
        let c = Record::untyped().set("Amount", -1.0);

        assert_eq!(compare_records(&a, &b, "Amount", &FieldType::Double), Ordering::Greater);
        assert_eq!(compare_records(&c, &b, "Amount", &FieldType::Double), Ordering::Less);
    }

    #[test]
    fn test_unreadable_numbers_sort_last() {
        let a = Record::untyped().set("Amount", "n/a");
        let b = Record::untyped().set("Amount", "12");
        assert_eq!(compare_records(&a, &b, "Amount", &FieldType::Double), Ordering::Greater);
    }

    #[test]
    fn test_unreadable_numbers_lead_a_descending_sort() {
        let rows = |values: &[&str]| -> Vec<TableRow> {
            let columns = vec![Column::new(&FieldDescriptor::new("Amount", FieldType::Double), false)];
            let config = crate::table::TableConfig::default();
            let mut acc = crate::table::ThresholdAccumulator::new(config.threshold, 2);
            values
                .iter()
                .map(|v| {
                    let record = Record::untyped().set("Id", *v).set("Amount", *v);
                    crate::table::build_row(&record, &columns, &config, &mut acc)
                })
                .collect()
        };
        let ids = |rows: &[TableRow]| rows.iter().filter_map(|r| r.id().map(str::to_string)).collect::<Vec<_>>();

        let mut sorted = rows(&["n/a", "3", "1"]);
        sort_rows(&mut sorted, "Amount", &FieldType::Double, SortDirection::Ascending);
        assert_eq!(ids(&sorted), ["1", "3", "n/a"]);

        sort_rows(&mut sorted, "Amount", &FieldType::Double, SortDirection::Descending);
        assert_eq!(ids(&sorted), ["n/a", "3", "1"]);
    }

    #[test]
    fn test_clear_sort() {
        let mut columns = columns();
        toggle_columns(&mut columns, "Amount", None);
        clear_sort(&mut columns);
        assert!(columns.iter().all(|c| !c.is_sort()));
    }

    #[test]
    fn test_locale_compare_is_code_point_based() {
        assert_eq!(locale_compare("é", "z"), Ordering::Greater);
    }

    #[test]
    fn test_date_compare() {
        let a = Record::untyped().set("CloseDate", "2024-03-01");
        let b = Record::untyped().set("CloseDate", "2023-12-31");
        assert_eq!(compare_records(&a, &b, "CloseDate", &FieldType::Date), Ordering::Greater);
        assert_eq!(parse_date_millis("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_date_millis("2024-01-01T00:00:00.000+0000"), parse_date_millis("2024-01-01"));
        assert_eq!(parse_date_millis("soon"), None);
    }

    #[test]
    fn test_locale_compare_ignores_case() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("", "a"), Ordering::Less);
    }
}
