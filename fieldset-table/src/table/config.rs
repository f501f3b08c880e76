//! Table configuration

use serde::Deserialize;
use serde::Serialize;

use super::SortDirection;
use crate::model::FieldType;

/// Page size used when none (or a non-positive one) is configured.
pub const DEFAULT_RECORDS_PER_PAGE: usize = 10;

/// Threshold used when none is configured. High enough to never trigger.
pub const DEFAULT_THRESHOLD: f64 = 999_999_999.0;

/// Decimal places used for numeric cells when none is configured.
pub const DEFAULT_NUMBER_ACCURACY: u32 = 2;

/// Configuration surface of a field set table.
///
/// Every field has a default, so a host only sets what it needs. Hosts that
/// keep their configuration in JSON can deserialize it directly (keys are
/// camelCase, e.g. `recordsPerPage`, `rankField`).
///
/// # Example
///
/// ```
/// use fieldset_table::table::{SortDirection, TableConfig};
///
/// let config = TableConfig::default()
///     .with_records_per_page(25)
///     .with_rank_field("Rank__c")
///     .with_default_sort("Rank__c", SortDirection::Ascending)
///     .with_threshold("Amount", 10_000.0);
/// assert_eq!(config.records_per_page(), 25);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    /// API name of the object the table lists.
    pub object_name: Option<String>,

    /// Name of the field set describing the columns.
    pub field_set_name: Option<String>,

    /// Whether rows may be opened in the edit modal.
    pub can_edit: bool,

    /// Whether the new-record button is shown.
    pub can_create: bool,

    /// Header shown above the table.
    pub table_header: Option<String>,

    /// Label of the new-record button.
    ///
    /// Default: `New`
    pub new_record_button_label: String,

    /// Message shown when there are no rows.
    pub no_data_label: String,

    /// Rows per page. Values below 1 fall back to the default.
    ///
    /// Default: 10
    pub records_per_page: i64,

    /// Hides the pagination footer and shows every row on one page.
    pub disable_pagination: bool,

    /// Enables drag and drop row reordering.
    pub enable_drag_drop: bool,

    /// Rank assigned to the first row after a reorder.
    ///
    /// Default: 0
    pub row_number: i64,

    /// Field holding each row's rank. Rewritten by reorder.
    pub rank_field: Option<String>,

    /// Field sorted on after every rebuild.
    pub default_sort_field: Option<String>,

    /// Direction of the default sort on a column. Unset sorts descending.
    /// A default sort field outside the field set always sorts ascending.
    pub default_sort_dir: Option<SortDirection>,

    /// Type of the default sort field, used when the field is not a column.
    pub default_sort_data_type: Option<FieldType>,

    /// Event published with the reordered rows after a drop.
    pub drop_event_name: Option<String>,

    /// Running-sum cutoff for threshold highlighting.
    ///
    /// Default: 999999999
    pub threshold: f64,

    /// Numeric field summed for threshold highlighting.
    pub threshold_field: Option<String>,

    /// Decimal places for numeric cells and running sums.
    ///
    /// Default: 2
    pub number_accuracy: u32,

    /// Ignores column header clicks.
    pub disable_sort: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            object_name: None,
            field_set_name: None,
            can_edit: false,
            can_create: false,
            table_header: None,
            new_record_button_label: "New".to_string(),
            no_data_label: "No data available".to_string(),
            records_per_page: DEFAULT_RECORDS_PER_PAGE as i64,
            disable_pagination: false,
            enable_drag_drop: false,
            row_number: 0,
            rank_field: None,
            default_sort_field: None,
            default_sort_dir: None,
            default_sort_data_type: None,
            drop_event_name: None,
            threshold: DEFAULT_THRESHOLD,
            threshold_field: None,
            number_accuracy: DEFAULT_NUMBER_ACCURACY,
            disable_sort: false,
        }
    }
}

impl TableConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the object and field set the table lists.
    pub fn with_field_set(mut self, object_name: impl Into<String>, field_set_name: impl Into<String>) -> Self {
        self.object_name = Some(object_name.into());
        self.field_set_name = Some(field_set_name.into());
        self
    }

    /// Sets the page size.
    pub fn with_records_per_page(mut self, records_per_page: i64) -> Self {
        self.records_per_page = records_per_page;
        self
    }

    /// Disables pagination.
    pub fn without_pagination(mut self) -> Self {
        self.disable_pagination = true;
        self
    }

    /// Enables drag and drop reordering starting ranks at `row_number`.
    pub fn with_drag_drop(mut self, row_number: i64) -> Self {
        self.enable_drag_drop = true;
        self.row_number = row_number;
        self
    }

    /// Sets the rank field.
    pub fn with_rank_field(mut self, rank_field: impl Into<String>) -> Self {
        self.rank_field = Some(rank_field.into());
        self
    }

    /// Sets the default sort field and direction.
    pub fn with_default_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.default_sort_field = Some(field.into());
        self.default_sort_dir = Some(direction);
        self
    }

    /// Sets the event published after a drop.
    pub fn with_drop_event(mut self, event_name: impl Into<String>) -> Self {
        self.drop_event_name = Some(event_name.into());
        self
    }

    /// Sets the threshold field and cutoff.
    pub fn with_threshold(mut self, field: impl Into<String>, threshold: f64) -> Self {
        self.threshold_field = Some(field.into());
        self.threshold = threshold;
        self
    }

    /// Sets the decimal places for numeric cells.
    pub fn with_number_accuracy(mut self, number_accuracy: u32) -> Self {
        self.number_accuracy = number_accuracy;
        self
    }

    /// Disables column sorting from header clicks.
    pub fn without_sort(mut self) -> Self {
        self.disable_sort = true;
        self
    }

    /// Returns the effective page size.
    pub fn records_per_page(&self) -> usize {
        if self.records_per_page < 1 {
            DEFAULT_RECORDS_PER_PAGE
        } else {
            self.records_per_page as usize
        }
    }

    pub(crate) fn is_rank_field(&self, field_path: &str) -> bool {
        self.rank_field.as_deref() == Some(field_path)
    }

    pub(crate) fn is_threshold_field(&self, field_path: &str) -> bool {
        self.threshold_field.as_deref() == Some(field_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.records_per_page(), 10);
        assert_eq!(config.threshold, 999_999_999.0);
        assert_eq!(config.number_accuracy, 2);
        assert_eq!(config.new_record_button_label, "New");
    }

    #[test]
    fn test_non_positive_page_size_falls_back() {
        assert_eq!(TableConfig::default().with_records_per_page(0).records_per_page(), 10);
        assert_eq!(TableConfig::default().with_records_per_page(-4).records_per_page(), 10);
        assert_eq!(TableConfig::default().with_records_per_page(3).records_per_page(), 3);
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let config: TableConfig = serde_json::from_str(
            r#"{"recordsPerPage": 5, "rankField": "Rank__c", "defaultSortDir": "desc", "defaultSortDataType": "DOUBLE"}"#,
        )
        .unwrap();

        assert_eq!(config.records_per_page(), 5);
        assert_eq!(config.rank_field.as_deref(), Some("Rank__c"));
        assert_eq!(config.default_sort_dir, Some(SortDirection::Descending));
        assert_eq!(config.default_sort_data_type, Some(FieldType::Double));
        assert_eq!(config.number_accuracy, 2);
    }
}
