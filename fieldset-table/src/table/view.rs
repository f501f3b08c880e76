//! Table view model

use std::ops::Range;

use log::debug;

use super::Column;
use super::DragState;
use super::PageIndex;
use super::RowClasses;
use super::SortDirection;
use super::TableConfig;
use super::TableRow;
use super::build::build_columns;
use super::build::build_row;
use super::sort::sort_rows;
use super::sort::toggle_columns;
use super::threshold::ThresholdAccumulator;
use crate::error::TableError;
use crate::events::PageEventBus;
use crate::model::FieldDescriptor;
use crate::model::FieldType;
use crate::model::Record;

/// In-memory state of a field set table.
///
/// Holds the display rows built from the last record set, the column header
/// state, the page partition and the drag state. Every operation runs to
/// completion synchronously; the host calls [`rebuild`](Self::rebuild)
/// whenever its record collection is (re)assigned.
///
/// # Example
///
/// ```
/// use fieldset_table::model::{FieldDescriptor, FieldType, Record};
/// use fieldset_table::table::{TableConfig, TableViewModel};
///
/// let fields = vec![
///     FieldDescriptor::new("Name", FieldType::String),
///     FieldDescriptor::new("Amount", FieldType::Double),
/// ];
/// let records: Vec<Record> = (1..=12)
///     .map(|i| Record::new("Opportunity").set("Id", format!("006{i}")).set("Amount", i as f64))
///     .collect();
///
/// let mut table = TableViewModel::build(TableConfig::default(), &records, &fields);
/// assert_eq!(table.total_pages(), 2);
/// table.page_forward();
/// assert_eq!(table.visible_rows().len(), 2);
/// ```
#[derive(Clone)]
pub struct TableViewModel {
    pub(crate) config: TableConfig,
    pub(crate) columns: Vec<Column>,
    pub(crate) rows: Vec<TableRow>,
    pub(crate) pages: PageIndex,
    pub(crate) current_page: usize,
    pub(crate) drag: DragState,
    pub(crate) events: Option<PageEventBus>,
}

impl TableViewModel {
    /// Creates an empty table.
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            columns: Vec::new(),
            rows: Vec::new(),
            pages: PageIndex::default(),
            current_page: 1,
            drag: DragState::Idle,
            events: None,
        }
    }

    /// Creates a table and builds it from records and a field set.
    pub fn build(config: TableConfig, records: &[Record], fields: &[FieldDescriptor]) -> Self {
        let mut table = Self::new(config);
        table.rebuild(records, fields);
        table
    }

    /// Attaches the page event bus that receives drop notifications.
    pub fn with_event_bus(mut self, events: PageEventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Rebuilds every row from scratch.
    ///
    /// Records are copied, columns are copied from `fields`, the threshold
    /// running sum restarts at zero and the default sort (if any) is
    /// applied. Calling it twice with the same input gives the same state.
    pub fn rebuild(&mut self, records: &[Record], fields: &[FieldDescriptor]) {
        self.columns = build_columns(fields, &self.config);
        self.drag = DragState::Idle;

        let mut acc = ThresholdAccumulator::new(self.config.threshold, self.config.number_accuracy);
        self.rows = records
            .iter()
            .map(|record| build_row(record, &self.columns, &self.config, &mut acc))
            .collect();
        debug!(
            "rebuilt table with {} rows and {} columns",
            self.rows.len(),
            self.columns.len()
        );

        self.setup_pagination();
        self.apply_default_sort();
    }

    fn apply_default_sort(&mut self) {
        let Some(field) = self.config.default_sort_field.clone() else {
            return;
        };
        // A field outside the field set has no header arrow to follow and
        // always sorts smallest first. Columns default to descending.
        let direction = match self.column(&field) {
            Some(_) => self
                .config
                .default_sort_dir
                .unwrap_or(SortDirection::Descending),
            None => SortDirection::Ascending,
        };
        let field_type = self.sort_type_for(&field, self.config.default_sort_data_type.clone());
        self.sort_column(&field, Some(field_type), Some(direction));
    }

    fn sort_type_for(&self, field_path: &str, fallback: Option<FieldType>) -> FieldType {
        self.column(field_path)
            .map(|c| c.field_type().clone())
            .or(fallback)
            .unwrap_or_default()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the columns in field set order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column for a field path.
    pub fn column(&self, field_path: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field_path == field_path)
    }

    /// Returns every row in current order.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has rows to show.
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Returns the rows whose rank changed through reordering.
    pub fn changed_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|row| row.is_changed)
    }

    /// Returns the classes every row starts from before threshold marking.
    pub fn row_classes(&self) -> RowClasses {
        RowClasses::base(self.config.enable_drag_drop)
    }

    /// Returns true if the pagination footer is shown.
    pub fn display_footer(&self) -> bool {
        !self.config.disable_pagination
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Repartitions the rows into pages and returns to page 1.
    pub fn setup_pagination(&mut self) {
        let records_per_page = if self.config.disable_pagination {
            self.rows.len()
        } else {
            self.config.records_per_page()
        };
        self.pages = PageIndex::partition(self.rows.len(), records_per_page);
        self.current_page = 1;
        debug!(
            "paginated {} rows into {} pages of {}",
            self.rows.len(),
            self.pages.total_pages(),
            self.pages.records_per_page()
        );
    }

    /// Returns the page partition.
    pub fn pages(&self) -> &PageIndex {
        &self.pages
    }

    /// Returns the current 1-based page number.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Returns the number of pages (at least 1).
    pub fn total_pages(&self) -> usize {
        self.pages.total_pages()
    }

    /// Returns the row positions of the current page.
    pub fn visible_range(&self) -> Range<usize> {
        self.pages.page(self.current_page).unwrap_or(0..0)
    }

    /// Returns the rows of the current page.
    pub fn visible_rows(&self) -> &[TableRow] {
        &self.rows[self.visible_range()]
    }

    /// Moves to the next page. Does nothing on the last page.
    pub fn page_forward(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
    }

    /// Moves to the previous page. Does nothing on the first page.
    pub fn page_back(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// Changes the page size and repaginates.
    ///
    /// Values below 1 fall back to the default page size.
    pub fn set_records_per_page(&mut self, records_per_page: i64) {
        self.config.records_per_page = records_per_page;
        self.setup_pagination();
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Handles a click on a column header.
    ///
    /// Ignored when sorting is disabled.
    pub fn click_column(&mut self, field_path: &str) -> Result<(), TableError> {
        if self.config.disable_sort {
            return Ok(());
        }
        let field_type = self
            .column(field_path)
            .map(|c| c.field_type().clone())
            .ok_or_else(|| TableError::UnknownColumn(field_path.to_string()))?;
        self.sort_column(field_path, Some(field_type), None);
        Ok(())
    }

    /// Sorts rows by a field and repaginates.
    ///
    /// Header state toggles as for a click. `direction`, when given, forces
    /// the sort direction regardless of the header arrow. `field_type`
    /// defaults to the column's type.
    pub fn sort_column(
        &mut self,
        field_path: &str,
        field_type: Option<FieldType>,
        direction: Option<SortDirection>,
    ) {
        let direction = toggle_columns(&mut self.columns, field_path, direction);
        let field_type = field_type.unwrap_or_else(|| self.sort_type_for(field_path, None));
        debug!("sorting by {field_path} ({field_type}) {direction:?}");
        sort_rows(&mut self.rows, field_path, &field_type, direction);
        self.setup_pagination();
    }

    /// Returns the column the table is sorted by, if any.
    pub fn sorted_column(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_sort)
    }
}

impl std::fmt::Debug for TableViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableViewModel")
            .field("columns", &self.columns.len())
            .field("rows", &self.rows.len())
            .field("current_page", &self.current_page)
            .field("total_pages", &self.pages.total_pages())
            .field("drag", &self.drag)
            .finish()
    }
}
