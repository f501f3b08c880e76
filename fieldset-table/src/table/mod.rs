//! Field set table view model
//!
//! Builds display rows from raw records and field set members, and keeps the
//! derived views (sort order, pages, threshold marks) in step as the user
//! sorts, pages, reorders and edits.
//!
//! # Overview
//!
//! - [`TableViewModel`] - the table state and every operation on it
//! - [`TableConfig`] - host-supplied settings
//! - [`TableRow`] / [`TableCell`] - display rows built from records
//! - [`Column`] - header state per field set member
//! - [`PageIndex`] - partition of the current row order into pages
//! - [`ThresholdAccumulator`] - running sum over the threshold field

mod build;
mod config;
mod number;
mod page;
mod reorder;
mod row;
mod sort;
mod threshold;
mod upsert;
mod view;

pub use build::NAME_FIELD;
pub use build::build_row;
pub use build::relationship_name;
pub use config::*;
pub use number::round_to;
pub use number::to_fixed;
pub use page::PageIndex;
pub use reorder::DragState;
pub use row::*;
pub use sort::Column;
pub use sort::SortDirection;
pub use sort::SortIcon;
pub use sort::compare_records;
pub use sort::locale_compare;
pub use sort::parse_date_millis;
pub use threshold::ThresholdAccumulator;
pub use threshold::ThresholdStep;
pub use upsert::FormField;
pub use upsert::RecordForm;
pub use upsert::RecordSavedEvent;
pub use upsert::Upsert;
pub use view::TableViewModel;
