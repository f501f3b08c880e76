//! Field set data table view model
//!
//! Turns platform records and field set metadata into a sortable, paginated,
//! drag-reorderable table with running-sum threshold highlighting.
//!
//! - [`model`] - dynamic records, values and field set members
//! - [`table`] - the table view model
//! - [`events`] - page-scoped publish/subscribe for drop notifications
//! - [`service`] - collaborator traits for loading and saving

pub mod error;
pub mod events;
pub mod model;
pub mod service;
pub mod table;

pub use error::Error;
pub use events::PageEventBus;
pub use table::TableConfig;
pub use table::TableViewModel;
