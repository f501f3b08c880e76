//! Collaborator services
//!
//! The table never fetches or persists anything itself. Field set members,
//! records and saves go through the traits below; [`TableController`] wires
//! them to a [`TableViewModel`].

mod json_file;

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use log::info;
use serde::Deserialize;
use serde::Serialize;

pub use json_file::JsonFileSource;

use crate::error::ServiceError;
use crate::events::PageEventBus;
use crate::model::FieldDescriptor;
use crate::model::Record;
use crate::table::SortDirection;
use crate::table::TableConfig;
use crate::table::TableViewModel;

/// Resolves a field set to its ordered members.
#[async_trait]
pub trait FieldSetService: Send + Sync {
    /// Returns the members of `field_set` on `object_name`, in display order.
    async fn field_set_members(
        &self,
        object_name: &str,
        field_set: &str,
    ) -> Result<Vec<FieldDescriptor>, ServiceError>;
}

/// Fetches the records shown in a table.
#[async_trait]
pub trait RecordQueryService: Send + Sync {
    /// Runs a query and returns the matching records.
    async fn query_records(&self, query: &RecordQuery) -> Result<Vec<Record>, ServiceError>;
}

/// Persists edited records.
#[async_trait]
pub trait SaveService: Send + Sync {
    /// Saves a JSON array of records.
    async fn save_records(&self, records_json: &str) -> Result<(), ServiceError>;
}

/// Parameters of a record query.
///
/// The service decides how to turn these into an actual query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordQuery {
    pub object_name: String,
    pub field_set: Option<String>,
    /// Parent record the results are related to.
    pub record_id: Option<String>,
    /// Field on the queried object that points at `record_id`.
    pub related_field: Option<String>,
    pub where_clause: Option<String>,
    pub limit: Option<usize>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

impl RecordQuery {
    /// Creates a query for every record of an object.
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            ..Default::default()
        }
    }

    /// Builds the query a table configuration implies.
    pub fn for_table(config: &TableConfig) -> Result<Self, ServiceError> {
        let object_name = config
            .object_name
            .clone()
            .ok_or(ServiceError::Unconfigured("objectName"))?;
        Ok(Self {
            object_name,
            field_set: config.field_set_name.clone(),
            sort_field: config.default_sort_field.clone(),
            sort_direction: config.default_sort_dir,
            ..Default::default()
        })
    }

    /// Restricts the query to children of a parent record.
    pub fn related_to(mut self, related_field: impl Into<String>, record_id: impl Into<String>) -> Self {
        self.related_field = Some(related_field.into());
        self.record_id = Some(record_id.into());
        self
    }

    /// Adds a filter passed through to the service.
    pub fn with_where(mut self, where_clause: impl Into<String>) -> Self {
        self.where_clause = Some(where_clause.into());
        self
    }

    /// Caps the number of records returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Loads tables from the collaborator services and saves their changes.
#[derive(Clone)]
pub struct TableController {
    fields: Arc<dyn FieldSetService>,
    records: Arc<dyn RecordQueryService>,
    saver: Arc<dyn SaveService>,
    events: Option<PageEventBus>,
}

impl TableController {
    /// Creates a controller over three services.
    pub fn new(
        fields: Arc<dyn FieldSetService>,
        records: Arc<dyn RecordQueryService>,
        saver: Arc<dyn SaveService>,
    ) -> Self {
        Self {
            fields,
            records,
            saver,
            events: None,
        }
    }

    /// Creates a controller over one source implementing every service.
    pub fn from_source<S>(source: Arc<S>) -> Self
    where
        S: FieldSetService + RecordQueryService + SaveService + 'static,
    {
        Self::new(source.clone(), source.clone(), source)
    }

    /// Attaches the event bus handed to every table this controller loads.
    pub fn with_event_bus(mut self, events: PageEventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Fetches the field set and records and builds a table.
    pub async fn load(&self, config: TableConfig, query: &RecordQuery) -> Result<TableViewModel, ServiceError> {
        let object_name = config
            .object_name
            .as_deref()
            .ok_or(ServiceError::Unconfigured("objectName"))?;
        let field_set = config
            .field_set_name
            .as_deref()
            .ok_or(ServiceError::Unconfigured("fieldSetName"))?;

        let fields = self.fields.field_set_members(object_name, field_set).await?;
        let records = self.records.query_records(query).await?;
        info!(
            "loaded {} records of {object_name} with {} fields from {field_set}",
            records.len(),
            fields.len()
        );

        let table = TableViewModel::build(config, &records, &fields);
        Ok(match &self.events {
            Some(events) => table.with_event_bus(events.clone()),
            None => table,
        })
    }

    /// Saves the records of rows whose rank changed.
    ///
    /// Returns the number of records handed to the save service. Nothing is
    /// sent when no row changed.
    pub async fn save_changes(&self, table: &TableViewModel) -> Result<usize, ServiceError> {
        let changed: Vec<&Record> = table.changed_rows().map(|row| row.record()).collect();
        if changed.is_empty() {
            debug!("no changed rows to save");
            return Ok(0);
        }
        let records_json = serde_json::to_string(&changed)?;
        self.saver.save_records(&records_json).await?;
        info!("saved {} changed records", changed.len());
        Ok(changed.len())
    }
}

impl std::fmt::Debug for TableController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableController")
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
