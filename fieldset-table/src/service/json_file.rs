//! Services backed by JSON files on disk

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;
use log::warn;
use serde::Deserialize;

use super::FieldSetService;
use super::RecordQuery;
use super::RecordQueryService;
use super::SaveService;
use crate::error::ServiceError;
use crate::model::FieldDescriptor;
use crate::model::Record;

/// Field set file: one member list, or lists keyed by `Object.FieldSet`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSetFile {
    Members(Vec<FieldDescriptor>),
    Keyed(HashMap<String, Vec<FieldDescriptor>>),
}

/// Records file: a plain array or a query result with a `records` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsFile {
    Records(Vec<Record>),
    QueryResult { records: Vec<Record> },
}

/// Reads field sets and records from JSON files and writes saves to one.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), fieldset_table::error::ServiceError> {
/// use fieldset_table::service::{JsonFileSource, RecordQuery, RecordQueryService};
///
/// let source = JsonFileSource::new("fields.json", "records.json").with_save_path("saved.json");
/// let records = source.query_records(&RecordQuery::new("Opportunity")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    fields_path: PathBuf,
    records_path: PathBuf,
    save_path: Option<PathBuf>,
}

impl JsonFileSource {
    /// Creates a source reading the given field set and records files.
    pub fn new(fields_path: impl Into<PathBuf>, records_path: impl Into<PathBuf>) -> Self {
        Self {
            fields_path: fields_path.into(),
            records_path: records_path.into(),
            save_path: None,
        }
    }

    /// Sets the file saved records are written to.
    pub fn with_save_path(mut self, save_path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(save_path.into());
        self
    }

    async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ServiceError> {
        let bytes = tokio::fs::read(path).await?;
        debug!("read {} bytes from {}", bytes.len(), path.display());
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl FieldSetService for JsonFileSource {
    async fn field_set_members(
        &self,
        object_name: &str,
        field_set: &str,
    ) -> Result<Vec<FieldDescriptor>, ServiceError> {
        match Self::read_json(&self.fields_path).await? {
            FieldSetFile::Members(members) => Ok(members),
            FieldSetFile::Keyed(mut sets) => sets
                .remove(&format!("{object_name}.{field_set}"))
                .ok_or_else(|| ServiceError::field_set_not_found(object_name, field_set)),
        }
    }
}

#[async_trait]
impl RecordQueryService for JsonFileSource {
    async fn query_records(&self, query: &RecordQuery) -> Result<Vec<Record>, ServiceError> {
        let records = match Self::read_json(&self.records_path).await? {
            RecordsFile::Records(records) | RecordsFile::QueryResult { records } => records,
        };
        if let Some(where_clause) = &query.where_clause {
            warn!("ignoring where clause '{where_clause}' for file source");
        }

        let related = match (&query.related_field, &query.record_id) {
            (Some(field), Some(id)) => Some((field.as_str(), id.as_str())),
            _ => None,
        };
        let records: Vec<Record> = records
            .into_iter()
            .filter(|r| r.object_name().is_none_or(|name| name == query.object_name))
            .filter(|r| {
                related.is_none_or(|(field, id)| {
                    r.get_string(field).ok().flatten() == Some(id)
                })
            })
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();
        debug!("{} records match {:?}", records.len(), query);
        Ok(records)
    }
}

#[async_trait]
impl SaveService for JsonFileSource {
    async fn save_records(&self, records_json: &str) -> Result<(), ServiceError> {
        let Some(path) = &self.save_path else {
            return Err(ServiceError::rejected("no save file configured"));
        };
        // Reject anything that is not a record array before touching the file.
        let records: Vec<Record> = serde_json::from_str(records_json)?;
        let pretty = serde_json::to_vec_pretty(&records)?;
        tokio::fs::write(path, pretty).await?;
        debug!("wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("fieldset-table-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_keyed_field_sets() {
        let fields = temp_file(
            "keyed-fields.json",
            r#"{"Opportunity.Pipeline": [{"fieldPath": "Name", "typeApex": "STRING"}]}"#,
        );
        let source = JsonFileSource::new(&fields, "unused.json");

        let members = source.field_set_members("Opportunity", "Pipeline").await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].path(), "Name");

        let err = source.field_set_members("Opportunity", "Other").await.unwrap_err();
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn test_query_filters_by_object_parent_and_limit() {
        let records = temp_file(
            "records.json",
            r#"{"records": [
                {"attributes": {"type": "Contact"}, "Id": "003A", "AccountId": "001A"},
                {"attributes": {"type": "Contact"}, "Id": "003B", "AccountId": "001B"},
                {"attributes": {"type": "Contact"}, "Id": "003C", "AccountId": "001A"},
                {"attributes": {"type": "Lead"}, "Id": "00QA", "AccountId": "001A"}
            ]}"#,
        );
        let source = JsonFileSource::new("unused.json", &records);

        let query = RecordQuery::new("Contact").related_to("AccountId", "001A");
        let found = source.query_records(&query).await.unwrap();
        let ids: Vec<_> = found.iter().filter_map(Record::id).collect();
        assert_eq!(ids, ["003A", "003C"]);

        let found = source.query_records(&query.with_limit(1)).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_save_requires_a_target() {
        let source = JsonFileSource::new("a.json", "b.json");
        let err = source.save_records("[]").await.unwrap_err();
        assert!(err.is_rejection());
    }
}
