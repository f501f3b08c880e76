//! Loading and saving tables through the collaborator services.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use fieldset_table::error::ServiceError;
use fieldset_table::model::FieldDescriptor;
use fieldset_table::model::FieldType;
use fieldset_table::model::Record;
use fieldset_table::service::FieldSetService;
use fieldset_table::service::JsonFileSource;
use fieldset_table::service::RecordQuery;
use fieldset_table::service::RecordQueryService;
use fieldset_table::service::SaveService;
use fieldset_table::service::TableController;
use fieldset_table::table::TableConfig;

#[derive(Default)]
struct MockServices {
    queries: Mutex<Vec<RecordQuery>>,
    saved: Mutex<Vec<String>>,
}

#[async_trait]
impl FieldSetService for MockServices {
    async fn field_set_members(
        &self,
        object_name: &str,
        field_set: &str,
    ) -> Result<Vec<FieldDescriptor>, ServiceError> {
        if field_set != "Board" {
            return Err(ServiceError::field_set_not_found(object_name, field_set));
        }
        Ok(vec![
            FieldDescriptor::new("Name", FieldType::String),
            FieldDescriptor::new("Rank__c", FieldType::Double),
        ])
    }
}

#[async_trait]
impl RecordQueryService for MockServices {
    async fn query_records(&self, query: &RecordQuery) -> Result<Vec<Record>, ServiceError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok((1..=4)
            .map(|i| {
                Record::new("Task")
                    .set("Id", format!("00T{i}"))
                    .set("Name", format!("Task {i}"))
                    .set("Rank__c", i as f64)
            })
            .collect())
    }
}

#[async_trait]
impl SaveService for MockServices {
    async fn save_records(&self, records_json: &str) -> Result<(), ServiceError> {
        self.saved.lock().unwrap().push(records_json.to_string());
        Ok(())
    }
}

fn board_config() -> TableConfig {
    TableConfig::default()
        .with_field_set("Task", "Board")
        .with_drag_drop(1)
        .with_rank_field("Rank__c")
}

#[tokio::test]
async fn test_load_builds_the_table() {
    let services = Arc::new(MockServices::default());
    let controller = TableController::from_source(services.clone());

    let query = RecordQuery::for_table(&board_config()).unwrap().related_to("WhatId", "001A");
    let table = controller.load(board_config(), &query).await.unwrap();

    assert_eq!(table.row_count(), 4);
    assert_eq!(table.columns().len(), 2);
    let queries = services.queries.lock().unwrap();
    assert_eq!(queries[0].object_name, "Task");
    assert_eq!(queries[0].record_id.as_deref(), Some("001A"));
}

#[tokio::test]
async fn test_load_requires_object_and_field_set() {
    let controller = TableController::from_source(Arc::new(MockServices::default()));

    let err = controller
        .load(TableConfig::default(), &RecordQuery::new("Task"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Unconfigured("objectName")));

    let config = TableConfig::default().with_field_set("Task", "Missing");
    let err = controller.load(config, &RecordQuery::new("Task")).await.unwrap_err();
    assert!(matches!(err, ServiceError::FieldSetNotFound { .. }));
}

#[tokio::test]
async fn test_save_changes_sends_only_changed_rows() {
    let services = Arc::new(MockServices::default());
    let controller = TableController::from_source(services.clone());
    let mut table = controller.load(board_config(), &RecordQuery::new("Task")).await.unwrap();

    assert_eq!(controller.save_changes(&table).await.unwrap(), 0);
    assert!(services.saved.lock().unwrap().is_empty());

    table.start_drag(0).unwrap();
    table.drop_on(1).unwrap();
    assert_eq!(controller.save_changes(&table).await.unwrap(), 2);

    let saved = services.saved.lock().unwrap();
    let records: Vec<Record> = serde_json::from_str(&saved[0]).unwrap();
    let ranks: Vec<_> = records
        .iter()
        .map(|r| (r.id().unwrap().to_string(), r.get_number("Rank__c").unwrap()))
        .collect();
    assert_eq!(
        ranks,
        [("00T2".to_string(), Some(1.0)), ("00T1".to_string(), Some(2.0))]
    );
}

#[tokio::test]
async fn test_json_file_round_trip() {
    let dir = std::env::temp_dir().join(format!("fieldset-table-controller-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let fields = dir.join("fields.json");
    let records = dir.join("records.json");
    let saved = dir.join("saved.json");
    std::fs::write(
        &fields,
        r#"[{"fieldPath": "Name", "typeApex": "STRING"}, {"fieldPath": "Rank__c", "typeApex": "DOUBLE"}]"#,
    )
    .unwrap();
    std::fs::write(
        &records,
        r#"[
            {"attributes": {"type": "Task"}, "Id": "00T1", "Name": "One", "Rank__c": 1},
            {"attributes": {"type": "Task"}, "Id": "00T2", "Name": "Two", "Rank__c": 2},
            {"attributes": {"type": "Task"}, "Id": "00T3", "Name": "Three", "Rank__c": 3}
        ]"#,
    )
    .unwrap();

    let source = Arc::new(JsonFileSource::new(&fields, &records).with_save_path(&saved));
    let controller = TableController::from_source(source);
    let mut table = controller.load(board_config(), &RecordQuery::new("Task")).await.unwrap();

    table.start_drag(2).unwrap();
    table.drop_on(0).unwrap();
    assert_eq!(controller.save_changes(&table).await.unwrap(), 3);

    let written: Vec<Record> = serde_json::from_slice(&std::fs::read(&saved).unwrap()).unwrap();
    assert_eq!(written[0].id(), Some("00T3"));
    assert_eq!(written[0].object_name(), Some("Task"));
    assert_eq!(written[0].get_number("Rank__c").unwrap(), Some(1.0));
}
