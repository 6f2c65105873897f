/// Test data factories with sensible defaults
use outcomes_import_lib::modules::data_import::domain::{
    Conflict, ConflictStrategy, ImportRequest, ImportResult, UploadFile,
};
use serde_json::json;

pub fn spreadsheet() -> UploadFile {
    UploadFile::new("courses.xlsx", b"PK\x03\x04 spreadsheet bytes".to_vec())
}

pub fn import_request() -> ImportRequest {
    ImportRequest {
        file: Some(spreadsheet()),
        conflict_strategy: ConflictStrategy::UseTheirs,
        ..Default::default()
    }
}

pub fn dry_run_request() -> ImportRequest {
    ImportRequest {
        dry_run: true,
        ..import_request()
    }
}

pub fn destructive_request() -> ImportRequest {
    ImportRequest {
        delete_existing: true,
        ..import_request()
    }
}

pub fn import_result(created: u64, updated: u64) -> ImportResult {
    ImportResult {
        success: Some(true),
        records_processed: created + updated,
        records_created: created,
        records_updated: updated,
        execution_time: 1.23,
        ..Default::default()
    }
}

pub fn conflict(index: usize) -> Conflict {
    Conflict {
        entity_type: "course".to_string(),
        entity_key: format!("MATH-{}", 100 + index),
        field_name: "title".to_string(),
        existing_value: json!("Calculus I"),
        import_value: json!("Calculus 1"),
        resolution: "use_theirs".to_string(),
    }
}
