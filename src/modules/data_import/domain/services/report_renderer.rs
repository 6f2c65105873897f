//! Pure conversion of import and validation payloads into display models.
//!
//! Nothing here performs I/O; front-ends turn the models into text or markup.

use serde::Serialize;

use crate::modules::data_import::domain::entities::{
    Conflict, ImportResult, ProgressSnapshot, ValidationOutcome,
};
use crate::modules::data_import::domain::value_objects::ProgressStatus;

pub const MAX_VISIBLE_ERRORS: usize = 10;
pub const MAX_VISIBLE_WARNINGS: usize = 5;
pub const MAX_VISIBLE_CONFLICTS: usize = 20;

/// A list truncated to a fixed number of visible entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CappedList<T> {
    pub visible: Vec<T>,
    /// Entries left out, `total - cap` when the cap was exceeded
    pub hidden: usize,
    pub total: usize,
}

impl<T: Clone> CappedList<T> {
    pub fn new(items: &[T], cap: usize) -> Self {
        let visible: Vec<T> = items.iter().take(cap).cloned().collect();
        Self {
            hidden: items.len() - visible.len(),
            total: items.len(),
            visible,
        }
    }

    /// Capacity that never truncates
    pub fn uncapped(items: &[T]) -> Self {
        Self::new(items, items.len())
    }
}

impl<T> CappedList<T> {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// `"... and N more <noun>"` when entries were hidden
    pub fn overflow_notice(&self, noun: &str) -> Option<String> {
        (self.hidden > 0).then(|| format!("... and {} more {}", self.hidden, noun))
    }
}

/// The four counters every completed import shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreCounters {
    pub processed: u64,
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
}

impl CoreCounters {
    pub fn labelled(&self) -> [(&'static str, u64); 4] {
        [
            ("Records processed", self.processed),
            ("Records created", self.created),
            ("Records updated", self.updated),
            ("Records skipped", self.skipped),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictRow {
    pub entity_type: String,
    pub entity_key: String,
    pub field_name: String,
    pub existing_value: String,
    pub import_value: String,
    pub resolution: String,
}

impl ConflictRow {
    pub fn from_conflict(conflict: &Conflict) -> Self {
        Self {
            entity_type: conflict.entity_type.clone(),
            entity_key: conflict.entity_key.clone(),
            field_name: conflict.field_name.clone(),
            existing_value: display_value(&conflict.existing_value),
            import_value: display_value(&conflict.import_value),
            resolution: resolution_label(&conflict.resolution),
        }
    }
}

/// Display model for a finished import
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub success: bool,
    pub counters: CoreCounters,
    pub conflicts_detected: u64,
    pub execution_time: String,
    pub errors: CappedList<String>,
    pub warnings: CappedList<String>,
    pub conflicts: CappedList<ConflictRow>,
}

impl ImportReport {
    pub fn build(result: &ImportResult, success: bool) -> Self {
        let rows: Vec<ConflictRow> = result
            .conflicts
            .iter()
            .take(MAX_VISIBLE_CONFLICTS)
            .map(ConflictRow::from_conflict)
            .collect();

        Self {
            success,
            counters: CoreCounters {
                processed: result.records_processed,
                created: result.records_created,
                updated: result.records_updated,
                skipped: result.records_skipped,
            },
            conflicts_detected: result.conflicts_detected,
            execution_time: format_seconds(result.execution_time),
            errors: CappedList::new(&result.errors, MAX_VISIBLE_ERRORS),
            warnings: CappedList::new(&result.warnings, MAX_VISIBLE_WARNINGS),
            conflicts: CappedList {
                hidden: result.conflicts.len() - rows.len(),
                total: result.conflicts.len(),
                visible: rows,
            },
        }
    }

    pub fn from_result(result: &ImportResult) -> Self {
        Self::build(result, result.is_success())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerStyle {
    Success,
    Warning,
}

/// Display model for a dry validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub banner: BannerStyle,
    pub filename: String,
    pub adapter: String,
    pub records_found: u64,
    pub potential_conflicts: u64,
    pub errors: CappedList<String>,
    pub warnings: CappedList<String>,
}

impl ValidationReport {
    pub fn build(outcome: &ValidationOutcome) -> Self {
        Self {
            valid: outcome.valid,
            banner: if outcome.valid {
                BannerStyle::Success
            } else {
                BannerStyle::Warning
            },
            filename: outcome.file_info.filename.clone(),
            adapter: outcome.file_info.adapter.clone(),
            records_found: outcome.records_found,
            potential_conflicts: outcome.potential_conflicts,
            errors: CappedList::uncapped(&outcome.errors),
            warnings: CappedList::uncapped(&outcome.warnings),
        }
    }
}

/// Bounded progress indicator state for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub status: ProgressStatus,
    pub percentage: u8,
    pub message: String,
    /// `(processed, total)` only when the service reported both
    pub records: Option<(u64, u64)>,
}

impl ProgressView {
    pub fn from_snapshot(snapshot: &ProgressSnapshot) -> Self {
        let fallback = if snapshot.status == ProgressStatus::Completed {
            100.0
        } else {
            0.0
        };

        Self {
            status: snapshot.status,
            percentage: clamp_percentage(snapshot.percentage.unwrap_or(fallback)),
            message: snapshot.message.clone(),
            records: snapshot.records_processed.zip(snapshot.total_records),
        }
    }
}

pub fn clamp_percentage(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}

pub fn format_seconds(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    format!("{:.2}s", seconds)
}

/// `kept_existing` -> `Kept existing`
pub fn resolution_label(resolution: &str) -> String {
    let spaced = resolution.trim().replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Unresolved".to_string(),
    }
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
