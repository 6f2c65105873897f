//! Plain-text rendering of import display models for the terminal.

use std::fmt::Write;

use crate::modules::data_import::domain::{
    BannerStyle, CappedList, ImportEvent, ImportReport, ProgressView, ValidationReport,
};

const BAR_WIDTH: usize = 30;

pub fn render_progress(view: &ProgressView) -> String {
    let filled = BAR_WIDTH * view.percentage as usize / 100;
    let mut line = format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        view.percentage
    );
    if !view.message.is_empty() {
        let _ = write!(line, " {}", view.message);
    }
    if let Some((processed, total)) = view.records {
        let _ = write!(line, " ({}/{} records)", processed, total);
    }
    line
}

pub fn render_import_report(report: &ImportReport, dry_run: bool) -> String {
    let mut out = String::new();

    let heading = match (dry_run, report.success) {
        (true, true) => "Dry run completed. No changes were saved.",
        (true, false) => "Dry run completed with errors. No changes were saved.",
        (false, true) => "Import completed successfully.",
        (false, false) => "Import completed with errors.",
    };
    let _ = writeln!(out, "{}", heading);

    for (label, value) in report.counters.labelled() {
        let _ = writeln!(out, "  {:<18} {}", format!("{}:", label), value);
    }
    let _ = writeln!(out, "  {:<18} {}", "Execution time:", report.execution_time);

    write_list(&mut out, "Errors", &report.errors, "errors");
    write_list(&mut out, "Warnings", &report.warnings, "warnings");

    if !report.conflicts.is_empty() {
        let _ = writeln!(
            out,
            "Conflicts ({} detected):",
            report.conflicts_detected.max(report.conflicts.total as u64)
        );
        let _ = writeln!(
            out,
            "  {} | {} | {} | {} | {} | {}",
            "Entity type", "Entity key", "Field", "Existing value", "Import value", "Resolution"
        );
        for row in &report.conflicts.visible {
            let _ = writeln!(
                out,
                "  {} | {} | {} | {} | {} | {}",
                row.entity_type,
                row.entity_key,
                row.field_name,
                row.existing_value,
                row.import_value,
                row.resolution
            );
        }
        if let Some(notice) = report.conflicts.overflow_notice("conflicts") {
            let _ = writeln!(out, "  {}", notice);
        }
    }

    out
}

pub fn render_validation_report(report: &ValidationReport) -> String {
    let mut out = String::new();

    let banner = match report.banner {
        BannerStyle::Success => "[OK] File is valid and ready to import.",
        BannerStyle::Warning => "[WARN] File has problems that must be fixed before importing.",
    };
    let _ = writeln!(out, "{}", banner);
    let _ = writeln!(out, "  File:                {}", report.filename);
    let _ = writeln!(out, "  Adapter:             {}", report.adapter);
    let _ = writeln!(out, "  Records found:       {}", report.records_found);
    let _ = writeln!(out, "  Potential conflicts: {}", report.potential_conflicts);

    write_list(&mut out, "Errors", &report.errors, "errors");
    write_list(&mut out, "Warnings", &report.warnings, "warnings");

    out
}

/// One status line for events a terminal should show while waiting
pub fn render_event(event: &ImportEvent) -> Option<String> {
    match event {
        ImportEvent::Submitted {
            progress_id,
            dry_run,
        } => Some(format!(
            "Submitted {} (progress id {})",
            if *dry_run { "dry run" } else { "import" },
            progress_id
        )),
        ImportEvent::Progress { view, .. } => Some(render_progress(view)),
        ImportEvent::Cancelled { .. } => Some("Stopped watching import progress.".to_string()),
        // Terminal outcomes are reported by the command itself
        ImportEvent::Completed { .. }
        | ImportEvent::Failed { .. }
        | ImportEvent::TimedOut { .. }
        | ImportEvent::ConnectionLost { .. } => None,
        // A terminal has no views to refresh
        ImportEvent::ReloadScheduled { .. } | ImportEvent::ReloadRequested { .. } => None,
    }
}

fn write_list(out: &mut String, title: &str, list: &CappedList<String>, noun: &str) {
    if list.is_empty() {
        return;
    }
    let _ = writeln!(out, "{} ({}):", title, list.total);
    for item in &list.visible {
        let _ = writeln!(out, "  - {}", item);
    }
    if let Some(notice) = list.overflow_notice(noun) {
        let _ = writeln!(out, "  {}", notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::data_import::domain::{
        ImportResult, ProgressId, ProgressSnapshot, ValidationOutcome,
    };
    use std::time::Duration;

    #[test]
    fn test_progress_line() {
        let mut snapshot = ProgressSnapshot::running(40.0, "Importing courses");
        snapshot.records_processed = Some(4);
        snapshot.total_records = Some(10);
        let line = render_progress(&ProgressView::from_snapshot(&snapshot));
        assert_eq!(
            line,
            format!(
                "[{}{}]  40% Importing courses (4/10 records)",
                "#".repeat(12),
                "-".repeat(18)
            )
        );
    }

    #[test]
    fn test_import_report_text() {
        let result = ImportResult {
            records_processed: 10,
            records_created: 8,
            records_updated: 2,
            execution_time: 1.23,
            errors: (1..=12).map(|i| format!("Row {}: invalid term", i)).collect(),
            ..Default::default()
        };
        let text = render_import_report(&ImportReport::from_result(&result), false);

        assert!(text.starts_with("Import completed with errors."));
        assert!(text.contains("Records created:   8"));
        assert!(text.contains("Execution time:    1.23s"));
        assert!(text.contains("Errors (12):"));
        assert!(text.contains("  - Row 10: invalid term"));
        assert!(!text.contains("Row 11: invalid term"));
        assert!(text.contains("... and 2 more errors"));
        assert!(!text.contains("Warnings"));
    }

    #[test]
    fn test_dry_run_heading() {
        let text = render_import_report(&ImportReport::from_result(&ImportResult::default()), true);
        assert!(text.starts_with("Dry run completed. No changes were saved."));
    }

    #[test]
    fn test_validation_text() {
        let outcome = ValidationOutcome {
            valid: false,
            errors: vec!["Missing column: course_number".to_string()],
            ..Default::default()
        };
        let text = render_validation_report(&ValidationReport::build(&outcome));
        assert!(text.starts_with("[WARN]"));
        assert!(text.contains("  - Missing column: course_number"));
    }

    #[test]
    fn test_event_lines() {
        let progress_id = ProgressId::new("abc").unwrap();
        let scheduled = ImportEvent::ReloadScheduled {
            progress_id: progress_id.clone(),
            delay: Duration::from_millis(3000),
        };
        assert!(render_event(&scheduled).is_none());
        assert!(render_event(&ImportEvent::ReloadRequested {
            progress_id: progress_id.clone(),
        })
        .is_none());
        assert!(render_event(&ImportEvent::Failed {
            progress_id,
            message: "boom".to_string()
        })
        .is_none());
    }
}
