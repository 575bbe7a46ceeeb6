//! Per-file status lines and the end-of-run summary.

use playbook_mender_engine::{FileReport, FileStatus, RunSummary, Strategy};

pub fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Valid => "valid",
        FileStatus::Fixed => "fixed",
        FileStatus::Failed => "failed",
        FileStatus::IoError => "io-error",
    }
}

/// `fixed    roles/web/tasks/main.yml (task-list, incremental, written)`
pub fn format_report(report: &FileReport) -> String {
    let mut details = Vec::new();
    if let Some(kind) = report.kind {
        details.push(kind.to_string());
    }
    if report.strategy != Strategy::None {
        details.push(report.strategy.to_string());
    }
    if report.written {
        details.push("written".to_string());
    }

    let mut line = format!(
        "{:<8} {}",
        status_label(report.status),
        report.path.display()
    );
    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }
    if matches!(report.status, FileStatus::Failed | FileStatus::IoError)
        && let Some(diagnostic) = &report.diagnostic
    {
        line.push_str(&format!(": {diagnostic}"));
    }
    line
}

pub fn format_summary(summary: &RunSummary) -> String {
    let noun = if summary.total == 1 { "file" } else { "files" };
    format!(
        "{} {noun}: {} valid, {} fixed, {} failed, {} io errors",
        summary.total, summary.valid, summary.fixed, summary.failed, summary.io_errors
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use playbook_mender_engine::FileKind;
    use rstest::rstest;
    use std::path::PathBuf;

    fn report(status: FileStatus, strategy: Strategy, written: bool) -> FileReport {
        FileReport {
            path: PathBuf::from("roles/web/tasks/main.yml"),
            status,
            kind: Some(FileKind::TaskList),
            strategy,
            diagnostic: Some("document 1: tasks is a mapping, expected a sequence".to_string()),
            written,
        }
    }

    #[rstest]
    #[case(
        report(FileStatus::Valid, Strategy::None, false),
        "valid    roles/web/tasks/main.yml (task-list)"
    )]
    #[case(
        report(FileStatus::Fixed, Strategy::Incremental, true),
        "fixed    roles/web/tasks/main.yml (task-list, incremental, written)"
    )]
    #[case(
        report(FileStatus::Failed, Strategy::FullRebuild, false),
        "failed   roles/web/tasks/main.yml (task-list, full-rebuild): document 1: tasks is a mapping, expected a sequence"
    )]
    fn status_lines(#[case] report: FileReport, #[case] expected: &str) {
        assert_eq!(format_report(&report), expected);
    }

    #[test]
    fn io_errors_have_no_kind() {
        let report = FileReport {
            path: PathBuf::from("gone.yml"),
            status: FileStatus::IoError,
            kind: None,
            strategy: Strategy::None,
            diagnostic: Some("File not found: gone.yml".to_string()),
            written: false,
        };

        assert_eq!(
            format_report(&report),
            "io-error gone.yml: File not found: gone.yml"
        );
    }

    #[rstest]
    #[case(1, "1 file: 0 valid, 1 fixed, 0 failed, 0 io errors")]
    #[case(3, "3 files: 0 valid, 3 fixed, 0 failed, 0 io errors")]
    fn summary_line(#[case] fixed: usize, #[case] expected: &str) {
        let summary = RunSummary {
            total: fixed,
            fixed,
            ..RunSummary::default()
        };

        assert_eq!(format_summary(&summary), expected);
    }
}
