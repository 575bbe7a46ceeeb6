use std::path::PathBuf;

use super::{FileKind, RepairStatus, Strategy};

/// Per-file status as reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    Valid,
    Fixed,
    Failed,
    /// The file could not be read, or the repaired text could not be written.
    IoError,
}

impl From<RepairStatus> for FileStatus {
    fn from(status: RepairStatus) -> Self {
        match status {
            RepairStatus::Valid => FileStatus::Valid,
            RepairStatus::Fixed => FileStatus::Fixed,
            RepairStatus::Failed => FileStatus::Failed,
        }
    }
}

/// One line of the run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub kind: Option<FileKind>,
    pub strategy: Strategy,
    pub diagnostic: Option<String>,
    /// The file on disk was overwritten.
    pub written: bool,
}

/// Aggregate counters for a run.
///
/// Each worker accumulates its own summary; partial summaries are combined
/// with [`RunSummary::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub valid: usize,
    pub fixed: usize,
    pub failed: usize,
    pub io_errors: usize,
}

impl RunSummary {
    pub fn record(&mut self, report: &FileReport) {
        self.total += 1;
        match report.status {
            FileStatus::Valid => self.valid += 1,
            FileStatus::Fixed => self.fixed += 1,
            FileStatus::Failed => self.failed += 1,
            FileStatus::IoError => self.io_errors += 1,
        }
    }

    pub fn merge(&mut self, other: RunSummary) {
        self.total += other.total;
        self.valid += other.valid;
        self.fixed += other.fixed;
        self.failed += other.failed;
        self.io_errors += other.io_errors;
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.io_errors > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(status: FileStatus) -> FileReport {
        FileReport {
            path: PathBuf::from("site.yml"),
            status,
            kind: Some(FileKind::Playbook),
            strategy: Strategy::None,
            diagnostic: None,
            written: false,
        }
    }

    #[test]
    fn record_counts_by_status() {
        let mut summary = RunSummary::default();
        for status in [FileStatus::Valid, FileStatus::Fixed, FileStatus::Fixed] {
            summary.record(&report(status));
        }
        assert_eq!(summary.total, 3);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.fixed, 2);
        assert!(!summary.has_failures());
    }

    #[test]
    fn merge_adds_partial_summaries() {
        let mut left = RunSummary::default();
        left.record(&report(FileStatus::Failed));
        let mut right = RunSummary::default();
        right.record(&report(FileStatus::IoError));
        right.record(&report(FileStatus::Valid));

        left.merge(right);

        assert_eq!(
            left,
            RunSummary {
                total: 3,
                valid: 1,
                fixed: 0,
                failed: 1,
                io_errors: 1,
            }
        );
        assert!(left.has_failures());
    }
}
