//! Repairing many files at once.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::{
    error::RepairError,
    io::{IoError, backup_file, read_file, write_file},
    models::{FileReport, FileStatus, RepairResult, RepairStatus, RunSummary, Strategy},
    repair::{RepairOptions, RepairOrchestrator},
};

/// Which results are written back over their source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Report only.
    DryRun,
    /// Overwrite files whose repair verified.
    #[default]
    Repaired,
    /// Also overwrite failed files with their last candidate.
    BestEffort,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub write: WritePolicy,
    /// Suffix of the copy taken before overwriting; `None` disables backups.
    pub backup_suffix: Option<String>,
    /// Worker threads; 0 leaves the choice to rayon.
    pub jobs: usize,
    pub repair: RepairOptions,
}

#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// One report per input path, sorted by path.
    pub reports: Vec<FileReport>,
    pub summary: RunSummary,
}

impl RunOutcome {
    fn push(mut self, report: FileReport) -> Self {
        self.summary.record(&report);
        self.reports.push(report);
        self
    }

    fn merge(mut self, other: RunOutcome) -> Self {
        self.summary.merge(other.summary);
        self.reports.extend(other.reports);
        self
    }
}

/// Repairs every file in `paths` in parallel.
///
/// Per-file problems end up in the reports; only a worker pool that cannot
/// be built is an error.
pub fn run(paths: &[PathBuf], options: &RunOptions) -> Result<RunOutcome, RepairError> {
    let orchestrator = RepairOrchestrator::new(options.repair.clone());
    let work = || {
        paths
            .par_iter()
            .map(|path| repair_file(&orchestrator, path, options))
            .fold(RunOutcome::default, RunOutcome::push)
            .reduce(RunOutcome::default, RunOutcome::merge)
    };

    let mut outcome = if options.jobs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .build()?
            .install(work)
    } else {
        work()
    };
    outcome.reports.sort_by(|a, b| a.path.cmp(&b.path));

    let summary = outcome.summary;
    info!(
        "{} files: {} valid, {} fixed, {} failed, {} io errors",
        summary.total, summary.valid, summary.fixed, summary.failed, summary.io_errors
    );
    Ok(outcome)
}

/// Repairs one in-memory document, such as one read from stdin.
///
/// A failed repair is an error unless the policy is best-effort, in which
/// case the result carries the last candidate.
pub fn repair_text(
    path_hint: &str,
    text: &str,
    options: &RunOptions,
) -> Result<RepairResult, RepairError> {
    let result = RepairOrchestrator::new(options.repair.clone()).repair(path_hint, text);
    if !result.ok() && options.write != WritePolicy::BestEffort {
        return Err(RepairError::Unrecoverable {
            diagnostic: result
                .diagnostic()
                .unwrap_or("no candidate verified")
                .to_string(),
        });
    }
    Ok(result)
}

fn repair_file(orchestrator: &RepairOrchestrator, path: &Path, options: &RunOptions) -> FileReport {
    let text = match read_file(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("{}: {e}", path.display());
            return FileReport {
                path: path.to_path_buf(),
                status: FileStatus::IoError,
                kind: None,
                strategy: Strategy::None,
                diagnostic: Some(e.to_string()),
                written: false,
            };
        }
    };

    let result = orchestrator.repair(&path.to_string_lossy(), &text);
    for ambiguity in result.ambiguities() {
        debug!("{}: {ambiguity}", path.display());
    }
    let mut report = FileReport {
        path: path.to_path_buf(),
        status: result.status().into(),
        kind: Some(result.kind()),
        strategy: result.strategy(),
        diagnostic: result.diagnostic().map(str::to_string),
        written: false,
    };
    if result.status() == RepairStatus::Failed {
        warn!(
            "{}: {}",
            path.display(),
            result.diagnostic().unwrap_or("repair failed")
        );
    }

    let should_write = match options.write {
        WritePolicy::DryRun => false,
        WritePolicy::Repaired => result.status() == RepairStatus::Fixed,
        WritePolicy::BestEffort => result.status() != RepairStatus::Valid,
    };
    if should_write && result.text() != text {
        match write_back(path, result.text(), options.backup_suffix.as_deref()) {
            Ok(()) => report.written = true,
            Err(e) => {
                warn!("{}: {e}", path.display());
                report.status = FileStatus::IoError;
                report.diagnostic = Some(e.to_string());
            }
        }
    }
    report
}

fn write_back(path: &Path, text: &str, backup_suffix: Option<&str>) -> Result<(), IoError> {
    if let Some(suffix) = backup_suffix {
        let backup = backup_file(path, suffix)?;
        debug!("backed up {} to {}", path.display(), backup.display());
    }
    write_file(path, text)
}
