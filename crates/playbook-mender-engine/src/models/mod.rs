pub mod document;
pub mod repair_result;
pub mod run_summary;

pub use document::{Document, FileKind};
pub use repair_result::{Ambiguity, RepairResult, RepairStatus, Strategy};
pub use run_summary::{FileReport, FileStatus, RunSummary};
