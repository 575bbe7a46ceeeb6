pub mod error;
pub mod io;
pub mod models;
pub mod repair;
pub mod run;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use error::RepairError;
pub use io::*;
pub use models::*;
pub use repair::{MetaDefaults, Platform, RepairOptions, RepairOrchestrator, repair};
pub use run::{RunOptions, RunOutcome, WritePolicy, repair_text, run};
