//! # Document Repair
//!
//! Two-phase recovery of broken YAML documents, without a grammar.
//!
//! ## Phases
//!
//! 1. **Line Classification** (`classify`): each line gets exactly one `Role`
//!    from an ordered table of pattern rules, given what the tracker knows
//!    about the surrounding structure
//!
//! 2. **Block Tracking** (`builder`): a `BlockTracker` keeps the open play,
//!    task section, task, nested key and shell block, and emits every line at
//!    its canonical depth
//!
//! The `orchestrator` runs these phases as an incremental pass and, if its
//! output does not verify, a full rebuild. Meta and vars files have their own
//! rebuilds in `kinds`.
//!
//! ## Modules
//!
//! - **`lines`**: indentation measurement
//! - **`catalog`**: keyword, module and shell-syntax tables
//! - **`scalar`**: template quoting and block-scalar helpers
//! - **`classify`**: `LineClassifier` produces a `LineToken` per line
//! - **`context`**: `BlockContext` and the depth table
//! - **`shell_block`**: gathering shell lines into a literal block
//! - **`builder`**: `BlockTracker` state machine
//! - **`rebuild`**: drives classification and tracking over a document
//! - **`kinds`**: canonical meta template and flat vars rebuild
//! - **`verify`**: `Verifier` round-trips candidates through a YAML parser
//! - **`orchestrator`**: strategy selection and escalation
//!
//! ## Key Invariants
//!
//! - No header or attribute line is emitted while a shell block is open
//! - Output always ends with exactly one newline
//! - A candidate is accepted only if the verifier accepts it

pub mod builder;
pub mod catalog;
pub mod classify;
pub mod context;
pub mod kinds;
pub mod lines;
pub mod orchestrator;
pub mod rebuild;
pub mod scalar;
pub mod shell_block;
pub mod verify;

#[cfg(test)]
mod tests;

pub use builder::{BlockTracker, Mode, Rebuilt};
pub use classify::{LineClassifier, LineToken, Role};
pub use kinds::{MetaDefaults, Platform};
pub use orchestrator::{RepairOptions, RepairOrchestrator, repair};
pub use verify::{Diagnostic, Verifier};
