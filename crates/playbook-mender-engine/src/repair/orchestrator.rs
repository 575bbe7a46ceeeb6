use log::{debug, info};

use crate::models::{Document, FileKind, RepairResult, Strategy};

use super::{
    builder::{Mode, Rebuilt},
    kinds::{MetaDefaults, rebuild_meta, rebuild_vars},
    rebuild::rebuild,
    verify::{Diagnostic, Verifier},
};

/// Knobs for a repair request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairOptions {
    /// Values for the canonical meta template.
    pub meta: MetaDefaults,
}

/// Drives the strategies for one document and picks the first candidate
/// that verifies.
///
/// Stateless between calls, so one orchestrator can serve many documents
/// (and threads) at once.
#[derive(Debug, Clone, Default)]
pub struct RepairOrchestrator {
    options: RepairOptions,
}

impl RepairOrchestrator {
    pub fn new(options: RepairOptions) -> Self {
        Self { options }
    }

    /// Repairs `text`, detecting its kind from `path_hint` and content.
    pub fn repair(&self, path_hint: &str, text: &str) -> RepairResult {
        self.repair_document(&Document::new(path_hint, text))
    }

    pub fn repair_document(&self, doc: &Document<'_>) -> RepairResult {
        let kind = doc.kind();
        let verifier = Verifier::for_kind(kind);

        let mut rejected = match verifier.verify(doc.text()) {
            Ok(()) => {
                debug!("{}: already valid {kind}", doc.path_hint());
                return RepairResult::unchanged(kind, doc.text());
            }
            Err(diagnostic) => {
                debug!("{}: {kind} does not verify: {diagnostic}", doc.path_hint());
                None
            }
        };

        for &strategy in plan(kind) {
            let candidate = self.candidate(doc, strategy);
            match verifier.verify(&candidate.text) {
                Ok(()) => {
                    info!("{}: repaired with {strategy} strategy", doc.path_hint());
                    return RepairResult::accepted(
                        kind,
                        strategy,
                        candidate.text,
                        candidate.ambiguities,
                    );
                }
                Err(diagnostic) => {
                    debug!(
                        "{}: {strategy} candidate rejected: {diagnostic}",
                        doc.path_hint()
                    );
                    rejected = Some((strategy, candidate, diagnostic));
                }
            }
        }

        let (strategy, candidate, diagnostic) = rejected.unwrap_or_else(|| {
            (
                Strategy::None,
                Rebuilt {
                    text: doc.text().to_string(),
                    ambiguities: Vec::new(),
                },
                Diagnostic::new("no strategy applies"),
            )
        });
        RepairResult::failed(
            kind,
            strategy,
            candidate.text,
            diagnostic.into_string(),
            candidate.ambiguities,
        )
    }

    fn candidate(&self, doc: &Document<'_>, strategy: Strategy) -> Rebuilt {
        match (doc.kind(), strategy) {
            (FileKind::Meta, _) => rebuild_meta(doc, &self.options.meta),
            (FileKind::Vars, _) => rebuild_vars(doc),
            (_, Strategy::Incremental) => rebuild(doc, Mode::Incremental),
            _ => rebuild(doc, Mode::Canonical),
        }
    }
}

/// Strategies to try, in escalation order.
fn plan(kind: FileKind) -> &'static [Strategy] {
    match kind {
        FileKind::Meta | FileKind::Vars => &[Strategy::FullRebuild],
        FileKind::Playbook | FileKind::TaskList | FileKind::Unknown => {
            &[Strategy::Incremental, Strategy::FullRebuild]
        }
    }
}

/// Repairs one document with default options.
pub fn repair(path_hint: &str, text: &str) -> RepairResult {
    RepairOrchestrator::default().repair(path_hint, text)
}
