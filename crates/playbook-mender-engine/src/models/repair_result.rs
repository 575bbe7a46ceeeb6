use std::fmt;

use super::FileKind;

/// Which rebuild produced the accepted (or last attempted) text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The input already verified; nothing was rebuilt.
    #[default]
    None,
    /// Line order and content kept; indentation, list markers and shell runs normalized.
    Incremental,
    /// Structure rebuilt from classified roles only (or the kind's canonical form).
    FullRebuild,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::None => "none",
            Strategy::Incremental => "incremental",
            Strategy::FullRebuild => "full-rebuild",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one repair request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepairStatus {
    /// Already valid; text returned unchanged.
    Valid,
    /// A rebuilt candidate verified.
    Fixed,
    /// No candidate verified.
    Failed,
}

/// A line the tracker could not place under its expected section.
///
/// Not fatal: the line is kept as a continuation (or dropped by the full
/// rebuild) and the repair goes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    /// 1-based source line number.
    pub line: usize,
    /// Trimmed source content.
    pub content: String,
    pub reason: &'static str,
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} (`{}`)", self.line, self.reason, self.content)
    }
}

/// Result of repairing one document. Built once, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairResult {
    text: String,
    status: RepairStatus,
    strategy: Strategy,
    kind: FileKind,
    diagnostic: Option<String>,
    ambiguities: Vec<Ambiguity>,
}

impl RepairResult {
    pub(crate) fn unchanged(kind: FileKind, text: &str) -> Self {
        Self {
            text: text.to_string(),
            status: RepairStatus::Valid,
            strategy: Strategy::None,
            kind,
            diagnostic: None,
            ambiguities: Vec::new(),
        }
    }

    pub(crate) fn accepted(
        kind: FileKind,
        strategy: Strategy,
        text: String,
        ambiguities: Vec<Ambiguity>,
    ) -> Self {
        let mut diagnostic = format!("repaired with {strategy} strategy");
        if !ambiguities.is_empty() {
            diagnostic.push_str(&format!("; {} ambiguous line(s)", ambiguities.len()));
        }
        Self {
            text,
            status: RepairStatus::Fixed,
            strategy,
            kind,
            diagnostic: Some(diagnostic),
            ambiguities,
        }
    }

    pub(crate) fn failed(
        kind: FileKind,
        strategy: Strategy,
        candidate: String,
        diagnostic: String,
        ambiguities: Vec<Ambiguity>,
    ) -> Self {
        Self {
            text: candidate,
            status: RepairStatus::Failed,
            strategy,
            kind,
            diagnostic: Some(diagnostic),
            ambiguities,
        }
    }

    /// The accepted text, or the best-effort candidate when the repair failed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// True when the text verifies (unchanged or repaired).
    pub fn ok(&self) -> bool {
        self.status != RepairStatus::Failed
    }

    pub fn status(&self) -> RepairStatus {
        self.status
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    pub fn ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_result_has_no_diagnostic() {
        let result = RepairResult::unchanged(FileKind::Vars, "a: 1\n");
        assert!(result.ok());
        assert_eq!(result.strategy(), Strategy::None);
        assert_eq!(result.diagnostic(), None);
        assert_eq!(result.text(), "a: 1\n");
    }

    #[test]
    fn accepted_result_names_strategy_and_ambiguities() {
        let ambiguity = Ambiguity {
            line: 4,
            content: "stray".to_string(),
            reason: "continuation outside any section",
        };
        let result = RepairResult::accepted(
            FileKind::TaskList,
            Strategy::FullRebuild,
            "---\n".to_string(),
            vec![ambiguity],
        );
        assert_eq!(result.status(), RepairStatus::Fixed);
        assert_eq!(
            result.diagnostic(),
            Some("repaired with full-rebuild strategy; 1 ambiguous line(s)")
        );
        assert_eq!(
            result.ambiguities()[0].to_string(),
            "line 4: continuation outside any section (`stray`)"
        );
    }

    #[test]
    fn failed_result_is_not_ok() {
        let result = RepairResult::failed(
            FileKind::Playbook,
            Strategy::FullRebuild,
            "candidate".to_string(),
            "mapping values are not allowed".to_string(),
            Vec::new(),
        );
        assert!(!result.ok());
        assert_eq!(result.into_text(), "candidate");
    }
}
