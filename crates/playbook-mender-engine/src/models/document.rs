use std::fmt;

use crate::repair::{classify::LineFacts, lines::lines_with_indent};

/// Expected shape of a document, used to pick a rebuild strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// A list of plays (`hosts:`, `tasks:`, `roles:` at the top).
    Playbook,
    /// A bare list of tasks, as in a role's `tasks/main.yml`.
    TaskList,
    /// Flat variable definitions: `vars/`, `defaults/`, `group_vars/`, `host_vars/`.
    Vars,
    /// A role's `meta/main.yml`.
    Meta,
    #[default]
    Unknown,
}

impl FileKind {
    /// Classifies a document from its path hint first, then its content.
    pub fn detect(path_hint: &str, text: &str) -> Self {
        let path = path_hint.replace('\\', "/");
        if path.contains("meta/main") {
            return FileKind::Meta;
        }
        if ["vars/", "defaults/", "group_vars/", "host_vars/"]
            .iter()
            .any(|dir| path.contains(dir))
        {
            return FileKind::Vars;
        }
        if has_playbook_markers(text) {
            return FileKind::Playbook;
        }
        if path.contains("tasks/") || path.contains("handlers/") || starts_with_list_item(text) {
            return FileKind::TaskList;
        }
        FileKind::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Playbook => "playbook",
            FileKind::TaskList => "task-list",
            FileKind::Vars => "vars",
            FileKind::Meta => "meta",
            FileKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level `hosts:`, `tasks:` or `roles:`, with or without a list marker.
fn has_playbook_markers(text: &str) -> bool {
    lines_with_indent(text)
        .filter(|line| line.indent <= 2)
        .map(LineFacts::of)
        .any(|facts| matches!(facts.key, Some("hosts" | "tasks" | "roles")))
}

fn starts_with_list_item(text: &str) -> bool {
    lines_with_indent(text)
        .find(|line| {
            !line.content.is_empty() && !line.content.starts_with('#') && line.content != "---"
        })
        .is_some_and(|line| LineFacts::of(line).dashed)
}

/// One candidate document: immutable input text plus its detected kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
    path_hint: &'a str,
    text: &'a str,
    kind: FileKind,
}

impl<'a> Document<'a> {
    /// Creates a document, detecting its kind from the path hint and content.
    ///
    /// The path is only a hint; it is never opened.
    pub fn new(path_hint: &'a str, text: &'a str) -> Self {
        Self::with_kind(path_hint, text, FileKind::detect(path_hint, text))
    }

    pub fn with_kind(path_hint: &'a str, text: &'a str, kind: FileKind) -> Self {
        Self {
            path_hint,
            text,
            kind,
        }
    }

    pub fn path_hint(&self) -> &'a str {
        self.path_hint
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }
}
