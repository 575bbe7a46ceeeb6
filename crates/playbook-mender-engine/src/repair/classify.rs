use std::sync::OnceLock;

use regex::Regex;

use crate::models::FileKind;

use super::{
    catalog::{self, KeywordScope, ShellSyntax},
    lines::LineRef,
    scalar::value_opens_block,
};

/// Semantic role of a line. Exactly one role is assigned per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Blank,
    Comment,
    /// `---`
    DocumentMarker,
    /// `- hosts:` or a `- name:` that owns a `hosts:` key.
    PlayHeader,
    /// `- name:`; `dashed` is false when the list marker was lost.
    TaskHeader { dashed: bool },
    TaskAttribute,
    PlayAttribute,
    ModuleInvocation,
    ShellFragment(ShellSyntax),
    /// A `key: value` line no more specific rule claimed.
    KeyValue,
    /// A `-` item that is not a header.
    ListItem,
    /// Anything else; belongs to whatever came before.
    Continuation,
}

impl Role {
    /// Roles that open or extend document structure rather than content.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Role::DocumentMarker
                | Role::PlayHeader
                | Role::TaskHeader { .. }
                | Role::TaskAttribute
                | Role::PlayAttribute
                | Role::ModuleInvocation
        )
    }

    pub fn is_header(self) -> bool {
        matches!(self, Role::PlayHeader | Role::TaskHeader { .. })
    }
}

/// A classified line with the fields the tracker needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineToken<'a> {
    pub line: LineRef<'a>,
    pub role: Role,
    /// The content starts with a `-` list marker.
    pub dashed: bool,
    /// Content after the list marker, or the whole content.
    pub body: &'a str,
    /// Mapping key of `body`, if it has the `key: value` shape.
    pub key: Option<&'a str>,
    /// Mapping value (possibly empty) when `key` is present.
    pub value: &'a str,
}

impl LineToken<'_> {
    pub fn indent(&self) -> usize {
        self.line.indent
    }

    /// A keyed line whose value continues on following lines.
    pub fn opens_block(&self) -> bool {
        self.key.is_some() && value_opens_block(self.value)
    }
}

/// What the classifier may know about the surrounding document.
///
/// Filled in by the rebuilder from the block tracker's state and a lookahead
/// over the following lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyContext {
    pub kind: FileKind,
    pub play_open: bool,
    /// Source indent of the open task's header, if a task is open.
    pub task_indent: Option<usize>,
    /// A `tasks:`-like section of the current play is open.
    pub in_task_section: bool,
    /// The previous significant line ended in a key with no inline value.
    pub previous_opens_block: bool,
    /// For a list item: the item owns a `hosts:` key further down.
    pub item_has_hosts: bool,
    /// Source indentation may be trusted to decide scope.
    pub use_indent: bool,
}

/// Local facts about a line, computed once before the rules run.
#[derive(Debug, Clone, Copy)]
pub struct LineFacts<'a> {
    pub line: LineRef<'a>,
    pub dashed: bool,
    pub body: &'a str,
    pub key: Option<&'a str>,
    pub value: &'a str,
}

impl<'a> LineFacts<'a> {
    pub fn of(line: LineRef<'a>) -> Self {
        let content = line.content;
        let dashed = content == "-" || content.starts_with("- ");
        let body = if dashed {
            content[1..].trim_start()
        } else {
            content
        };
        let (key, value) = match split_key_value(body) {
            Some((key, value)) => (Some(key), value),
            None => (None, ""),
        };
        Self {
            line,
            dashed,
            body,
            key,
            value,
        }
    }
}

/// Splits `key: value` (or `key:`) into its parts. Quoted keys keep their quotes.
pub fn split_key_value(body: &str) -> Option<(&str, &str)> {
    static KEY_VALUE: OnceLock<Regex> = OnceLock::new();
    let re = KEY_VALUE.get_or_init(|| {
        Regex::new(r#"^([A-Za-z_][\w.\-/]*|"[^"]+"|'[^']+')[ \t]*:(?:[ \t]+(.*))?$"#)
            .expect("Invalid key regex")
    });
    let caps = re.captures(body)?;
    let key = caps.get(1)?.as_str();
    let value = caps.get(2).map_or("", |m| m.as_str().trim());
    Some((key, value))
}

type RuleFn = fn(&LineFacts<'_>, &ClassifyContext) -> Option<Role>;

/// One entry of the classifier's priority table.
pub struct Rule {
    pub name: &'static str,
    test: RuleFn,
}

/// Role detection rules in priority order. The first rule that matches wins;
/// a line no rule claims is a [`Role::Continuation`].
pub const RULES: &[Rule] = &[
    Rule {
        name: "document-marker",
        test: document_marker,
    },
    Rule {
        name: "blank",
        test: blank,
    },
    Rule {
        name: "comment",
        test: comment,
    },
    Rule {
        name: "play-header",
        test: play_header,
    },
    Rule {
        name: "task-header",
        test: task_header,
    },
    Rule {
        name: "attribute",
        test: attribute,
    },
    Rule {
        name: "module",
        test: module,
    },
    Rule {
        name: "shell-fragment",
        test: shell_fragment,
    },
    Rule {
        name: "key-value",
        test: key_value,
    },
    Rule {
        name: "list-item",
        test: list_item,
    },
];

/// Classifies individual lines for the rebuild phase.
pub struct LineClassifier;

impl LineClassifier {
    /// Classifies a line into a [`LineToken`].
    ///
    /// Pure and deterministic: the same line in the same context always gets
    /// the same role.
    pub fn classify<'a>(&self, line: LineRef<'a>, ctx: &ClassifyContext) -> LineToken<'a> {
        let facts = LineFacts::of(line);
        let role = RULES
            .iter()
            .find_map(|rule| (rule.test)(&facts, ctx))
            .unwrap_or(Role::Continuation);
        LineToken {
            line,
            role,
            dashed: facts.dashed,
            body: facts.body,
            key: facts.key,
            value: facts.value,
        }
    }
}

fn document_marker(f: &LineFacts<'_>, _: &ClassifyContext) -> Option<Role> {
    let c = f.line.content;
    (c == "---" || c.starts_with("--- ")).then_some(Role::DocumentMarker)
}

fn blank(f: &LineFacts<'_>, _: &ClassifyContext) -> Option<Role> {
    f.line.content.is_empty().then_some(Role::Blank)
}

fn comment(f: &LineFacts<'_>, _: &ClassifyContext) -> Option<Role> {
    f.line.content.starts_with('#').then_some(Role::Comment)
}

fn play_header(f: &LineFacts<'_>, ctx: &ClassifyContext) -> Option<Role> {
    match f.key? {
        // A bare `hosts:` right under an open play header is that play's attribute.
        "hosts" => (f.dashed
            || !ctx.play_open
            || ctx.in_task_section
            || ctx.task_indent.is_some())
        .then_some(Role::PlayHeader),
        "name" if ctx.kind == FileKind::Playbook => {
            let starts_play = if f.dashed {
                !ctx.play_open || ctx.item_has_hosts
            } else {
                !ctx.play_open
            };
            starts_play.then_some(Role::PlayHeader)
        }
        _ => None,
    }
}

fn task_header(f: &LineFacts<'_>, ctx: &ClassifyContext) -> Option<Role> {
    if f.key? != "name" {
        return None;
    }
    if f.dashed {
        return Some(Role::TaskHeader { dashed: true });
    }
    // Lost list marker: only where a task may start and not as a child of the previous key.
    let task_position = ctx.in_task_section || ctx.kind != FileKind::Playbook;
    if !task_position || ctx.previous_opens_block {
        return None;
    }
    match ctx.task_indent {
        Some(task) if ctx.use_indent && f.line.indent > task + 2 => None,
        _ => Some(Role::TaskHeader { dashed: false }),
    }
}

fn attribute(f: &LineFacts<'_>, ctx: &ClassifyContext) -> Option<Role> {
    if f.dashed {
        return None;
    }
    let role = match catalog::attribute_scope(f.key?)? {
        KeywordScope::Task => Role::TaskAttribute,
        KeywordScope::Play => Role::PlayAttribute,
        KeywordScope::Shared => {
            let task_scope = match ctx.task_indent {
                Some(task) => !ctx.use_indent || f.line.indent > task,
                None => !ctx.play_open,
            };
            if task_scope {
                Role::TaskAttribute
            } else {
                Role::PlayAttribute
            }
        }
    };
    Some(role)
}

fn module(f: &LineFacts<'_>, _: &ClassifyContext) -> Option<Role> {
    (!f.dashed && catalog::is_module(f.key?)).then_some(Role::ModuleInvocation)
}

fn shell_fragment(f: &LineFacts<'_>, _: &ClassifyContext) -> Option<Role> {
    catalog::match_fragment(f.line.content).map(Role::ShellFragment)
}

fn key_value(f: &LineFacts<'_>, _: &ClassifyContext) -> Option<Role> {
    (!f.dashed && f.key.is_some()).then_some(Role::KeyValue)
}

fn list_item(f: &LineFacts<'_>, _: &ClassifyContext) -> Option<Role> {
    f.dashed.then_some(Role::ListItem)
}
