use crate::models::{Ambiguity, FileKind};

use super::{
    catalog::{is_shell_module, is_task_section},
    classify::{ClassifyContext, LineToken, Role},
    context::{
        BlockContext, Frame, INDENT_STEP, InnerLiteral, OpenKey, PLAY_ATTRIBUTE_DEPTH, PLAY_DEPTH,
        TASK_ATTRIBUTE_DEPTH, TASK_ITEM_DEPTH,
    },
    scalar::{is_block_indicator, quote_mapping_value, quote_template_value},
    shell_block::ShellBlock,
};

/// How much of the source layout the tracker trusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keeps line order, comments and nested content. Source indentation
    /// decides where sections end.
    Incremental,
    /// Places every line by its role alone. Source indentation only
    /// delimits block-scalar bodies; comments and blank lines are dropped.
    Canonical,
}

/// Text produced by one rebuild pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rebuilt {
    pub text: String,
    pub ambiguities: Vec<Ambiguity>,
}

/// Places classified lines at canonical depths.
///
/// Fed one [`LineToken`] at a time through [`BlockTracker::push`]; the
/// output is only complete after [`BlockTracker::finish`].
pub struct BlockTracker {
    mode: Mode,
    kind: FileKind,
    ctx: BlockContext,
    out: Vec<String>,
    ambiguities: Vec<Ambiguity>,
    /// Emitted column of the last key, for placing continuation lines.
    last_key_column: Option<usize>,
    /// The next task line starts an unnamed task and carries the list marker.
    pending_dash: bool,
    /// What the open task runs, once its action line has been emitted.
    task_action: Option<TaskAction>,
    /// Where the shell block being extended was emitted before it was reopened.
    reopened: Option<Placement>,
}

/// The action line of the open task.
enum TaskAction {
    /// A shell block, kept so later fragments of the same task can join it.
    Shell(ParkedShell),
    Module,
}

struct ParkedShell {
    block: ShellBlock,
    placement: Placement,
}

/// Output lines `start..start + len` hold a rendered shell block.
#[derive(Debug, Clone, Copy)]
struct Placement {
    start: usize,
    len: usize,
    depth: usize,
    /// The header line carries the task's list marker.
    dashed: bool,
}

impl BlockTracker {
    pub fn new(mode: Mode, kind: FileKind) -> Self {
        let out = match mode {
            Mode::Canonical => vec!["---".to_string()],
            Mode::Incremental => vec![],
        };
        Self {
            mode,
            kind,
            ctx: BlockContext::default(),
            out,
            ambiguities: vec![],
            last_key_column: None,
            pending_dash: false,
            task_action: None,
            reopened: None,
        }
    }

    /// What the classifier may assume about the next line.
    pub fn classify_context(
        &self,
        previous_opens_block: bool,
        item_has_hosts: bool,
    ) -> ClassifyContext {
        ClassifyContext {
            kind: self.kind,
            play_open: self.ctx.play.is_some(),
            task_indent: self.ctx.task.map(|task| task.source_indent),
            in_task_section: self.ctx.task_section.is_some(),
            previous_opens_block,
            item_has_hosts,
            use_indent: self.mode == Mode::Incremental,
        }
    }

    pub fn push(&mut self, token: &LineToken<'_>) {
        if self.ctx.shell_open() {
            if self.extend_shell(token) {
                return;
            }
            self.flush_shell();
        }

        if token.role == Role::Blank {
            self.blank();
            return;
        }

        if self.take_nested(token) {
            return;
        }

        if self.mode == Mode::Incremental {
            self.close_by_dedent(token);
        }

        match token.role {
            Role::Blank => {}
            Role::Comment => self.comment(token),
            Role::DocumentMarker => self.document_marker(token),
            Role::PlayHeader => self.play_header(token),
            Role::TaskHeader { .. } => self.task_header(token),
            Role::PlayAttribute => self.play_attribute(token),
            Role::TaskAttribute => self.task_attribute(token),
            Role::ModuleInvocation => self.module(token),
            Role::ShellFragment(_) => self.open_fragment(token),
            Role::KeyValue => self.key_value(token),
            Role::ListItem => self.list_item(token),
            Role::Continuation => self.continuation(token, None),
        }
    }

    pub fn finish(mut self) -> Rebuilt {
        // EOF flush
        self.flush_shell();
        while self.out.last().is_some_and(|line| line.is_empty()) {
            self.out.pop();
        }
        if self.mode == Mode::Incremental && !self.starts_with_marker() {
            self.out.insert(0, "---".to_string());
        }
        let mut text = self.out.join("\n");
        text.push('\n');
        Rebuilt {
            text,
            ambiguities: self.ambiguities,
        }
    }

    fn starts_with_marker(&self) -> bool {
        self.out
            .iter()
            .find(|line| !line.is_empty() && !line.trim_start().starts_with('#'))
            .is_some_and(|line| line.starts_with("---"))
    }

    fn emit(&mut self, depth: usize, text: String) {
        self.out.push(indented(depth, text));
    }

    /// Emits a task-level line, opening the list item if the task has no header.
    fn emit_task_line(&mut self, text: String) {
        if std::mem::take(&mut self.pending_dash) {
            self.emit(TASK_ITEM_DEPTH, format!("- {text}"));
        } else {
            self.emit(TASK_ATTRIBUTE_DEPTH, text);
        }
    }

    fn note(&mut self, token: &LineToken<'_>, reason: &'static str) {
        log::trace!("line {}: {reason}", token.line.number);
        self.ambiguities.push(Ambiguity {
            line: token.line.number,
            content: token.line.content.to_string(),
            reason,
        });
    }

    fn at_task_position(&self) -> bool {
        match self.kind {
            FileKind::Playbook => self.ctx.play.is_some(),
            FileKind::TaskList => true,
            _ => self.ctx.task_section.is_some(),
        }
    }

    fn blank(&mut self) {
        if self.mode == Mode::Canonical {
            return;
        }
        let in_literal = self
            .ctx
            .open_key
            .is_some_and(|key| key.literal || key.inner_literal.is_some());
        if in_literal || self.out.last().is_some_and(|line| !line.is_empty()) {
            self.out.push(String::new());
        }
    }

    fn comment(&mut self, token: &LineToken<'_>) {
        if self.mode == Mode::Incremental {
            self.out.push(token.line.raw.trim_end().to_string());
        }
    }

    fn document_marker(&mut self, token: &LineToken<'_>) {
        self.ctx.reset();
        self.last_key_column = None;
        self.pending_dash = false;
        if self.mode == Mode::Incremental {
            self.out.push(token.line.content.to_string());
        }
    }

    fn play_header(&mut self, token: &LineToken<'_>) {
        self.ctx.reset();
        self.ctx.play = Some(Frame {
            source_indent: token.indent(),
        });
        self.pending_dash = false;
        self.emit(PLAY_DEPTH, format!("- {}", keyed(token)));
        self.after_key(token, PLAY_ATTRIBUTE_DEPTH);
    }

    fn task_header(&mut self, token: &LineToken<'_>) {
        self.ctx.task = None;
        self.ctx.open_key = None;
        let source_indent = if token.dashed {
            token.indent()
        } else {
            token.indent().saturating_sub(INDENT_STEP)
        };
        self.ensure_task_section(source_indent);
        self.open_task(source_indent);
        self.pending_dash = false;
        self.emit(TASK_ITEM_DEPTH, format!("- {}", keyed(token)));
        self.after_key(token, TASK_ATTRIBUTE_DEPTH);
    }

    fn play_attribute(&mut self, token: &LineToken<'_>) {
        if self.ctx.play.is_none() {
            self.misplaced(token, "play attribute outside a play");
            return;
        }
        self.ctx.close_tasks();
        self.pending_dash = false;
        self.emit(PLAY_ATTRIBUTE_DEPTH, keyed(token));
        let opens_tasks = token.key.is_some_and(is_task_section)
            && token.opens_block()
            && !is_block_indicator(token.value);
        if opens_tasks {
            self.last_key_column = Some(PLAY_ATTRIBUTE_DEPTH);
            self.ctx.task_section = Some(Frame {
                source_indent: token.indent(),
            });
        } else {
            self.after_key(token, PLAY_ATTRIBUTE_DEPTH);
        }
    }

    fn task_attribute(&mut self, token: &LineToken<'_>) {
        if self.ctx.task.is_some() {
            self.task_key(token);
        } else {
            self.misplaced(token, "task attribute outside a task");
        }
    }

    fn module(&mut self, token: &LineToken<'_>) {
        if token.key.is_some_and(is_shell_module) {
            self.open_shell(token, ShellBlock::from_module(token));
        } else if self.ensure_task(token.indent()) {
            self.task_key(token);
            self.task_action = Some(TaskAction::Module);
        } else {
            self.misplaced(token, "module outside a task");
        }
    }

    fn key_value(&mut self, token: &LineToken<'_>) {
        if self.ctx.task.is_some() {
            self.task_key(token);
            return;
        }
        // An action the catalog does not know, on a task that lost its header.
        let task_position = self.ctx.task_section.is_some()
            || (self.ctx.play.is_none() && self.kind == FileKind::TaskList);
        if task_position && self.ensure_task(token.indent()) {
            self.task_key(token);
            return;
        }
        let depth = if self.ctx.play.is_some() {
            PLAY_ATTRIBUTE_DEPTH
        } else {
            0
        };
        self.emit(depth, keyed(token));
        self.after_key(token, depth);
    }

    fn list_item(&mut self, token: &LineToken<'_>) {
        let new_item =
            self.at_task_position() && (self.ctx.task.is_none() || self.mode == Mode::Canonical);
        if !new_item {
            self.continuation(token, Some("list item outside a list"));
            return;
        }
        self.ctx.task = None;
        self.ctx.open_key = None;
        self.pending_dash = false;
        self.ensure_task_section(token.indent());
        self.emit(TASK_ITEM_DEPTH, nested_text(token));
        if token.key.is_some() {
            self.open_task(token.indent());
            self.after_key(token, TASK_ATTRIBUTE_DEPTH);
        } else {
            self.last_key_column = Some(TASK_ITEM_DEPTH);
        }
    }

    fn continuation(&mut self, token: &LineToken<'_>, misplaced: Option<&'static str>) {
        if let Some(reason) = misplaced {
            self.note(token, reason);
        }
        match self.last_key_column {
            Some(column) => self.emit(column + INDENT_STEP, nested_text(token)),
            None => {
                if misplaced.is_none() {
                    self.note(token, "continuation with nothing to continue");
                }
                if self.mode == Mode::Incremental {
                    self.out.push(token.line.raw.trim_end().to_string());
                }
            }
        }
    }

    /// A keyed line that has no section of its own: kept under the nearest
    /// enclosing one and reported.
    fn misplaced(&mut self, token: &LineToken<'_>, reason: &'static str) {
        self.note(token, reason);
        if self.ctx.play.is_some() {
            self.ctx.close_tasks();
            self.pending_dash = false;
            self.emit(PLAY_ATTRIBUTE_DEPTH, keyed(token));
            self.after_key(token, PLAY_ATTRIBUTE_DEPTH);
        } else if self.ensure_task(token.indent()) {
            self.task_key(token);
        } else {
            self.emit(0, keyed(token));
            self.after_key(token, 0);
        }
    }

    fn task_key(&mut self, token: &LineToken<'_>) {
        self.ctx.open_key = None;
        self.emit_task_line(keyed(token));
        self.after_key(token, TASK_ATTRIBUTE_DEPTH);
    }

    /// Records the key just emitted at `column` and opens it when its value
    /// continues below.
    fn after_key(&mut self, token: &LineToken<'_>, column: usize) {
        self.last_key_column = Some(column);
        self.ctx.open_key = token.opens_block().then(|| OpenKey {
            source_indent: key_column(token),
            depth: column,
            literal: is_block_indicator(token.value),
            inner_literal: None,
        });
    }

    fn ensure_task_section(&mut self, source_indent: usize) {
        if self.ctx.play.is_some() && self.ctx.task_section.is_none() {
            self.emit(PLAY_ATTRIBUTE_DEPTH, "tasks:".to_string());
            self.ctx.task_section = Some(Frame { source_indent });
        }
    }

    /// Makes sure a task is open for a task-level key at `key_indent`,
    /// starting an unnamed one where a task may appear.
    fn ensure_task(&mut self, key_indent: usize) -> bool {
        if self.ctx.task.is_some() {
            return true;
        }
        if !self.at_task_position() {
            return false;
        }
        let source_indent = key_indent.saturating_sub(INDENT_STEP);
        self.ensure_task_section(source_indent);
        self.open_task(source_indent);
        self.pending_dash = true;
        true
    }

    fn open_task(&mut self, source_indent: usize) {
        self.ctx.task = Some(Frame { source_indent });
        self.task_action = None;
    }

    /// The open task's action, if it has emitted one.
    fn take_task_action(&mut self) -> Option<TaskAction> {
        let action = self.task_action.take();
        self.ctx.task.and(action)
    }

    /// A fragment inside a task that already has a shell block joins that
    /// block; after any other action it starts an unnamed task of its own.
    fn open_fragment(&mut self, token: &LineToken<'_>) {
        match self.take_task_action() {
            Some(TaskAction::Shell(ParkedShell {
                mut block,
                placement,
            })) => {
                block.reopen();
                block.push(token);
                self.ctx.open_key = None;
                self.ctx.shell = Some(block);
                self.reopened = Some(placement);
            }
            Some(TaskAction::Module) => {
                self.note(token, "shell commands after the task's action");
                self.ctx.task = None;
                self.pending_dash = false;
                self.open_shell(token, ShellBlock::from_fragment(token));
            }
            None => self.open_shell(token, ShellBlock::from_fragment(token)),
        }
    }

    fn open_shell(&mut self, token: &LineToken<'_>, block: ShellBlock) {
        self.ctx.open_key = None;
        if !self.ensure_task(token.indent()) {
            self.note(token, "shell block outside a task");
        }
        self.ctx.shell = Some(block);
    }

    fn extend_shell(&mut self, token: &LineToken<'_>) -> bool {
        let Some(block) = self.ctx.shell.as_mut() else {
            return false;
        };
        if token.role == Role::Blank {
            block.push_blank();
            return true;
        }
        if !block.accepts(token) {
            return false;
        }
        block.push(token);
        true
    }

    /// Writes the open shell block out, over its earlier rendering if it was
    /// reopened.
    fn flush_shell(&mut self) {
        let Some(block) = self.ctx.shell.take() else {
            return;
        };
        let placement = match self.reopened.take() {
            Some(placement) => placement,
            None => Placement {
                start: self.out.len(),
                len: 0,
                depth: self.ctx.attribute_depth(),
                dashed: self.ctx.task.is_some() && std::mem::take(&mut self.pending_dash),
            },
        };
        let depth = placement.depth;
        let lines: Vec<String> = block
            .render(self.mode == Mode::Incremental)
            .into_iter()
            .enumerate()
            .map(|(index, (offset, text))| {
                if index == 0 && placement.dashed {
                    indented(TASK_ITEM_DEPTH, format!("- {text}"))
                } else {
                    indented(depth + offset, text)
                }
            })
            .collect();
        let len = lines.len();
        self.out
            .splice(placement.start..placement.start + placement.len, lines);
        self.last_key_column = Some(depth);

        let trailing_blank = self.mode == Mode::Incremental && block.trailing_blanks() > 0;
        let action = if block.is_bare() {
            // Argument-map form: the lines below are the module's keys.
            self.ctx.open_key = Some(OpenKey {
                source_indent: block.start_indent(),
                depth,
                literal: false,
                inner_literal: None,
            });
            TaskAction::Module
        } else {
            TaskAction::Shell(ParkedShell {
                block,
                placement: Placement { len, ..placement },
            })
        };
        if self.ctx.task.is_some() {
            self.task_action = Some(action);
        }
        if trailing_blank {
            self.out.push(String::new());
        }
    }

    /// Emits `token` as part of the open key's value, if it belongs there.
    fn take_nested(&mut self, token: &LineToken<'_>) -> bool {
        let Some(mut open) = self.ctx.open_key else {
            return false;
        };
        if let Some(inner) = open.inner_literal
            && token.indent() <= inner.source_indent
        {
            open.inner_literal = None;
        }
        if !self.nests_under(&open, token) {
            // A comment does not end a nested region.
            if token.role != Role::Comment {
                self.ctx.open_key = None;
            }
            return false;
        }

        let text_only = open.literal || open.inner_literal.is_some();
        let depth = match self.mode {
            Mode::Incremental => open.depth + token.indent().saturating_sub(open.source_indent),
            Mode::Canonical => {
                open.inner_literal.map_or(open.depth, |inner| inner.depth) + INDENT_STEP
            }
        };
        let text = if text_only {
            token.line.content.to_string()
        } else {
            nested_text(token)
        };
        if !text_only && token.key.is_some() && is_block_indicator(token.value) {
            let marker = if token.dashed { INDENT_STEP } else { 0 };
            open.inner_literal = Some(InnerLiteral {
                source_indent: token.indent() + marker,
                depth: depth + marker,
            });
        }
        self.emit(depth, text);
        self.ctx.open_key = Some(open);
        true
    }

    fn nests_under(&self, open: &OpenKey, token: &LineToken<'_>) -> bool {
        let indent = token.indent();
        if open.literal {
            return indent > open.source_indent;
        }
        if open
            .inner_literal
            .is_some_and(|inner| indent > inner.source_indent)
        {
            return true;
        }
        match self.mode {
            Mode::Incremental => {
                indent > open.source_indent
                    || (indent == open.source_indent && token.dashed && !token.role.is_header())
            }
            Mode::Canonical => matches!(
                token.role,
                Role::KeyValue | Role::ListItem | Role::Continuation
            ),
        }
    }

    /// Closes the task and task section a shallower line leaves.
    fn close_by_dedent(&mut self, token: &LineToken<'_>) {
        if matches!(token.role, Role::Comment | Role::DocumentMarker) || token.role.is_header() {
            return;
        }
        let indent = token.indent();
        // A task-level line sitting on its task's list marker is misindented, not a sibling.
        let binds_to_task = matches!(
            token.role,
            Role::TaskAttribute
                | Role::ModuleInvocation
                | Role::ShellFragment(_)
                | Role::Continuation
        );
        if self.ctx.task.is_some_and(|task| {
            indent < task.source_indent || (indent == task.source_indent && !binds_to_task)
        }) {
            self.ctx.task = None;
            self.pending_dash = false;
        }
        if self.ctx.play.is_some()
            && self.ctx.task.is_none()
            && self.ctx.task_section.is_some_and(|section| {
                indent < section.source_indent
                    || (indent == section.source_indent && !token.dashed && !binds_to_task)
            })
        {
            self.ctx.task_section = None;
        }
    }
}

fn indented(depth: usize, text: String) -> String {
    if text.is_empty() {
        text
    } else {
        format!("{:depth$}{text}", "")
    }
}

/// Source column of a token's key.
fn key_column(token: &LineToken<'_>) -> usize {
    if token.dashed {
        token.indent() + INDENT_STEP
    } else {
        token.indent()
    }
}

/// `key: value` with the value's template quoted, or `key:` for an empty value.
fn keyed(token: &LineToken<'_>) -> String {
    let key = token.key.unwrap_or_default();
    if token.value.is_empty() {
        format!("{key}:")
    } else {
        format!("{key}: {}", quote_mapping_value(token.value))
    }
}

/// A line re-emitted inside some other key's value.
fn nested_text(token: &LineToken<'_>) -> String {
    match (token.dashed, token.key) {
        (true, Some(_)) => format!("- {}", keyed(token)),
        (true, None) if token.body.is_empty() => "-".to_string(),
        (true, None) => format!("- {}", quote_template_value(token.body)),
        (false, Some(_)) => keyed(token),
        (false, None) => token.line.content.to_string(),
    }
}
