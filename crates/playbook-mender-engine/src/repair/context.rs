use super::shell_block::ShellBlock;

/// Width of one nesting level in emitted output.
pub const INDENT_STEP: usize = 2;
/// Column of a play's list marker.
pub const PLAY_DEPTH: usize = 0;
/// Column of a play's keys.
pub const PLAY_ATTRIBUTE_DEPTH: usize = PLAY_DEPTH + INDENT_STEP;
/// Column of a task's list marker.
pub const TASK_ITEM_DEPTH: usize = PLAY_ATTRIBUTE_DEPTH;
/// Column of a task's keys.
pub const TASK_ATTRIBUTE_DEPTH: usize = TASK_ITEM_DEPTH + INDENT_STEP;
/// Column of a shell block's body under a task.
pub const SHELL_BODY_DEPTH: usize = TASK_ATTRIBUTE_DEPTH + INDENT_STEP;

/// Innermost open section of the document being rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Document,
    Play,
    /// A `tasks:`-like list inside a play, with no task open yet.
    TaskList,
    Task,
}

/// An open section remembered by the source indentation of its opening line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub source_indent: usize,
}

/// A key whose value continues on the lines after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenKey {
    /// Source column of the key.
    pub source_indent: usize,
    /// Emitted column of the key.
    pub depth: usize,
    /// The value is a block scalar, so every deeper line is text.
    pub literal: bool,
    /// A block-scalar key found among the nested lines.
    pub inner_literal: Option<InnerLiteral>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnerLiteral {
    pub source_indent: usize,
    pub depth: usize,
}

/// Nesting state carried from line to line.
///
/// At most one shell block is open at a time; the tracker flushes it before
/// any header or attribute line is emitted.
#[derive(Debug, Default)]
pub struct BlockContext {
    pub play: Option<Frame>,
    pub task_section: Option<Frame>,
    pub task: Option<Frame>,
    pub open_key: Option<OpenKey>,
    pub shell: Option<ShellBlock>,
}

impl BlockContext {
    pub fn section(&self) -> Section {
        if self.task.is_some() {
            Section::Task
        } else if self.task_section.is_some() {
            Section::TaskList
        } else if self.play.is_some() {
            Section::Play
        } else {
            Section::Document
        }
    }

    /// Column at which keys of the innermost section are emitted.
    pub fn attribute_depth(&self) -> usize {
        match self.section() {
            Section::Task => TASK_ATTRIBUTE_DEPTH,
            Section::Play | Section::TaskList => PLAY_ATTRIBUTE_DEPTH,
            Section::Document => 0,
        }
    }

    pub fn shell_open(&self) -> bool {
        self.shell.is_some()
    }

    /// Closes everything down to the play level.
    pub fn close_tasks(&mut self) {
        self.task = None;
        self.task_section = None;
        self.open_key = None;
    }

    /// Closes everything, including the play.
    pub fn reset(&mut self) {
        self.close_tasks();
        self.play = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depths_step_by_two() {
        assert_eq!(
            [
                PLAY_DEPTH,
                PLAY_ATTRIBUTE_DEPTH,
                TASK_ITEM_DEPTH,
                TASK_ATTRIBUTE_DEPTH,
                SHELL_BODY_DEPTH
            ],
            [0, 2, 2, 4, 6]
        );
    }

    #[test]
    fn section_is_innermost_open_frame() {
        let mut ctx = BlockContext::default();
        assert_eq!(ctx.section(), Section::Document);
        assert_eq!(ctx.attribute_depth(), 0);

        ctx.play = Some(Frame { source_indent: 0 });
        assert_eq!(ctx.section(), Section::Play);

        ctx.task_section = Some(Frame { source_indent: 2 });
        assert_eq!(ctx.section(), Section::TaskList);

        ctx.task = Some(Frame { source_indent: 4 });
        assert_eq!(ctx.section(), Section::Task);
        assert_eq!(ctx.attribute_depth(), TASK_ATTRIBUTE_DEPTH);

        ctx.close_tasks();
        assert_eq!(ctx.section(), Section::Play);
        ctx.reset();
        assert_eq!(ctx.section(), Section::Document);
    }
}
