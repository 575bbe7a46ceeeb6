//! Shell-block reconstruction.
//!
//! A block opens on a shell fragment or a shell-module key and then absorbs
//! every following line until a structural line at or left of where it
//! started. It renders as a literal block scalar under a `shell:`-family key.

use super::{
    catalog::keywords::module_name,
    classify::{LineToken, Role},
    context::INDENT_STEP,
    scalar::{is_block_indicator, quote_mapping_value, strip_matching_quotes},
};

/// An open shell block and the lines gathered into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellBlock {
    key: String,
    indicator: String,
    start_indent: usize,
    /// Opened by `key: |` in the source.
    explicit: bool,
    /// Inline value of the opening `key: value` line.
    inline: Option<String>,
    body: Vec<BodyLine>,
    pending_blanks: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BodyLine {
    indent: usize,
    text: String,
}

impl ShellBlock {
    /// Opens a block on a line that looks like a shell command.
    pub fn from_fragment(token: &LineToken<'_>) -> Self {
        Self {
            key: "shell".to_string(),
            indicator: "|".to_string(),
            start_indent: token.indent(),
            explicit: false,
            inline: None,
            body: vec![BodyLine {
                indent: token.indent(),
                text: token.line.content.to_string(),
            }],
            pending_blanks: 0,
        }
    }

    /// Opens a block on a `shell:`, `command:` (or similar) module key.
    pub fn from_module(token: &LineToken<'_>) -> Self {
        let value = token.value;
        let explicit = is_block_indicator(value);
        let indicator = if explicit {
            value.split(" #").next().unwrap_or(value).trim_end()
        } else {
            "|"
        };
        let inline = (!value.is_empty() && !value.starts_with('#') && !explicit)
            .then(|| value.to_string());
        Self {
            key: token.key.unwrap_or("shell").to_string(),
            indicator: indicator.to_string(),
            start_indent: token.indent(),
            explicit,
            inline,
            body: Vec::new(),
            pending_blanks: 0,
        }
    }

    pub fn start_indent(&self) -> usize {
        self.start_indent
    }

    /// Nothing but a bare key: no inline value, no body, no block indicator.
    pub fn is_bare(&self) -> bool {
        !self.explicit && self.inline.is_none() && self.body.is_empty()
    }

    /// Whether `token` belongs to this block rather than closing it.
    pub fn accepts(&self, token: &LineToken<'_>) -> bool {
        let indent = token.indent();
        if self.explicit {
            return indent > self.start_indent;
        }
        if self.is_bare() {
            // `shell:` followed by `cmd:`/`chdir:` is the argument-map form.
            return indent >= self.start_indent
                && matches!(token.role, Role::ShellFragment(_) | Role::Continuation);
        }
        match token.role {
            role if role.is_structural() => indent > self.start_indent,
            Role::KeyValue if token.opens_block() => indent > self.start_indent,
            Role::Comment | Role::ListItem => indent >= self.start_indent,
            _ => true,
        }
    }

    pub fn push(&mut self, token: &LineToken<'_>) {
        if !self.body.is_empty() || self.inline.is_some() {
            for _ in 0..self.pending_blanks {
                self.body.push(BodyLine {
                    indent: 0,
                    text: String::new(),
                });
            }
        }
        self.pending_blanks = 0;
        self.body.push(BodyLine {
            indent: token.indent(),
            text: token.line.content.to_string(),
        });
    }

    /// Takes the block back after it was closed, dropping blank lines seen since.
    pub fn reopen(&mut self) {
        self.pending_blanks = 0;
    }

    pub fn push_blank(&mut self) {
        self.pending_blanks += 1;
    }

    /// Blank lines seen after the last body line.
    pub fn trailing_blanks(&self) -> usize {
        self.pending_blanks
    }

    /// Renders the block as `(depth, text)` pairs relative to the key's column.
    ///
    /// A seed line that gathered nothing stays a one-line `key: value`. With
    /// `keep_relative`, body lines of an explicit block keep their indentation
    /// relative to the first body line; shallower lines are pulled in to it.
    pub fn render(&self, keep_relative: bool) -> Vec<(usize, String)> {
        if !self.explicit && self.body.is_empty() {
            return vec![(
                0,
                match &self.inline {
                    Some(value) => format!("{}: {}", self.key, quote_mapping_value(value)),
                    None => format!("{}:", self.key),
                },
            )];
        }

        let key = if self.explicit {
            self.key.clone()
        } else {
            script_key(&self.key)
        };
        let mut out = vec![(0, format!("{key}: {}", self.indicator))];
        if let Some(seed) = &self.inline {
            out.push((INDENT_STEP, strip_matching_quotes(seed).to_string()));
        }
        // The first line fixes the block's indentation; nothing may sit left of it.
        let base = self
            .body
            .iter()
            .find(|line| !line.text.is_empty())
            .map_or(0, |line| line.indent);
        for line in &self.body {
            if line.text.is_empty() {
                out.push((0, String::new()));
                continue;
            }
            let extra = if keep_relative && self.explicit {
                line.indent.saturating_sub(base)
            } else {
                0
            };
            out.push((INDENT_STEP + extra, line.text.clone()));
        }
        out
    }
}

/// `command` modules do not run scripts; a block gathered under one becomes `shell`.
fn script_key(key: &str) -> String {
    let replacement = match module_name(key) {
        "command" => "shell",
        "win_command" => "win_shell",
        _ => return key.to_string(),
    };
    match key.rsplit_once('.') {
        Some((prefix, _)) => format!("{prefix}.{replacement}"),
        None => replacement.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::FileKind,
        repair::{
            classify::{ClassifyContext, LineClassifier},
            lines::lines_with_indent,
        },
    };
    use pretty_assertions::assert_eq;

    fn tokens(text: &str) -> Vec<LineToken<'_>> {
        let ctx = ClassifyContext {
            kind: FileKind::TaskList,
            task_indent: Some(2),
            use_indent: true,
            ..Default::default()
        };
        lines_with_indent(text)
            .map(|line| LineClassifier.classify(line, &ctx))
            .collect()
    }

    fn gather(text: &str) -> (ShellBlock, usize) {
        let tokens = tokens(text);
        let mut block = match tokens[0].role {
            Role::ShellFragment(_) => ShellBlock::from_fragment(&tokens[0]),
            _ => ShellBlock::from_module(&tokens[0]),
        };
        let mut taken = 1;
        for token in &tokens[1..] {
            if token.role == Role::Blank {
                block.push_blank();
            } else if block.accepts(token) {
                block.push(token);
            } else {
                break;
            }
            taken += 1;
        }
        (block, taken)
    }

    #[test]
    fn seeded_block_gathers_fragments_until_attribute() {
        let (block, taken) = gather(
            "    shell: echo hi\n    dnf install foo\n    systemctl restart foo\n    register: out\n",
        );
        assert_eq!(taken, 3);
        assert_eq!(
            block.render(false),
            vec![
                (0, "shell: |".to_string()),
                (2, "echo hi".to_string()),
                (2, "dnf install foo".to_string()),
                (2, "systemctl restart foo".to_string()),
            ]
        );
    }

    #[test]
    fn unextended_seed_stays_on_one_line() {
        let (block, taken) = gather("    command: /usr/bin/true\n    register: out\n");
        assert_eq!(taken, 1);
        assert_eq!(
            block.render(false),
            vec![(0, "command: /usr/bin/true".to_string())]
        );
    }

    #[test]
    fn extended_command_becomes_shell() {
        let (block, _) = gather("    ansible.builtin.command: \"cd /tmp\"\n    make install\n");
        assert_eq!(
            block.render(false),
            vec![
                (0, "ansible.builtin.shell: |".to_string()),
                (2, "cd /tmp".to_string()),
                (2, "make install".to_string()),
            ]
        );
    }

    #[test]
    fn explicit_block_keeps_relative_indentation() {
        let (block, taken) = gather(
            "    shell: |\n      if true; then\n        echo yes\n      fi\n    when: x\n",
        );
        assert_eq!(taken, 4);
        assert_eq!(
            block.render(true),
            vec![
                (0, "shell: |".to_string()),
                (2, "if true; then".to_string()),
                (4, "echo yes".to_string()),
                (2, "fi".to_string()),
            ]
        );
        assert_eq!(block.render(false)[2], (2, "echo yes".to_string()));
    }

    #[test]
    fn deeper_first_line_sets_the_block_indentation() {
        let (block, taken) =
            gather("    shell: |\n        echo deep\n      echo shallow\n          echo deeper\n");
        assert_eq!(taken, 4);
        assert_eq!(
            block.render(true),
            vec![
                (0, "shell: |".to_string()),
                (2, "echo deep".to_string()),
                (2, "echo shallow".to_string()),
                (4, "echo deeper".to_string()),
            ]
        );
    }

    #[test]
    fn deeper_keyword_is_absorbed() {
        let (_, taken) = gather("    dnf install foo\n      when: x\n    when: y\n");
        assert_eq!(taken, 2);
    }

    #[test]
    fn same_indent_comment_is_body_and_shallower_comment_closes() {
        let (_, taken) = gather("    dnf install foo\n    # retry\n  # done\n");
        assert_eq!(taken, 2);
    }

    #[test]
    fn bare_key_rejects_argument_map() {
        let (block, taken) = gather("    shell:\n      cmd: ls\n");
        assert_eq!(taken, 1);
        assert!(block.is_bare());
    }

    #[test]
    fn blanks_between_lines_are_kept_and_trailing_counted() {
        let (block, _) = gather("    dnf install foo\n\n    dnf install bar\n\n");
        assert_eq!(block.trailing_blanks(), 1);
        assert_eq!(
            block.render(false),
            vec![
                (0, "shell: |".to_string()),
                (2, "dnf install foo".to_string()),
                (0, String::new()),
                (2, "dnf install bar".to_string()),
            ]
        );
    }
}
