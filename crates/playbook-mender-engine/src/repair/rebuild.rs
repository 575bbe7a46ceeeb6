use crate::models::Document;

use super::{
    builder::{BlockTracker, Mode, Rebuilt},
    classify::{LineClassifier, LineFacts, Role},
    lines::{LineRef, lines_with_indent},
};

/// Runs the classify-then-place pipeline over a whole document.
///
/// Classification is driven by the tracker's state as of the previous line,
/// so both phases run in lockstep.
pub fn rebuild(doc: &Document<'_>, mode: Mode) -> Rebuilt {
    let lines: Vec<LineRef<'_>> = lines_with_indent(doc.text()).collect();
    let owns_hosts = hosts_lookahead(&lines);

    let mut tracker = BlockTracker::new(mode, doc.kind());
    let mut previous_opens_block = false;
    for (line, has_hosts) in lines.iter().zip(owns_hosts) {
        let ctx = tracker.classify_context(previous_opens_block, has_hosts);
        let token = LineClassifier.classify(*line, &ctx);
        if !matches!(token.role, Role::Blank | Role::Comment) {
            previous_opens_block = token.opens_block();
        }
        tracker.push(&token);
    }
    tracker.finish()
}

/// For each list item, whether a bare `hosts:` key follows before the next
/// `- name:`/`- hosts:` item or document marker.
///
/// Walks the lines backwards once, carrying whether a `hosts:` key has been
/// seen since the last boundary.
fn hosts_lookahead(lines: &[LineRef<'_>]) -> Vec<bool> {
    let mut owns = vec![false; lines.len()];
    let mut hosts_below = false;
    for (i, line) in lines.iter().enumerate().rev() {
        let facts = LineFacts::of(*line);
        owns[i] = facts.dashed && hosts_below;
        if facts.line.content == "---" || (facts.dashed && matches!(facts.key, Some("name" | "hosts")))
        {
            hosts_below = false;
        } else if !facts.dashed && facts.key == Some("hosts") {
            hosts_below = true;
        }
    }
    owns
}
