use rstest::rstest;

use super::CORPUS;
use crate::{
    models::{FileKind, RepairStatus, Strategy},
    repair::{
        catalog::{attribute_scope, is_shell_module},
        classify::split_key_value,
        lines::lines_with_indent,
        repair,
        scalar::is_block_indicator,
        verify::Verifier,
    },
};

fn case(index: usize) -> (&'static str, &'static str) {
    CORPUS[index]
}

#[rstest]
fn every_corpus_entry_is_repaired(#[values(0, 1, 2, 3, 4, 5)] index: usize) {
    let (path, text) = case(index);
    let result = repair(path, text);
    assert_eq!(result.status(), RepairStatus::Fixed, "{path}: {result:?}");
}

#[rstest]
fn accepted_text_verifies(#[values(0, 1, 2, 3, 4, 5)] index: usize) {
    let (path, text) = case(index);
    let result = repair(path, text);
    if result.ok() {
        assert_eq!(Verifier::for_kind(result.kind()).verify(result.text()), Ok(()));
    }
}

#[rstest]
fn repairing_twice_changes_nothing(#[values(0, 1, 2, 3, 4, 5)] index: usize) {
    let (path, text) = case(index);
    let once = repair(path, text);
    let twice = repair(path, once.text());
    assert_eq!(twice.strategy(), Strategy::None);
    assert_eq!(twice.text(), once.text());
}

#[rstest]
fn output_ends_with_one_newline(#[values(0, 1, 2, 3, 4, 5)] index: usize) {
    let (path, text) = case(index);
    let result = repair(path, text);
    assert!(result.text().ends_with('\n'));
    assert!(!result.text().ends_with("\n\n"));
}

#[rstest]
fn shell_blocks_hold_no_structure(#[values(0, 1, 2, 3)] index: usize) {
    let (path, text) = case(index);
    let result = repair(path, text);
    let lines: Vec<_> = lines_with_indent(result.text()).collect();
    for (i, header) in lines.iter().enumerate() {
        let body = header.content.trim_start_matches("- ");
        let Some((key, value)) = split_key_value(body) else {
            continue;
        };
        if !is_shell_module(key) || !is_block_indicator(value) {
            continue;
        }
        for line in lines[i + 1..]
            .iter()
            .take_while(|line| line.content.is_empty() || line.indent > header.indent)
        {
            let keyword = split_key_value(line.content).and_then(|(key, _)| attribute_scope(key));
            assert_eq!(keyword, None, "{path}: `{}` inside shell block", line.content);
            assert!(line.indent >= header.indent + 2 || line.content.is_empty());
        }
    }
}

#[test]
fn vars_output_is_flat_key_values() {
    let text = "---\nhttp_port: 80\n  - stray\nnginx -s reload\nworkers: {{ cores }}\n  nested: yes\n";
    let result = repair("roles/web/defaults/main.yml", text);
    assert_eq!(result.kind(), FileKind::Vars);
    for line in result.text().lines().skip(1) {
        assert!(!line.starts_with(' '), "`{line}` is indented");
        let (_, value) = split_key_value(line).expect("key: value line");
        assert!(!value.is_empty());
    }
}

#[test]
fn strategies_escalate_in_order() {
    let strategies: Vec<_> = CORPUS
        .iter()
        .map(|(path, text)| repair(path, text).strategy())
        .collect();
    assert_eq!(
        strategies,
        [
            Strategy::Incremental,
            Strategy::Incremental,
            Strategy::Incremental,
            Strategy::FullRebuild,
            Strategy::FullRebuild,
            Strategy::FullRebuild,
        ]
    );
}
