use std::collections::HashSet;

use serde_yaml::Value;

use crate::{
    models::{Ambiguity, Document},
    repair::{
        builder::Rebuilt,
        catalog::match_fragment,
        classify::LineFacts,
        lines::lines_with_indent,
        scalar::{double_quoted, quote_mapping_value, value_opens_block},
    },
};

/// Rebuilds a variables file as a flat mapping.
///
/// Only `key: value` lines with an inline value survive; list items, shell
/// fragments, prose and keys that open a nested block are dropped. Indented
/// pairs are flattened to the top level and reported, and a repeated key
/// keeps its first value. A value that does not parse on its own is kept as
/// a quoted string and reported.
pub fn rebuild_vars(doc: &Document<'_>) -> Rebuilt {
    let mut out = vec!["---".to_string()];
    let mut seen = HashSet::new();
    let mut ambiguities = Vec::new();

    for line in lines_with_indent(doc.text()) {
        let facts = LineFacts::of(line);
        if facts.dashed || value_opens_block(facts.value) {
            continue;
        }
        let Some(key) = facts.key else {
            continue;
        };
        if match_fragment(line.content).is_some() {
            continue;
        }
        let mut note = |reason| {
            ambiguities.push(Ambiguity {
                line: line.number,
                content: line.content.to_string(),
                reason,
            })
        };
        if !seen.insert(key) {
            note("duplicate variable dropped");
            continue;
        }
        if line.indent > 0 {
            note("nested variable flattened");
        }
        let value = match var_value(facts.value) {
            Some(value) => value,
            None => {
                note("unparseable value quoted");
                double_quoted(facts.value)
            }
        };
        out.push(format!("{key}: {value}"));
    }

    let mut text = out.join("\n");
    text.push('\n');
    Rebuilt { text, ambiguities }
}

/// The value as it can be written back, or `None` when it is not valid YAML
/// even after quoting colons and templates.
fn var_value(value: &str) -> Option<String> {
    let value = quote_mapping_value(value);
    serde_yaml::from_str::<Value>(&format!("value: {value}"))
        .is_ok()
        .then(|| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn rebuild(text: &str) -> Rebuilt {
        rebuild_vars(&Document::new("group_vars/all.yml", text))
    }

    #[test]
    fn shell_lines_are_dropped() {
        let rebuilt = rebuild("---\nhttp_port: 80\ndnf install -y httpd\nmax_clients: 200\n");
        assert_eq!(rebuilt.text, "---\nhttp_port: 80\nmax_clients: 200\n");
        assert!(rebuilt.ambiguities.is_empty());
    }

    #[test]
    fn lists_comments_and_block_keys_are_dropped() {
        let rebuilt = rebuild(
            "# web tier\npackages:\n- httpd\n- mod_ssl\nmotd: |\nWelcome\nport=8080\nenv: prod\n",
        );
        assert_eq!(rebuilt.text, "---\nenv: prod\n");
    }

    #[test]
    fn duplicates_keep_the_first_value() {
        let rebuilt = rebuild("a: 1\nb: 2\na: 3\n");
        assert_eq!(rebuilt.text, "---\na: 1\nb: 2\n");
        assert_eq!(rebuilt.ambiguities.len(), 1);
        assert_eq!(rebuilt.ambiguities[0].line, 3);
        assert_eq!(rebuilt.ambiguities[0].reason, "duplicate variable dropped");
    }

    #[test]
    fn indented_pairs_are_flattened_and_reported() {
        let rebuilt = rebuild("db:\n  host: db01\n  port: 5432\n");
        assert_eq!(rebuilt.text, "---\nhost: db01\nport: 5432\n");
        assert_eq!(rebuilt.ambiguities.len(), 2);
    }

    #[rstest]
    #[case("cmd: `hostname`", "cmd: \"`hostname`\"")]
    #[case("list: [1, 2", "list: \"[1, 2\"")]
    #[case("ref: *missing", "ref: \"*missing\"")]
    #[case("motd: \"unterminated", "motd: \"\\\"unterminated\"")]
    fn unparseable_values_become_strings(#[case] line: &str, #[case] expected: &str) {
        let rebuilt = rebuild(&format!("---\nhttp_port: 80\n{line}\nmax_clients: 200\n"));

        assert_eq!(
            rebuilt.text,
            format!("---\nhttp_port: 80\n{expected}\nmax_clients: 200\n")
        );
        assert_eq!(rebuilt.ambiguities.len(), 1);
        assert_eq!(rebuilt.ambiguities[0].line, 3);
        assert_eq!(rebuilt.ambiguities[0].reason, "unparseable value quoted");
    }

    #[test]
    fn values_are_made_safe() {
        let rebuilt = rebuild("greeting: {{ hello }} world\nbanner: note: read me\nlist: [a, b]\n");
        assert_eq!(
            rebuilt.text,
            "---\ngreeting: \"{{ hello }} world\"\nbanner: \"note: read me\"\nlist: [a, b]\n"
        );
    }
}
