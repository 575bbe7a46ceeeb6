use playbook_mender_engine::{RepairResult, repair};

#[test]
fn fixture_lost_list_markers() {
    assert_fixture("lost_list_markers", "site.yml");
}

#[test]
fn fixture_shell_run() {
    assert_fixture("shell_run", "patch.yml");
}

#[test]
fn fixture_chaotic_indentation() {
    assert_fixture("chaotic_indentation", "roles/web/tasks/main.yml");
}

#[test]
fn fixture_group_vars() {
    assert_fixture("group_vars", "group_vars/webservers.yml");
}

#[test]
fn fixture_meta_prose() {
    assert_fixture("meta_prose", "roles/web/meta/main.yml");
}

fn assert_fixture(name: &str, path_hint: &str) {
    let yaml = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.yml",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();

    let result = repair(path_hint, &yaml);
    assert!(result.ok(), "{name}: {:?}", result.diagnostic());

    insta::with_settings!({
        snapshot_path => "fixtures",
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_snapshot!(name, render(&result));
    });
}

/// Summary header followed by the repaired text.
fn render(result: &RepairResult) -> String {
    let mut out = format!(
        "kind: {}\nstatus: {:?}\nstrategy: {}\n",
        result.kind(),
        result.status(),
        result.strategy()
    );
    for ambiguity in result.ambiguities() {
        out.push_str(&format!("warning: {ambiguity}\n"));
    }
    out.push_str("====\n");
    out.push_str(result.text().trim_end());
    out
}
