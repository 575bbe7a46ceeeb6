/// Keywords valid on a task.
pub const TASK_ATTRIBUTES: &[&str] = &[
    "register",
    "when",
    "become",
    "vars",
    "with_items",
    "loop",
    "notify",
    "tags",
    "ignore_errors",
    "become_user",
    "changed_when",
    "failed_when",
    "until",
    "retries",
    "delay",
    "delegate_to",
    "run_once",
    "no_log",
    "environment",
    "args",
    "loop_control",
    "with_dict",
    "with_fileglob",
    "with_together",
    "with_nested",
    "with_sequence",
    "with_subelements",
    "async",
    "poll",
    "check_mode",
    "listen",
    "block",
    "rescue",
    "always",
];

/// Keywords valid on a play.
pub const PLAY_ATTRIBUTES: &[&str] = &[
    "gather_facts",
    "become",
    "vars",
    "tasks",
    "roles",
    "handlers",
    "pre_tasks",
    "post_tasks",
    "hosts",
    "vars_files",
    "vars_prompt",
    "remote_user",
    "serial",
    "connection",
    "strategy",
    "any_errors_fatal",
    "max_fail_percentage",
    "collections",
    "module_defaults",
    "become_user",
    "environment",
    "tags",
    "force_handlers",
];

/// Play attributes whose value is a list of tasks.
pub const TASK_SECTIONS: &[&str] = &["tasks", "handlers", "pre_tasks", "post_tasks"];

/// Modules whose argument is a command line or script body.
pub const SHELL_MODULES: &[&str] = &["shell", "command", "raw", "win_shell", "win_command"];

/// Configuration-management modules recognized as task actions.
pub const MODULES: &[&str] = &[
    "yum",
    "dnf",
    "apt",
    "package",
    "pip",
    "service",
    "systemd",
    "copy",
    "template",
    "file",
    "lineinfile",
    "blockinfile",
    "replace",
    "command",
    "shell",
    "script",
    "raw",
    "debug",
    "ping",
    "set_fact",
    "assert",
    "fail",
    "pause",
    "stat",
    "setup",
    "reboot",
    "group_by",
    "add_host",
    "wait_for",
    "wait_for_connection",
    "uri",
    "get_url",
    "git",
    "unarchive",
    "archive",
    "synchronize",
    "fetch",
    "mount",
    "user",
    "group",
    "cron",
    "at",
    "mail",
    "sysctl",
    "firewalld",
    "selinux",
    "seboolean",
    "include",
    "include_vars",
    "include_tasks",
    "import_tasks",
    "include_role",
    "import_role",
    "import_playbook",
    "meta",
    "win_updates",
    "win_reboot",
    "win_service",
    "win_feature",
    "win_package",
    "win_chocolatey",
    "win_command",
    "win_shell",
    "win_copy",
    "win_file",
    "redhat_subscription",
    "rhsm_repository",
    "yum_repository",
    "package_facts",
    "service_facts",
];

/// Where an attribute keyword may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordScope {
    Task,
    Play,
    /// Valid on both; the surrounding context decides.
    Shared,
}

pub fn attribute_scope(key: &str) -> Option<KeywordScope> {
    let task = TASK_ATTRIBUTES.contains(&key);
    let play = PLAY_ATTRIBUTES.contains(&key);
    match (task, play) {
        (true, true) => Some(KeywordScope::Shared),
        (true, false) => Some(KeywordScope::Task),
        (false, true) => Some(KeywordScope::Play),
        (false, false) => None,
    }
}

pub fn is_task_section(key: &str) -> bool {
    TASK_SECTIONS.contains(&key)
}

/// Strips a collection prefix: `ansible.builtin.copy` becomes `copy`.
pub fn module_name(key: &str) -> &str {
    key.rsplit('.').next().unwrap_or(key)
}

pub fn is_module(key: &str) -> bool {
    MODULES.contains(&module_name(key))
}

pub fn is_shell_module(key: &str) -> bool {
    SHELL_MODULES.contains(&module_name(key))
}
