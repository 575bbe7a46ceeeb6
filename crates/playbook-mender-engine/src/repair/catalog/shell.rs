use std::sync::OnceLock;

use regex::Regex;

/// The family of shell syntax a fragment line was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellSyntax {
    /// `dnf install`, `yum update`, `subscription-manager attach`, ...
    PackageManager,
    /// Common utilities: `echo`, `grep`, `systemctl`, ...
    Command,
    /// `for x in`, `if`, `case`, `[[ ... ]]`, `fi`, `done`, ...
    ControlFlow,
    /// `name=value` and PowerShell `$name = value`.
    Assignment,
    /// `{% if %}` style template conditionals.
    TemplateConditional,
    /// PowerShell `Verb-Noun` cmdlets.
    Cmdlet,
}

const PATTERNS: &[(ShellSyntax, &str)] = &[
    (
        ShellSyntax::PackageManager,
        r"^(dnf|yum|rpm|apt|apt-get|zypper|pip3?|subscription-manager|kpatch)\s",
    ),
    (
        ShellSyntax::Command,
        r"^(echo|printf|cat|grep|awk|sed|find|ls|cp|mv|rm|mkdir|touch|chmod|chown|systemctl|service|mount|umount|df|free|ps|kill|lsmod|curl|wget|tar|cd|export|source|sudo|journalctl|needs-restarting)\s",
    ),
    (ShellSyntax::Command, r"^(uptime|reboot)$"),
    (ShellSyntax::Command, r"^===\s"),
    (ShellSyntax::Command, r"^\*\w"),
    (ShellSyntax::ControlFlow, r"^for\s+\w+\s+in\s"),
    (ShellSyntax::ControlFlow, r"^(while|if|elif|case|until)\s"),
    (ShellSyntax::ControlFlow, r"^(then|else|fi|do|done|esac|;;)$"),
    (ShellSyntax::ControlFlow, r"^\[\[?\s"),
    (ShellSyntax::ControlFlow, r"^try\s*\{"),
    (ShellSyntax::ControlFlow, r"^\}\s*(catch|finally|else)?"),
    (ShellSyntax::ControlFlow, r"^[A-Za-z_][\w-]*\s*\(\)"),
    (ShellSyntax::Assignment, r"^\$\w+\s*="),
    (ShellSyntax::Assignment, r"^[A-Za-z_]\w*="),
    (
        ShellSyntax::TemplateConditional,
        r"^\{%-?\s*(if|elif|else|endif|for|endfor|set)\b",
    ),
    (ShellSyntax::Cmdlet, r"^[A-Z][a-z]+-[A-Z][A-Za-z]+"),
];

fn compiled() -> &'static [(ShellSyntax, Regex)] {
    static COMPILED: OnceLock<Vec<(ShellSyntax, Regex)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|(syntax, pattern)| (*syntax, Regex::new(pattern).expect("Invalid shell regex")))
            .collect()
    })
}

/// Matches trimmed line content against the shell syntax catalog.
///
/// Patterns are tried in catalog order and the first hit wins.
pub fn match_fragment(content: &str) -> Option<ShellSyntax> {
    compiled()
        .iter()
        .find(|(_, re)| re.is_match(content))
        .map(|(syntax, _)| *syntax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("dnf install -y httpd", Some(ShellSyntax::PackageManager))]
    #[case("subscription-manager attach --auto", Some(ShellSyntax::PackageManager))]
    #[case("echo \"done\"", Some(ShellSyntax::Command))]
    #[case("uptime", Some(ShellSyntax::Command))]
    #[case("for k in $(ls /boot); do", Some(ShellSyntax::ControlFlow))]
    #[case("if [ -f /etc/motd ]; then", Some(ShellSyntax::ControlFlow))]
    #[case("fi", Some(ShellSyntax::ControlFlow))]
    #[case("[[ -n \"$x\" ]] && exit 0", Some(ShellSyntax::ControlFlow))]
    #[case("current_kernels=$(rpm -q kernel)", Some(ShellSyntax::Assignment))]
    #[case("$updates = Get-WindowsUpdate", Some(ShellSyntax::Assignment))]
    #[case("{% if ansible_os_family == 'RedHat' %}", Some(ShellSyntax::TemplateConditional))]
    #[case("Get-Service -Name wuauserv", Some(ShellSyntax::Cmdlet))]
    #[case("name: install", None)]
    #[case("service: httpd", None)]
    #[case("echo_message: hi", None)]
    #[case("- name: task", None)]
    fn catalog(#[case] content: &str, #[case] expected: Option<ShellSyntax>) {
        assert_eq!(match_fragment(content), expected);
    }
}
