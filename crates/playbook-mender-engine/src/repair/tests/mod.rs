mod invariants;

/// Broken documents with the path each one would be found at.
pub(super) const CORPUS: &[(&str, &str)] = &[
    (
        "roles/web/tasks/main.yml",
        "  - name: test\n    shell: echo hi\n    dnf install foo\n",
    ),
    (
        "site.yml",
        "- hosts: webservers\n  become: yes\n  - name: install httpd\n    yum: name=httpd state=present\n  name: start httpd\n    service: name=httpd state=started\n",
    ),
    (
        "patch.yml",
        "- name: patch\n  hosts: all\n  tasks:\n    - name: update\n      dnf update -y\n      needs-restarting -r\n      register: reboot_needed\n    - name: reboot\n      reboot:\n      when: reboot_needed.rc == 1\n    - debug: msg={{ x }}\n",
    ),
    (
        "roles/web/tasks/config.yml",
        "- name: a\n  copy:\n      src: x\n    dest: y\n",
    ),
    (
        "group_vars/all.yml",
        "---\nhttp_port: 80\ndnf install -y httpd\nmax_clients: 200\n",
    ),
    (
        "roles/web/meta/main.yml",
        "This role installs the web tier.\nIt has no structure left.\n",
    ),
];
