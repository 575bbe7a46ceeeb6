use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use playbook_mender_engine::{Document, FileKind, RepairOrchestrator, RepairOptions};
use playbook_mender_engine::repair::{Mode, rebuild::rebuild};

/// A playbook of `plays` plays whose tasks lost markers and grew shell runs.
fn generate_corrupted_playbook(plays: usize) -> String {
    let mut content = String::new();
    for play in 0..plays {
        content.push_str(&format!("- name: play {play}\n  hosts: group{play}\n  become: yes\n"));
        for task in 0..20 {
            content.push_str(&format!("  - name: task {task}\n"));
            match task % 4 {
                0 => content.push_str("    shell: echo start\n    dnf install -y httpd\n    systemctl enable httpd\n"),
                1 => content.push_str("  name: lost marker\n    yum: name=httpd state=present\n"),
                2 => content.push_str("    debug:\n      msg: {{ greeting }}\n    when: ansible_os_family == \"RedHat\"\n"),
                _ => content.push_str("    copy:\n        src: motd\n      dest: /etc/motd\n    notify: restart\n"),
            }
        }
    }
    content
}

fn bench_repair(c: &mut Criterion) {
    let mut group = c.benchmark_group("repair");
    group.sample_size(10);

    let orchestrator = RepairOrchestrator::new(RepairOptions::default());
    for plays in [1, 10, 50] {
        let content = generate_corrupted_playbook(plays);
        group.bench_with_input(BenchmarkId::new("orchestrator", plays), &content, |b, content| {
            b.iter(|| {
                let result = orchestrator.repair("site.yml", std::hint::black_box(content));
                std::hint::black_box(result);
            });
        });
        group.bench_with_input(BenchmarkId::new("full_rebuild", plays), &content, |b, content| {
            let doc = Document::with_kind("site.yml", content, FileKind::Playbook);
            b.iter(|| std::hint::black_box(rebuild(&doc, Mode::Canonical)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_repair);
criterion_main!(benches);
