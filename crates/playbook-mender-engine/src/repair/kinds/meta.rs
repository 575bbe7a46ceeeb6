use crate::{
    models::Document,
    repair::{
        builder::Rebuilt,
        classify::LineFacts,
        lines::lines_with_indent,
        scalar::{plain_or_quoted, strip_matching_quotes},
    },
};

/// A supported platform entry in `galaxy_info.platforms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub name: String,
    pub versions: Vec<String>,
}

/// Values for the canonical `meta/main.yml` template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDefaults {
    pub author: String,
    pub description: String,
    pub company: String,
    pub license: String,
    pub min_ansible_version: String,
    pub platforms: Vec<Platform>,
    pub galaxy_tags: Vec<String>,
}

impl Default for MetaDefaults {
    fn default() -> Self {
        Self {
            author: "Unknown".to_string(),
            description: "Ansible role".to_string(),
            company: String::new(),
            license: "license (MIT)".to_string(),
            min_ansible_version: "2.1".to_string(),
            platforms: vec![Platform {
                name: "EL".to_string(),
                versions: vec!["7".to_string(), "8".to_string(), "9".to_string()],
            }],
            galaxy_tags: Vec::new(),
        }
    }
}

/// Scalar `galaxy_info` fields worth keeping from a corrupted file, in output order.
const SALVAGED: &[&str] = &[
    "role_name",
    "namespace",
    "author",
    "description",
    "company",
    "license",
    "min_ansible_version",
];

/// Rebuilds a role's meta file from the canonical template.
///
/// Recognizable scalar fields found anywhere in the text override the
/// defaults; everything else is discarded.
pub fn rebuild_meta(doc: &Document<'_>, defaults: &MetaDefaults) -> Rebuilt {
    let found = salvage(doc.text());
    let value_of = |key: &str| found.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

    let mut out = vec!["---".to_string(), "galaxy_info:".to_string()];
    for &key in SALVAGED {
        let fallback = match key {
            "author" => Some(defaults.author.as_str()),
            "description" => Some(defaults.description.as_str()),
            "company" => Some(defaults.company.as_str()),
            "license" => Some(defaults.license.as_str()),
            "min_ansible_version" => Some(defaults.min_ansible_version.as_str()),
            _ => None,
        };
        if let Some(value) = value_of(key).or(fallback) {
            out.push(format!("  {key}: {}", plain_or_quoted(value)));
        }
    }

    if defaults.platforms.is_empty() {
        out.push("  platforms: []".to_string());
    } else {
        out.push("  platforms:".to_string());
        for platform in &defaults.platforms {
            out.push(format!("    - name: {}", plain_or_quoted(&platform.name)));
            if platform.versions.is_empty() {
                out.push("      versions: []".to_string());
                continue;
            }
            out.push("      versions:".to_string());
            for version in &platform.versions {
                out.push(format!("        - {}", plain_or_quoted(version)));
            }
        }
    }

    if defaults.galaxy_tags.is_empty() {
        out.push("  galaxy_tags: []".to_string());
    } else {
        out.push("  galaxy_tags:".to_string());
        for tag in &defaults.galaxy_tags {
            out.push(format!("    - {}", plain_or_quoted(tag)));
        }
    }

    out.push(String::new());
    out.push("dependencies: []".to_string());

    let mut text = out.join("\n");
    text.push('\n');
    Rebuilt {
        text,
        ambiguities: Vec::new(),
    }
}

/// First non-empty value of each salvageable key.
fn salvage(text: &str) -> Vec<(&'static str, &str)> {
    let mut found: Vec<(&'static str, &str)> = Vec::new();
    for line in lines_with_indent(text) {
        let facts = LineFacts::of(line);
        let Some(key) = facts.key else {
            continue;
        };
        let Some(wanted) = SALVAGED.iter().find(|wanted| **wanted == key) else {
            continue;
        };
        let value = strip_matching_quotes(facts.value).trim();
        if value.is_empty() || found.iter().any(|(k, _)| k == wanted) {
            continue;
        }
        log::trace!("salvaged meta field {wanted} from line {}", line.number);
        found.push((*wanted, value));
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEMPLATE: &str = "---
galaxy_info:
  author: Unknown
  description: Ansible role
  company: \"\"
  license: license (MIT)
  min_ansible_version: \"2.1\"
  platforms:
    - name: EL
      versions:
        - \"7\"
        - \"8\"
        - \"9\"
  galaxy_tags: []

dependencies: []
";

    fn rebuild(text: &str, defaults: &MetaDefaults) -> String {
        rebuild_meta(&Document::new("roles/web/meta/main.yml", text), defaults).text
    }

    #[test]
    fn prose_becomes_the_template() {
        let text = "This role installs the web tier\nand nothing else works here\n";
        assert_eq!(rebuild(text, &MetaDefaults::default()), TEMPLATE);
    }

    #[test]
    fn recognizable_fields_are_kept() {
        let text = "galaxy_info author: broken\n   author: \"Jane Ops\"\n  role_name: web\nlicense:   Apache-2.0\nplatforms: garbage {\n";
        let out = rebuild(text, &MetaDefaults::default());
        assert!(out.starts_with(
            "---\ngalaxy_info:\n  role_name: web\n  author: Jane Ops\n  description: Ansible role\n"
        ));
        assert!(out.contains("  license: Apache-2.0\n"));
        assert!(out.contains("  platforms:\n    - name: EL\n"));
    }

    #[test]
    fn configured_defaults_fill_the_template() {
        let defaults = MetaDefaults {
            author: "Platform Team".to_string(),
            platforms: vec![Platform {
                name: "Ubuntu".to_string(),
                versions: vec![],
            }],
            galaxy_tags: vec!["web".to_string(), "nginx".to_string()],
            ..MetaDefaults::default()
        };
        let out = rebuild("", &defaults);
        assert!(out.contains("  author: Platform Team\n"));
        assert!(out.contains("    - name: Ubuntu\n      versions: []\n"));
        assert!(out.contains("  galaxy_tags:\n    - web\n    - nginx\n"));
        assert!(out.ends_with("\ndependencies: []\n"));
    }
}
