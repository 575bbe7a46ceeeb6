use std::fmt;

use serde::Deserialize;
use serde_yaml::Value;

use crate::models::FileKind;

/// Longest diagnostic kept, in characters.
pub const DIAGNOSTIC_LIMIT: usize = 100;

/// Why a candidate text was rejected, truncated to [`DIAGNOSTIC_LIMIT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic(String);

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if let Some((cut, _)) = message.char_indices().nth(DIAGNOSTIC_LIMIT) {
            message.truncate(cut);
        }
        Self(message)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accepts a text only if it parses as YAML and has the shape its kind requires.
///
/// Has no side effects; a stream of several documents is checked one
/// document at a time.
#[derive(Debug, Clone, Copy)]
pub struct Verifier {
    kind: FileKind,
}

impl Verifier {
    pub fn for_kind(kind: FileKind) -> Self {
        Self { kind }
    }

    pub fn verify(&self, text: &str) -> Result<(), Diagnostic> {
        for (index, document) in serde_yaml::Deserializer::from_str(text).enumerate() {
            let value = Value::deserialize(document).map_err(|e| Diagnostic::new(e.to_string()))?;
            self.check_shape(&value)
                .map_err(|reason| Diagnostic::new(format!("document {}: {reason}", index + 1)))?;
        }
        Ok(())
    }

    fn check_shape(&self, value: &Value) -> Result<(), String> {
        match self.kind {
            FileKind::Meta => match value {
                Value::Mapping(map)
                    if map.contains_key("galaxy_info") || map.contains_key("dependencies") =>
                {
                    Ok(())
                }
                Value::Mapping(_) => Err("meta has neither galaxy_info nor dependencies".into()),
                other => Err(format!("meta is {}, expected a mapping", describe(other))),
            },
            FileKind::Vars => match value {
                Value::Mapping(_) | Value::Null => Ok(()),
                other => Err(format!("vars is {}, expected a mapping", describe(other))),
            },
            FileKind::Playbook | FileKind::TaskList => match value {
                Value::Null => Ok(()),
                Value::Sequence(items) => items
                    .iter()
                    .position(|item| !matches!(item, Value::Mapping(_)))
                    .map_or(Ok(()), |i| {
                        Err(format!(
                            "item {} is {}, expected a mapping",
                            i + 1,
                            describe(&items[i])
                        ))
                    }),
                other => Err(format!(
                    "{} is {}, expected a sequence",
                    self.kind,
                    describe(other)
                )),
            },
            FileKind::Unknown => Ok(()),
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "empty",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
