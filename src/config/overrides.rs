//! Command-line overrides of individual keys
//!
//! An override is `key:sub:key=value`. The value is parsed as YAML, so
//! `8`, `2e-4`, `true`, `~` and `[1, 2]` all keep their types. Overrides are
//! applied to the raw document before it is typed, so they go through the
//! same validation as hand-written keys.

use super::validate::{ConfigError, ConfigResult};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::str::FromStr;

/// One parsed `key:path=value` override
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub path: Vec<String>,
    pub value: Value,
}

impl Override {
    pub fn parse(input: &str) -> ConfigResult<Self> {
        let invalid = |message: &str| ConfigError::InvalidOverride {
            input: input.to_string(),
            message: message.to_string(),
        };

        let (keys, raw) = input.split_once('=').ok_or_else(|| invalid("missing '='"))?;
        let path: Vec<String> = keys.trim().split(':').map(|k| k.trim().to_string()).collect();
        if path.iter().any(String::is_empty) {
            return Err(invalid("empty key segment"));
        }

        let raw = raw.trim();
        let value = if raw.is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(raw).map_err(|e| ConfigError::InvalidOverride {
                input: input.to_string(),
                message: format!("value is not valid YAML: {e}"),
            })?
        };

        Ok(Self { path, value })
    }

    /// Dotted form of the key, e.g. `train.optim_g.lr`.
    pub fn key(&self) -> String {
        self.path.join(".")
    }
}

impl FromStr for Override {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = serde_yaml::to_string(&self.value).map_err(|_| fmt::Error)?;
        write!(f, "{}={}", self.path.join(":"), value.trim_end())
    }
}

/// Apply overrides in order; later overrides win.
///
/// Missing intermediate sections are created. Descending into a key that
/// holds a scalar or sequence is an error.
pub fn apply_overrides(doc: &mut Value, overrides: &[Override]) -> ConfigResult<()> {
    for entry in overrides {
        apply_one(doc, entry)?;
        tracing::debug!(key = %entry.key(), "applied override");
    }
    Ok(())
}

fn apply_one(doc: &mut Value, entry: &Override) -> ConfigResult<()> {
    let not_a_section = |depth: usize| ConfigError::InvalidOverride {
        input: entry.to_string(),
        message: format!("'{}' is not a section", entry.path[..depth].join(".")),
    };

    if doc.is_null() {
        *doc = Value::Mapping(Mapping::new());
    }
    let Some((last, parents)) = entry.path.split_last() else {
        return Ok(());
    };

    let mut node = doc;
    for (depth, key) in parents.iter().enumerate() {
        let map = node.as_mapping_mut().ok_or_else(|| not_a_section(depth))?;
        let child = map
            .entry(Value::String(key.clone()))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if child.is_null() {
            *child = Value::Mapping(Mapping::new());
        }
        node = child;
    }

    let map = node
        .as_mapping_mut()
        .ok_or_else(|| not_a_section(parents.len()))?;
    map.insert(Value::String(last.clone()), entry.value.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_parse_typed_values() {
        let lr = Override::parse("train:optim_g:lr=2e-4").unwrap();
        assert_eq!(lr.path, vec!["train", "optim_g", "lr"]);
        assert_eq!(lr.value.as_f64(), Some(2e-4));

        let flag = Override::parse("logger:use_tb_logger=false").unwrap();
        assert_eq!(flag.value, Value::Bool(false));

        let list = Override::parse("train:scheduler:milestones=[100, 200]").unwrap();
        assert!(list.value.is_sequence());
    }

    #[test]
    fn test_parse_tilde_and_empty_are_null() {
        assert!(Override::parse("path:resume_state=~").unwrap().value.is_null());
        assert!(Override::parse("path:resume_state=").unwrap().value.is_null());
    }

    #[test]
    fn test_value_may_contain_equals() {
        let entry = Override::parse("name=a=b").unwrap();
        assert_eq!(entry.value, Value::String("a=b".into()));
    }

    #[test]
    fn test_malformed_overrides() {
        assert!(matches!(
            Override::parse("train:optim_g:lr"),
            Err(ConfigError::InvalidOverride { .. })
        ));
        assert!(Override::parse("train::lr=1").is_err());
        assert!(Override::parse("=1").is_err());
    }

    #[test]
    fn test_apply_replaces_nested_value() {
        let mut value = doc("train:\n  optim_g:\n    type: Adam\n    lr: 0.001\n");
        let entry = Override::parse("train:optim_g:lr=2e-4").unwrap();
        apply_overrides(&mut value, &[entry]).unwrap();
        assert_eq!(value["train"]["optim_g"]["lr"].as_f64(), Some(2e-4));
        assert_eq!(value["train"]["optim_g"]["type"].as_str(), Some("Adam"));
    }

    #[test]
    fn test_apply_creates_missing_sections() {
        let mut value = doc("name: x\n");
        apply_overrides(&mut value, &[Override::parse("val:val_freq=8").unwrap()]).unwrap();
        assert_eq!(value["val"]["val_freq"].as_u64(), Some(8));
    }

    #[test]
    fn test_apply_into_scalar_fails() {
        let mut value = doc("scale: 4\n");
        let err = apply_overrides(&mut value, &[Override::parse("scale:x=1").unwrap()]).unwrap_err();
        assert!(err.to_string().contains("'scale' is not a section"));
    }

    #[test]
    fn test_later_override_wins() {
        let mut value = doc("scale: 4\n");
        let overrides = [
            Override::parse("scale=2").unwrap(),
            Override::parse("scale=3").unwrap(),
        ];
        apply_overrides(&mut value, &overrides).unwrap();
        assert_eq!(value["scale"].as_u64(), Some(3));
    }

    #[test]
    fn test_display_round_trips() {
        let entry = Override::parse("train:total_iter=1000").unwrap();
        assert_eq!(entry.to_string(), "train:total_iter=1000");
        assert_eq!(entry.to_string().parse::<Override>().unwrap(), entry);
    }
}
