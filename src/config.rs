//! Layered YAML configuration.
//!
//! A [`Config`] starts from built-in defaults and deep-merges any number of
//! YAML documents over them. Mappings merge key by key; scalars and
//! sequences in later documents replace earlier ones.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{Result, SurroundError};

/// Name of the project configuration file, looked up in the project root.
pub const CONFIG_FILENAME: &str = "config.yaml";

const DEFAULT_OUTPUT_PATH: &str = "output";

/// Framework settings stored under the `surround` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SurroundSettings {
    /// Call `dump_output` on each filter and estimator after it runs.
    #[serde(default)]
    pub enable_stage_output_dump: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    values: Value,
    project_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            values: default_values(),
            project_root: None,
        }
    }
}

fn default_values() -> Value {
    let mut surround = Mapping::new();
    surround.insert(
        Value::from("enable_stage_output_dump"),
        Value::Bool(false),
    );

    let mut root = Mapping::new();
    root.insert(Value::from("surround"), Value::Mapping(surround));
    root.insert(Value::from("output_path"), Value::from(DEFAULT_OUTPUT_PATH));
    Value::Mapping(root)
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load defaults plus `<root>/config.yaml` when present.
    ///
    /// Relative `output_path` values are resolved against `root`.
    pub fn from_project_root(root: &Path) -> Result<Self> {
        let mut config = Self {
            project_root: Some(root.to_path_buf()),
            ..Self::default()
        };
        let path = root.join(CONFIG_FILENAME);
        if path.exists() {
            config.read_config_files([&path])?;
        } else {
            debug!(path = %path.display(), "no project config found; using defaults");
        }
        Ok(config)
    }

    /// Merge each file over the current values, in order.
    pub fn read_config_files<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();
            let text = fs::read_to_string(path).map_err(|e| SurroundError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            self.merge_yaml(&text).map_err(|e| SurroundError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            debug!(path = %path.display(), "merged config file");
        }
        Ok(())
    }

    /// Merge a YAML document over the current values. An empty document is a no-op.
    pub fn merge_yaml(&mut self, yaml: &str) -> std::result::Result<(), serde_yaml::Error> {
        let overlay: Value = serde_yaml::from_str(yaml)?;
        if !overlay.is_null() {
            merge(&mut self.values, overlay);
        }
        Ok(())
    }

    /// Look up a value by dotted key, e.g. `"surround.enable_stage_output_dump"`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        key.split('.')
            .try_fold(&self.values, |value, part| value.get(part))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Deserialize the value under `key` into `T`; `None` if missing or mistyped.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|v| serde_yaml::from_value(v.clone()).ok())
    }

    pub fn settings(&self) -> SurroundSettings {
        self.get_as("surround").unwrap_or_default()
    }

    pub fn enable_stage_output_dump(&self) -> bool {
        self.settings().enable_stage_output_dump
    }

    pub fn output_path(&self) -> PathBuf {
        let raw = PathBuf::from(self.get_str("output_path").unwrap_or(DEFAULT_OUTPUT_PATH));
        match &self.project_root {
            Some(root) if raw.is_relative() => root.join(raw),
            _ => raw,
        }
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn defaults_disable_output_dump() {
        let config = Config::new();
        assert!(!config.enable_stage_output_dump());
        assert_eq!(config.get_bool("surround.enable_stage_output_dump"), Some(false));
        assert_eq!(config.output_path(), PathBuf::from("output"));
    }

    #[test]
    fn merge_keeps_sibling_keys() {
        let mut config = Config::new();
        config
            .merge_yaml("surround:\n  enable_stage_output_dump: true\nhelloStage:\n  suffix: Scott\n")
            .unwrap();
        assert!(config.enable_stage_output_dump());
        assert_eq!(config.get_str("helloStage.suffix"), Some("Scott"));
        assert_eq!(config.get_str("output_path"), Some("output"));
    }

    #[test]
    fn later_scalars_replace_earlier_ones() {
        let mut config = Config::new();
        config.merge_yaml("model:\n  layers: [1, 2]\n  rate: 0.1\n").unwrap();
        config.merge_yaml("model:\n  layers: [3]\n").unwrap();
        assert_eq!(config.get_as::<Vec<u32>>("model.layers"), Some(vec![3]));
        assert_eq!(config.get_as::<f64>("model.rate"), Some(0.1));
    }

    #[test]
    fn empty_document_is_noop() {
        let mut config = Config::new();
        config.merge_yaml("").unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn missing_key_is_none() {
        let config = Config::new();
        assert!(config.get("surround.nope").is_none());
        assert!(config.get("output_path.deeper").is_none());
    }

    #[test]
    fn project_root_resolves_output_path() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join(CONFIG_FILENAME), "output_path: results\n").unwrap();
        let config = Config::from_project_root(tmp.path()).expect("load config");
        assert_eq!(config.output_path(), tmp.path().join("results"));
        assert_eq!(config.project_root(), Some(tmp.path()));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let mut config = Config::new();
        let err = config
            .read_config_files(["does/not/exist.yaml"])
            .unwrap_err();
        match err {
            SurroundError::Config { path, .. } => {
                assert_eq!(path, PathBuf::from("does/not/exist.yaml"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("bad.yaml");
        fs::write(&path, "surround: [unclosed\n").unwrap();
        let mut config = Config::new();
        assert!(matches!(
            config.read_config_files([&path]),
            Err(SurroundError::Config { .. })
        ));
    }
}
