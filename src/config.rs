//! Processor configuration.
//!
//! Settings come from a JSON document, from `FERROUS_INJECT_*` environment
//! variables, or from any other [`ConfigSource`].

use std::env;

use serde::Deserialize;

use crate::error::{CompilerError, CompilerResult};

/// Prefix of every environment variable the processor reads.
pub const ENV_PREFIX: &str = "FERROUS_INJECT";

/// A raw configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    String(String),
    Boolean(bool),
}

impl ConfigValue {
    pub fn as_string(&self) -> CompilerResult<&str> {
        match self {
            ConfigValue::String(value) => Ok(value),
            ConfigValue::Boolean(value) => Err(CompilerError::Config(format!(
                "expected a string, found {value}"
            ))),
        }
    }

    pub fn as_bool(&self) -> CompilerResult<bool> {
        match self {
            ConfigValue::Boolean(value) => Ok(*value),
            ConfigValue::String(value) => Err(CompilerError::Config(format!(
                "expected a boolean, found {value:?}"
            ))),
        }
    }
}

/// Source of configuration values.
pub trait ConfigSource: std::fmt::Debug {
    fn get(&self, key: &str) -> Option<ConfigValue>;
}

/// Environment variable configuration source.
///
/// With a prefix, key `project_name` is read from `{PREFIX}_PROJECT_NAME`.
#[derive(Debug, Default)]
pub struct EnvironmentConfigSource {
    prefix: Option<String>,
}

impl EnvironmentConfigSource {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl ConfigSource for EnvironmentConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        let env_key = match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.to_uppercase(), key.to_uppercase()),
            None => key.to_uppercase(),
        };

        env::var(&env_key).ok().map(|value| match value.parse::<bool>() {
            Ok(flag) => ConfigValue::Boolean(flag),
            Err(_) => ConfigValue::String(value),
        })
    }
}

/// Settings of one processor invocation.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::ProcessorConfig;
///
/// let config = ProcessorConfig::from_json_str(r#"{ "project_name": "app" }"#).unwrap();
/// assert_eq!(config.project_name, "app");
/// assert!(config.check_dependency_cycles);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Suffix of every generated type name, keeping artifacts of separately
    /// compiled projects apart.
    pub project_name: String,
    pub check_dependency_cycles: bool,
    /// Log a JSON snapshot of the analysed graph (`debug-report` feature).
    pub debug_report: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            project_name: "main".to_string(),
            check_dependency_cycles: true,
            debug_report: false,
        }
    }
}

impl ProcessorConfig {
    pub fn validate(&self) -> CompilerResult<()> {
        if self.project_name.is_empty() {
            return Err(CompilerError::Config("project_name must not be empty".to_string()));
        }
        if self.project_name.contains(['/', '$']) {
            return Err(CompilerError::Config(format!(
                "project_name must not contain '/' or '$': {}",
                self.project_name
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> CompilerResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|error| CompilerError::Config(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by whatever `source` defines.
    pub fn load(source: &dyn ConfigSource) -> CompilerResult<Self> {
        let mut config = Self::default();
        if let Some(value) = source.get("project_name") {
            config.project_name = value.as_string()?.to_string();
        }
        if let Some(value) = source.get("check_dependency_cycles") {
            config.check_dependency_cycles = value.as_bool()?;
        }
        if let Some(value) = source.get("debug_report") {
            config.debug_report = value.as_bool()?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> CompilerResult<Self> {
        Self::load(&EnvironmentConfigSource::with_prefix(ENV_PREFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct MapSource(HashMap<&'static str, ConfigValue>);

    impl ConfigSource for MapSource {
        fn get(&self, key: &str) -> Option<ConfigValue> {
            self.0.get(key).cloned()
        }
    }

    #[test]
    fn load_overrides_defaults() {
        let source = MapSource(HashMap::from([
            ("project_name", ConfigValue::String("feature".to_string())),
            ("check_dependency_cycles", ConfigValue::Boolean(false)),
        ]));

        let config = ProcessorConfig::load(&source).unwrap();
        assert_eq!(config.project_name, "feature");
        assert!(!config.check_dependency_cycles);
        assert!(!config.debug_report);
    }

    #[test]
    fn json_and_sources_share_key_names() {
        let from_json = ProcessorConfig::from_json_str(r#"{ "check_dependency_cycles": false }"#).unwrap();
        let source = MapSource(HashMap::from([(
            "check_dependency_cycles",
            ConfigValue::Boolean(false),
        )]));
        assert_eq!(ProcessorConfig::load(&source).unwrap(), from_json);
    }

    #[test]
    fn load_rejects_mistyped_values() {
        let source = MapSource(HashMap::from([(
            "check_dependency_cycles",
            ConfigValue::String("sometimes".to_string()),
        )]));
        assert!(matches!(ProcessorConfig::load(&source), Err(CompilerError::Config(_))));
    }

    #[test]
    fn environment_source_reads_prefixed_variables() {
        env::set_var("FERROUS_INJECT_TEST_ONLY_FLAG", "true");
        env::set_var("FERROUS_INJECT_TEST_ONLY_NAME", "lib");

        let source = EnvironmentConfigSource::with_prefix("ferrous_inject");
        assert_eq!(source.get("test_only_flag"), Some(ConfigValue::Boolean(true)));
        assert_eq!(source.get("test_only_name"), Some(ConfigValue::String("lib".to_string())));
        assert_eq!(source.get("test_only_missing"), None);

        env::remove_var("FERROUS_INJECT_TEST_ONLY_FLAG");
        env::remove_var("FERROUS_INJECT_TEST_ONLY_NAME");
    }

    #[test]
    fn project_name_with_separator_is_invalid() {
        let config = ProcessorConfig {
            project_name: "a$b".to_string(),
            ..ProcessorConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ProcessorConfig::from_json_str(r#"{ "project_name": "" }"#).is_err());
    }
}
