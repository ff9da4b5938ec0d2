//! Configuration for analysis runs.
//!
//! Sources are layered in order:
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. environment variables with the `FRAMED_LISTENING__` prefix, sections
//!    separated by `__` (e.g. `FRAMED_LISTENING__OUTPUT__PREFIX=BERT`)
//!
//! ```toml
//! [analysis]
//! interaction_top_k = 5
//! min_condition_group = 2
//!
//! [output]
//! dir = "results"
//! prefix = "TFIDF"
//! write_csv = true
//! write_json = true
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "FRAMED_LISTENING";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["pretty", "compact"];

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load defaults, then `path` if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);
        if let Some(path) = path {
            if !path.exists() {
                return Err(CoreError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(
                config::File::from(path.to_path_buf()).format(config::FileFormat::Toml),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file without environment overrides.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| CoreError::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        toml::to_string_pretty(self).map_err(|e| CoreError::SerializationError(e.to_string()))
    }

    /// Validate configuration values.
    pub fn validate(&self) -> CoreResult<()> {
        if self.analysis.interaction_top_k == 0 {
            return Err(CoreError::ConfigError(
                "analysis.interaction_top_k must be greater than 0".into(),
            ));
        }
        if self.analysis.min_condition_group < 2 {
            return Err(CoreError::ConfigError(
                "analysis.min_condition_group must be at least 2".into(),
            ));
        }
        if self.output.prefix.trim().is_empty() {
            return Err(CoreError::ConfigError("output.prefix must not be empty".into()));
        }
        if self.output.prefix.contains(['/', '\\']) {
            return Err(CoreError::ConfigError(format!(
                "output.prefix must not contain path separators: {}",
                self.output.prefix
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(CoreError::ConfigError(format!(
                "logging.level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.logging.level
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(CoreError::ConfigError(format!(
                "logging.format must be one of {:?}, got '{}'",
                LOG_FORMATS, self.logging.format
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Cells listed at each end of the genre x context ranking.
    #[serde(default = "default_interaction_top_k")]
    pub interaction_top_k: usize,
    /// Smallest group for a named-condition t-test.
    #[serde(default = "default_min_condition_group")]
    pub min_condition_group: usize,
}

fn default_interaction_top_k() -> usize {
    crate::interaction::DEFAULT_INTERACTION_TOP_K
}

fn default_min_condition_group() -> usize {
    crate::compare::MIN_CONDITION_GROUP
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            interaction_top_k: default_interaction_top_k(),
            min_condition_group: default_min_condition_group(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// File name prefix, conventionally the backend name.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_true")]
    pub write_csv: bool,
    #[serde(default = "default_true")]
    pub write_json: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_prefix() -> String {
    "TFIDF".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            prefix: default_prefix(),
            write_csv: true,
            write_json: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.interaction_top_k, 5);
        assert_eq!(config.analysis.min_condition_group, 2);
        assert_eq!(config.output.dir, PathBuf::from("results"));
        assert_eq!(config.output.prefix, "TFIDF");
        assert!(config.output.write_csv && config.output.write_json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validation_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_fails_zero_top_k() {
        let mut config = AppConfig::default();
        config.analysis.interaction_top_k = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interaction_top_k"));
    }

    #[test]
    fn test_validation_fails_bad_prefix_and_level() {
        let mut config = AppConfig::default();
        config.output.prefix = "a/b".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "loud".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.analysis.min_condition_group = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.output.prefix = "W2V".into();
        config.analysis.interaction_top_k = 3;
        let text = config.to_toml_string().unwrap();
        let parsed = AppConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("[output]\nprefix = \"BERT\"\n").unwrap();
        assert_eq!(config.output.prefix, "BERT");
        assert_eq!(config.output.dir, PathBuf::from("results"));
        assert_eq!(config.analysis.interaction_top_k, 5);
    }

    #[test]
    #[serial]
    fn test_load_layers_file_and_env() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[output]\nprefix = \"W2V\"\n\n[analysis]\ninteraction_top_k = 3").unwrap();

        std::env::set_var("FRAMED_LISTENING__ANALYSIS__INTERACTION_TOP_K", "7");
        let config = AppConfig::load(Some(file.path()));
        std::env::remove_var("FRAMED_LISTENING__ANALYSIS__INTERACTION_TOP_K");

        let config = config.unwrap();
        assert_eq!(config.output.prefix, "W2V");
        assert_eq!(config.analysis.interaction_top_k, 7);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    #[serial]
    fn test_load_missing_file_fails() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/framed.toml"))).unwrap_err();
        assert!(matches!(err, CoreError::ConfigError(_)));
    }

    #[test]
    #[serial]
    fn test_load_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
