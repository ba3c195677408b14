//! Global configuration model for the Dockwarden control plane.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WardenError};

/// Root configuration for the control plane.
///
/// Every field has a default, so a configuration file only needs to name
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// Path to the JSON store holding users, roles, and build memory.
    pub state_file: PathBuf,
    /// Address the HTTP binding listens on.
    pub listen: SocketAddr,
    /// Explicit path to the `docker` binary; discovered on `PATH` when unset.
    pub docker_binary: Option<PathBuf>,
    /// Number of trailing log lines returned by the log views.
    pub log_tail_lines: usize,
    /// Credential given to the bootstrap admin when it is first created.
    pub bootstrap_credential: String,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            state_file: crate::constants::default_state_file(),
            listen: SocketAddr::from(([127, 0, 0, 1], crate::constants::DEFAULT_LISTEN_PORT)),
            docker_binary: None,
            log_tail_lines: crate::constants::DEFAULT_LOG_TAIL_LINES,
            bootstrap_credential: crate::constants::DEFAULT_BOOTSTRAP_CREDENTIAL.to_string(),
        }
    }
}

impl WardenConfig {
    /// Loads a configuration from a TOML file, filling unset fields with
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WardenError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this model.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.log_tail_lines == 0 {
            return Err(WardenError::Config {
                message: "log_tail_lines must be at least 1".into(),
            });
        }
        if self.bootstrap_credential.chars().count() < crate::constants::CREDENTIAL_MIN_LEN {
            return Err(WardenError::Config {
                message: format!(
                    "bootstrap_credential must be at least {} characters",
                    crate::constants::CREDENTIAL_MIN_LEN
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = WardenConfig::default();
        assert_eq!(config.log_tail_lines, 50);
        assert_eq!(config.bootstrap_credential, "admin123");
        config.validate().expect("default config validates");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = WardenConfig::from_toml(
            r#"
listen = "0.0.0.0:9000"
log_tail_lines = 100
"#,
        )
        .expect("parse");
        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.log_tail_lines, 100);
        assert!(config.docker_binary.is_none());
    }

    #[test]
    fn zero_tail_lines_rejected() {
        let config = WardenConfig {
            log_tail_lines: 0,
            ..WardenConfig::default()
        };
        assert!(matches!(config.validate(), Err(WardenError::Config { .. })));
    }

    #[test]
    fn short_bootstrap_credential_rejected() {
        let config = WardenConfig {
            bootstrap_credential: "abc".into(),
            ..WardenConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dockwarden.toml");
        std::fs::write(&path, "state_file = \"/tmp/dw.json\"\n").expect("write");
        let config = WardenConfig::load(&path).expect("load");
        assert_eq!(config.state_file, PathBuf::from("/tmp/dw.json"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = WardenConfig::load(Path::new("/nonexistent/dockwarden.toml")).unwrap_err();
        assert!(matches!(err, WardenError::Io { .. }));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = WardenConfig::from_toml("listen = 12").unwrap_err();
        assert!(matches!(err, WardenError::TomlParse { .. }));
    }
}
