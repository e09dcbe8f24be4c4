//! CLI configuration utilities

use anyhow::Result;
use blackhole_http::ClientConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `BLACKHOLE_CLIENT__BASE_URL`
pub const ENV_PREFIX: &str = "BLACKHOLE";

/// Everything the binary needs besides its command-line arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// API connection settings
    pub client: ClientConfig,

    /// Where the persisted session lives
    pub state_dir: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            state_dir: default_state_dir(),
        }
    }
}

impl CliConfig {
    /// Load configuration: defaults, then the config file, then environment
    ///
    /// An explicitly named file must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        match path {
            Some(path) => builder = builder.add_source(File::from(path)),
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// File holding the persisted token and user
    pub fn session_path(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }
}

pub fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("blackhole")
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("blackhole")
        .join("config.toml")
}

/// Save configuration to a TOML file
pub fn save_config<P: AsRef<Path>>(config: &CliConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Generate a default configuration file
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    save_config(&CliConfig::default(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn generated_file_loads_back_as_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        generate_default_config(&path).unwrap();
        let loaded = CliConfig::load(Some(&path)).unwrap();

        assert_eq!(loaded.client.timeout_secs, ClientConfig::DEFAULT_TIMEOUT_SECS);
        assert_eq!(loaded.state_dir, default_state_dir());
    }

    #[test]
    fn file_overrides_only_what_it_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "state_dir = \"/tmp/blackhole-state\"\n\n[client]\nbase_url = \"http://localhost:5000/api\"\n",
        )
        .unwrap();

        let loaded = CliConfig::load(Some(&path)).unwrap();

        assert_eq!(loaded.client.base_url, "http://localhost:5000/api");
        assert_eq!(loaded.client.timeout_secs, ClientConfig::DEFAULT_TIMEOUT_SECS);
        assert_eq!(loaded.state_dir, PathBuf::from("/tmp/blackhole-state"));
        assert_eq!(
            loaded.session_path(),
            PathBuf::from("/tmp/blackhole-state/session.json")
        );
    }

    #[test]
    fn named_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(CliConfig::load(Some(&missing)).is_err());
    }
}
