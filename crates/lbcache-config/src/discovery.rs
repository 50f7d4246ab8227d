//! Config file discovery.
//!
//! Resolution order:
//! 1. An explicit path (`--config`), which must exist
//! 2. `$LBCACHE_CONFIG_DIR/config.toml`
//! 3. `<platform config dir>/lbcache/config.toml`
//!
//! A missing discovered file is not an error; defaults apply.

use std::path::{Path, PathBuf};

use crate::{ConfigError, LbCacheConfig, Result};

/// Config filename within the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application name for platform directory resolution.
const APP_NAME: &str = "lbcache";

/// Environment variable to override the config directory.
pub const CONFIG_DIR_ENV: &str = "LBCACHE_CONFIG_DIR";

/// Where a config file was looked for.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSource {
    /// Path to the config file.
    pub path: PathBuf,
    /// Whether the file was found and loaded.
    pub loaded: bool,
}

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration, defaults filled in.
    pub config: LbCacheConfig,
    /// The file that was checked, if any location could be determined.
    pub source: Option<ConfigSource>,
}

impl LoadedConfig {
    /// Path of the file that was actually loaded.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.source
            .as_ref()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
    }
}

/// Load configuration, from `explicit` if given, otherwise from the
/// discovered default location.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(explicit, None)
}

/// Load configuration with explicit control over the config directory.
///
/// `config_dir` overrides both `LBCACHE_CONFIG_DIR` and the platform default.
pub fn load_config_with_options(
    explicit: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_config_file(path)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        return Ok(LoadedConfig {
            config,
            source: Some(ConfigSource {
                path: path.to_path_buf(),
                loaded: true,
            }),
        });
    }

    let path = match config_dir {
        Some(dir) => Some(dir.join(CONFIG_FILE)),
        None => config_path(),
    };

    let Some(path) = path else {
        tracing::debug!("No config directory available, using defaults");
        return Ok(LoadedConfig {
            config: LbCacheConfig::default(),
            source: None,
        });
    };

    if !path.is_file() {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        return Ok(LoadedConfig {
            config: LbCacheConfig::default(),
            source: Some(ConfigSource {
                path,
                loaded: false,
            }),
        });
    }

    let config = load_config_file(&path)?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(LoadedConfig {
        config,
        source: Some(ConfigSource { path, loaded: true }),
    })
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<LbCacheConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    LbCacheConfig::from_toml(&contents)
}

/// Save configuration to a file, creating parent directories.
pub fn save_config(config: &LbCacheConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_toml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Default config file path.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CONFIG_FILE))
}

/// Config directory: `LBCACHE_CONFIG_DIR` if set, otherwise the platform default.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_path_shape() {
        if let Some(p) = config_path() {
            assert!(p.ends_with(CONFIG_FILE));
        }
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[store]
url = "memory://"
"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.store.url, "memory://");
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "this is not valid toml {{{{").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_explicit_path_wins_over_config_dir() {
        let config_dir = TempDir::new().unwrap();
        fs::write(
            config_dir.path().join(CONFIG_FILE),
            "[cache]\nnamespace = \"from-dir\"\n",
        )
        .unwrap();

        let other = TempDir::new().unwrap();
        let explicit = other.path().join("custom.toml");
        fs::write(&explicit, "[cache]\nnamespace = \"explicit\"\n").unwrap();

        let loaded = load_config_with_options(Some(&explicit), Some(config_dir.path())).unwrap();
        assert_eq!(loaded.config.cache.namespace, "explicit");
        assert_eq!(loaded.loaded_from(), Some(explicit.as_path()));
    }

    #[test]
    fn test_discovered_file_loaded() {
        let config_dir = TempDir::new().unwrap();
        fs::write(
            config_dir.path().join(CONFIG_FILE),
            "[cache]\nrefresh_window_secs = 10\n",
        )
        .unwrap();

        let loaded = load_config_with_options(None, Some(config_dir.path())).unwrap();
        assert_eq!(loaded.config.cache.refresh_window_secs, 10);
        assert!(loaded.loaded_from().is_some());
    }

    #[test]
    fn test_no_file_gives_defaults() {
        let empty = TempDir::new().unwrap();
        let loaded = load_config_with_options(None, Some(empty.path())).unwrap();
        assert_eq!(loaded.config, LbCacheConfig::default());
        assert!(loaded.loaded_from().is_none());
        assert_eq!(
            loaded.source,
            Some(ConfigSource {
                path: empty.path().join(CONFIG_FILE),
                loaded: false,
            })
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = LbCacheConfig::default();
        config.cache.namespace = "saved".to_string();
        save_config(&config, &path).unwrap();

        assert_eq!(load_config_file(&path).unwrap(), config);
    }
}
