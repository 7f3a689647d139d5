//! Configuration system: TOML file + env var overrides + defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{QtopError, Result};

/// Lowest accepted dashboard refresh interval.
pub const MIN_REFRESH_MS: u64 = 100;
/// Highest accepted dashboard refresh interval (one hour).
pub const MAX_REFRESH_MS: u64 = 3_600_000;
/// Smallest log file size worth rotating at.
pub const MIN_LOG_SIZE_BYTES: u64 = 4_096;

/// Full qtop configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub dashboard: DashboardConfig,
    pub source: SourceConfig,
    pub logging: LoggingConfig,
    /// Where this config was loaded from. Not part of the file itself.
    #[serde(skip)]
    pub config_file: PathBuf,
}

/// List view behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    pub refresh_ms: u64,
    /// Column id to sort by at start; the column set's default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<String>,
    /// Snap focus back to the first page when the user has scrolled away.
    pub follow_bottom: bool,
    pub no_color: bool,
}

/// Where snapshots come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    pub snapshot_file: PathBuf,
}

/// JSONL activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub jsonl_log: PathBuf,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_ms: 1_000,
            default_sort: None,
            follow_bottom: true,
            no_color: false,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            snapshot_file: data_dir().join("plancache.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jsonl_log: data_dir().join("activity.jsonl"),
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[QTOP-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("qtop")
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        home_dir().join(".config").join("qtop").join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from the default path;
    /// defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, env_var)
    }

    /// [`Config::load`] with an injectable environment lookup.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| QtopError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if path.is_some() {
            return Err(QtopError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.config_file = path_buf;
        cfg.apply_env_overrides_from(lookup)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Deterministic hash of the effective config for the activity log.
    ///
    /// FNV-1a over canonical JSON, stable across processes and releases.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    /// Effective config rendered as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // dashboard
        set_u64(&mut lookup, "QTOP_REFRESH_MS", &mut self.dashboard.refresh_ms)?;
        if let Some(raw) = lookup("QTOP_DEFAULT_SORT") {
            self.dashboard.default_sort = Some(raw.trim().to_string());
        }
        set_bool(
            &mut lookup,
            "QTOP_FOLLOW_BOTTOM",
            &mut self.dashboard.follow_bottom,
        )?;
        set_bool(&mut lookup, "QTOP_NO_COLOR", &mut self.dashboard.no_color)?;

        // source
        if let Some(raw) = lookup("QTOP_SNAPSHOT_FILE") {
            self.source.snapshot_file = PathBuf::from(raw);
        }

        // logging
        set_bool(&mut lookup, "QTOP_LOG_ENABLED", &mut self.logging.enabled)?;
        if let Some(raw) = lookup("QTOP_JSONL_LOG") {
            self.logging.jsonl_log = PathBuf::from(raw);
        }
        set_u64(
            &mut lookup,
            "QTOP_LOG_MAX_SIZE_BYTES",
            &mut self.logging.max_size_bytes,
        )?;
        if let Some(raw) = lookup("QTOP_LOG_MAX_ROTATED_FILES") {
            self.logging.max_rotated_files =
                raw.parse::<u32>().map_err(|error| QtopError::ConfigParse {
                    context: "env",
                    details: format!("QTOP_LOG_MAX_ROTATED_FILES={raw:?}: {error}"),
                })?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let refresh = self.dashboard.refresh_ms;
        if !(MIN_REFRESH_MS..=MAX_REFRESH_MS).contains(&refresh) {
            return Err(QtopError::InvalidConfig {
                details: format!(
                    "dashboard.refresh_ms must be in [{MIN_REFRESH_MS}, {MAX_REFRESH_MS}], got {refresh}"
                ),
            });
        }

        if let Some(column) = &self.dashboard.default_sort
            && column.trim().is_empty()
        {
            return Err(QtopError::InvalidConfig {
                details: "dashboard.default_sort must not be empty when set".to_string(),
            });
        }

        if self.source.snapshot_file.as_os_str().is_empty() {
            return Err(QtopError::InvalidConfig {
                details: "source.snapshot_file must not be empty".to_string(),
            });
        }

        if self.logging.enabled {
            if self.logging.jsonl_log.as_os_str().is_empty() {
                return Err(QtopError::InvalidConfig {
                    details: "logging.jsonl_log must not be empty when logging is enabled"
                        .to_string(),
                });
            }
            if self.logging.max_size_bytes < MIN_LOG_SIZE_BYTES {
                return Err(QtopError::InvalidConfig {
                    details: format!(
                        "logging.max_size_bytes must be at least {MIN_LOG_SIZE_BYTES}, got {}",
                        self.logging.max_size_bytes
                    ),
                });
            }
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn set_u64<F>(lookup: &mut F, name: &str, slot: &mut u64) -> Result<()>
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(raw) = lookup(name) {
        *slot = raw.parse::<u64>().map_err(|error| QtopError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}

fn set_bool<F>(lookup: &mut F, name: &str, slot: &mut bool) -> Result<()>
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(raw) = lookup(name) {
        *slot = parse_bool(name, &raw)?;
    }
    Ok(())
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(QtopError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: expected a boolean"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, QtopError};
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    fn load_with(path: &Path, env: &HashMap<String, String>) -> Result<Config, QtopError> {
        Config::load_with_env(Some(path), |name| env.get(name).cloned())
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.dashboard.follow_bottom);
        assert!(cfg.logging.enabled);
    }

    #[test]
    fn refresh_below_floor_rejected() {
        let mut cfg = Config::default();
        cfg.dashboard.refresh_ms = 50;
        let err = cfg.validate().expect_err("expected invalid refresh");
        match err {
            QtopError::InvalidConfig { details } => assert!(details.contains("refresh_ms")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tiny_log_size_rejected_only_when_logging() {
        let mut cfg = Config::default();
        cfg.logging.max_size_bytes = 10;
        assert!(cfg.validate().is_err());
        cfg.logging.enabled = false;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn blank_default_sort_rejected() {
        let mut cfg = Config::default();
        cfg.dashboard.default_sort = Some("  ".to_string());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_reads_toml_and_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[dashboard]\nrefresh_ms = 250\ndefault_sort = \"memory\"\n\n[source]\nsnapshot_file = \"/srv/plancache.json\"\n",
        )
        .unwrap();

        let cfg = load_with(&path, &vars(&[])).unwrap();
        assert_eq!(cfg.dashboard.refresh_ms, 250);
        assert_eq!(cfg.dashboard.default_sort.as_deref(), Some("memory"));
        assert!(cfg.dashboard.follow_bottom);
        assert_eq!(cfg.source.snapshot_file, PathBuf::from("/srv/plancache.json"));
        assert_eq!(cfg.config_file, path);
    }

    #[test]
    fn env_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[dashboard]\nrefresh_ms = 250\n").unwrap();

        let env = vars(&[
            ("QTOP_REFRESH_MS", "500"),
            ("QTOP_FOLLOW_BOTTOM", "off"),
            ("QTOP_SNAPSHOT_FILE", "/tmp/snap.json"),
            ("QTOP_LOG_ENABLED", "false"),
            ("QTOP_LOG_MAX_ROTATED_FILES", "7"),
        ]);
        let cfg = load_with(&path, &env).unwrap();
        assert_eq!(cfg.dashboard.refresh_ms, 500);
        assert!(!cfg.dashboard.follow_bottom);
        assert_eq!(cfg.source.snapshot_file, PathBuf::from("/tmp/snap.json"));
        assert!(!cfg.logging.enabled);
        assert_eq!(cfg.logging.max_rotated_files, 7);
    }

    #[test]
    fn env_invalid_number_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();
        let err = load_with(&path, &vars(&[("QTOP_REFRESH_MS", "soon")])).unwrap_err();
        assert!(matches!(err, QtopError::ConfigParse { context: "env", .. }));
    }

    #[test]
    fn env_invalid_boolean_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();
        let err = load_with(&path, &vars(&[("QTOP_NO_COLOR", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("QTOP_NO_COLOR"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[dashboard\nrefresh_ms = ").unwrap();
        let err = load_with(&path, &vars(&[])).unwrap_err();
        assert_eq!(err.code(), "QTOP-1003");
    }

    #[test]
    fn load_returns_error_for_explicit_missing_path() {
        let result = Config::load(Some(Path::new("/nonexistent/qtop/config.toml")));
        assert!(matches!(result, Err(QtopError::MissingConfig { .. })));
    }

    #[test]
    fn toml_output_round_trips() {
        let mut cfg = Config::default();
        cfg.dashboard.default_sort = Some("rows".to_string());
        let text = cfg.to_toml().unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.dashboard, cfg.dashboard);
        assert_eq!(back.logging, cfg.logging);
    }

    #[test]
    fn stable_hash_deterministic_and_sensitive() {
        let cfg = Config::default();
        assert_eq!(cfg.stable_hash().unwrap(), cfg.stable_hash().unwrap());
        let mut modified = Config::default();
        modified.dashboard.refresh_ms += 1;
        assert_ne!(cfg.stable_hash().unwrap(), modified.stable_hash().unwrap());
    }
}
