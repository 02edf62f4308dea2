//! Configuration management for till.
//!
//! Loads configuration from ${TILL_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::routing::Routes;
use crate::validation::ValidationPolicy;

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, run `cargo run -p xtask`.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for till configuration and data directories.
    //!
    //! TILL_HOME resolution order:
    //! 1. TILL_HOME environment variable (if set)
    //! 2. ~/.config/till (default)
    //! 3. ./.till when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the till home directory.
    pub fn till_home() -> PathBuf {
        if let Ok(home) = std::env::var("TILL_HOME")
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".till"),
            |h| h.join(".config").join("till"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        till_home().join("config.toml")
    }

    /// Returns the directory rolling log files are written to.
    pub fn logs_dir() -> PathBuf {
        till_home().join("logs")
    }
}

/// Authentication backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Base URL of the auth API (overridden by `TILL_AUTH_URL`).
    pub base_url: Option<String>,
    /// Request timeout in seconds (0 disables).
    pub timeout_secs: u32,
}

impl AuthConfig {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
    pub const BASE_URL_ENV: &str = "TILL_AUTH_URL";
    const DEFAULT_TIMEOUT_SECS: u32 = 15;

    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.timeout_secs)))
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Delays used to stagger the login screen's transitions.
///
/// Each value matches the length of the visual transition it waits for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Role selection → login panel.
    pub phase_transition_ms: u64,
    /// Panel container → decorative line.
    pub line_reveal_ms: u64,
    /// Overlay mount → overlay slide-in.
    pub overlay_mount_ms: u64,
    /// Slide-out of the password reset overlays.
    pub overlay_exit_ms: u64,
    /// Slide-out of the "forgot PIN" notice.
    pub pin_notice_exit_ms: u64,
    /// How long the previous sheet stays mounted when one overlay replaces another.
    pub overlay_swap_ms: u64,
}

impl Timings {
    pub fn phase_transition(&self) -> Duration {
        Duration::from_millis(self.phase_transition_ms)
    }

    pub fn line_reveal(&self) -> Duration {
        Duration::from_millis(self.line_reveal_ms)
    }

    pub fn overlay_mount(&self) -> Duration {
        Duration::from_millis(self.overlay_mount_ms)
    }

    pub fn overlay_exit(&self) -> Duration {
        Duration::from_millis(self.overlay_exit_ms)
    }

    pub fn pin_notice_exit(&self) -> Duration {
        Duration::from_millis(self.pin_notice_exit_ms)
    }

    pub fn overlay_swap(&self) -> Duration {
        Duration::from_millis(self.overlay_swap_ms)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            phase_transition_ms: 900,
            line_reveal_ms: 200,
            overlay_mount_ms: 100,
            overlay_exit_ms: 500,
            pin_notice_exit_ms: 300,
            overlay_swap_ms: 1000,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Auth backend connection settings.
    pub auth: AuthConfig,

    /// Transition delays for the login sequencer.
    pub timings: Timings,

    /// Post-login destinations by role.
    pub routes: Routes,

    /// Local form validation rules.
    pub validation: ValidationPolicy,
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Used by `xtask update-default-config` to keep `default_config.toml`
    /// in sync with the defaults above. Comments come from the embedded
    /// template, values from `Config::default()`.
    pub fn generate() -> Result<String> {
        use toml_edit::DocumentMut;

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        merge_items(doc.as_table_mut(), generated_doc.as_table());

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}
