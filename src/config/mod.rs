//! Compiler settings and their YAML persistence.
//!
//! [`CompilerSettings`] is the read-only snapshot every core call receives.
//! It is owned by the host layer; [`ConfigManager`] gives a file-backed host
//! (such as the CLI) a place to keep it. Editing settings through any surface
//! must be followed by a resolver cache invalidation.

pub mod validation;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Default timeout for one compiler run, in seconds.
pub const DEFAULT_COMPILE_TIMEOUT: u64 = 30;

/// Settings controlling how the UI compiler is located and run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerSettings {
    /// Root of a virtual-environment install layout. Empty skips the
    /// venv search tier.
    #[serde(rename = "Virtual Environment", default = "default_venv_path")]
    pub virtual_environment_path: String,

    /// Explicit compiler executable override. Empty means auto-detect.
    #[serde(rename = "UIC Path", default)]
    pub uic_path: String,

    /// Custom glob/regex pattern for UI files. Empty uses the `.ui`
    /// extension check.
    #[serde(rename = "UI File Pattern", default)]
    pub ui_file_pattern: String,

    /// Output path pattern. Empty writes next to the input file.
    #[serde(rename = "Output Path", default)]
    pub output_path: String,

    /// Whether the host should compile on save. Checked by the host layer
    /// only, never by the core.
    #[serde(rename = "Auto Compile", default = "default_true")]
    pub auto_compile_enabled: bool,

    /// Resolve the venv and override paths relative to the project root.
    #[serde(rename = "Relative Paths", default = "default_true")]
    pub use_relative_paths: bool,

    /// Timeout for one compiler run, in seconds.
    #[serde(rename = "Compile Timeout", default = "default_compile_timeout")]
    pub compile_timeout: u64,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            virtual_environment_path: default_venv_path(),
            uic_path: String::new(),
            ui_file_pattern: String::new(),
            output_path: String::new(),
            auto_compile_enabled: true,
            use_relative_paths: true,
            compile_timeout: DEFAULT_COMPILE_TIMEOUT,
        }
    }
}

impl CompilerSettings {
    /// Compile timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.compile_timeout)
    }
}

fn default_venv_path() -> String {
    ".venv".to_string()
}

fn default_true() -> bool {
    true
}

fn default_compile_timeout() -> u64 {
    DEFAULT_COMPILE_TIMEOUT
}

/// Loads and saves the settings file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a manager rooted at `config_dir`, creating the directory if
    /// needed.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join("uicompile.yaml"),
            config_dir,
        })
    }

    /// Load settings, falling back to defaults when the file is absent.
    pub fn load_settings(&self) -> Result<CompilerSettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
            return Ok(CompilerSettings::default());
        }

        let file_contents = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: CompilerSettings = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    /// Save settings to the settings file.
    pub fn save_settings(&self, settings: &CompilerSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_settings_defaults() {
        let settings = CompilerSettings::default();
        assert_eq!(settings.virtual_environment_path, ".venv");
        assert!(settings.uic_path.is_empty());
        assert!(settings.auto_compile_enabled);
        assert!(settings.use_relative_paths);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        let settings = manager.load_settings().unwrap();
        assert_eq!(settings, CompilerSettings::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (manager, _temp_dir) = create_test_config_manager();

        let settings = CompilerSettings {
            virtual_environment_path: "env".to_string(),
            uic_path: "tools/pyuic6".to_string(),
            ui_file_pattern: "ui/**/*.ui".to_string(),
            output_path: "generated/$1.py".to_string(),
            auto_compile_enabled: false,
            use_relative_paths: false,
            compile_timeout: 120,
        };
        manager.save_settings(&settings).unwrap();

        let loaded = manager.load_settings().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(
            manager.config_dir().join("uicompile.yaml"),
            "UIC Path: /opt/pyuic6\n",
        )
        .unwrap();

        let loaded = manager.load_settings().unwrap();
        assert_eq!(loaded.uic_path, "/opt/pyuic6");
        assert_eq!(loaded.virtual_environment_path, ".venv");
        assert_eq!(loaded.compile_timeout, DEFAULT_COMPILE_TIMEOUT);
    }
}
