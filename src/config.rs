//! Configuration module for `gpa-planner`

use crate::core::trajectory::Requirements;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory inside path values
const DIR_VARIABLE: &str = "$GPA_PLANNER";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for JSON transcript snapshots
    #[serde(default)]
    pub exports_dir: String,
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Degree credit requirements used by trajectory evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementsConfig {
    /// Credits required to graduate
    #[serde(default)]
    pub total_credits: f64,
    /// Foundation credits required
    #[serde(default)]
    pub foundation_credits: f64,
    /// Co-curricular credits required
    #[serde(default)]
    pub co_curricular_credits: f64,
    /// Major credits required
    #[serde(default)]
    pub major_credits: f64,
}

impl From<RequirementsConfig> for Requirements {
    fn from(config: RequirementsConfig) -> Self {
        Self {
            total_credits: config.total_credits,
            foundation_credits: config.foundation_credits,
            co_curricular_credits: config.co_curricular_credits,
            major_credits: config.major_credits,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Credit requirements
    #[serde(default)]
    pub requirements: RequirementsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override snapshot output directory
    pub exports_dir: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

/// Fill `value` from `default` when unset; true if it changed.
fn merge_string(value: &mut String, default: &str) -> bool {
    if value.is_empty() && !default.is_empty() {
        default.clone_into(value);
        true
    } else {
        false
    }
}

/// Fill `value` from `default` when unset (zero); true if it changed.
fn merge_credits(value: &mut f64, default: f64) -> bool {
    if *value <= 0.0 && default > 0.0 {
        *value = default;
        true
    } else {
        false
    }
}

fn parse_credits(key: &str, value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(credits) if credits.is_finite() && credits >= 0.0 => Ok(credits),
        _ => Err(format!("Invalid credit value for '{key}': '{value}'")),
    }
}

impl Config {
    /// Get the `$GPA_PLANNER` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gpaplanner`
    /// - macOS: `~/Library/Application Support/gpaplanner`
    /// - Windows: `%APPDATA%\gpaplanner`
    #[must_use]
    pub fn get_gpaplanner_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gpaplanner")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used on load so that fields added in newer versions pick up their
    /// default values. Only fields that are unset here and set in `defaults`
    /// are updated.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let results = [
            merge_string(&mut self.logging.level, &defaults.logging.level),
            merge_string(&mut self.logging.file, &defaults.logging.file),
            merge_string(&mut self.paths.exports_dir, &defaults.paths.exports_dir),
            merge_string(&mut self.paths.reports_dir, &defaults.paths.reports_dir),
            merge_credits(
                &mut self.requirements.total_credits,
                defaults.requirements.total_credits,
            ),
            merge_credits(
                &mut self.requirements.foundation_credits,
                defaults.requirements.foundation_credits,
            ),
            merge_credits(
                &mut self.requirements.co_curricular_credits,
                defaults.requirements.co_curricular_credits,
            ),
            merge_credits(
                &mut self.requirements.major_credits,
                defaults.requirements.major_credits,
            ),
        ];
        results.contains(&true)
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Command-line arguments override file values for this run only; the
    /// config file is not touched. Only non-`None` overrides apply.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let mut config = Config::load();
    /// let overrides = ConfigOverrides {
    ///     level: Some("debug".to_string()),
    ///     ..Default::default()
    /// };
    /// config.apply_overrides(&overrides);
    /// ```
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file = Self::expand_variables(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(exports_dir) = &overrides.exports_dir {
            self.paths.exports_dir = Self::expand_variables(exports_dir);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir = Self::expand_variables(reports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, in
    /// the directory returned by [`get_gpaplanner_dir`].
    ///
    /// [`get_gpaplanner_dir`]: Self::get_gpaplanner_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gpaplanner_dir().join(CONFIG_FILE_NAME)
    }

    /// Replace `$GPA_PLANNER` in `value` with the config directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_gpaplanner_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults (empty strings, false, zero).
    /// `$GPA_PLANNER` is expanded in every path value.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.exports_dir = Self::expand_variables(&config.paths.exports_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary, so this only fails on a broken build.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: load it, merge in missing default fields,
    ///   and save it back when anything was added.
    /// - On first run: create the config directory and save the defaults.
    ///
    /// Falls back to defaults if the file exists but cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            match fs::read_to_string(&config_file).map(|content| Self::from_toml(&content)) {
                Ok(Ok(mut config)) => {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
                Ok(Err(e)) => logger::warn!("Ignoring malformed config file: {e}"),
                Err(e) => logger::warn!("Could not read config file: {e}"),
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Credit requirements in the form trajectory evaluation takes
    #[must_use]
    pub fn requirements(&self) -> Requirements {
        self.requirements.into()
    }

    /// Get a configuration value by key
    ///
    /// Supported keys:
    /// - `level`, `file`, `verbose`
    /// - `exports_dir`, `reports_dir`
    /// - `total_credits`, `foundation_credits`, `co_curricular_credits`, `major_credits`
    ///
    /// Dashed spellings (`exports-dir`) are accepted as well.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "exports_dir" | "exports-dir" => Some(self.paths.exports_dir.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "total_credits" | "total-credits" => Some(self.requirements.total_credits.to_string()),
            "foundation_credits" | "foundation-credits" => {
                Some(self.requirements.foundation_credits.to_string())
            }
            "co_curricular_credits" | "co-curricular-credits" => {
                Some(self.requirements.co_curricular_credits.to_string())
            }
            "major_credits" | "major-credits" => Some(self.requirements.major_credits.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config. Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or the value does not
    /// parse (`verbose` takes `true`/`false`, credit keys a non-negative number).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = Self::expand_variables(value),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "exports_dir" | "exports-dir" => self.paths.exports_dir = Self::expand_variables(value),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = Self::expand_variables(value),
            "total_credits" | "total-credits" => {
                self.requirements.total_credits = parse_credits(key, value)?;
            }
            "foundation_credits" | "foundation-credits" => {
                self.requirements.foundation_credits = parse_credits(key, value)?;
            }
            "co_curricular_credits" | "co-curricular-credits" => {
                self.requirements.co_curricular_credits = parse_credits(key, value)?;
            }
            "major_credits" | "major-credits" => {
                self.requirements.major_credits = parse_credits(key, value)?;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to the value in `defaults`)
    ///
    /// Updates the in-memory config. Call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "exports_dir" | "exports-dir" => self
                .paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "total_credits" | "total-credits" => {
                self.requirements.total_credits = defaults.requirements.total_credits;
            }
            "foundation_credits" | "foundation-credits" => {
                self.requirements.foundation_credits = defaults.requirements.foundation_credits;
            }
            "co_curricular_credits" | "co-curricular-credits" => {
                self.requirements.co_curricular_credits =
                    defaults.requirements.co_curricular_credits;
            }
            "major_credits" | "major-credits" => {
                self.requirements.major_credits = defaults.requirements.major_credits;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if there is no file.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  exports_dir = \"{}\"", self.paths.exports_dir)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[requirements]")?;
        writeln!(f, "  total_credits = {}", self.requirements.total_credits)?;
        writeln!(f, "  foundation_credits = {}", self.requirements.foundation_credits)?;
        writeln!(
            f,
            "  co_curricular_credits = {}",
            self.requirements.co_curricular_credits
        )?;
        writeln!(f, "  major_credits = {}", self.requirements.major_credits)?;

        Ok(())
    }
}
