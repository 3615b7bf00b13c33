//! Persisted user preferences.
//!
//! Preferences live in a small JSON file:
//!
//! ```json
//! {
//!   "format": "standard",
//!   "max_search_results": 10
//! }
//! ```
//!
//! A value is looked up in three layers: command-line override, config file,
//! built-in default. [`Config::get_with_source`] reports which layer won.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dblp::BibFormat;

/// Directory name under the user config directory.
pub const APP_NAME: &str = "bibtex-dblp";

/// Config file name inside the application directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Format used when neither command line nor config file set one.
pub const DEFAULT_FORMAT: BibFormat = BibFormat::Condensed;

/// Search result limit used when neither command line nor config file set one.
pub const DEFAULT_MAX_SEARCH_RESULTS: u32 = 30;

/// Errors from loading, editing or saving the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config path was given and none could be derived from the environment
    #[error("cannot locate config directory\n  Suggestion: Set HOME or XDG_CONFIG_HOME, or pass --config-file")]
    NoConfigPath,

    /// The config file exists but could not be read
    #[error("failed to read config file '{path}': {reason}")]
    Read { path: PathBuf, reason: String },

    /// The config file is not a JSON object
    #[error("failed to parse config file '{path}': {reason}\n  Suggestion: Fix or delete the file")]
    Parse { path: PathBuf, reason: String },

    /// The config file could not be written
    #[error("failed to write config file '{path}': {reason}")]
    Write { path: PathBuf, reason: String },

    /// A key other than the known ones was used
    #[error("configuration key '{key}' is unknown\n  Suggestion: Known keys are {known}")]
    UnknownKey { key: String, known: String },

    /// A value does not fit its key
    #[error("configuration key '{key}' cannot be set to '{value}'\n  Suggestion: Expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

/// The configurable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Format,
    MaxSearchResults,
}

impl ConfigKey {
    pub const ALL: [Self; 2] = [Self::Format, Self::MaxSearchResults];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Format => "format",
            Self::MaxSearchResults => "max_search_results",
        }
    }

    fn known_keys() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey {
                key: s.to_string(),
                known: Self::known_keys(),
            })
    }
}

/// Where an effective value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    CommandLine,
    ConfigFile(PathBuf),
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandLine => f.write_str("command line"),
            Self::ConfigFile(path) => write!(f, "config file {}", path.display()),
            Self::Default => f.write_str("default setting"),
        }
    }
}

/// One layer of settings; unset values fall through to the next layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub format: Option<BibFormat>,
    pub max_search_results: Option<u32>,
}

impl Settings {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.format.is_none() && self.max_search_results.is_none()
    }

    fn value_of(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::Format => self.format.map(|format| format.to_string()),
            ConfigKey::MaxSearchResults => self.max_search_results.map(|n| n.to_string()),
        }
    }

    fn to_json(self) -> Value {
        let mut map = Map::new();
        if let Some(format) = self.format {
            map.insert(ConfigKey::Format.to_string(), Value::from(format.as_str()));
        }
        if let Some(max) = self.max_search_results {
            map.insert(ConfigKey::MaxSearchResults.to_string(), Value::from(max));
        }
        Value::Object(map)
    }
}

/// Layered configuration backed by a JSON file.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    file: Settings,
    command_line: Settings,
}

impl Config {
    /// Loads the config from `path`, or from the default location when `None`.
    ///
    /// A missing file is not an error and yields an empty file layer.
    /// Unknown keys in the file are logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when no path can be determined, the file cannot
    /// be read, or it holds invalid JSON or values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => resolve_default_config_path().ok_or(ConfigError::NoConfigPath)?,
        };
        debug!(path = %path.display(), "Loading config");

        let file = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|error| ConfigError::Read {
                path: path.clone(),
                reason: error.to_string(),
            })?;
            parse_config_str(&raw, &path)?
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Settings::default()
        };
        debug!(?file, "Loaded configuration");

        Ok(Self {
            path,
            file,
            command_line: Settings::default(),
        })
    }

    /// Path of the backing file (it may not exist yet).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Values stored in the config file.
    #[must_use]
    pub fn file_settings(&self) -> &Settings {
        &self.file
    }

    /// Replaces the command-line layer.
    pub fn set_command_line(&mut self, settings: Settings) {
        self.command_line = settings;
    }

    /// Effective output format.
    #[must_use]
    pub fn format(&self) -> BibFormat {
        self.command_line
            .format
            .or(self.file.format)
            .unwrap_or(DEFAULT_FORMAT)
    }

    /// Effective search result limit.
    #[must_use]
    pub fn max_search_results(&self) -> u32 {
        self.command_line
            .max_search_results
            .or(self.file.max_search_results)
            .unwrap_or(DEFAULT_MAX_SEARCH_RESULTS)
    }

    /// Effective value of `key` and the layer that supplied it.
    #[must_use]
    pub fn get_with_source(&self, key: ConfigKey) -> (String, ValueSource) {
        if let Some(value) = self.command_line.value_of(key) {
            return (value, ValueSource::CommandLine);
        }
        if let Some(value) = self.file.value_of(key) {
            return (value, ValueSource::ConfigFile(self.path.clone()));
        }
        let default = match key {
            ConfigKey::Format => DEFAULT_FORMAT.to_string(),
            ConfigKey::MaxSearchResults => DEFAULT_MAX_SEARCH_RESULTS.to_string(),
        };
        (default, ValueSource::Default)
    }

    /// Sets `key` to `value` in the file layer (call [`Config::save`] to persist).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] or [`ConfigError::InvalidValue`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key.parse::<ConfigKey>()? {
            ConfigKey::Format => self.file.format = Some(parse_format(value)?),
            ConfigKey::MaxSearchResults => {
                self.file.max_search_results = Some(parse_max_results(value)?);
            }
        }
        Ok(())
    }

    /// Removes `key` from the file layer (call [`Config::save`] to persist).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`].
    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key.parse::<ConfigKey>()? {
            ConfigKey::Format => self.file.format = None,
            ConfigKey::MaxSearchResults => self.file.max_search_results = None,
        }
        Ok(())
    }

    /// The file layer rendered as pretty JSON.
    #[must_use]
    pub fn file_json_pretty(&self) -> String {
        let value = self.file.to_json();
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }

    /// Writes the file layer to [`Config::path`], creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Write`] when the directory or file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let write_error = |error: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            reason: error.to_string(),
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(&self.path, self.file_json_pretty()).map_err(write_error)?;
        info!(path = %self.path.display(), "Successfully wrote configuration");
        Ok(())
    }
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/bibtex-dblp/config.json`
/// 2. `$HOME/.config/bibtex-dblp/config.json`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(APP_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_NAME)
            .join(CONFIG_FILE_NAME),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

fn parse_config_str(raw: &str, path: &Path) -> Result<Settings, ConfigError> {
    let parse_error = |reason: String| ConfigError::Parse {
        path: path.to_path_buf(),
        reason,
    };
    if raw.trim().is_empty() {
        return Ok(Settings::default());
    }
    let value: Value = serde_json::from_str(raw).map_err(|error| parse_error(error.to_string()))?;
    let Value::Object(map) = value else {
        return Err(parse_error("expected a JSON object".to_string()));
    };

    let mut settings = Settings::default();
    for (key, value) in map {
        // Values written by `config --set` may be strings or numbers.
        let text = match &value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        match key.parse::<ConfigKey>() {
            Ok(ConfigKey::Format) => settings.format = Some(parse_format(&text)?),
            Ok(ConfigKey::MaxSearchResults) => {
                settings.max_search_results = Some(parse_max_results(&text)?);
            }
            Err(_) => warn!(
                path = %path.display(),
                key = %key,
                known = %ConfigKey::known_keys(),
                "Ignoring unknown configuration key"
            ),
        }
    }
    Ok(settings)
}

fn parse_format(value: &str) -> Result<BibFormat, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: ConfigKey::Format.to_string(),
        value: value.to_string(),
        expected: format!(
            "one of: {}",
            BibFormat::ALL.map(BibFormat::as_str).join(", ")
        ),
    })
}

fn parse_max_results(value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::InvalidValue {
            key: ConfigKey::MaxSearchResults.to_string(),
            value: value.to_string(),
            expected: "a positive integer".to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_config() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        (dir, path)
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let (_dir, path) = temp_config();
        let config = Config::load(Some(&path)).unwrap();
        assert!(config.file_settings().is_empty());
        assert_eq!(config.format(), BibFormat::Condensed);
        assert_eq!(config.max_search_results(), 30);
        assert_eq!(
            config.get_with_source(ConfigKey::Format),
            ("condensed".to_string(), ValueSource::Default)
        );
    }

    #[test]
    fn test_set_save_reload_unset() {
        let (_dir, path) = temp_config();
        let mut config = Config::load(Some(&path)).unwrap();
        config.set("format", "standard").unwrap();
        config.set("max_search_results", "7").unwrap();
        config.save().unwrap();

        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["format"], "standard");
        assert_eq!(json["max_search_results"], 7);

        let mut reloaded = Config::load(Some(&path)).unwrap();
        assert_eq!(reloaded.format(), BibFormat::Standard);
        assert_eq!(
            reloaded.get_with_source(ConfigKey::MaxSearchResults),
            ("7".to_string(), ValueSource::ConfigFile(path.clone()))
        );

        reloaded.unset("format").unwrap();
        reloaded.save().unwrap();
        let json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(json.get("format").is_none());
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_command_line_wins_over_file() {
        let (_dir, path) = temp_config();
        let mut config = Config::load(Some(&path)).unwrap();
        config.set("format", "standard").unwrap();
        config.set_command_line(Settings {
            format: Some(BibFormat::Crossref),
            max_search_results: None,
        });
        assert_eq!(config.format(), BibFormat::Crossref);
        assert_eq!(config.get_with_source(ConfigKey::Format).1, ValueSource::CommandLine);
        assert_eq!(config.get_with_source(ConfigKey::MaxSearchResults).1, ValueSource::Default);
    }

    #[test]
    fn test_string_numbers_are_accepted() {
        let (dir, _) = temp_config();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"max_search_results": "12", "format": "Crossref"}"#).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.max_search_results(), 12);
        assert_eq!(config.format(), BibFormat::Crossref);
    }

    #[test]
    fn test_unknown_file_key_is_ignored() {
        let (dir, _) = temp_config();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"colour": "blue", "format": "standard"}"#).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.format(), BibFormat::Standard);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let (_dir, path) = temp_config();
        let mut config = Config::load(Some(&path)).unwrap();
        assert!(matches!(
            config.set("format", "fancy"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("max_search_results", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.set("colour", "blue"),
            Err(ConfigError::UnknownKey { .. })
        ));
        let msg = config.unset("colour").unwrap_err().to_string();
        assert!(msg.contains("format, max_search_results"), "got: {msg}");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let (dir, _) = temp_config();
        let path = dir.path().join("config.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(ConfigError::Parse { .. })));
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_value_source_display() {
        assert_eq!(ValueSource::CommandLine.to_string(), "command line");
        assert_eq!(ValueSource::Default.to_string(), "default setting");
        assert_eq!(
            ValueSource::ConfigFile(PathBuf::from("/tmp/c.json")).to_string(),
            "config file /tmp/c.json"
        );
    }
}
