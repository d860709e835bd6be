use crate::primitives::language::Language;
use crate::services::action_client::DEFAULT_BACKEND_URL;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Analysis backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Editor behavior settings (indentation, line numbers, feedback, etc.)
    #[serde(default)]
    pub editor: EditorConfig,

    /// Language used for files whose extension is not recognized
    #[serde(default)]
    pub default_language: Language,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BackendConfig {
    /// Base URL of the analysis backend (without the `/api` suffix)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Editor behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EditorConfig {
    /// Number of columns a tab character occupies
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,

    /// Show line numbers in the gutter
    #[serde(default = "default_true")]
    pub line_numbers: bool,

    /// How long success/error feedback stays visible, in milliseconds
    #[serde(default = "default_feedback_duration")]
    pub feedback_duration_ms: u64,

    /// Columns between the end of the selection and the action menu trigger
    #[serde(default = "default_menu_offset")]
    pub menu_offset: u16,

    /// Maximum time in milliseconds between clicks of a double-click
    #[serde(default = "default_double_click_time")]
    pub double_click_time_ms: u64,
}

fn default_tab_size() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_feedback_duration() -> u64 {
    5000
}

fn default_menu_offset() -> u16 {
    1
}

fn default_double_click_time() -> u64 {
    500
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: default_tab_size(),
            line_numbers: true,
            feedback_duration_ms: default_feedback_duration(),
            menu_offset: default_menu_offset(),
            double_click_time_ms: default_double_click_time(),
        }
    }
}

impl EditorConfig {
    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_duration_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            editor: EditorConfig::default(),
            default_language: Language::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path` if it exists, falling back to defaults
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(
                        "Failed to load config from {}: {}, using defaults",
                        path.display(),
                        e
                    );
                }
            }
        }
        Self::default()
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// JSON Schema for the config file
    pub fn json_schema() -> Result<String, ConfigError> {
        let schema = schemars::schema_for!(Config);
        serde_json::to_string_pretty(&schema).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor.tab_size == 0 {
            return Err(ConfigError::ValidationError(
                "tab_size must be greater than 0".to_string(),
            ));
        }

        if self.editor.tab_size > 16 {
            return Err(ConfigError::ValidationError(
                "tab_size must be at most 16".to_string(),
            ));
        }

        let url = self.backend.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "backend.base_url must start with http:// or https://, got '{url}'"
            )));
        }

        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "backend.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Directory paths for editor state and configuration
///
/// Only the top-level `main` function should use `dirs::*` to construct this;
/// all other code should receive it by construction/parameter passing, so
/// tests can point everything at a temp directory.
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// Data directory for persistent state (session)
    /// e.g., ~/.local/share/codeward on Linux
    pub data_dir: std::path::PathBuf,

    /// Config directory for user configuration
    /// e.g., ~/.config/codeward on Linux
    pub config_dir: std::path::PathBuf,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    /// This should ONLY be called from main()
    pub fn from_system() -> std::io::Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine data directory",
                )
            })?
            .join("codeward");

        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join("codeward");

        Ok(Self {
            data_dir,
            config_dir,
        })
    }

    /// Create a DirectoryContext for testing with a temp directory
    pub fn for_testing(temp_dir: &std::path::Path) -> Self {
        Self {
            data_dir: temp_dir.join("data"),
            config_dir: temp_dir.join("config"),
        }
    }

    /// Get the config file path
    pub fn config_path(&self) -> std::path::PathBuf {
        self.config_dir.join("config.json")
    }

    /// Get the session file path
    pub fn session_path(&self) -> std::path::PathBuf {
        self.data_dir.join("session.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.tab_size, 4);
        assert!(config.editor.line_numbers);
        assert_eq!(config.editor.feedback_duration(), Duration::from_secs(5));
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.default_language, Language::Javascript);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.editor.tab_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.backend.base_url = "localhost:5000".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.backend.base_url = "https://analyzer.example.com".to_string();
        config.default_language = Language::Python;
        config.save_to_file(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.backend.base_url, "https://analyzer.example.com");
        assert_eq!(loaded.default_language, Language::Python);
    }

    #[test]
    fn test_partial_config_takes_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"editor": {"feedback_duration_ms": 1500}}"#).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.editor.feedback_duration_ms, 1500);
        assert_eq!(loaded.editor.tab_size, 4);
        assert_eq!(loaded.backend.timeout_secs, 30);
    }

    #[test]
    fn test_unknown_language_in_config_is_rejected_gracefully() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"default_language": "cobol"}"#).unwrap();

        // Parsing fails, load_or_default falls back to defaults
        assert!(Config::load_from_file(&config_path).is_err());
        let config = Config::load_or_default(&config_path);
        assert_eq!(config.default_language, Language::Javascript);
    }

    #[test]
    fn test_directory_context_for_testing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dirs = DirectoryContext::for_testing(temp_dir.path());
        assert_eq!(dirs.config_path(), temp_dir.path().join("config").join("config.json"));
        assert_eq!(dirs.session_path(), temp_dir.path().join("data").join("session.json"));
    }

    #[test]
    fn test_json_schema_mentions_backend() {
        let schema = Config::json_schema().unwrap();
        assert!(schema.contains("base_url"));
    }
}
