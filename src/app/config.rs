use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_API_KEY_ENV, DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_PROMPT,
    TRANSCRIPT_FILE_NAME,
};
use crate::models::SessionConfig;
use crate::utils::CoachError;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model identifier sent to the API. There is no built-in default.
    #[serde(default)]
    pub model: Option<String>,

    /// Maximum tokens to generate per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// System prompt override
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Anthropic configuration
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Transcript configuration
    #[serde(default)]
    pub transcript: TranscriptConfig,
}

fn default_max_tokens() -> usize {
    DEFAULT_MAX_TOKENS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: None,
            anthropic: AnthropicConfig::default(),
            transcript: TranscriptConfig::default(),
        }
    }
}

/// Anthropic configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// Environment variable containing API key
    pub api_key_env: String,
    /// API endpoint, overridable for proxies
    pub base_url: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
        }
    }
}

/// Transcript configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Where the conversation is written on quit (defaults to the temp dir)
    pub path: Option<PathBuf>,
}

impl Config {
    /// Build the immutable session parameters, applying command-line overrides
    pub fn session_config(
        &self,
        model_override: Option<String>,
        max_tokens_override: Option<usize>,
    ) -> Result<SessionConfig, CoachError> {
        let model = model_override
            .or_else(|| self.model.clone())
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| {
                CoachError::Config(
                    "no model configured. Pass --model, set MYCOACH_MODEL, or add `model` to config.toml"
                        .to_string(),
                )
            })?;

        let max_tokens = max_tokens_override.unwrap_or(self.max_tokens);
        if max_tokens == 0 {
            return Err(CoachError::Config("max_tokens must be greater than zero".to_string()));
        }

        let system_prompt = self
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        Ok(SessionConfig::new(system_prompt, model, max_tokens))
    }

    /// Destination of the transcript written on quit
    pub fn transcript_path(&self) -> PathBuf {
        self.transcript
            .path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(TRANSCRIPT_FILE_NAME))
    }
}

/// Layer defaults, the given files (in order) and `MYCOACH_` environment variables
fn build_figment(files: &[PathBuf]) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    for file in files {
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }
    }

    // Nested keys use a double underscore, e.g. MYCOACH_ANTHROPIC__BASE_URL
    figment.merge(Env::prefixed("MYCOACH_").split("__"))
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".mycoach/config.toml");

    build_figment(&[global_config, local_config])
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from one explicit file (plus environment overrides)
pub fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    build_figment(&[path.to_path_buf()])
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "mycoach") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("mycoach");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
    }

    Ok(config_file)
}
