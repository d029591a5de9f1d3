use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_ANTHROPIC_VERSION: &str = "2023-06-01";

/// Application configuration (`config.toml`).
///
/// Every field has a default so a partial or missing file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CompassConfig {
    pub model: String,
    pub api_url: String,
    pub anthropic_version: String,
    pub request_timeout_secs: u64,
    pub reply_max_tokens: u32,
    pub insight_max_tokens: u32,
    pub report_max_tokens: u32,
    /// Overrides the directory of the key-value store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            anthropic_version: DEFAULT_ANTHROPIC_VERSION.to_string(),
            request_timeout_secs: 120,
            reply_max_tokens: 600,
            insight_max_tokens: 400,
            report_max_tokens: 3000,
            data_dir: None,
        }
    }
}

/// Secrets (`secret.json`).
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    pub claude: Option<ClaudeConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ClaudeConfig {
    pub api_key: String,
    pub model_name: Option<String>,
}
