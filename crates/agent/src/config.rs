//! LLM endpoint configuration.
//!
//! Resolved once at startup from the environment and threaded into the
//! assessor; nothing in this crate reads environment variables after
//! construction.

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for the OpenAI-compatible chat endpoint.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub base_url: String,
    pub model: String,
    /// Absent when the deployment runs rule-based only.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AgentConfig {
    /// Resolve the configuration from `RMD_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var("RMD_LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url: std::env::var("RMD_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("RMD_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_key: std::env::var("RMD_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            timeout_secs,
        }
    }

    /// Whether an API key is present, so the LLM strategy can run at all.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
