//! API Configuration Module
//!
//! This module provides configuration for CORS, the chat provider, and
//! other production-level API settings. Configuration is loaded from
//! environment variables with sensible defaults for development.

/// Default chat model when PRAXIS_CHAT_MODEL is unset.
pub const DEFAULT_CHAT_MODEL: &str = "claude-3-5-haiku-latest";

/// API configuration for CORS and chat provider wiring.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    // ========================================================================
    // CORS Configuration
    // ========================================================================
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    /// Example: "https://praxis.example,https://app.praxis.example"
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    // ========================================================================
    // Chat Provider Configuration
    // ========================================================================
    /// API key for the chat provider. Absent means the chat route is
    /// served but fails with an internal error.
    pub anthropic_api_key: Option<String>,

    /// Model identifier completions are requested from.
    pub chat_model: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            // CORS defaults: permissive for development
            cors_origins: Vec::new(), // Empty = allow all
            cors_allow_credentials: false,
            cors_max_age_secs: 86400, // 24 hours

            anthropic_api_key: None,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `PRAXIS_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `PRAXIS_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `PRAXIS_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `PRAXIS_ANTHROPIC_API_KEY` (or `ANTHROPIC_API_KEY`): chat credential
    /// - `PRAXIS_CHAT_MODEL`: model identifier (default: claude-3-5-haiku-latest)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("PRAXIS_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_allow_credentials = std::env::var("PRAXIS_CORS_ALLOW_CREDENTIALS")
            .ok()
            .map(|s| s.to_lowercase() == "true")
            .unwrap_or(false);

        let cors_max_age_secs = std::env::var("PRAXIS_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        let anthropic_api_key = std::env::var("PRAXIS_ANTHROPIC_API_KEY")
            .ok()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|key| !key.trim().is_empty());

        let chat_model = std::env::var("PRAXIS_CHAT_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());

        Self {
            cors_origins,
            cors_allow_credentials,
            cors_max_age_secs,
            anthropic_api_key,
            chat_model,
        }
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert!(!config.cors_allow_credentials);
        assert_eq!(config.cors_max_age_secs, 86400);
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn test_is_production() {
        let mut config = ApiConfig::default();
        assert!(!config.is_production());

        config.cors_origins = vec!["https://praxis.example".to_string()];
        assert!(config.is_production());
    }
}
