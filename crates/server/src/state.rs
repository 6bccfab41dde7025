use referent_core::{Referent, ReferentConfig, Result};

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub referent: Referent,
}

impl AppState {
    pub fn new(referent: Referent) -> Self {
        Self { referent }
    }

    /// State configured from environment variables.
    ///
    /// Missing keys are logged, not fatal: operations that need them fail
    /// individually.
    pub fn from_env() -> Result<Self> {
        let config = ReferentConfig::from_env();
        if config.chat_api_key.is_none() {
            tracing::warn!("OPENROUTER_API_KEY is not set, chat operations will fail");
        }
        if config.image_api_key.is_none() {
            tracing::warn!("API_KEY_IMAGE is not set, image generation will fail");
        }
        Ok(Self::new(Referent::new(config)?))
    }
}
