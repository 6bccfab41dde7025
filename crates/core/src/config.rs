//! Configuration for the [`Referent`](crate::Referent) facade.
//!
//! Credentials are optional at construction time. An operation that needs a
//! missing key fails with [`ReferentError::ConfigurationMissing`](crate::ReferentError)
//! when it is called, so page parsing keeps working without any key.
//!
//! # Example
//!
//! ```rust
//! use referent_core::ReferentConfig;
//!
//! let config = ReferentConfig::builder()
//!     .chat_api_key("sk-or-...")
//!     .fetch_timeout(10)
//!     .build();
//! assert_eq!(config.fetch.timeout, 10);
//! ```

use crate::extract::ExtractConfig;
use crate::fetch::FetchConfig;
use crate::provider::{EndpointCandidate, default_image_candidates};

pub const DEFAULT_CHAT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "deepseek/deepseek-chat";
pub const DEFAULT_IMAGE_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

/// Environment variable names read by [`ReferentConfig::from_env`].
pub mod env {
    pub const CHAT_API_KEY: &str = "OPENROUTER_API_KEY";
    pub const IMAGE_API_KEY: &str = "API_KEY_IMAGE";
    pub const APP_URL: &str = "REFERENT_APP_URL";
    pub const CHAT_URL: &str = "REFERENT_CHAT_URL";
    pub const CHAT_MODEL: &str = "REFERENT_CHAT_MODEL";
    pub const IMAGE_MODEL: &str = "REFERENT_IMAGE_MODEL";
}

/// Settings shared by every operation.
#[derive(Debug, Clone)]
pub struct ReferentConfig {
    /// Key for the chat-completions provider.
    pub chat_api_key: Option<String>,
    /// Key for the image provider.
    pub image_api_key: Option<String>,
    /// Sent as `HTTP-Referer` for provider attribution.
    pub app_url: String,
    pub chat_endpoint: String,
    pub chat_model: String,
    pub image_model: String,
    /// Image endpoints, tried by ascending priority.
    pub image_candidates: Vec<EndpointCandidate>,
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
}

impl Default for ReferentConfig {
    fn default() -> Self {
        Self {
            chat_api_key: None,
            image_api_key: None,
            app_url: DEFAULT_APP_URL.to_string(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_candidates: default_image_candidates(),
            fetch: FetchConfig::default(),
            extract: ExtractConfig::default(),
        }
    }
}

impl ReferentConfig {
    /// Creates a new builder for ReferentConfig.
    pub fn builder() -> ReferentConfigBuilder {
        ReferentConfigBuilder::new()
    }

    /// Read keys and overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut builder = ReferentConfig::builder();

        if let Some(key) = get(env::CHAT_API_KEY) {
            builder = builder.chat_api_key(key);
        }
        if let Some(key) = get(env::IMAGE_API_KEY) {
            builder = builder.image_api_key(key);
        }
        if let Some(url) = get(env::APP_URL) {
            builder = builder.app_url(url);
        }
        if let Some(url) = get(env::CHAT_URL) {
            builder = builder.chat_endpoint(url);
        }
        if let Some(model) = get(env::CHAT_MODEL) {
            builder = builder.chat_model(model);
        }
        if let Some(model) = get(env::IMAGE_MODEL) {
            builder = builder.image_model(model);
        }

        builder.build()
    }
}

/// Builder for ReferentConfig.
///
/// # Example
///
/// ```rust
/// use referent_core::ReferentConfig;
///
/// let config = ReferentConfig::builder()
///     .chat_model("openai/gpt-4o-mini")
///     .user_agent("MyBot/1.0")
///     .build();
/// assert_eq!(config.chat_model, "openai/gpt-4o-mini");
/// ```
pub struct ReferentConfigBuilder {
    config: ReferentConfig,
}

impl ReferentConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ReferentConfig::default() }
    }

    /// Sets the chat provider key.
    pub fn chat_api_key(mut self, value: impl Into<String>) -> Self {
        self.config.chat_api_key = Some(value.into());
        self
    }

    /// Sets the image provider key.
    pub fn image_api_key(mut self, value: impl Into<String>) -> Self {
        self.config.image_api_key = Some(value.into());
        self
    }

    /// Sets the attribution URL.
    pub fn app_url(mut self, value: impl Into<String>) -> Self {
        self.config.app_url = value.into();
        self
    }

    /// Sets the chat-completions endpoint.
    pub fn chat_endpoint(mut self, value: impl Into<String>) -> Self {
        self.config.chat_endpoint = value.into();
        self
    }

    /// Sets the chat model id.
    pub fn chat_model(mut self, value: impl Into<String>) -> Self {
        self.config.chat_model = value.into();
        self
    }

    /// Sets the image model id.
    pub fn image_model(mut self, value: impl Into<String>) -> Self {
        self.config.image_model = value.into();
        self
    }

    /// Replaces the image endpoint candidates.
    pub fn image_candidates(mut self, value: Vec<EndpointCandidate>) -> Self {
        self.config.image_candidates = value;
        self
    }

    /// Sets the page fetch bound in seconds.
    pub fn fetch_timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    /// Sets the User-Agent used for page fetches.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Sets the extraction thresholds.
    pub fn extract(mut self, value: ExtractConfig) -> Self {
        self.config.extract = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ReferentConfig {
        self.config
    }
}

impl Default for ReferentConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
