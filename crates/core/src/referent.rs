//! Main API.
//!
//! [`Referent`] owns the configuration and one HTTP client, and exposes one
//! operation per artifact. Illustration is a two-step pipeline written
//! against the [`ImagePromptSource`] and [`ImageSink`] traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use referent_core::{Referent, ReferentConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let referent = Referent::new(ReferentConfig::from_env())?;
//! let article = referent.parse("https://example.com/article").await?;
//! if let Some(content) = article.content.as_deref() {
//!     println!("{}", referent.summarize(content).await?);
//! }
//! # Ok(())
//! # }
//! ```

use std::future::{Future, pending};

use reqwest::Client;

use crate::article::ArticleRecord;
use crate::config::ReferentConfig;
use crate::extract::{extract_article, extract_article_with_config};
use crate::fetch::{FetchConfig, fetch_url, fetch_with_client, http_client};
use crate::provider::{ChatGateway, ChatOperation, GeneratedImage, ImageGateway};
use crate::{ReferentError, Result};

/// Anything that can write an image prompt for an article.
pub trait ImagePromptSource {
    fn image_prompt(&self, content: &str, title: Option<&str>) -> impl Future<Output = Result<String>> + Send;
}

/// Anything that can turn a prompt into an image.
pub trait ImageSink {
    fn generate_image(&self, prompt: &str) -> impl Future<Output = Result<GeneratedImage>> + Send;
}

/// Prompt and image produced by [`illustrate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Illustration {
    pub prompt: String,
    pub image: GeneratedImage,
}

/// Write an image prompt for the article, then render it.
///
/// A failed prompt step is returned as is and the sink is never called. A
/// blank prompt fails with [`ReferentError::EmptyPrompt`]. Otherwise the
/// prompt reaches the sink unchanged.
pub async fn illustrate<P, S>(prompts: &P, images: &S, content: &str, title: Option<&str>) -> Result<Illustration>
where
    P: ImagePromptSource,
    S: ImageSink,
{
    let prompt = prompts.image_prompt(content, title).await?;
    if prompt.trim().is_empty() {
        tracing::warn!("image prompt step returned an empty prompt");
        return Err(ReferentError::EmptyPrompt);
    }

    let image = images.generate_image(&prompt).await?;
    Ok(Illustration { prompt, image })
}

/// Entry point for every article operation.
#[derive(Debug, Clone)]
pub struct Referent {
    config: ReferentConfig,
    client: Client,
    chat: ChatGateway,
    image: ImageGateway,
}

impl Referent {
    /// Creates a facade with the given configuration.
    ///
    /// # Errors
    ///
    /// Fails only when the HTTP client cannot be built.
    pub fn new(config: ReferentConfig) -> Result<Self> {
        let client = http_client()?;
        let chat = ChatGateway::new(client.clone(), &config);
        let image = ImageGateway::new(client.clone(), &config);
        Ok(Self { config, client, chat, image })
    }

    /// Creates a facade configured from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ReferentConfig::from_env())
    }

    pub fn config(&self) -> &ReferentConfig {
        &self.config
    }

    /// Fetch `url` and extract its article fields.
    pub async fn parse(&self, url: &str) -> Result<ArticleRecord> {
        self.parse_with_cancel(url, pending()).await
    }

    /// Like [`Referent::parse`], abandoned with a timeout error once `cancel`
    /// completes.
    pub async fn parse_with_cancel(&self, url: &str, cancel: impl Future<Output = ()>) -> Result<ArticleRecord> {
        let html = fetch_with_client(&self.client, url, &self.config.fetch, cancel).await?;
        Ok(self.parse_html(&html))
    }

    /// Extract article fields from HTML already in memory.
    pub fn parse_html(&self, html: &str) -> ArticleRecord {
        extract_article_with_config(html, &self.config.extract)
    }

    /// Translate the article into Russian.
    pub async fn translate(&self, content: &str) -> Result<String> {
        self.chat.complete(&ChatOperation::TRANSLATE, content, None, None).await
    }

    /// Two or three paragraph summary in Russian.
    pub async fn summarize(&self, content: &str) -> Result<String> {
        self.chat.complete(&ChatOperation::SUMMARY, content, None, None).await
    }

    /// Numbered list of key theses in Russian.
    pub async fn extract_theses(&self, content: &str) -> Result<String> {
        self.chat.complete(&ChatOperation::THESES, content, None, None).await
    }

    /// Telegram post for the article.
    pub async fn generate_post(&self, content: &str, title: Option<&str>, date: Option<&str>) -> Result<String> {
        self.chat.complete(&ChatOperation::POST, content, title, date).await
    }

    /// English prompt for an image model, trimmed.
    pub async fn generate_image_prompt(&self, content: &str, title: Option<&str>) -> Result<String> {
        let prompt = self.chat.complete(&ChatOperation::IMAGE_PROMPT, content, title, None).await?;
        Ok(prompt.trim().to_string())
    }

    /// Render `prompt` through the image endpoint candidates.
    pub async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        self.image.generate(prompt).await
    }

    /// Image prompt followed by image generation.
    pub async fn generate_illustration(&self, content: &str, title: Option<&str>) -> Result<Illustration> {
        illustrate(self, self, content, title).await
    }
}

impl ImagePromptSource for Referent {
    async fn image_prompt(&self, content: &str, title: Option<&str>) -> Result<String> {
        self.generate_image_prompt(content, title).await
    }
}

impl ImageSink for Referent {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        self.image.generate(prompt).await
    }
}

/// Fetch and extract an article with default settings.
///
/// # Example
///
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let article = referent_core::fetch_and_extract("https://example.com/article").await?;
/// println!("{:?}", article.title);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_and_extract(url: &str) -> Result<ArticleRecord> {
    let html = fetch_url(url, &FetchConfig::default()).await?;
    Ok(extract_article(&html))
}
