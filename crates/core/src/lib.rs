pub mod article;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod metadata;
pub mod normalize;
pub mod parse;
pub mod presentation;
pub mod provider;
pub mod referent;

pub use article::ArticleRecord;
pub use config::{ReferentConfig, ReferentConfigBuilder};
pub use error::{ErrorCategory, ReferentError, Result, TransportKind};
pub use extract::{ExtractConfig, SelectorRule, extract_article, extract_article_with_config, extract_content};
pub use fetch::FetchConfig;
pub use fetch::{fetch_file, fetch_stdin, fetch_url, fetch_url_with_cancel};
pub use normalize::normalize_whitespace;
pub use parse::Document;
pub use presentation::{ErrorPresentation, Severity};
pub use provider::{
    ChatOperation, EndpointCandidate, GeneratedImage, OperationKind, ProviderError, ProviderErrorKind,
};
pub use referent::{ImagePromptSource, ImageSink, Illustration, Referent, fetch_and_extract, illustrate};
