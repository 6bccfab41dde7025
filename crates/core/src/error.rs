//! Error types for Referent operations.
//!
//! This module defines the main error type [`ReferentError`] which represents
//! every failure that can occur while fetching a page, extracting an article,
//! or calling one of the external providers.
//!
//! Each variant belongs to exactly one [`ErrorCategory`] and carries an HTTP
//! status code ([`ReferentError::status_code`]) so that any caller, the JSON
//! server in particular, can turn it into a response without further logic.
//!
//! # Example
//!
//! ```rust
//! use referent_core::{ErrorCategory, ReferentError};
//!
//! let err = ReferentError::ContentTooShort { min: 50, actual: 12 };
//! assert_eq!(err.category(), ErrorCategory::InputValidation);
//! assert_eq!(err.status_code(), 400);
//! ```

use thiserror::Error;

use crate::provider::{ProviderError, ProviderErrorKind};

/// Transport-level failure kinds reported by the page fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// The request exceeded its time bound or was aborted.
    Timeout,
    /// Access was refused by a cross-origin policy.
    Blocked,
    /// The host name could not be resolved.
    DnsFailure,
    /// The server refused the TCP connection.
    ConnectionRefused,
    /// Certificate or TLS handshake problem.
    TlsFailure,
    /// Generic network failure.
    NetworkError,
    /// Anything the classifier did not recognize.
    Unknown,
}

impl TransportKind {
    /// Short human readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            TransportKind::Timeout => "request timeout",
            TransportKind::Blocked => "blocked by cross-origin policy",
            TransportKind::DnsFailure => "DNS error",
            TransportKind::ConnectionRefused => "connection refused",
            TransportKind::TlsFailure => "SSL/TLS error",
            TransportKind::NetworkError => "network error",
            TransportKind::Unknown => "transport error",
        }
    }
}

/// Coarse error taxonomy shared by every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing, short or malformed request fields. Never reaches the network.
    InputValidation,
    /// DNS, TLS, timeout, refused connection, CORS.
    TransportFailure,
    /// Non-2xx response from the target site or a provider.
    HttpStatusFailure,
    /// Success status with an unusable payload.
    MalformedResponse,
    /// The endpoint fallback loop ran out of candidates.
    AllEndpointsUnreachable,
    /// A required credential is absent.
    ConfigurationMissing,
}

/// Main error type for Referent operations.
#[derive(Error, Debug)]
pub enum ReferentError {
    /// A required request field was absent or empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or does not use http/https.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The content is below the minimum length accepted by an operation.
    #[error("Content is too short ({actual} characters, minimum {min})")]
    ContentTooShort { min: usize, actual: usize },

    /// A credential needed by the operation is not configured.
    #[error("{0} is not configured")]
    ConfigurationMissing(&'static str),

    /// Page fetch exceeded the configured bound or was cancelled.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Transport failure while fetching a page.
    #[error("{}: {message}", kind.label())]
    Transport { kind: TransportKind, message: String },

    /// The target site answered with a non-2xx status.
    #[error("HTTP {status}: {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// A provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Every endpoint candidate failed with 404 or a transport error.
    #[error("All endpoints are unreachable. Last error: {last_error}")]
    AllEndpointsUnreachable { last_error: String },

    /// The image prompt step produced an empty prompt.
    #[error("Image prompt generation returned an empty prompt")]
    EmptyPrompt,

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Local file or stdin errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReferentError {
    /// The taxonomy bucket this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReferentError::MissingField(_) | ReferentError::InvalidUrl(_) | ReferentError::ContentTooShort { .. } => {
                ErrorCategory::InputValidation
            }
            ReferentError::ConfigurationMissing(_) => ErrorCategory::ConfigurationMissing,
            ReferentError::Timeout { .. } | ReferentError::Transport { .. } | ReferentError::Io(_) => {
                ErrorCategory::TransportFailure
            }
            ReferentError::HttpStatus { .. } => ErrorCategory::HttpStatusFailure,
            ReferentError::Provider(err) if err.kind == ProviderErrorKind::MalformedResponse => {
                ErrorCategory::MalformedResponse
            }
            ReferentError::Provider(_) => ErrorCategory::HttpStatusFailure,
            ReferentError::AllEndpointsUnreachable { .. } => ErrorCategory::AllEndpointsUnreachable,
            ReferentError::EmptyPrompt | ReferentError::HtmlParseError(_) => ErrorCategory::MalformedResponse,
        }
    }

    /// HTTP status code appropriate for reporting this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ReferentError::MissingField(_) | ReferentError::InvalidUrl(_) | ReferentError::ContentTooShort { .. } => 400,
            ReferentError::Timeout { .. } => 408,
            ReferentError::Transport { kind, .. } => match kind {
                TransportKind::Timeout => 408,
                TransportKind::Blocked => 403,
                TransportKind::DnsFailure => 404,
                TransportKind::ConnectionRefused => 503,
                TransportKind::TlsFailure => 495,
                TransportKind::NetworkError | TransportKind::Unknown => 500,
            },
            ReferentError::HttpStatus { status, .. } => *status,
            ReferentError::Provider(err) if err.kind == ProviderErrorKind::MalformedResponse => 500,
            ReferentError::Provider(err) => err.http_status,
            ReferentError::ConfigurationMissing(_)
            | ReferentError::AllEndpointsUnreachable { .. }
            | ReferentError::EmptyPrompt
            | ReferentError::HtmlParseError(_)
            | ReferentError::Io(_) => 500,
        }
    }
}

/// Result type alias for ReferentError.
pub type Result<T> = std::result::Result<T, ReferentError>;
