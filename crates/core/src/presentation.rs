//! User-facing rendering of errors.
//!
//! Every [`ReferentError`] maps deterministically, together with the
//! [`OperationKind`] that failed, to a localized (Russian) message and a
//! severity that a UI can use to pick a style.

use serde::Serialize;

use crate::error::TransportKind;
use crate::provider::{OperationKind, ProviderErrorKind};
use crate::ReferentError;

/// How loudly an error should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Transient condition, the user only has to wait.
    Info,
    /// The user can fix it (input) or retry later.
    Warning,
    /// The operation failed.
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPresentation {
    pub message: String,
    pub severity: Severity,
}

impl OperationKind {
    /// Russian phrase used as the message prefix, "could not ...".
    fn failure_title(self) -> &'static str {
        match self {
            OperationKind::Parse => "Не удалось загрузить статью",
            OperationKind::Translate => "Не удалось перевести статью",
            OperationKind::Summarize => "Не удалось создать краткое содержание",
            OperationKind::Theses => "Не удалось выделить тезисы",
            OperationKind::Post => "Не удалось создать пост",
            OperationKind::ImagePrompt => "Не удалось создать промпт для изображения",
            OperationKind::ImageGeneration => "Не удалось сгенерировать изображение",
            OperationKind::Illustration => "Не удалось создать иллюстрацию",
        }
    }
}

impl ErrorPresentation {
    pub fn from_error(err: &ReferentError, operation: OperationKind) -> Self {
        let (detail, severity) = describe(err);
        Self { message: format!("{}: {}", operation.failure_title(), detail), severity }
    }
}

fn describe(err: &ReferentError) -> (String, Severity) {
    match err {
        ReferentError::MissingField("url") => ("укажите URL статьи".to_string(), Severity::Warning),
        ReferentError::MissingField("prompt") => ("укажите промпт".to_string(), Severity::Warning),
        ReferentError::MissingField(field) => (format!("не заполнено поле «{}»", field), Severity::Warning),
        ReferentError::InvalidUrl(_) => {
            ("некорректный URL, используйте адрес вида http:// или https://".to_string(), Severity::Warning)
        }
        ReferentError::ContentTooShort { min, actual } => {
            (format!("текст слишком короткий ({} символов, нужно не менее {})", actual, min), Severity::Warning)
        }
        ReferentError::ConfigurationMissing(var) => (format!("сервис не настроен, отсутствует {}", var), Severity::Destructive),
        ReferentError::Timeout { timeout } => {
            (format!("сайт не ответил за {} секунд", timeout), Severity::Destructive)
        }
        ReferentError::Transport { kind, .. } => (transport_detail(*kind).to_string(), Severity::Destructive),
        ReferentError::HttpStatus { status: 404, .. } => ("страница не найдена (404)".to_string(), Severity::Destructive),
        ReferentError::HttpStatus { status: 403, .. } => ("доступ к странице запрещён (403)".to_string(), Severity::Destructive),
        ReferentError::HttpStatus { status, status_text } => {
            (format!("сайт вернул ошибку {} {}", status, status_text).trim_end().to_string(), Severity::Destructive)
        }
        ReferentError::Provider(provider) => match provider.kind {
            ProviderErrorKind::InvalidCredentials => ("неверный API-ключ сервиса".to_string(), Severity::Destructive),
            ProviderErrorKind::ModelUnavailable => ("модель недоступна".to_string(), Severity::Destructive),
            ProviderErrorKind::RateLimited => {
                ("превышен лимит запросов, попробуйте позже".to_string(), Severity::Warning)
            }
            ProviderErrorKind::ModelLoading => {
                ("модель загружается, повторите попытку через минуту".to_string(), Severity::Info)
            }
            ProviderErrorKind::ServerError => ("ошибка на стороне сервиса".to_string(), Severity::Destructive),
            ProviderErrorKind::Upstream => {
                (format!("сервис вернул ошибку {}: {}", provider.http_status, provider.raw_message), Severity::Destructive)
            }
            ProviderErrorKind::MalformedResponse => ("сервис вернул некорректный ответ".to_string(), Severity::Destructive),
        },
        ReferentError::AllEndpointsUnreachable { .. } => {
            ("ни один адрес сервиса генерации изображений не ответил".to_string(), Severity::Destructive)
        }
        ReferentError::EmptyPrompt => ("получен пустой промпт для изображения".to_string(), Severity::Destructive),
        ReferentError::HtmlParseError(_) => ("не удалось разобрать страницу".to_string(), Severity::Destructive),
        ReferentError::Io(_) => ("ошибка чтения данных".to_string(), Severity::Destructive),
    }
}

fn transport_detail(kind: TransportKind) -> &'static str {
    match kind {
        TransportKind::Timeout => "превышено время ожидания ответа",
        TransportKind::Blocked => "сайт блокирует доступ к странице",
        TransportKind::DnsFailure => "сайт не найден, проверьте адрес",
        TransportKind::ConnectionRefused => "сайт отклонил соединение",
        TransportKind::TlsFailure => "ошибка защищённого соединения (SSL/TLS)",
        TransportKind::NetworkError => "сетевая ошибка",
        TransportKind::Unknown => "неизвестная ошибка соединения",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use rstest::rstest;

    fn provider(status: u16) -> ReferentError {
        ProviderError::from_status(status, "provider says no").into()
    }

    #[rstest]
    #[case(ReferentError::MissingField("content"), Severity::Warning)]
    #[case(ReferentError::InvalidUrl("x".to_string()), Severity::Warning)]
    #[case(ReferentError::ContentTooShort { min: 50, actual: 10 }, Severity::Warning)]
    #[case(provider(503), Severity::Info)]
    #[case(provider(429), Severity::Warning)]
    #[case(provider(401), Severity::Destructive)]
    #[case(provider(500), Severity::Destructive)]
    #[case(ReferentError::Timeout { timeout: 30 }, Severity::Destructive)]
    #[case(ReferentError::EmptyPrompt, Severity::Destructive)]
    #[case(ReferentError::AllEndpointsUnreachable { last_error: "x".to_string() }, Severity::Destructive)]
    #[case(ReferentError::ConfigurationMissing("API_KEY_IMAGE"), Severity::Destructive)]
    fn test_severity(#[case] err: ReferentError, #[case] expected: Severity) {
        assert_eq!(ErrorPresentation::from_error(&err, OperationKind::Summarize).severity, expected);
    }

    #[test]
    fn test_message_names_operation() {
        let err = ReferentError::ContentTooShort { min: 50, actual: 30 };
        let summary = ErrorPresentation::from_error(&err, OperationKind::Summarize);
        let post = ErrorPresentation::from_error(&err, OperationKind::Post);

        assert!(summary.message.starts_with("Не удалось создать краткое содержание"));
        assert!(post.message.starts_with("Не удалось создать пост"));
        assert!(summary.message.contains("30"));
        assert!(summary.message.contains("50"));
    }

    #[test]
    fn test_deterministic() {
        let err = provider(429);
        assert_eq!(
            ErrorPresentation::from_error(&err, OperationKind::Translate),
            ErrorPresentation::from_error(&err, OperationKind::Translate)
        );
    }

    #[test]
    fn test_upstream_keeps_provider_text() {
        let presentation = ErrorPresentation::from_error(&provider(402), OperationKind::Theses);
        assert!(presentation.message.contains("provider says no"));
        assert!(presentation.message.contains("402"));
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Destructive).unwrap(), r#""destructive""#);
    }
}
