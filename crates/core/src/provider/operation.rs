//! Per-operation chat configuration.
//!
//! Every chat-based artifact is produced by the same gateway call; what
//! differs between them is captured by one [`ChatOperation`] record.

use crate::normalize::truncate_chars;
use crate::{ReferentError, Result};

/// Minimum trimmed content length accepted by every chat operation.
pub const MIN_CONTENT_CHARS: usize = 50;

/// The user-facing operations, used for logging and error presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Parse,
    Translate,
    Summarize,
    Theses,
    Post,
    ImagePrompt,
    ImageGeneration,
    Illustration,
}

impl OperationKind {
    /// Stable identifier used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Parse => "parse",
            OperationKind::Translate => "translate",
            OperationKind::Summarize => "summary",
            OperationKind::Theses => "theses",
            OperationKind::Post => "post",
            OperationKind::ImagePrompt => "image-prompt",
            OperationKind::ImageGeneration => "generate-image",
            OperationKind::Illustration => "illustration",
        }
    }
}

/// Fixed prompts and sampling parameters of one chat operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatOperation {
    pub kind: OperationKind,
    pub system_prompt: &'static str,
    /// Leading part of the user message.
    pub instruction: &'static str,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Content is silently cut to this many characters.
    pub content_budget: usize,
    /// JSON field the server reports the result under.
    pub output_field: &'static str,
}

impl ChatOperation {
    pub const TRANSLATE: ChatOperation = ChatOperation {
        kind: OperationKind::Translate,
        system_prompt: "Ты профессиональный переводчик. Переведи следующий текст с английского на русский язык, сохраняя структуру и стиль оригинала.",
        instruction: "Переведи на русский язык следующий текст:\n\n",
        temperature: 0.3,
        max_tokens: 4000,
        content_budget: 10_000,
        output_field: "translation",
    };

    pub const SUMMARY: ChatOperation = ChatOperation {
        kind: OperationKind::Summarize,
        system_prompt: "Ты профессиональный аналитик текстов. Создай краткое содержание следующей статьи на русском языке (2-3 абзаца). Краткое содержание должно быть информативным и отражать основные идеи статьи.",
        instruction: "Создай краткое содержание следующей статьи:\n\n",
        temperature: 0.5,
        max_tokens: 1000,
        content_budget: 8_000,
        output_field: "summary",
    };

    pub const THESES: ChatOperation = ChatOperation {
        kind: OperationKind::Theses,
        system_prompt: "Ты профессиональный аналитик. Извлеки ключевые тезисы из следующей статьи и представь их в виде нумерованного списка на русском языке. Каждый тезис должен быть четким и информативным.",
        instruction: "Извлеки ключевые тезисы из следующей статьи:\n\n",
        temperature: 0.4,
        max_tokens: 1500,
        content_budget: 8_000,
        output_field: "theses",
    };

    pub const POST: ChatOperation = ChatOperation {
        kind: OperationKind::Post,
        system_prompt: "Ты копирайтер для Telegram-каналов. Создай привлекательный пост на русском языке на основе следующей статьи. Используй эмодзи для визуального оформления, структурируй текст с помощью абзацев и списков, добавь призыв к действию в конце. Пост должен быть информативным, но при этом легко читаемым и интересным для аудитории Telegram.",
        instruction: "Создай Telegram-пост на основе следующей статьи:\n\n",
        temperature: 0.7,
        max_tokens: 2000,
        content_budget: 10_000,
        output_field: "post",
    };

    pub const IMAGE_PROMPT: ChatOperation = ChatOperation {
        kind: OperationKind::ImagePrompt,
        system_prompt: "You are a professional prompt engineer for AI image generation. Create detailed, descriptive prompts in English for generating images based on articles. The prompts should be specific, include style descriptions, mood, and key visual elements suitable for AI image generation models like Stable Diffusion.",
        instruction: "Создай детальный промпт на английском языке для генерации изображения на основе следующей статьи. Промпт должен быть конкретным, описательным и подходить для генерации изображения через AI (например, Stable Diffusion). Включи описание стиля, настроения и ключевых элементов.\n\n",
        temperature: 0.7,
        max_tokens: 500,
        content_budget: 5_000,
        output_field: "prompt",
    };

    /// Build the user message from already prepared content.
    ///
    /// Title and date are only used by the post and image prompt operations.
    pub fn user_message(&self, content: &str, title: Option<&str>, date: Option<&str>) -> String {
        let title = title.filter(|t| !t.is_empty());
        let date = date.filter(|d| !d.is_empty());
        let mut message = String::from(self.instruction);

        match self.kind {
            OperationKind::Post => {
                if let Some(title) = title {
                    message.push_str(&format!("Заголовок: {}\n", title));
                }
                if let Some(date) = date {
                    message.push_str(&format!("Дата: {}\n", date));
                }
                message.push_str("\nКонтент:\n");
            }
            OperationKind::ImagePrompt => {
                if let Some(title) = title {
                    message.push_str(&format!("Заголовок: {}\n\n", title));
                }
                message.push_str("Контент:\n");
            }
            _ => {}
        }

        message.push_str(content);
        message
    }
}

/// Validate and cut content before it is sent to a provider.
///
/// Empty content is a missing field; trimmed content shorter than
/// [`MIN_CONTENT_CHARS`] is rejected; longer content is truncated to
/// `budget` characters without error.
pub fn prepare_content(content: &str, budget: usize) -> Result<String> {
    if content.is_empty() {
        return Err(ReferentError::MissingField("content"));
    }

    let trimmed = content.trim();
    let actual = trimmed.chars().count();
    if actual < MIN_CONTENT_CHARS {
        return Err(ReferentError::ContentTooShort { min: MIN_CONTENT_CHARS, actual });
    }

    Ok(truncate_chars(trimmed, budget).to_string())
}
