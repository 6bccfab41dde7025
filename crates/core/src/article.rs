//! Extracted article record.
//!
//! [`ArticleRecord`] is the only output of the content extractor. Every
//! field is optional: a page without any recognizable element still yields
//! a valid record with all fields `None`.

use serde::{Deserialize, Serialize};

use crate::{ReferentError, Result};

/// Title, publication date and main text of one page.
///
/// Serialized as `{"title", "date", "content"}` with explicit `null`s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Best title candidate.
    pub title: Option<String>,

    /// Raw publication date string, passed through unparsed.
    #[serde(rename = "date")]
    pub published_date: Option<String>,

    /// Whitespace-normalized main text.
    pub content: Option<String>,
}

impl ArticleRecord {
    /// True when no field could be extracted.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.published_date.is_none() && self.content.is_none()
    }

    /// Character count of the content, zero when absent.
    pub fn content_chars(&self) -> usize {
        self.content.as_deref().map(|c| c.chars().count()).unwrap_or(0)
    }

    /// Gets the record as structured JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| ReferentError::HtmlParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_date_key_and_nulls() {
        let record = ArticleRecord { title: Some("Title".to_string()), published_date: None, content: None };
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains(r#""title":"Title""#));
        assert!(json.contains(r#""date":null"#));
        assert!(json.contains(r#""content":null"#));
        assert!(!json.contains("published_date"));
    }

    #[test]
    fn test_deserializes_from_wire_shape() {
        let record: ArticleRecord =
            serde_json::from_str(r#"{"title":null,"date":"2024-01-01","content":"Body"}"#).unwrap();
        assert_eq!(record.published_date.as_deref(), Some("2024-01-01"));
        assert_eq!(record.content.as_deref(), Some("Body"));
    }

    #[test]
    fn test_is_empty() {
        assert!(ArticleRecord::default().is_empty());
        let record = ArticleRecord { content: Some("x".to_string()), ..Default::default() };
        assert!(!record.is_empty());
    }

    #[test]
    fn test_content_chars_counts_characters() {
        let record = ArticleRecord { content: Some("привет".to_string()), ..Default::default() };
        assert_eq!(record.content_chars(), 6);
        assert_eq!(ArticleRecord::default().content_chars(), 0);
    }

    #[test]
    fn test_to_json() {
        let json = ArticleRecord::default().to_json().unwrap();
        assert!(json.is_object());
        assert!(json.get("date").unwrap().is_null());
    }
}
