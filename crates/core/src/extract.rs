//! Heuristic article extraction.
//!
//! Every field is extracted by walking an ordered table of [`SelectorRule`]s:
//! the first matching element of each rule yields a candidate value, and the
//! first candidate that passes the field's length check wins. Title and date
//! tables live here next to the content table; the per-field walks are on
//! [`Document`] in [`crate::metadata`].

use crate::article::ArticleRecord;
use crate::normalize::{CONTENT_NOISE, Detached, FALLBACK_NOISE, normalize_whitespace};
use crate::parse::{Document, Element};

/// Configuration for content extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// A title candidate must be longer than this many characters
    pub title_min_chars: usize,
    /// A content candidate must be longer than this many characters
    pub content_min_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { title_min_chars: 10, content_min_chars: 100 }
    }
}

/// How a value is read from the first element a rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Trimmed text content.
    Text,
    /// `datetime` attribute, then `content` attribute, then trimmed text.
    DateValue,
    /// Trimmed text after removing descendants matching the noise selectors.
    StrippedText(&'static str),
}

/// One entry of an ordered selector table.
#[derive(Debug, Clone, Copy)]
pub struct SelectorRule {
    pub selector: &'static str,
    pub extraction: Extraction,
}

impl SelectorRule {
    const fn text(selector: &'static str) -> Self {
        Self { selector, extraction: Extraction::Text }
    }

    const fn date(selector: &'static str) -> Self {
        Self { selector, extraction: Extraction::DateValue }
    }

    const fn stripped(selector: &'static str) -> Self {
        Self { selector, extraction: Extraction::StrippedText(CONTENT_NOISE) }
    }

    /// Value read from the first element matching this rule.
    ///
    /// `None` when nothing matches; the value itself may be empty.
    pub fn apply(&self, doc: &Document) -> Option<String> {
        self.apply_detached(doc, &mut Detached::default())
    }

    /// Like [`SelectorRule::apply`], within a walk that removes nodes.
    ///
    /// Elements already removed are not matched, and noise stripped from the
    /// matched element is recorded in `detached`.
    pub fn apply_detached(&self, doc: &Document, detached: &mut Detached) -> Option<String> {
        let element = match doc.select(self.selector) {
            Ok(found) => found.into_iter().find(|el| !detached.contains(el))?,
            Err(err) => {
                tracing::warn!(selector = self.selector, error = %err, "skipping invalid selector");
                return None;
            }
        };
        Some(read_value(&element, self.extraction, detached))
    }
}

fn read_value(element: &Element<'_>, extraction: Extraction, detached: &mut Detached) -> String {
    match extraction {
        Extraction::Text => detached.text(element).trim().to_string(),
        Extraction::DateValue => element
            .attr("datetime")
            .filter(|v| !v.is_empty())
            .or_else(|| element.attr("content").filter(|v| !v.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| element.trimmed_text()),
        Extraction::StrippedText(noise) => {
            detached.strip(element, noise);
            detached.text(element).trim().to_string()
        }
    }
}

/// Walk `rules` in order and return the first value longer than `min_chars`.
pub fn first_qualifying(doc: &Document, rules: &[SelectorRule], min_chars: usize) -> Option<String> {
    first_qualifying_detached(doc, rules, min_chars, &mut Detached::default())
}

fn first_qualifying_detached(
    doc: &Document,
    rules: &[SelectorRule],
    min_chars: usize,
    detached: &mut Detached,
) -> Option<String> {
    for rule in rules {
        let value = rule.apply_detached(doc, detached).filter(|v| v.chars().count() > min_chars);
        if value.is_some() {
            return value;
        }
    }
    None
}

/// Title candidates, highest priority first.
pub const TITLE_RULES: &[SelectorRule] = &[
    SelectorRule::text("h1"),
    SelectorRule::text("article h1"),
    SelectorRule::text(".post-title"),
    SelectorRule::text(".article-title"),
    SelectorRule::text("[class*=\"title\"]"),
    SelectorRule::text("title"),
];

/// Date candidates, highest priority first.
pub const DATE_RULES: &[SelectorRule] = &[
    SelectorRule::date("time[datetime]"),
    SelectorRule::date("time"),
    SelectorRule::date("[class*=\"date\"]"),
    SelectorRule::date("[class*=\"published\"]"),
    SelectorRule::date("[class*=\"time\"]"),
    SelectorRule::date("article time"),
    SelectorRule::date(".post-date"),
    SelectorRule::date(".article-date"),
    SelectorRule::date("meta[property=\"article:published_time\"]"),
    SelectorRule::date("meta[name=\"date\"]"),
    SelectorRule::date("meta[name=\"publish-date\"]"),
];

/// Content containers, highest priority first.
pub const CONTENT_RULES: &[SelectorRule] = &[
    SelectorRule::stripped("article"),
    SelectorRule::stripped(".post"),
    SelectorRule::stripped(".content"),
    SelectorRule::stripped(".article-content"),
    SelectorRule::stripped("[class*=\"article\"]"),
    SelectorRule::stripped("[class*=\"post-content\"]"),
    SelectorRule::stripped("[class*=\"entry-content\"]"),
    SelectorRule::stripped("main article"),
    SelectorRule::stripped(".post-body"),
    SelectorRule::stripped(".article-body"),
];

/// Last resort when no content rule qualifies. No length check applies.
pub const CONTENT_FALLBACK: SelectorRule =
    SelectorRule { selector: "main, [role=\"main\"]", extraction: Extraction::StrippedText(FALLBACK_NOISE) };

/// Extract the main text of the document.
///
/// Content rules and the `main` fallback share one [`Detached`] set: noise
/// stripped from a rejected candidate stays out of every later candidate.
///
/// Returns whitespace-normalized text, or `None` when neither a content rule
/// nor the `main` fallback produced any text.
pub fn extract_content(doc: &Document, config: &ExtractConfig) -> Option<String> {
    let mut detached = Detached::default();
    let raw = match first_qualifying_detached(doc, CONTENT_RULES, config.content_min_chars, &mut detached) {
        Some(value) => value,
        None => CONTENT_FALLBACK.apply_detached(doc, &mut detached)?,
    };

    let normalized = normalize_whitespace(&raw);
    if normalized.is_empty() { None } else { Some(normalized) }
}

/// Extract title, date and content with the default thresholds.
///
/// Never fails: a page without any recognizable element yields a record with
/// every field set to `None`.
///
/// # Example
///
/// ```rust
/// use referent_core::extract_article;
///
/// let record = extract_article("<html><body><p>nothing here</p></body></html>");
/// assert!(record.title.is_none());
/// assert!(record.published_date.is_none());
/// assert!(record.content.is_none());
/// ```
pub fn extract_article(html: &str) -> ArticleRecord {
    extract_article_with_config(html, &ExtractConfig::default())
}

/// Extract title, date and content with explicit thresholds.
pub fn extract_article_with_config(html: &str, config: &ExtractConfig) -> ArticleRecord {
    let doc = Document::parse(html);

    let record = ArticleRecord {
        title: doc.extract_title(config),
        published_date: doc.extract_date(),
        content: extract_content(&doc, config),
    };

    tracing::debug!(
        title = record.title.is_some(),
        date = record.published_date.is_some(),
        content_chars = record.content.as_deref().map(|c| c.chars().count()).unwrap_or(0),
        "article extracted"
    );

    record
}
