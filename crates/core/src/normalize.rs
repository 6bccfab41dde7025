//! Text normalization helpers used by the extractor and the gateway.
//!
//! Noise stripping marks nodes as removed in a [`Detached`] set instead of
//! rewriting markup, so removed nodes never contribute text. Whitespace
//! normalization collapses every run of whitespace into a single space.

use std::collections::HashSet;
use std::sync::LazyLock;

use ego_tree::NodeId;
use regex::Regex;

use crate::parse::Element;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Nodes removed from a content candidate before its text is measured.
pub const CONTENT_NOISE: &str = "script, style, nav, aside, footer, header, .ad, .advertisement, .sidebar";

/// Nodes removed from the `main` fallback. Class based noise is kept here.
pub const FALLBACK_NOISE: &str = "script, style, nav, aside, footer, header";

/// Collapse all whitespace runs to a single space and trim the ends.
///
/// The function is idempotent: normalizing its own output returns the same
/// string.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Nodes removed from a document during one extraction walk.
///
/// Removal is shared: a node stripped while measuring one candidate stays
/// removed for every later candidate, and removed nodes are never selected
/// again.
#[derive(Debug, Default)]
pub struct Detached {
    nodes: HashSet<NodeId>,
}

impl Detached {
    /// True when `element` or one of its ancestors has been removed.
    pub fn contains(&self, element: &Element<'_>) -> bool {
        element.lineage().any(|id| self.nodes.contains(&id))
    }

    /// Remove every descendant of `element` matching `noise`.
    pub fn strip(&mut self, element: &Element<'_>, noise: &str) {
        match element.select(noise) {
            Ok(found) => self.nodes.extend(found.iter().map(Element::id)),
            Err(err) => tracing::warn!(error = %err, "noise selector rejected, nothing stripped"),
        }
    }

    /// Text of `element` without the removed subtrees.
    pub fn text(&self, element: &Element<'_>) -> String {
        element.text_where(|id| !self.nodes.contains(&id))
    }
}

/// Truncate `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
