//! HTML parsing and DOM queries.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and querying it with CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use referent_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use ego_tree::{NodeId, NodeRef};
use scraper::{Html, Node, Selector};

use crate::{ReferentError, Result};

/// Represents a parsed HTML document.
///
/// Parsing never fails: malformed markup is repaired the way a browser would
/// repair it.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Selects elements using a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ReferentError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use referent_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html);
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// First element matching `selector`, if any.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Gets the trimmed text of the `<title>` element, if present.
    pub fn title(&self) -> Option<String> {
        let title = self.select_first("title").ok()??.trimmed_text();
        if title.is_empty() { None } else { Some(title) }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ReferentError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use referent_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html);
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    ///
    /// Returns the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Text content with leading and trailing whitespace removed.
    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Gets the value of an attribute.
    ///
    /// Returns `None` if the attribute is not present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Tree id of this element.
    pub fn id(&self) -> NodeId {
        self.element.id()
    }

    /// Ids of this element and all of its ancestors, innermost first.
    pub fn lineage(&self) -> impl Iterator<Item = NodeId> + 'a {
        let node: NodeRef<'a, Node> = *self.element;
        std::iter::once(node.id()).chain(node.ancestors().map(|ancestor| ancestor.id()))
    }

    /// Text content, skipping every subtree whose root id fails `keep`.
    pub fn text_where(&self, keep: impl Fn(NodeId) -> bool) -> String {
        let mut text = String::new();
        collect_text(*self.element, &keep, &mut text);
        text
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ReferentError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }
}

fn collect_text(node: NodeRef<'_, Node>, keep: &impl Fn(NodeId) -> bool, out: &mut String) {
    for child in node.children() {
        if !keep(child.id()) {
            continue;
        }
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => collect_text(child, keep, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>  Test Page  </title>
        </head>
        <body>
            <h1>Heading</h1>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_select_first() {
        let doc = Document::parse(SAMPLE_HTML);
        let first = doc.select_first("p.content").unwrap().unwrap();
        assert_eq!(first.text(), "Paragraph 1");
        assert!(doc.select_first("article").unwrap().is_none());
    }

    #[test]
    fn test_element_attributes() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("a").unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].attr("href"), Some("https://example.com"));
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(ReferentError::HtmlParseError(_))));
    }

    #[test]
    fn test_missing_title() {
        let doc = Document::parse("<html><body><p>x</p></body></html>");
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn test_element_select_descendants_only() {
        let doc = Document::parse(r#"<div class="box"><div class="box">inner</div></div>"#);
        let outer = doc.select_first("div.box").unwrap().unwrap();
        let nested = outer.select("div.box").unwrap();

        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].text(), "inner");
    }

    #[test]
    fn test_lineage_contains_ancestors() {
        let doc = Document::parse("<section><p><b>bold</b></p></section>");
        let section = doc.select_first("section").unwrap().unwrap();
        let bold = doc.select_first("b").unwrap().unwrap();

        let lineage: Vec<_> = bold.lineage().collect();
        assert_eq!(lineage[0], bold.id());
        assert!(lineage.contains(&section.id()));
        assert!(!section.lineage().any(|id| id == bold.id()));
    }

    #[test]
    fn test_text_where_skips_subtrees() {
        let doc = Document::parse("<div><p>keep</p><aside>drop <b>this</b></aside><p>too</p></div>");
        let div = doc.select_first("div").unwrap().unwrap();
        let aside = doc.select_first("aside").unwrap().unwrap().id();

        assert_eq!(div.text_where(|id| id != aside), "keeptoo");
        assert_eq!(div.text_where(|_| true), div.text());
    }
}
