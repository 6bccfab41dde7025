use crate::extract::{DATE_RULES, ExtractConfig, TITLE_RULES, first_qualifying};
use crate::parse::Document;

impl Document {
    /// Extract title with priority fallback:
    /// 1. First of `h1`, `article h1`, `.post-title`, `.article-title`,
    ///    `[class*="title"]`, `<title>` whose text is longer than
    ///    `config.title_min_chars`
    /// 2. Open Graph `og:title`
    /// 3. Meta `title`
    /// 4. `<title>` element, whatever its length
    pub fn extract_title(&self, config: &ExtractConfig) -> Option<String> {
        if let Some(title) = first_qualifying(self, TITLE_RULES, config.title_min_chars) {
            return Some(title);
        }

        if let Some(title) = self.meta_content("meta[property=\"og:title\"]") {
            return Some(title);
        }

        if let Some(title) = self.meta_content("meta[name=\"title\"]") {
            return Some(title);
        }

        self.title()
    }

    /// Extract the publication date as a raw string.
    ///
    /// Each rule of [`DATE_RULES`] is tried in order; for the first matching
    /// element the `datetime` attribute is preferred, then `content`, then the
    /// element text. The first non-empty value wins and is not parsed.
    pub fn extract_date(&self) -> Option<String> {
        first_qualifying(self, DATE_RULES, 0)
    }

    /// Get the non-empty `content` attribute of the first element matching `selector`
    fn meta_content(&self, selector: &str) -> Option<String> {
        let element = self.select_first(selector).ok()??;
        element.attr("content").filter(|c| !c.is_empty()).map(str::to_string)
    }
}
