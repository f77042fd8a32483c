//! HTML parsing and DOM queries.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! recipe and index pages and querying them with CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use simrecipe_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <p><strong>Film Simulation: Classic Chrome<br>Highlight: -1</strong></p>
//!             <a href="https://fujixweekly.com/2024/07/15/sample-recipe/">Sample</a>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.strong_tags().unwrap().len(), 1);
//! assert_eq!(doc.links().unwrap().len(), 1);
//! ```

use scraper::{Html, Selector};

use crate::flatten::RawTag;
use crate::{RecipeError, Result};

/// Represents a parsed HTML document.
///
/// # Example
///
/// ```rust
/// use simrecipe_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| RecipeError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Gets the title of the document.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }

    /// Every `<strong>` node of the page, in document order.
    pub fn strong_tags(&self) -> Result<Vec<RawTag>> {
        Ok(self.select("strong")?.iter().map(Element::raw_tag).collect())
    }

    /// Every `<a>` node of the page, in document order.
    pub fn links(&'_ self) -> Result<Vec<Element<'_>>> {
        self.select("a")
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use simrecipe_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
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
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Text of this element with `<br>` kept as line breaks.
    pub fn raw_tag(&self) -> RawTag {
        RawTag::from_element(self.element)
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
            <title>Kodak Portra 400</title>
        </head>
        <body>
            <p><strong>Film Simulation: Classic Chrome<br/>Dynamic Range: DR400</strong></p>
            <p><strong>Highlight: -1</strong></p>
            <a href="https://example.com/2024/01/02/portra-recipe/">Portra</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.title(), Some("Kodak Portra 400".to_string()));
    }

    #[test]
    fn test_strong_tags() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let tags = doc.strong_tags().unwrap();

        assert_eq!(tags.len(), 2);
        assert!(tags[0].has_breaks());
        assert_eq!(tags[0].text(), "Film Simulation: Classic Chrome\nDynamic Range: DR400");
        assert_eq!(tags[1].text(), "Highlight: -1");
    }

    #[test]
    fn test_links() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let links = doc.links().unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].attr("href"), Some("https://example.com/2024/01/02/portra-recipe/"));
        assert_eq!(links[0].text(), "Portra");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(RecipeError::HtmlParseError(_))));
    }
}
