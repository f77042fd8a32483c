//! Turns bold-text HTML nodes into logical `"Key: Value"` lines.
//!
//! Recipe pages write their settings as `<strong>` blocks, one setting per
//! visual line, separated by `<br>`. Authors wrap values, nest links inside
//! values and sprinkle non-breaking spaces; [`flatten_and_process_tags`]
//! undoes all of that.
//!
//! # Example
//!
//! ```rust
//! use simrecipe_core::flatten::{RawTag, flatten_and_process_tags};
//!
//! let tags = vec![RawTag::from_lines(["Film Simulation:", "Classic Chrome", "Highlight: -1"])];
//! let lines: Vec<String> = flatten_and_process_tags(&tags).collect();
//!
//! assert_eq!(lines, vec!["Film Simulation: Classic Chrome", "Highlight: -1"]);
//! ```

use std::collections::VecDeque;

use scraper::{ElementRef, Node};

const NBSP: char = '\u{a0}';

/// Text of one bold node, with `<br>` elements turned into `'\n'`.
///
/// Nested markup such as links or emphasis contributes only its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    text: String,
    has_breaks: bool,
}

impl RawTag {
    /// Builds a tag from text whose line breaks are already `'\n'`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let has_breaks = text.contains('\n');
        Self { text, has_breaks }
    }

    /// Builds a tag whose visual lines are separated by line breaks.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<String> = lines.into_iter().map(|line| line.as_ref().to_string()).collect();
        Self { text: lines.join("\n"), has_breaks: lines.len() > 1 }
    }

    /// Collects the text of an element, keeping link text and marking `<br>`.
    pub fn from_element(element: ElementRef<'_>) -> Self {
        let mut text = String::new();
        let mut has_breaks = false;

        for node in element.descendants() {
            match node.value() {
                Node::Text(t) => text.push_str(t),
                Node::Element(e) if e.name().eq_ignore_ascii_case("br") => {
                    text.push('\n');
                    has_breaks = true;
                }
                _ => {}
            }
        }

        Self { text, has_breaks }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn has_breaks(&self) -> bool {
        self.has_breaks
    }

    /// Logical lines of this tag alone.
    pub fn logical_lines(&self) -> Vec<String> {
        if !self.has_breaks {
            let line = self.text.trim();
            return if line.is_empty() { Vec::new() } else { vec![normalize_spaces(line)] };
        }

        let raw: Vec<&str> = self.text.split('\n').map(str::trim).filter(|line| !line.is_empty()).collect();
        merge_continuations(&raw).iter().map(|line| normalize_spaces(line)).collect()
    }
}

/// Joins a line ending in `:` with the colon-free lines that follow it.
fn merge_continuations(lines: &[&str]) -> Vec<String> {
    let mut merged = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let mut line = lines[i].to_string();
        i += 1;

        if line.ends_with(':') {
            while i < lines.len() && !lines[i].contains(':') {
                line.push(' ');
                line.push_str(lines[i]);
                i += 1;
            }
        }

        merged.push(line);
    }

    merged
}

fn normalize_spaces(line: &str) -> String {
    line.replace(NBSP, " ")
}

/// Lazy iterator over the logical lines of a slice of tags.
///
/// Cloning the iterator, or calling [`flatten_and_process_tags`] again on
/// the same slice, restarts the sequence.
#[derive(Debug, Clone)]
pub struct LogicalLines<'a> {
    tags: std::slice::Iter<'a, RawTag>,
    pending: VecDeque<String>,
}

impl Iterator for LogicalLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(line);
            }
            let tag = self.tags.next()?;
            self.pending.extend(tag.logical_lines());
        }
    }
}

/// Flattens every tag into logical lines, in source order.
pub fn flatten_and_process_tags(tags: &[RawTag]) -> LogicalLines<'_> {
    LogicalLines { tags: tags.iter(), pending: VecDeque::new() }
}
