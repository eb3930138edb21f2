//! Field extraction from listing pages and detail pages.
//!
//! Everything here is synchronous and works on owned strings: documents are
//! parsed, queried and dropped inside one call so no `Html` value ever lives
//! across an await point in the pipelines.

pub mod feed;
pub mod image;
pub mod job;
pub mod news;
pub mod price;
pub mod retail;

use crate::error::{Result, ScraperError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use url::Url;

pub use price::clean_price;

static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0b-\x1f\x7f]").expect("valid control-char regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Compile a CSS selector coming from adapter configuration.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScraperError::Selector {
        selector: selector.to_string(),
        message: format!("{e:?}"),
    })
}

/// Drop control characters, collapse runs of whitespace and trim.
pub fn clean_text(text: &str) -> String {
    let without_controls = CONTROL_CHARS.replace_all(text, "");
    WHITESPACE
        .replace_all(&without_controls, " ")
        .trim()
        .to_string()
}

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Resolve `raw` against `base_url`.
///
/// Absolute `http(s)` URLs pass through unchanged; anything else is joined
/// with standard URL-join semantics. Empty or unjoinable input yields `None`.
pub fn normalize_url(raw: &str, base_url: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }
    let base = Url::parse(base_url).ok()?;
    base.join(raw).ok().map(|u| u.to_string())
}

/// Whole text content of an element, text nodes joined by `separator`.
pub fn element_text(element: &ElementRef<'_>, separator: &str) -> String {
    element.text().collect::<Vec<_>>().join(separator)
}

/// Cleaned text of the first match of `selector` under `scope`.
///
/// An empty result (no match or only whitespace) is `None`.
pub fn select_text(scope: &ElementRef<'_>, selector: Option<&Selector>) -> Option<String> {
    let found = scope.select(selector?).next()?;
    let text = clean_text(&element_text(&found, " "));
    (!text.is_empty()).then_some(text)
}

/// First non-blank attribute among `attrs` on `element`.
pub fn first_attr<'a>(element: &ElementRef<'a>, attrs: &[&str]) -> Option<&'a str> {
    attrs
        .iter()
        .filter_map(|attr| element.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
}

/// Compile an optional selector; `None` and blank strings stay `None`.
pub fn parse_optional_selector(selector: Option<&str>) -> Result<Option<Selector>> {
    match selector.map(str::trim) {
        Some(s) if !s.is_empty() => parse_selector(s).map(Some),
        _ => Ok(None),
    }
}
