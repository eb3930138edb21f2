use super::{clean_text, element_text};
use crate::constants::{FALLBACK_FEED_SOURCE, FALLBACK_NEWS_TITLE};
use crate::error::Result;
use quick_xml::de::{Deserializer, EntityResolver};
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::BytesText;
use scraper::Html;
use serde::Deserialize;
use std::convert::Infallible;

/// Portals copy HTML named entities (`&ccedil;`, `&atilde;`) straight into
/// their feeds; resolve them instead of rejecting the document.
struct HtmlEntities;

impl EntityResolver for HtmlEntities {
    type Error = Infallible;

    fn capture(&mut self, _doctype: BytesText) -> std::result::Result<(), Self::Error> {
        Ok(())
    }

    fn resolve(&self, entity: &str) -> Option<&str> {
        resolve_html5_entity(entity)
    }
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    title: Option<String>,
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub summary: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    /// Channel title, or a generic source name when the feed has none.
    pub source: String,
    pub entries: Vec<FeedEntry>,
}

/// Parse an RSS 2.0 document, keeping the first `limit` entries that have a link.
pub fn parse_feed(xml: &str, limit: usize) -> Result<FeedDocument> {
    let scrubbed = scrub_html_entities(xml);
    let mut de = Deserializer::from_str_with_resolver(&scrubbed, HtmlEntities);
    let rss = Rss::deserialize(&mut de)?;

    let source = rss
        .channel
        .title
        .as_deref()
        .map(clean_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| FALLBACK_FEED_SOURCE.to_string());

    let entries = rss
        .channel
        .items
        .into_iter()
        .take(limit)
        .filter_map(|item| {
            let url = item.link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())?;
            let title = item
                .title
                .as_deref()
                .map(clean_text)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| FALLBACK_NEWS_TITLE.to_string());
            let summary = item.description.as_deref().map(strip_markup).unwrap_or_default();
            Some(FeedEntry { title, summary, url })
        })
        .collect();

    Ok(FeedDocument { source, entries })
}

/// Descriptions often carry HTML; keep the text only.
fn strip_markup(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    clean_text(&element_text(&html.root_element(), " "))
}

// HTML entities that are not valid XML
fn scrub_html_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
