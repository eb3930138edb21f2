use super::image::extract_image;
use super::{
    clean_text, element_text, normalize_url, parse_optional_selector, parse_selector, select_text,
};
use crate::constants::{FALLBACK_COMPANY, FALLBACK_LOCATION};
use crate::error::Result;
use crate::registry::JobSource;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{info, warn};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Listing selectors tried when the configured card selector finds nothing.
const CANDIDATE_CARD_SELECTORS: [&str; 11] = [
    "li.job_listing",
    "article.job_listing",
    ".job-listing",
    ".job-item",
    ".vacancy-item",
    "li.job",
    ".job_item",
    ".base-card",
    "article.post",
    ".post",
    "article",
];

/// Elements whose boundaries become line breaks in block text.
const BLOCK_TAGS: [&str; 9] = ["li", "p", "br", "div", "tr", "h3", "h4", "h5", "h6"];

/// One job card from a listing page, with fallbacks already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct JobCard {
    pub url: String,
    pub title: String,
    pub company: String,
    pub location: String,
}

/// What the detail page adds to a card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDetail {
    pub description: String,
    pub requirements: Vec<String>,
    pub image_url: Option<String>,
    pub email: Option<String>,
}

struct CardSelectors {
    card: Selector,
    title: Selector,
    company: Option<Selector>,
    location: Option<Selector>,
    link: Selector,
}

impl CardSelectors {
    fn compile(source: &JobSource) -> Result<Self> {
        Ok(Self {
            card: parse_selector(&source.job_card_selector)?,
            title: parse_selector(&source.title_selector)?,
            company: parse_optional_selector(source.company_selector.as_deref())?,
            location: parse_optional_selector(source.location_selector.as_deref())?,
            link: parse_selector(&source.link_selector)?,
        })
    }
}

/// Extract every usable card from a listing page, in page order.
///
/// Cards without a title or a link are dropped. If the configured card
/// selector matches nothing, common listing selectors are tried instead.
pub fn parse_job_cards(html: &str, source: &JobSource) -> Result<Vec<JobCard>> {
    let selectors = CardSelectors::compile(source)?;
    let doc = Html::parse_document(html);

    let mut cards: Vec<ElementRef<'_>> = doc.select(&selectors.card).collect();
    if cards.is_empty() {
        warn!("⚠️  No cards for '{}' on {}, trying auto-detection", source.job_card_selector, source.name);
        if let Some(detected) = auto_detect_card_selector(&doc) {
            cards = doc.select(&detected).collect();
        }
    }

    Ok(cards
        .iter()
        .filter_map(|card| extract_job_card(card, &selectors, source))
        .collect())
}

fn auto_detect_card_selector(doc: &Html) -> Option<Selector> {
    CANDIDATE_CARD_SELECTORS.iter().find_map(|candidate| {
        let selector = Selector::parse(candidate).ok()?;
        let count = doc.select(&selector).count();
        (count >= 2).then(|| {
            info!("🔍 Auto-detected card selector '{}' ({} items)", candidate, count);
            selector
        })
    })
}

fn extract_job_card(card: &ElementRef<'_>, selectors: &CardSelectors, source: &JobSource) -> Option<JobCard> {
    let href = card
        .select(&selectors.link)
        .chain(card.select(&ANCHOR))
        .find_map(|a| a.value().attr("href"))?;
    let url = normalize_url(href, &source.base_url)?;

    let title = select_text(card, Some(&selectors.title))?;

    let company = source
        .fixed_company
        .as_deref()
        .map(clean_text)
        .filter(|c| !c.is_empty())
        .or_else(|| select_text(card, selectors.company.as_ref()))
        .unwrap_or_else(|| FALLBACK_COMPANY.to_string());

    let location = select_text(card, selectors.location.as_ref())
        .unwrap_or_else(|| FALLBACK_LOCATION.to_string());

    Some(JobCard {
        url,
        title,
        company,
        location,
    })
}

/// Pull description, requirements, picture and contact email from a detail page.
pub fn parse_job_detail(html: &str, source: &JobSource) -> Result<JobDetail> {
    let description_sel = parse_optional_selector(source.detail_description_selector.as_deref())?;
    let requirements_sel = parse_optional_selector(source.detail_requirements_selector.as_deref())?;
    let doc = Html::parse_document(html);

    let description = description_sel
        .as_ref()
        .and_then(|sel| doc.select(sel).next())
        .map(|el| clean_text(&element_text(&el, "\n")))
        .unwrap_or_default();

    let requirements = requirements_sel
        .as_ref()
        .and_then(|sel| doc.select(sel).next())
        .map(|el| split_requirements(&block_text(&el)))
        .unwrap_or_default();

    let image_url = extract_image(&doc, &source.base_url, description_sel.as_ref());
    let email = extract_email(&element_text(&doc.root_element(), " "));

    Ok(JobDetail {
        description,
        requirements,
        image_url,
        email,
    })
}

/// First email address in `text`.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

/// Text of an element with a line break at every block boundary.
fn block_text(element: &ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if BLOCK_TAGS.contains(&el.name()) => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// One requirement per line, bullets stripped, blank lines dropped.
pub fn split_requirements(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| clean_text(line.trim_matches(|c: char| c == '-' || c == '•' || c.is_whitespace())))
        .filter(|line| !line.is_empty())
        .collect()
}
