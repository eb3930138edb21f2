use super::image::card_image;
use super::{clean_price, element_text, normalize_url, parse_optional_selector, parse_selector, select_text};
use crate::error::Result;
use crate::registry::RetailSource;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

const FLYER_KEYWORDS: [&str; 5] = ["folheto", "pdf", "promo", "catalogo", "ver ofertas"];

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

#[derive(Debug, Clone, PartialEq)]
pub struct DealItem {
    pub name: String,
    pub price: f64,
    pub old_price: Option<f64>,
    pub image_url: Option<String>,
}

/// What a store's promotions page yielded.
#[derive(Debug, Clone, PartialEq)]
pub enum PromoPage {
    /// Product cards, capped at the per-store limit.
    Items(Vec<DealItem>),
    /// No cards; a link to a digital flyer instead.
    Flyer(String),
    Empty,
}

/// Read product cards from a promotions page, or its flyer link when no card matches.
pub fn parse_promo_page(html: &str, source: &RetailSource, limit: usize) -> Result<PromoPage> {
    let item_sel = parse_selector(&source.item_selector)?;
    let name_sel = parse_selector(&source.name_selector)?;
    let price_sel = parse_selector(&source.price_selector)?;
    let old_price_sel = parse_optional_selector(source.old_price_selector.as_deref())?;
    let img_sel = parse_optional_selector(source.img_selector.as_deref())?;
    let doc = Html::parse_document(html);

    let cards: Vec<_> = doc.select(&item_sel).collect();
    if cards.is_empty() {
        return Ok(find_flyer_link(&doc, &source.base_url).map_or(PromoPage::Empty, PromoPage::Flyer));
    }

    let items = cards
        .iter()
        .take(limit)
        .filter_map(|card| {
            let name = select_text(card, Some(&name_sel))?;
            let price = clean_price(&select_text(card, Some(&price_sel))?);
            let old_price = select_text(card, old_price_sel.as_ref()).map(|text| clean_price(&text));
            let image_url = card_image(card, img_sel.as_ref(), &source.base_url);
            Some(DealItem {
                name,
                price,
                old_price,
                image_url,
            })
        })
        .collect();
    Ok(PromoPage::Items(items))
}

/// First anchor that looks like a flyer, by its text or a `.pdf` href.
fn find_flyer_link(doc: &Html, base_url: &str) -> Option<String> {
    let anchor = doc.select(&ANCHOR).find(|a| {
        let text = element_text(a, " ").to_lowercase();
        let href = a.value().attr("href").unwrap_or_default().to_lowercase();
        FLYER_KEYWORDS.iter().any(|kw| text.contains(kw)) || href.contains(".pdf")
    })?;
    normalize_url(anchor.value().attr("href")?, base_url)
}
