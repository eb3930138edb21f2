use super::image::{card_image, extract_image};
use super::{clean_text, element_text, normalize_url, parse_selector, select_text, truncate_chars};
use crate::constants::{FALLBACK_NEWS_TITLE, SUMMARY_LENGTH};
use crate::error::Result;
use crate::registry::NewsSource;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static STRIPPED_TAGS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script, style, iframe, ins, nav, footer").expect("valid strip selector")
});
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("valid body selector"));

#[derive(Debug, Clone, PartialEq)]
pub struct NewsCard {
    pub url: String,
    pub title: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsDetail {
    /// Sanitized article markup.
    pub body_html: String,
    pub summary: String,
    /// Page-level picture, used when the card had none.
    pub image_url: Option<String>,
}

/// Read up to `limit` article cards; cards without a link are dropped.
pub fn parse_news_cards(html: &str, source: &NewsSource, limit: usize) -> Result<Vec<NewsCard>> {
    let article_sel = parse_selector(&source.article_selector)?;
    let title_sel = parse_selector(&source.title_selector)?;
    let link_sel = parse_selector(&source.link_selector)?;
    let image_sel = parse_selector(&source.image_selector)?;
    let doc = Html::parse_document(html);

    let cards = doc
        .select(&article_sel)
        .take(limit)
        .filter_map(|article| {
            let href = article.select(&link_sel).find_map(|a| a.value().attr("href"))?;
            let url = normalize_url(href, &source.base_url)?;
            let title = select_text(&article, Some(&title_sel))
                .unwrap_or_else(|| FALLBACK_NEWS_TITLE.to_string());
            let image_url = card_image(&article, Some(&image_sel), &source.base_url);
            Some(NewsCard {
                url,
                title,
                image_url,
            })
        })
        .collect();
    Ok(cards)
}

/// Locate the article body, strip non-content subtrees and summarize it.
///
/// Falls back to the whole `<body>` when the body selector matches nothing.
pub fn parse_news_detail(html: &str, source: &NewsSource) -> Result<NewsDetail> {
    let body_sel = parse_selector(&source.body_selector)?;
    let mut doc = Html::parse_document(html);

    let image_url = extract_image(&doc, &source.base_url, Some(&body_sel));

    let Some(body_id) = doc
        .select(&body_sel)
        .next()
        .or_else(|| doc.select(&BODY).next())
        .map(|el| el.id())
    else {
        return Ok(NewsDetail {
            body_html: String::new(),
            summary: String::new(),
            image_url,
        });
    };

    let stripped: Vec<_> = doc
        .tree
        .get(body_id)
        .and_then(ElementRef::wrap)
        .map(|body| body.select(&STRIPPED_TAGS).map(|el| el.id()).collect())
        .unwrap_or_default();
    for id in stripped {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let (body_html, text) = doc
        .tree
        .get(body_id)
        .and_then(ElementRef::wrap)
        .map(|body| (body.html(), element_text(&body, " ")))
        .unwrap_or_default();

    Ok(NewsDetail {
        body_html,
        summary: summarize(&text),
        image_url,
    })
}

/// Whitespace-collapsed text, cut to the summary length with an ellipsis.
pub fn summarize(text: &str) -> String {
    let cleaned = clean_text(text);
    if cleaned.chars().count() > SUMMARY_LENGTH {
        format!("{}...", truncate_chars(&cleaned, SUMMARY_LENGTH))
    } else {
        cleaned
    }
}
