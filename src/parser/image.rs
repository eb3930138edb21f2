use super::{first_attr, normalize_url};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

const LOGO_MARKERS: [&str; 4] = ["logo", "company", "employer", "brand"];
const LOGO_SCAN_LIMIT: usize = 5;
const IMAGE_ATTRS: [&str; 3] = ["src", "data-src", "data-lazy-src"];

static OG_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).expect("valid og:image selector"));
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("valid img selector"));

/// Best picture for a detail page.
///
/// Order: `og:image`, then a logo-looking image among the first few `<img>`,
/// then the first image inside `content` (the main content container).
/// The category placeholder is the caller's last resort.
pub fn extract_image(doc: &Html, base_url: &str, content: Option<&Selector>) -> Option<String> {
    let og = doc
        .select(&OG_IMAGE)
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(|src| normalize_url(src, base_url));
    if og.is_some() {
        return og;
    }

    let logo = doc.select(&IMG).take(LOGO_SCAN_LIMIT).find_map(|img| {
        let src = first_attr(&img, &IMAGE_ATTRS[..2])?;
        let lowered = src.to_lowercase();
        LOGO_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
            .then(|| normalize_url(src, base_url))
            .flatten()
    });
    if logo.is_some() {
        return logo;
    }

    let container = doc.select(content?).next()?;
    container
        .select(&IMG)
        .find_map(|img| first_attr(&img, &IMAGE_ATTRS).and_then(|src| normalize_url(src, base_url)))
}

/// First usable image URL under a card element.
pub fn card_image(card: &scraper::ElementRef<'_>, selector: Option<&Selector>, base_url: &str) -> Option<String> {
    let img = card.select(selector.unwrap_or(&IMG)).next()?;
    first_attr(&img, &IMAGE_ATTRS).and_then(|src| normalize_url(src, base_url))
}
