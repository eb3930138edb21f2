use crate::app::ports::HeaderList;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Randomized pause, in seconds, as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DelayRange(pub f64, pub f64);

impl DelayRange {
    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

fn default_link_selector() -> String {
    "a".to_string()
}

fn default_image_selector() -> String {
    "img".to_string()
}

fn default_body_selector() -> String {
    "article, .entry-content, .content, .post-content".to_string()
}

fn default_job_delay() -> DelayRange {
    DelayRange(2.0, 4.0)
}

fn default_news_delay() -> DelayRange {
    DelayRange(2.0, 2.0)
}

fn default_retail_delay() -> DelayRange {
    DelayRange(1.5, 1.5)
}

fn default_true() -> bool {
    true
}

fn header_list(headers: &BTreeMap<String, String>) -> HeaderList {
    headers
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// How to read one job board.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSource {
    pub name: String,
    pub base_url: String,
    pub list_url: String,
    pub job_card_selector: String,
    pub title_selector: String,
    #[serde(default)]
    pub company_selector: Option<String>,
    #[serde(default)]
    pub location_selector: Option<String>,
    #[serde(default = "default_link_selector")]
    pub link_selector: String,
    #[serde(default)]
    pub detail_enabled: bool,
    #[serde(default)]
    pub detail_description_selector: Option<String>,
    #[serde(default)]
    pub detail_requirements_selector: Option<String>,
    /// Used verbatim instead of the company selector.
    #[serde(default)]
    pub fixed_company: Option<String>,
    /// Bypasses keyword classification.
    #[serde(default)]
    pub fixed_category: Option<String>,
    #[serde(default = "default_job_delay")]
    pub request_delay_range: DelayRange,
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

impl JobSource {
    pub fn headers(&self) -> HeaderList {
        header_list(&self.extra_headers)
    }
}

/// How to read one news portal.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsSource {
    pub name: String,
    pub base_url: String,
    pub list_url: String,
    pub article_selector: String,
    pub title_selector: String,
    #[serde(default = "default_link_selector")]
    pub link_selector: String,
    #[serde(default = "default_image_selector")]
    pub image_selector: String,
    #[serde(default = "default_body_selector")]
    pub body_selector: String,
    #[serde(default)]
    pub fixed_category: Option<String>,
    #[serde(default = "default_news_delay")]
    pub request_delay_range: DelayRange,
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

impl NewsSource {
    pub fn headers(&self) -> HeaderList {
        header_list(&self.extra_headers)
    }
}

/// How to read one store's promotions page.
#[derive(Debug, Clone, Deserialize)]
pub struct RetailSource {
    pub name: String,
    pub base_url: String,
    pub promo_url: String,
    pub item_selector: String,
    pub name_selector: String,
    pub price_selector: String,
    #[serde(default)]
    pub old_price_selector: Option<String>,
    #[serde(default)]
    pub img_selector: Option<String>,
    pub category: String,
    /// Visit the homepage first to pick up cookies.
    #[serde(default = "default_true")]
    pub warm_up: bool,
    #[serde(default = "default_retail_delay")]
    pub request_delay_range: DelayRange,
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

impl RetailSource {
    /// Extra headers plus a referer pointing at the store's own homepage.
    pub fn headers(&self) -> HeaderList {
        let mut headers = header_list(&self.extra_headers);
        if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("referer")) {
            headers.push(("Referer".to_string(), self.base_url.clone()));
        }
        headers
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedsConfig {
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    pub api_url: String,
    pub currencies: Vec<String>,
    /// Sell = buy * (1 + spread)
    pub spread: f64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            api_url: "https://open.er-api.com/v6/latest/USD".to_string(),
            currencies: vec!["USD".to_string(), "EUR".to_string()],
            spread: 0.02,
        }
    }
}
