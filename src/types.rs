//! Insert payloads for the remote tables.
//!
//! Field names are the column names of the remote schema, which mixes
//! English and Portuguese. Records are built once and serialized once.

use crate::constants::{MAX_DESCRIPTION, MAX_SHORT_FIELD};
use crate::parser::truncate_chars;
use chrono::Utc;
use serde::Serialize;

/// Creation timestamp in UTC, RFC 3339.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Row for the `jobs` table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: Vec<String>,
    /// Contact email, or "Candidatar via: <url>" when the page has none.
    pub application_email: String,
    pub imagem_url: String,
    pub source_url: String,
    pub categoria: String,
    pub status: String,
    pub posted_at: String,
}

impl JobRecord {
    /// Cap text columns at their remote widths.
    pub fn truncated(mut self) -> Self {
        self.title = truncate_chars(&self.title, MAX_SHORT_FIELD);
        self.company = truncate_chars(&self.company, MAX_SHORT_FIELD);
        self.location = truncate_chars(&self.location, MAX_SHORT_FIELD);
        self.application_email = truncate_chars(&self.application_email, MAX_SHORT_FIELD);
        self.description = truncate_chars(&self.description, MAX_DESCRIPTION);
        self
    }
}

/// Row for the `news_articles` table, scraped from a portal.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewsRecord {
    pub titulo: String,
    pub resumo: String,
    pub corpo: String,
    pub imagem_url: String,
    pub categoria: String,
    pub fonte: String,
    pub url_origem: String,
    pub status: String,
    pub is_priority: bool,
    pub published_at: String,
}

/// Row for `product_deals`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DealRecord {
    pub title: String,
    pub store: String,
    pub discount_price: f64,
    pub original_price: Option<f64>,
    pub image_placeholder: Option<String>,
    pub category: String,
    pub status: String,
    pub submitted_by: String,
    pub created_at: String,
}

/// A store's digital flyer, stored in `product_deals` when no product cards exist.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlyerRecord {
    pub title: String,
    pub store: String,
    pub url: String,
    pub category: String,
    pub image_placeholder: String,
    pub status: String,
    pub submitted_by: String,
    pub created_at: String,
}

/// Row for `news_articles` coming from an RSS feed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedRecord {
    pub title: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub category: String,
    pub status: String,
    pub published_at: String,
}

/// Row for `exchange_rates`, AOA per unit of `currency`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RateRecord {
    pub currency: String,
    pub formal_buy: f64,
    pub formal_sell: f64,
    pub informal_buy: f64,
    pub informal_sell: f64,
    pub last_updated: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_record_truncates_long_fields() {
        let record = JobRecord {
            title: "x".repeat(300),
            company: "Empresa".to_string(),
            location: "Luanda".to_string(),
            description: "d".repeat(6000),
            requirements: vec![],
            application_email: "rh@empresa.ao".to_string(),
            imagem_url: String::new(),
            source_url: "https://x.com/1".to_string(),
            categoria: "Geral".to_string(),
            status: "pendente".to_string(),
            posted_at: now_timestamp(),
        }
        .truncated();
        assert_eq!(record.title.chars().count(), MAX_SHORT_FIELD);
        assert_eq!(record.description.chars().count(), MAX_DESCRIPTION);
        assert_eq!(record.company, "Empresa");
    }

    #[test]
    fn test_deal_record_serializes_missing_values_as_null() {
        let record = DealRecord {
            title: "Óleo 1L".to_string(),
            store: "Kero".to_string(),
            discount_price: 1500.0,
            original_price: None,
            image_placeholder: None,
            category: "Misto".to_string(),
            status: "pending".to_string(),
            submitted_by: "scraper".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["original_price"], json!(null));
        assert_eq!(value["discount_price"], json!(1500.0));
    }
}
