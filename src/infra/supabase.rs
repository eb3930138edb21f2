use crate::app::ports::{Filters, RemoteSinkPort};
use crate::config::Settings;
use crate::constants::SINK_TIMEOUT_SECS;
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Minimal PostgREST client for the hosted backend (`/rest/v1/<table>`).
///
/// Authenticates every call with the service credential as both `apikey`
/// and bearer token.
pub struct SupabaseRest {
    base_url: String,
    key: String,
    client: reqwest::Client,
}

impl SupabaseRest {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SINK_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: settings.supabase_url.trim_end_matches('/').to_string(),
            key: settings.supabase_key.clone(),
            client,
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.key.as_str())
            .header("Authorization", format!("Bearer {}", self.key))
    }

    async fn check(resp: reqwest::Response) -> Result<()> {
        let status = resp.status();
        if status.as_u16() >= 400 {
            let body = resp.text().await.unwrap_or_default();
            return Err(ScraperError::Api {
                message: format!("{} - {}", status.as_u16(), body),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteSinkPort for SupabaseRest {
    async fn select(&self, table: &str, filters: &Filters, columns: &str) -> Result<Vec<Value>> {
        let mut params: Vec<(&str, &str)> = vec![("select", columns)];
        params.extend(filters.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let resp = self
            .authorized(self.client.get(self.endpoint(table)))
            .query(&params)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ScraperError::Api {
                message: format!("select on {table} returned {}: {body}", status.as_u16()),
            });
        }
        let rows: Vec<Value> = resp.json().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, payload: &Value) -> Result<()> {
        let resp = self
            .authorized(self.client.post(self.endpoint(table)))
            .header("Prefer", "return=minimal")
            .json(payload)
            .send()
            .await?;
        Self::check(resp).await
    }

    async fn update(&self, table: &str, filters: &Filters, payload: &Value) -> Result<()> {
        let params: Vec<(&str, &str)> = filters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let resp = self
            .authorized(self.client.patch(self.endpoint(table)))
            .header("Prefer", "return=minimal")
            .query(&params)
            .json(payload)
            .send()
            .await?;
        Self::check(resp).await
    }
}
