use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Header name/value pairs layered on top of the client's browser defaults.
pub type HeaderList = Vec<(String, String)>;

/// PostgREST-style filters: `(column, "eq.value")`.
pub type Filters = Vec<(String, String)>;

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub body: String,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Fetch-side port
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(
        &self,
        url: &str,
        extra_headers: &HeaderList,
        timeout: Duration,
    ) -> Result<HttpGetResult>;
}

// Sink-side port
#[async_trait]
pub trait RemoteSinkPort: Send + Sync {
    async fn select(&self, table: &str, filters: &Filters, columns: &str) -> Result<Vec<Value>>;
    async fn insert(&self, table: &str, payload: &Value) -> Result<()>;
    async fn update(&self, table: &str, filters: &Filters, payload: &Value) -> Result<()>;
}
