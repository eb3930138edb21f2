#![allow(dead_code)]

use ango_scraper::app::ports::{Filters, HeaderList, HttpClientPort, HttpGetResult, RemoteSinkPort};
use ango_scraper::error::{Result, ScraperError};
use ango_scraper::pipeline::PipelineContext;
use ango_scraper::storage::InMemorySink;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned responses keyed by URL; unknown URLs fail like a refused connection.
#[derive(Default)]
pub struct FakeHttp {
    pages: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<(String, HeaderList)>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), (200, body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), (status, String::new()));
        self
    }

    /// Every GET so far, in order, with the extra headers it carried.
    pub fn requests(&self) -> Vec<(String, HeaderList)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested(&self, url: &str) -> bool {
        self.requests().iter().any(|(u, _)| u == url)
    }
}

#[async_trait]
impl HttpClientPort for FakeHttp {
    async fn get(&self, url: &str, extra_headers: &HeaderList, _timeout: Duration) -> Result<HttpGetResult> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), extra_headers.clone()));
        match self.pages.get(url) {
            Some((status, body)) => Ok(HttpGetResult {
                status: *status,
                body: body.clone(),
                content_type: "text/html; charset=utf-8".to_string(),
            }),
            None => Err(ScraperError::Api {
                message: format!("connection refused: {url}"),
            }),
        }
    }
}

/// Sink whose existence checks always fail while inserts go through.
#[derive(Clone, Default)]
pub struct FlakySelectSink {
    pub inner: InMemorySink,
}

#[async_trait]
impl RemoteSinkPort for FlakySelectSink {
    async fn select(&self, _table: &str, _filters: &Filters, _columns: &str) -> Result<Vec<Value>> {
        Err(ScraperError::Api {
            message: "503 - upstream unavailable".to_string(),
        })
    }

    async fn insert(&self, table: &str, payload: &Value) -> Result<()> {
        self.inner.insert(table, payload).await
    }

    async fn update(&self, table: &str, filters: &Filters, payload: &Value) -> Result<()> {
        self.inner.update(table, filters, payload).await
    }
}

/// Sink that rejects every insert.
#[derive(Clone, Default)]
pub struct RejectingSink;

#[async_trait]
impl RemoteSinkPort for RejectingSink {
    async fn select(&self, _table: &str, _filters: &Filters, _columns: &str) -> Result<Vec<Value>> {
        Ok(Vec::new())
    }

    async fn insert(&self, _table: &str, _payload: &Value) -> Result<()> {
        Err(ScraperError::Api {
            message: "400 - invalid input syntax".to_string(),
        })
    }

    async fn update(&self, _table: &str, _filters: &Filters, _payload: &Value) -> Result<()> {
        Ok(())
    }
}

pub fn context(http: Arc<FakeHttp>, sink: Arc<dyn RemoteSinkPort>) -> PipelineContext {
    PipelineContext::new(http, sink)
}
