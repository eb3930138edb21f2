use crate::app::ports::{HeaderList, HttpClientPort, HttpGetResult};
use crate::constants::{ACCEPT, ACCEPT_LANGUAGE, DEFAULT_REFERER, USER_AGENT};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT as ACCEPT_HEADER, ACCEPT_LANGUAGE as ACCEPT_LANGUAGE_HEADER,
    CACHE_CONTROL, CONTENT_TYPE, REFERER,
};
use std::time::Duration;

/// reqwest-backed client that looks like a desktop browser.
///
/// One instance is shared by a whole run so its cookie store carries the
/// session cookies picked up by homepage warm-up visits.
pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_HEADER, HeaderValue::from_static(ACCEPT));
        headers.insert(ACCEPT_LANGUAGE_HEADER, HeaderValue::from_static(ACCEPT_LANGUAGE));
        headers.insert(REFERER, HeaderValue::from_static(DEFAULT_REFERER));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(
        &self,
        url: &str,
        extra_headers: &HeaderList,
        timeout: Duration,
    ) -> Result<HttpGetResult> {
        let mut request = self.client.get(url).timeout(timeout);
        for (name, value) in extra_headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        // text() honours the charset in Content-Type and falls back to UTF-8
        let body = resp.text().await?;
        Ok(HttpGetResult { status, body, content_type })
    }
}
