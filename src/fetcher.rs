use crate::app::ports::{HeaderList, HttpClientPort};
use crate::constants::WARM_UP_TIMEOUT_SECS;
use std::time::Duration;
use tracing::{debug, warn};

/// GET a page and return its body.
///
/// Transport errors, timeouts and non-2xx statuses are logged and become
/// `None`; a failed page never aborts the run.
pub async fn fetch_page(
    http: &dyn HttpClientPort,
    url: &str,
    extra_headers: &HeaderList,
    timeout_secs: u64,
) -> Option<String> {
    match http.get(url, extra_headers, Duration::from_secs(timeout_secs)).await {
        Ok(resp) if resp.is_success() => {
            debug!("Fetched {} ({} bytes, {})", url, resp.body.len(), resp.content_type);
            Some(resp.body)
        }
        Ok(resp) => {
            warn!("⚠️  {} returned HTTP {}", url, resp.status);
            None
        }
        Err(e) => {
            warn!("⚠️  Failed to fetch {}: {}", url, e);
            None
        }
    }
}

/// Visit a site's homepage so the shared cookie store picks up its session.
///
/// The outcome is deliberately ignored.
pub async fn warm_up(http: &dyn HttpClientPort, base_url: &str) {
    let timeout = Duration::from_secs(WARM_UP_TIMEOUT_SECS);
    if let Err(e) = http.get(base_url, &HeaderList::new(), timeout).await {
        debug!("Warm-up visit to {} failed: {}", base_url, e);
    }
}
