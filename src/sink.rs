use crate::app::ports::{Filters, RemoteSinkPort};
use crate::constants::MAX_LOGGED_PAYLOAD;
use crate::error::Result;
use crate::parser::truncate_chars;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

/// Build an `eq.` filter pair.
pub fn eq_filter(column: &str, value: &str) -> (String, String) {
    (column.to_string(), format!("eq.{value}"))
}

/// The remote table store as the pipelines see it.
///
/// Inserts and updates report success as a boolean; failures are logged with
/// the payload (truncated) and never retried.
#[derive(Clone)]
pub struct RemoteSink {
    port: Arc<dyn RemoteSinkPort>,
}

impl RemoteSink {
    pub fn new(port: Arc<dyn RemoteSinkPort>) -> Self {
        Self { port }
    }

    pub async fn select(&self, table: &str, filters: &Filters, columns: &str) -> Result<Vec<Value>> {
        self.port.select(table, filters, columns).await
    }

    pub async fn insert(&self, table: &str, payload: &Value) -> bool {
        match self.port.insert(table, payload).await {
            Ok(()) => {
                debug!("Insert into {} accepted", table);
                true
            }
            Err(e) => {
                error!("❌ Insert into {} failed: {}", table, e);
                error!("Payload: {}", truncate_chars(&payload.to_string(), MAX_LOGGED_PAYLOAD));
                false
            }
        }
    }

    pub async fn update(&self, table: &str, filters: &Filters, payload: &Value) -> bool {
        match self.port.update(table, filters, payload).await {
            Ok(()) => true,
            Err(e) => {
                error!("❌ Update on {} failed: {}", table, e);
                error!("Payload: {}", truncate_chars(&payload.to_string(), MAX_LOGGED_PAYLOAD));
                false
            }
        }
    }
}
