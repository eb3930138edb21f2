use crate::app::ports::Filters;
use crate::constants::{DEALS_TABLE, FALLBACK_COMPANY, JOBS_TABLE};
use crate::sink::{eq_filter, RemoteSink};
use tracing::warn;

/// Existence checks against the remote tables.
///
/// Every check is fail-open: when the lookup itself fails the record is
/// treated as new and the failure is logged.
#[derive(Clone)]
pub struct Deduplicator {
    sink: RemoteSink,
}

impl Deduplicator {
    pub fn new(sink: RemoteSink) -> Self {
        Self { sink }
    }

    /// Is there already a row in `table` whose `column` equals `url`?
    pub async fn url_exists(&self, table: &str, column: &str, url: &str) -> bool {
        self.exists(table, vec![eq_filter(column, url)]).await
    }

    /// Same job title at the same company.
    ///
    /// Anonymous postings ("Empresa Confidencial") are never matched this way,
    /// since different employers share that name.
    pub async fn job_exists(&self, title: &str, company: &str) -> bool {
        if title.is_empty() || company.is_empty() || company == FALLBACK_COMPANY {
            return false;
        }
        self.exists(
            JOBS_TABLE,
            vec![eq_filter("title", title), eq_filter("company", company)],
        )
        .await
    }

    /// Same product title at the same store.
    pub async fn deal_exists(&self, title: &str, store: &str) -> bool {
        self.exists(
            DEALS_TABLE,
            vec![eq_filter("title", title), eq_filter("store", store)],
        )
        .await
    }

    async fn exists(&self, table: &str, filters: Filters) -> bool {
        match self.sink.select(table, &filters, "id").await {
            Ok(rows) => !rows.is_empty(),
            Err(e) => {
                warn!("⚠️  Duplicate check on {} failed, treating as new: {}", table, e);
                false
            }
        }
    }
}
