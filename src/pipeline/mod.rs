//! The per-pipeline loops and the bookkeeping they share.
//!
//! Every source is its own failure boundary: an error inside one source is
//! recorded on that source's report and the loop moves on to the next.

pub mod feeds;
pub mod jobs;
pub mod news;
pub mod rates;
pub mod retail;

use crate::app::ports::{HttpClientPort, RemoteSinkPort};
use crate::constants::RETAIL_PIPELINE;
use crate::dedup::Deduplicator;
use crate::sink::RemoteSink;
use metrics::counter;
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, warn};

pub use feeds::run_feeds;
pub use jobs::{run_jobs, JobsOptions};
pub use news::run_news;
pub use rates::run_rates;
pub use retail::run_retail;

const SAVED_METRIC: &str = "ango_records_saved_total";
const SKIPPED_METRIC: &str = "ango_records_skipped_total";
const ERRORS_METRIC: &str = "ango_record_errors_total";

/// Shared handles for one run.
#[derive(Clone)]
pub struct PipelineContext {
    pub http: Arc<dyn HttpClientPort>,
    pub sink: RemoteSink,
    pub dedup: Deduplicator,
}

impl PipelineContext {
    pub fn new(http: Arc<dyn HttpClientPort>, sink: Arc<dyn RemoteSinkPort>) -> Self {
        let sink = RemoteSink::new(sink);
        Self {
            http,
            dedup: Deduplicator::new(sink.clone()),
            sink,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub processed: usize,
    pub saved: usize,
    pub skipped_duplicate: usize,
    pub errors: usize,
}

impl RunStats {
    fn add(&mut self, other: &RunStats) {
        self.processed += other.processed;
        self.saved += other.saved;
        self.skipped_duplicate += other.skipped_duplicate;
        self.errors += other.errors;
    }
}

/// Outcome of one source within a run.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub pipeline: &'static str,
    pub source: String,
    pub stats: RunStats,
    /// Set when the source was abandoned (page unreachable, bad selector, ...).
    pub failure: Option<String>,
}

impl SourceReport {
    pub fn new(pipeline: &'static str, source: &str) -> Self {
        Self {
            pipeline,
            source: source.to_string(),
            stats: RunStats::default(),
            failure: None,
        }
    }

    pub fn record_processed(&mut self) {
        self.stats.processed += 1;
    }

    pub fn record_saved(&mut self) {
        self.stats.saved += 1;
        counter!(SAVED_METRIC, "pipeline" => self.pipeline, "source" => self.source.clone()).increment(1);
    }

    pub fn record_duplicate(&mut self) {
        self.stats.skipped_duplicate += 1;
        counter!(SKIPPED_METRIC, "pipeline" => self.pipeline, "source" => self.source.clone()).increment(1);
    }

    pub fn record_error(&mut self) {
        self.stats.errors += 1;
        counter!(ERRORS_METRIC, "pipeline" => self.pipeline, "source" => self.source.clone()).increment(1);
    }

    /// Abandon the source.
    pub fn fail(&mut self, reason: impl Display) {
        warn!("❌ {} abandoned: {}", self.source, reason);
        self.failure = Some(reason.to_string());
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// All source reports of one pipeline run, in run order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub pipeline: &'static str,
    pub sources: Vec<SourceReport>,
}

impl RunReport {
    pub fn new(pipeline: &'static str) -> Self {
        Self {
            pipeline,
            sources: Vec::new(),
        }
    }

    pub fn push(&mut self, report: SourceReport) {
        self.sources.push(report);
    }

    pub fn totals(&self) -> RunStats {
        let mut totals = RunStats::default();
        for report in &self.sources {
            totals.add(&report.stats);
        }
        totals
    }

    pub fn source(&self, name: &str) -> Option<&SourceReport> {
        self.sources.iter().find(|r| r.source == name)
    }

    /// Whether the run should exit with success.
    ///
    /// A retail run that saved nothing means every store was blocked or
    /// changed its markup, so it is reported as a failure.
    pub fn is_success(&self) -> bool {
        self.pipeline != RETAIL_PIPELINE || self.totals().saved > 0
    }

    /// Per-source lines followed by the run totals.
    pub fn log_summary(&self) {
        info!("📊 {} run summary", self.pipeline);
        for report in &self.sources {
            let s = report.stats;
            match &report.failure {
                Some(reason) => info!(
                    "   {} → saved {}, duplicates {}, errors {} (failed: {})",
                    report.source, s.saved, s.skipped_duplicate, s.errors, reason
                ),
                None => info!(
                    "   {} → saved {}, duplicates {}, errors {}",
                    report.source, s.saved, s.skipped_duplicate, s.errors
                ),
            }
        }
        let t = self.totals();
        info!("   Processed:          {}", t.processed);
        info!("   Saved:              {}", t.saved);
        info!("   Skipped duplicates: {}", t.skipped_duplicate);
        info!("   Errors:             {}", t.errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{JOBS_PIPELINE, RATES_PIPELINE};

    #[test]
    fn test_run_report_totals() {
        let mut report = RunReport::new("jobs");

        let mut a = SourceReport::new("jobs", "AngoVagas");
        a.record_processed();
        a.record_saved();
        a.record_processed();
        a.record_duplicate();

        let mut b = SourceReport::new("jobs", "INEFOP");
        b.record_processed();
        b.record_error();
        b.fail("listing page unavailable");

        report.push(a);
        report.push(b);

        assert_eq!(
            report.totals(),
            RunStats {
                processed: 3,
                saved: 1,
                skipped_duplicate: 1,
                errors: 1,
            }
        );
        assert!(report.source("INEFOP").unwrap().is_failed());
        assert!(!report.source("AngoVagas").unwrap().is_failed());
    }

    #[test]
    fn test_retail_run_without_saves_is_a_failure() {
        let mut retail = RunReport::new(RETAIL_PIPELINE);
        let mut kero = SourceReport::new(RETAIL_PIPELINE, "Kero");
        kero.record_processed();
        kero.record_duplicate();
        retail.push(kero);
        assert!(!retail.is_success());

        let mut shoprite = SourceReport::new(RETAIL_PIPELINE, "Shoprite");
        shoprite.record_processed();
        shoprite.record_saved();
        retail.push(shoprite);
        assert!(retail.is_success());

        // Other pipelines succeed even when nothing new was found
        assert!(RunReport::new(JOBS_PIPELINE).is_success());
        assert!(RunReport::new(RATES_PIPELINE).is_success());
    }
}
