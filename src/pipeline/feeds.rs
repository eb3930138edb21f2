use super::{PipelineContext, RunReport, SourceReport};
use crate::constants::{
    FEEDS_PIPELINE, FEED_CATEGORY, FEED_ENTRIES_PER_FEED, NEWS_LIST_TIMEOUT_SECS, NEWS_TABLE,
    STATUS_PENDING,
};
use crate::error::Result;
use crate::fetcher::fetch_page;
use crate::parser::feed::parse_feed;
use crate::registry::FeedsConfig;
use crate::types::{now_timestamp, FeedRecord};
use tracing::{debug, info, instrument};

/// Read each RSS feed and store its newest entries as pending articles.
#[instrument(skip_all, fields(pipeline = FEEDS_PIPELINE))]
pub async fn run_feeds(ctx: &PipelineContext, config: &FeedsConfig) -> RunReport {
    info!("📡 RSS feeds: {}", config.urls.len());
    let mut run = RunReport::new(FEEDS_PIPELINE);

    for feed_url in &config.urls {
        let mut report = SourceReport::new(FEEDS_PIPELINE, feed_url);
        if let Err(e) = read_feed(ctx, feed_url, &mut report).await {
            report.fail(e);
        }
        run.push(report);
    }
    run
}

async fn read_feed(ctx: &PipelineContext, feed_url: &str, report: &mut SourceReport) -> Result<()> {
    let Some(xml) = fetch_page(ctx.http.as_ref(), feed_url, &Vec::new(), NEWS_LIST_TIMEOUT_SECS).await else {
        report.fail("feed unavailable");
        return Ok(());
    };
    let feed = parse_feed(&xml, FEED_ENTRIES_PER_FEED)?;
    if feed.entries.is_empty() {
        info!("   No entries in {}", feed_url);
        return Ok(());
    }

    for entry in feed.entries {
        if ctx.dedup.url_exists(NEWS_TABLE, "url", &entry.url).await {
            debug!("Skipping duplicate: {}", entry.title);
            report.record_duplicate();
            continue;
        }
        report.record_processed();

        let record = FeedRecord {
            title: entry.title,
            summary: entry.summary,
            source: feed.source.clone(),
            url: entry.url,
            category: FEED_CATEGORY.to_string(),
            status: STATUS_PENDING.to_string(),
            published_at: now_timestamp(),
        };
        if ctx.sink.insert(NEWS_TABLE, &serde_json::to_value(&record)?).await {
            info!("   ➕ {}", record.title);
            report.record_saved();
        } else {
            report.record_error();
        }
    }
    Ok(())
}
