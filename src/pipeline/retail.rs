use super::{PipelineContext, RunReport, SourceReport};
use crate::constants::{
    DEALS_TABLE, FLYER_PLACEHOLDER, RETAIL_ITEMS_PER_STORE, RETAIL_PIPELINE, RETAIL_TIMEOUT_SECS,
    STATUS_PENDING, SUBMITTED_BY_FLYER, SUBMITTED_BY_SCRAPER,
};
use crate::error::Result;
use crate::fetcher::{fetch_page, warm_up};
use crate::pacing::human_delay;
use crate::parser::retail::{parse_promo_page, DealItem, PromoPage};
use crate::registry::RetailSource;
use crate::types::{now_timestamp, DealRecord, FlyerRecord};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

/// Scrape the promotions page of every store.
///
/// The caller decides the exit status from the report: a run that saved
/// nothing counts as failed.
#[instrument(skip_all, fields(pipeline = RETAIL_PIPELINE))]
pub async fn run_retail(ctx: &PipelineContext, sources: &[RetailSource]) -> RunReport {
    info!("🛒 Retail deals: {} stores", sources.len());
    let mut run = RunReport::new(RETAIL_PIPELINE);

    for store in sources {
        info!("🚀 {} ({})", store.name, store.promo_url);
        let mut report = SourceReport::new(RETAIL_PIPELINE, &store.name);
        if let Err(e) = scrape_store(ctx, store, &mut report).await {
            report.fail(e);
        }
        run.push(report);
    }
    run
}

async fn scrape_store(ctx: &PipelineContext, store: &RetailSource, report: &mut SourceReport) -> Result<()> {
    if store.warm_up {
        warm_up(ctx.http.as_ref(), &store.base_url).await;
    }

    let Some(html) = fetch_page(ctx.http.as_ref(), &store.promo_url, &store.headers(), RETAIL_TIMEOUT_SECS).await
    else {
        report.fail("promotions page unavailable");
        return Ok(());
    };

    match parse_promo_page(&html, store, RETAIL_ITEMS_PER_STORE)? {
        PromoPage::Items(items) => {
            info!("   📦 {} candidate items", items.len());
            for item in items {
                if save_item(ctx, store, &item, report).await? {
                    human_delay(store.request_delay_range).await;
                }
            }
        }
        PromoPage::Flyer(url) => {
            info!("   📖 No product cards, flyer found: {}", url);
            save_flyer(ctx, store, url, report).await?;
        }
        PromoPage::Empty => {
            warn!("   ⚠️  No products and no flyer on {}", store.name);
        }
    }
    Ok(())
}

/// Returns whether the item went to the sink (saved or rejected).
async fn save_item(
    ctx: &PipelineContext,
    store: &RetailSource,
    item: &DealItem,
    report: &mut SourceReport,
) -> Result<bool> {
    if ctx.dedup.deal_exists(&item.name, &store.name).await {
        debug!("Already stored: {} @ {}", item.name, store.name);
        report.record_duplicate();
        return Ok(false);
    }
    report.record_processed();

    let record = DealRecord {
        title: item.name.clone(),
        store: store.name.clone(),
        discount_price: item.price,
        original_price: item.old_price,
        image_placeholder: item.image_url.clone(),
        category: store.category.clone(),
        status: STATUS_PENDING.to_string(),
        submitted_by: SUBMITTED_BY_SCRAPER.to_string(),
        created_at: now_timestamp(),
    };
    if ctx.sink.insert(DEALS_TABLE, &serde_json::to_value(&record)?).await {
        info!("   ✅ {} ({} Kz)", record.title, record.discount_price);
        report.record_saved();
    } else {
        report.record_error();
    }
    Ok(true)
}

/// One flyer row per store per day.
async fn save_flyer(ctx: &PipelineContext, store: &RetailSource, url: String, report: &mut SourceReport) -> Result<()> {
    let title = flyer_title(&store.name, &Utc::now().format("%Y-%m-%d").to_string());
    if ctx.dedup.deal_exists(&title, &store.name).await {
        report.record_duplicate();
        return Ok(());
    }
    report.record_processed();

    let record = FlyerRecord {
        title,
        store: store.name.clone(),
        url,
        category: store.category.clone(),
        image_placeholder: FLYER_PLACEHOLDER.to_string(),
        status: STATUS_PENDING.to_string(),
        submitted_by: SUBMITTED_BY_FLYER.to_string(),
        created_at: now_timestamp(),
    };
    if ctx.sink.insert(DEALS_TABLE, &serde_json::to_value(&record)?).await {
        info!("   ✅ Flyer saved: {}", record.title);
        report.record_saved();
    } else {
        report.record_error();
    }
    Ok(())
}

pub fn flyer_title(store: &str, date: &str) -> String {
    format!("Folheto Digital: {store} ({date})")
}
