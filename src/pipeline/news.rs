use super::{PipelineContext, RunReport, SourceReport};
use crate::classify::{news_classifier, placeholder_for, NewsClassifier};
use crate::constants::{
    NEWS_ARTICLES_PER_SOURCE, NEWS_DETAIL_TIMEOUT_SECS, NEWS_LIST_TIMEOUT_SECS, NEWS_PIPELINE,
    NEWS_TABLE, STATUS_PENDENTE,
};
use crate::error::Result;
use crate::fetcher::fetch_page;
use crate::pacing::human_delay;
use crate::parser::news::{parse_news_cards, parse_news_detail, NewsCard};
use crate::registry::NewsSource;
use crate::types::{now_timestamp, NewsRecord};
use tracing::{debug, info, instrument};

/// Scrape the latest articles of every news portal, one portal at a time.
#[instrument(skip_all, fields(pipeline = NEWS_PIPELINE))]
pub async fn run_news(ctx: &PipelineContext, sources: &[NewsSource]) -> RunReport {
    let classifier = news_classifier();
    let mut run = RunReport::new(NEWS_PIPELINE);

    for source in sources {
        info!("📰 Portal: {}", source.name);
        let mut report = SourceReport::new(NEWS_PIPELINE, &source.name);
        if let Err(e) = scrape_portal(ctx, source, &classifier, &mut report).await {
            report.fail(e);
        }
        run.push(report);
    }
    run
}

async fn scrape_portal(
    ctx: &PipelineContext,
    source: &NewsSource,
    classifier: &NewsClassifier,
    report: &mut SourceReport,
) -> Result<()> {
    let headers = source.headers();
    let Some(html) = fetch_page(ctx.http.as_ref(), &source.list_url, &headers, NEWS_LIST_TIMEOUT_SECS).await
    else {
        report.fail("listing page unavailable");
        return Ok(());
    };
    let cards = parse_news_cards(&html, source, NEWS_ARTICLES_PER_SOURCE)?;
    info!("   {} articles with links", cards.len());

    for card in cards {
        if ctx.dedup.url_exists(NEWS_TABLE, "url_origem", &card.url).await {
            debug!("Already stored: {}", card.url);
            report.record_duplicate();
            continue;
        }
        report.record_processed();

        let Some(record) = build_record(ctx, source, classifier, &card).await? else {
            report.record_error();
            continue;
        };

        let payload = serde_json::to_value(&record)?;
        if ctx.sink.insert(NEWS_TABLE, &payload).await {
            info!("   ✨ Saved as pending: {}", record.titulo);
            report.record_saved();
        } else {
            report.record_error();
        }
        human_delay(source.request_delay_range).await;
    }
    Ok(())
}

/// Fetch the article page and assemble the row; `None` when the page is unreachable.
async fn build_record(
    ctx: &PipelineContext,
    source: &NewsSource,
    classifier: &NewsClassifier,
    card: &NewsCard,
) -> Result<Option<NewsRecord>> {
    let Some(html) = fetch_page(ctx.http.as_ref(), &card.url, &source.headers(), NEWS_DETAIL_TIMEOUT_SECS).await
    else {
        return Ok(None);
    };
    let detail = parse_news_detail(&html, source)?;
    let categoria = classifier.classify(&card.title, source.fixed_category.as_deref());
    let imagem_url = card
        .image_url
        .clone()
        .or(detail.image_url)
        .unwrap_or_else(|| placeholder_for(&categoria).to_string());

    Ok(Some(NewsRecord {
        titulo: card.title.clone(),
        resumo: detail.summary,
        corpo: detail.body_html,
        imagem_url,
        categoria,
        fonte: source.name.clone(),
        url_origem: card.url.clone(),
        status: STATUS_PENDENTE.to_string(),
        is_priority: classifier.is_priority(&card.title),
        published_at: now_timestamp(),
    }))
}
