use super::{PipelineContext, RunReport, SourceReport};
use crate::classify::{job_categories, placeholder_for, CategoryMap};
use crate::constants::{
    APPLY_VIA_PREFIX, DEFAULT_JOBS_MAX_TOTAL, DEFAULT_JOBS_PER_CYCLE, DETAIL_TIMEOUT_SECS,
    JOBS_PIPELINE, JOBS_TABLE, LIST_TIMEOUT_SECS, STATUS_PENDENTE,
};
use crate::error::Result;
use crate::fetcher::fetch_page;
use crate::pacing::human_delay;
use crate::parser::job::{parse_job_cards, parse_job_detail, JobCard, JobDetail};
use crate::registry::JobSource;
use crate::types::{now_timestamp, JobRecord};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy)]
pub struct JobsOptions {
    /// Stop once this many records were saved across all sources.
    pub max_total: usize,
    /// Saves allowed per source in one round-robin cycle.
    pub per_cycle: usize,
}

impl Default for JobsOptions {
    fn default() -> Self {
        Self {
            max_total: DEFAULT_JOBS_MAX_TOTAL,
            per_cycle: DEFAULT_JOBS_PER_CYCLE,
        }
    }
}

/// Round-robin position of one job board.
struct BoardState<'a> {
    source: &'a JobSource,
    report: SourceReport,
    /// Listing cards, fetched once per run.
    cards: Option<Vec<JobCard>>,
    cursor: usize,
    seen_links: HashSet<String>,
    exhausted: bool,
}

impl<'a> BoardState<'a> {
    fn new(source: &'a JobSource) -> Self {
        Self {
            source,
            report: SourceReport::new(JOBS_PIPELINE, &source.name),
            cards: None,
            cursor: 0,
            seen_links: HashSet::new(),
            exhausted: false,
        }
    }
}

enum CardOutcome {
    Saved,
    Duplicate,
    Failed,
}

/// Cycle through the job boards, taking a few new listings from each per
/// cycle so no single board dominates the table.
///
/// The run ends when `max_total` records were saved or a full cycle saved
/// nothing.
#[instrument(skip_all, fields(pipeline = JOBS_PIPELINE))]
pub async fn run_jobs(ctx: &PipelineContext, sources: &[JobSource], options: JobsOptions) -> RunReport {
    info!(
        "🚀 Job boards: {} sources in rotation, target {} listings",
        sources.len(),
        options.max_total
    );
    let categories = job_categories();
    let mut boards: Vec<BoardState<'_>> = sources.iter().map(BoardState::new).collect();
    let mut total_saved = 0;
    let mut cycle = 0;

    while total_saved < options.max_total {
        cycle += 1;
        let mut saved_this_cycle = 0;

        for board in boards.iter_mut().filter(|b| !b.exhausted) {
            if total_saved >= options.max_total {
                break;
            }
            let budget = options.per_cycle.min(options.max_total - total_saved);
            info!("🔄 Cycle {}: {} (from card {})", cycle, board.source.name, board.cursor);

            match run_board_cycle(ctx, board, &categories, budget).await {
                Ok(saved) => {
                    saved_this_cycle += saved;
                    total_saved += saved;
                }
                Err(e) => {
                    board.report.fail(e);
                    board.exhausted = true;
                }
            }
        }

        if saved_this_cycle == 0 {
            info!("🏁 No new listings on any board, stopping");
            break;
        }
        info!("📊 End of cycle {}: {}/{} saved", cycle, total_saved, options.max_total);
    }

    let mut report = RunReport::new(JOBS_PIPELINE);
    for board in boards {
        report.push(board.report);
    }
    report
}

/// Take up to `budget` new saves from one board, resuming where the previous
/// cycle stopped.
async fn run_board_cycle(
    ctx: &PipelineContext,
    board: &mut BoardState<'_>,
    categories: &CategoryMap,
    budget: usize,
) -> Result<usize> {
    let source = board.source;
    if board.cards.is_none() {
        let cards = match fetch_page(ctx.http.as_ref(), &source.list_url, &source.headers(), LIST_TIMEOUT_SECS).await {
            Some(html) => parse_job_cards(&html, source)?,
            None => {
                board.report.fail("listing page unavailable");
                Vec::new()
            }
        };
        info!("📋 {}: {} cards on listing page", source.name, cards.len());
        board.cards = Some(cards);
    }

    let mut saved = 0;
    while saved < budget {
        let Some(card) = board.cards.as_ref().and_then(|cards| cards.get(board.cursor)).cloned() else {
            board.exhausted = true;
            break;
        };
        board.cursor += 1;

        if !board.seen_links.insert(card.url.clone()) {
            debug!("Link already seen this run: {}", card.url);
            continue;
        }

        board.report.record_processed();
        match process_card(ctx, source, categories, &card).await? {
            CardOutcome::Saved => {
                board.report.record_saved();
                saved += 1;
            }
            CardOutcome::Duplicate => board.report.record_duplicate(),
            CardOutcome::Failed => board.report.record_error(),
        }
    }
    Ok(saved)
}

async fn process_card(
    ctx: &PipelineContext,
    source: &JobSource,
    categories: &CategoryMap,
    card: &JobCard,
) -> Result<CardOutcome> {
    if ctx.dedup.url_exists(JOBS_TABLE, "source_url", &card.url).await {
        debug!("Already stored: {}", card.url);
        return Ok(CardOutcome::Duplicate);
    }

    if ctx.dedup.job_exists(&card.title, &card.company).await {
        debug!("Same title and company already stored: {} @ {}", card.title, card.company);
        return Ok(CardOutcome::Duplicate);
    }

    let detail = if source.detail_enabled {
        human_delay(source.request_delay_range).await;
        match fetch_page(ctx.http.as_ref(), &card.url, &source.headers(), DETAIL_TIMEOUT_SECS).await {
            Some(html) => parse_job_detail(&html, source)?,
            None => JobDetail::default(),
        }
    } else {
        JobDetail::default()
    };

    let categoria = categories.classify(&card.title, source.fixed_category.as_deref());

    let record = JobRecord {
        title: card.title.clone(),
        company: card.company.clone(),
        location: card.location.clone(),
        description: detail.description,
        requirements: detail.requirements,
        application_email: detail
            .email
            .unwrap_or_else(|| format!("{} {}", APPLY_VIA_PREFIX, card.url)),
        imagem_url: detail
            .image_url
            .unwrap_or_else(|| placeholder_for(&categoria).to_string()),
        source_url: card.url.clone(),
        categoria,
        status: STATUS_PENDENTE.to_string(),
        posted_at: now_timestamp(),
    }
    .truncated();

    let payload = serde_json::to_value(&record)?;
    if ctx.sink.insert(JOBS_TABLE, &payload).await {
        info!("✅ {} | {} | {}", record.title, record.company, record.categoria);
        Ok(CardOutcome::Saved)
    } else {
        Ok(CardOutcome::Failed)
    }
}
