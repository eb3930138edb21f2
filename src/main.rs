use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use ango_scraper::app::ports::{HttpClientPort, RemoteSinkPort};
use ango_scraper::config::Settings;
use ango_scraper::constants::{
    DEFAULT_JOBS_MAX_TOTAL, DEFAULT_JOBS_PER_CYCLE, FEEDS_PIPELINE, JOBS_PIPELINE, NEWS_PIPELINE,
    RATES_PIPELINE, RETAIL_PIPELINE,
};
use ango_scraper::infra::{ReqwestHttp, SupabaseRest};
use ango_scraper::logging::init_logging;
use ango_scraper::pipeline::{
    run_feeds, run_jobs, run_news, run_rates, run_retail, JobsOptions, PipelineContext,
};
use ango_scraper::registry::AdapterRegistry;
use ango_scraper::storage::InMemorySink;

#[derive(Parser)]
#[command(name = "ango_scraper")]
#[command(about = "Scrapes Angolan job boards, news portals, retail promotions and exchange rates")]
#[command(version)]
struct Cli {
    /// Adapter tables (TOML) to use instead of the built-in ones
    #[arg(long, global = true)]
    adapters: Option<PathBuf>,

    /// Only run these sources (comma-separated names)
    #[arg(long, global = true)]
    sources: Option<String>,

    /// Keep records in memory instead of writing to the backend
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Job boards, round-robin
    Jobs {
        /// Stop after this many saved listings
        #[arg(long, default_value_t = DEFAULT_JOBS_MAX_TOTAL)]
        max_total: usize,
        /// Listings taken from each board per cycle
        #[arg(long, default_value_t = DEFAULT_JOBS_PER_CYCLE)]
        per_cycle: usize,
    },
    /// News portals
    News,
    /// Retail promotions (exits 1 when nothing was saved)
    Retail,
    /// RSS feeds
    Feeds,
    /// Official exchange rates
    Rates,
}

impl Commands {
    fn pipeline(&self) -> &'static str {
        match self {
            Commands::Jobs { .. } => JOBS_PIPELINE,
            Commands::News => NEWS_PIPELINE,
            Commands::Retail => RETAIL_PIPELINE,
            Commands::Feeds => FEEDS_PIPELINE,
            Commands::Rates => RATES_PIPELINE,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    // Held until exit so the run summary reaches the log file
    let _guard = init_logging(cli.command.pipeline());

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let pipeline = cli.command.pipeline();

    let mut registry = match &cli.adapters {
        Some(path) => AdapterRegistry::load_from_file(path)?,
        None => AdapterRegistry::builtin().context("built-in adapter tables")?,
    };
    if let Some(list) = &cli.sources {
        let names: Vec<String> = list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        registry.retain_sources(&names);
    }

    let sink: Arc<dyn RemoteSinkPort> = if cli.dry_run {
        info!("🧪 Dry run: records stay in memory");
        Arc::new(InMemorySink::new())
    } else {
        let settings = Settings::load().context("backend credentials")?;
        Arc::new(SupabaseRest::new(&settings)?)
    };
    let http: Arc<dyn HttpClientPort> = Arc::new(ReqwestHttp::new()?);
    let ctx = PipelineContext::new(http, sink);

    let started = std::time::Instant::now();
    let report = match cli.command {
        Commands::Jobs { max_total, per_cycle } => {
            run_jobs(&ctx, &registry.jobs, JobsOptions { max_total, per_cycle }).await
        }
        Commands::News => run_news(&ctx, &registry.news).await,
        Commands::Retail => run_retail(&ctx, &registry.retail).await,
        Commands::Feeds => run_feeds(&ctx, &registry.feeds).await,
        Commands::Rates => run_rates(&ctx, &registry.rates).await,
    };
    report.log_summary();
    info!("🏁 {} finished in {}s", pipeline, started.elapsed().as_secs());

    if !report.is_success() {
        error!("❌ No retail record was saved; check the network and selector errors above");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
