//! Names, literals and header values shared across the pipelines.

// Pipeline names (used in CLI, log file names and metric labels)
pub const JOBS_PIPELINE: &str = "jobs";
pub const NEWS_PIPELINE: &str = "news";
pub const RETAIL_PIPELINE: &str = "retail";
pub const FEEDS_PIPELINE: &str = "feeds";
pub const RATES_PIPELINE: &str = "rates";

// Remote tables
pub const JOBS_TABLE: &str = "jobs";
pub const NEWS_TABLE: &str = "news_articles";
pub const DEALS_TABLE: &str = "product_deals";
pub const RATES_TABLE: &str = "exchange_rates";

// Record statuses at creation; curation happens outside this crate
pub const STATUS_PENDENTE: &str = "pendente";
pub const STATUS_PENDING: &str = "pending";

// Fallback literals
pub const FALLBACK_COMPANY: &str = "Empresa Confidencial";
pub const FALLBACK_LOCATION: &str = "Angola";
pub const FALLBACK_NEWS_TITLE: &str = "Sem Título";
pub const FALLBACK_FEED_SOURCE: &str = "News Angola";
pub const APPLY_VIA_PREFIX: &str = "Candidatar via:";
pub const FEED_CATEGORY: &str = "Nacional";

pub const SUBMITTED_BY_SCRAPER: &str = "scraper";
pub const SUBMITTED_BY_FLYER: &str = "scraper_flyer";
pub const FLYER_PLACEHOLDER: &str = "https://img.icons8.com/color/96/pdf.png";

// Browser masquerade
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
pub const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "pt-AO,pt;q=0.9,en-US;q=0.8,en;q=0.7";
pub const DEFAULT_REFERER: &str = "https://www.google.com/";

// Timeouts, in seconds, per call site
pub const LIST_TIMEOUT_SECS: u64 = 20;
pub const DETAIL_TIMEOUT_SECS: u64 = 20;
pub const NEWS_LIST_TIMEOUT_SECS: u64 = 15;
pub const NEWS_DETAIL_TIMEOUT_SECS: u64 = 10;
pub const RETAIL_TIMEOUT_SECS: u64 = 30;
pub const WARM_UP_TIMEOUT_SECS: u64 = 15;
pub const SINK_TIMEOUT_SECS: u64 = 10;

// Payload limits
pub const MAX_SHORT_FIELD: usize = 255;
pub const MAX_DESCRIPTION: usize = 5000;
pub const MAX_LOGGED_PAYLOAD: usize = 300;
pub const SUMMARY_LENGTH: usize = 200;

// Batch sizes
pub const NEWS_ARTICLES_PER_SOURCE: usize = 10;
pub const RETAIL_ITEMS_PER_STORE: usize = 25;
pub const FEED_ENTRIES_PER_FEED: usize = 5;
pub const DEFAULT_JOBS_MAX_TOTAL: usize = 100;
pub const DEFAULT_JOBS_PER_CYCLE: usize = 5;

