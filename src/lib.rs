pub mod classify;
pub mod config;
pub mod constants;
pub mod dedup;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod pacing;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod sink;
pub mod storage;
pub mod types;

// Ports (traits) and the adapters that implement them
pub mod app;
pub mod infra;
