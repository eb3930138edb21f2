use super::{PipelineContext, RunReport, SourceReport};
use crate::constants::{LIST_TIMEOUT_SECS, RATES_PIPELINE, RATES_TABLE};
use crate::error::{Result, ScraperError};
use crate::fetcher::fetch_page;
use crate::registry::RatesConfig;
use crate::sink::eq_filter;
use crate::types::{now_timestamp, RateRecord};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Response of an open.er-api style endpoint: units of each currency per base unit.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Official AOA quotes for one currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormalRate {
    pub buy: f64,
    pub sell: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// AOA buy/sell for `currency`, derived through the response's base currency.
fn formal_rate(rates: &HashMap<String, f64>, currency: &str, spread: f64) -> Option<FormalRate> {
    let aoa_per_base = *rates.get("AOA")?;
    let currency_per_base = *rates.get(currency)?;
    if currency_per_base <= 0.0 {
        return None;
    }
    let buy = aoa_per_base / currency_per_base;
    Some(FormalRate {
        buy: round2(buy),
        sell: round2(buy * (1.0 + spread)),
    })
}

/// Parse the exchange-rate API body into formal rates per configured currency.
pub fn parse_formal_rates(body: &str, config: &RatesConfig) -> Result<Vec<(String, Option<FormalRate>)>> {
    let response: RatesResponse = serde_json::from_str(body)?;
    if response.result.as_deref() == Some("error") {
        return Err(ScraperError::Api {
            message: "exchange-rate API reported an error".to_string(),
        });
    }
    Ok(config
        .currencies
        .iter()
        .map(|c| (c.clone(), formal_rate(&response.rates, c, config.spread)))
        .collect())
}

/// Refresh the official exchange rates.
///
/// Existing rows get their formal columns patched and keep their informal
/// ones; a currency seen for the first time is inserted with informal
/// values equal to the formal ones.
#[instrument(skip_all, fields(pipeline = RATES_PIPELINE))]
pub async fn run_rates(ctx: &PipelineContext, config: &RatesConfig) -> RunReport {
    info!("💱 Exchange rates from {}", config.api_url);
    let mut run = RunReport::new(RATES_PIPELINE);

    let rates = match fetch_page(ctx.http.as_ref(), &config.api_url, &Vec::new(), LIST_TIMEOUT_SECS).await {
        Some(body) => parse_formal_rates(&body, config),
        None => Err(ScraperError::Api {
            message: format!("{} unavailable", config.api_url),
        }),
    };

    let rates = match rates {
        Ok(rates) => rates,
        Err(e) => {
            for currency in &config.currencies {
                let mut report = SourceReport::new(RATES_PIPELINE, currency);
                report.fail(&e);
                run.push(report);
            }
            return run;
        }
    };

    for (currency, rate) in rates {
        let mut report = SourceReport::new(RATES_PIPELINE, &currency);
        match rate {
            Some(rate) => {
                report.record_processed();
                if let Err(e) = upsert_rate(ctx, &currency, rate, &mut report).await {
                    report.record_error();
                    warn!("⚠️  {}: {}", currency, e);
                }
            }
            None => report.fail("currency missing from API response"),
        }
        run.push(report);
    }
    run
}

async fn upsert_rate(
    ctx: &PipelineContext,
    currency: &str,
    rate: FormalRate,
    report: &mut SourceReport,
) -> Result<()> {
    let existing = ctx
        .sink
        .select(RATES_TABLE, &vec![eq_filter("currency", currency)], "id")
        .await?;

    match existing.first().and_then(|row| row.get("id")) {
        Some(id) => {
            let id = match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let changes = json!({
                "formal_buy": rate.buy,
                "formal_sell": rate.sell,
                "last_updated": now_timestamp(),
            });
            if ctx.sink.update(RATES_TABLE, &vec![eq_filter("id", &id)], &changes).await {
                info!("   🔁 Updated {}: buy {} / sell {}", currency, rate.buy, rate.sell);
                report.record_saved();
            } else {
                report.record_error();
            }
        }
        None => {
            let record = RateRecord {
                currency: currency.to_string(),
                formal_buy: rate.buy,
                formal_sell: rate.sell,
                informal_buy: rate.buy,
                informal_sell: rate.sell,
                last_updated: now_timestamp(),
            };
            if ctx.sink.insert(RATES_TABLE, &serde_json::to_value(&record)?).await {
                info!("   ➕ Inserted {}: buy {} / sell {}", currency, rate.buy, rate.sell);
                report.record_saved();
            } else {
                report.record_error();
            }
        }
    }
    Ok(())
}
