use crate::registry::DelayRange;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Sleep for a random time within `range`, in seconds.
///
/// A range whose upper bound is zero or below, or that is not finite,
/// disables the pause.
pub async fn human_delay(range: DelayRange) {
    let secs = pick_delay(range);
    if secs <= 0.0 {
        return;
    }
    debug!("⏳ Waiting {:.1}s", secs);
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}

fn pick_delay(DelayRange(min, max): DelayRange) -> f64 {
    if !(min.is_finite() && max.is_finite()) || max <= 0.0 {
        return 0.0;
    }
    let min = min.max(0.0);
    if min >= max {
        return max;
    }
    rand::thread_rng().gen_range(min..=max)
}
