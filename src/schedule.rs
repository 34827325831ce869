//! Periodic re-invocation of collection cycles.
//!
//! The first cycle runs immediately, later ones on a fixed interval. Stopping
//! simply means no further cycle is started; a cycle already in progress runs
//! to completion.

use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

/// Run `job` now and then every `period` until `stop` resolves.
///
/// Returns the number of completed runs.
pub async fn run_every<S, J, Fut>(period: Duration, stop: S, mut job: J) -> usize
where
    S: Future<Output = ()>,
    J: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(stop);

    let mut runs = 0usize;
    loop {
        tokio::select! {
            biased;
            _ = &mut stop => {
                info!(runs, "Stopping scheduled scraping");
                break;
            }
            _ = ticker.tick() => {
                job().await;
                runs += 1;
                info!(runs, next_in = ?period, "Scheduled run finished");
            }
        }
    }
    runs
}

pub fn hours(n: u64) -> Duration {
    Duration::from_secs(n * 60 * 60)
}
