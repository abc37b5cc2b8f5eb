use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::ValidationError;

/// Refresh cadence for the watch loop: a fixed interval with optional
/// uniform jitter added before each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    interval: Duration,
    jitter: Duration,
}

impl RefreshConfig {
    pub fn new(interval: Duration, jitter: Duration) -> Result<Self, ValidationError> {
        if interval.is_zero() {
            return Err(ValidationError::ZeroRefreshInterval);
        }
        Ok(Self { interval, jitter })
    }

    pub const fn interval(self) -> Duration {
        self.interval
    }

    pub const fn jitter(self) -> Duration {
        self.jitter
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            jitter: Duration::ZERO,
        }
    }
}

/// Run `cycle` immediately and then once per interval until `shutdown`
/// resolves.
///
/// A cycle always runs to completion; cancellation is only observed between
/// cycles. Slow cycles delay the next tick rather than bursting.
pub async fn run_refresh_loop<C, F, S>(config: RefreshConfig, shutdown: S, mut cycle: C)
where
    C: FnMut() -> F,
    F: Future<Output = ()>,
    S: Future<Output = ()>,
{
    let mut timer = tokio::time::interval(config.interval());
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("refresh loop shutting down");
                return;
            }
            _ = timer.tick() => {
                if let Some(delay) = jitter_delay(config.jitter()) {
                    tokio::time::sleep(delay).await;
                }
                cycle().await;
            }
        }
    }
}

fn jitter_delay(jitter: Duration) -> Option<Duration> {
    if jitter.is_zero() {
        return None;
    }
    let millis = fastrand::u64(0..=jitter.as_millis() as u64);
    (millis > 0).then(|| Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn rejects_zero_interval() {
        let err = RefreshConfig::new(Duration::ZERO, Duration::ZERO).expect_err("must fail");
        assert!(matches!(err, ValidationError::ZeroRefreshInterval));
    }

    #[tokio::test(start_paused = true)]
    async fn runs_cycles_until_shutdown() {
        let config =
            RefreshConfig::new(Duration::from_secs(60), Duration::ZERO).expect("config");
        let count = Arc::new(AtomicUsize::new(0));

        let cycles = Arc::clone(&count);
        run_refresh_loop(
            config,
            tokio::time::sleep(Duration::from_secs(150)),
            move || {
                let cycles = Arc::clone(&cycles);
                async move {
                    cycles.fetch_add(1, Ordering::SeqCst);
                }
            },
        )
        .await;

        // First tick fires immediately, then at 60s and 120s.
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
