use crate::datapoint::Datapoint;
use crate::inspect::{list_without_timers, list_without_timers_named};
use prometheus::Registry;
use slog::{debug, warn};
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};

/// How often the registry is re-inspected while waiting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);
/// How long a waiter keeps polling before giving up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Polling knobs for the wait helpers.
#[derive(Clone, Debug)]
pub struct WaitConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Error)]
pub enum WaitError {
    #[error("no value of metric `{id}` matched the predicate within {timeout:?}")]
    Timeout { id: String, timeout: Duration },
}

/// Polls `registry` until the non-timer datapoint with id `full_id` has a
/// value accepted by `predicate`, using the default interval and timeout.
///
/// `full_id` is the fully rendered id, tags and statistic included, e.g.
/// `requests_total[method=GET]$COUNT`.
pub async fn wait_for_value(
    log: &slog::Logger,
    registry: &Registry,
    full_id: &str,
    predicate: impl Fn(f64) -> bool,
) -> Result<Datapoint, WaitError> {
    wait_for_value_with(log, registry, full_id, predicate, &WaitConfig::default()).await
}

/// As [`wait_for_value`], with explicit polling configuration.
pub async fn wait_for_value_with(
    log: &slog::Logger,
    registry: &Registry,
    full_id: &str,
    predicate: impl Fn(f64) -> bool,
    config: &WaitConfig,
) -> Result<Datapoint, WaitError> {
    wait_matching(log, full_id, predicate, config, || {
        list_without_timers(registry, "")
    })
    .await
}

/// As [`wait_for_value`], resolving the registry by name on every poll, so a
/// registry set up after the wait starts is still picked up.
pub async fn wait_for_value_named(
    log: &slog::Logger,
    registry_name: &str,
    full_id: &str,
    predicate: impl Fn(f64) -> bool,
) -> Result<Datapoint, WaitError> {
    wait_matching(log, full_id, predicate, &WaitConfig::default(), || {
        list_without_timers_named(registry_name, "")
    })
    .await
}

async fn wait_matching(
    log: &slog::Logger,
    full_id: &str,
    predicate: impl Fn(f64) -> bool,
    config: &WaitConfig,
    list: impl Fn() -> Vec<Datapoint>,
) -> Result<Datapoint, WaitError> {
    let deadline = Instant::now() + config.timeout;
    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        if let Some(datapoint) = list()
            .into_iter()
            .find(|dp| dp.id() == full_id && predicate(dp.value()))
        {
            debug!(
                log,
                "expected metric value observed";
                "id" => full_id,
                "value" => datapoint.value(),
                "attempt" => attempt
            );
            return Ok(datapoint);
        }

        if Instant::now() + config.poll_interval > deadline {
            warn!(
                log,
                "timed out waiting for metric value";
                "id" => full_id,
                "timeout" => ?config.timeout,
                "attempts" => attempt
            );
            return Err(WaitError::Timeout {
                id: full_id.to_string(),
                timeout: config.timeout,
            });
        }

        debug!(log, "metric value not observed yet"; "id" => full_id, "attempt" => attempt);
        sleep(config.poll_interval).await;
    }
}
