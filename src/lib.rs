//! Test helpers for inspecting in-process Prometheus metrics registries.
//!
//! A test that drives a component through its public API often has no way to
//! observe side effects other than the metrics the component records. This
//! crate flattens a [`prometheus::Registry`] into comparable [`Datapoint`]
//! records (`name[k=v,...]$STATISTIC` plus a value), filters them by meter
//! kind and name prefix, and polls until an expected value shows up:
//!
//! ```no_run
//! # async fn example(log: &slog::Logger, registry: &prometheus::Registry) {
//! use metrics_inspector::{dp, wait_for_value, MetricsAssert};
//!
//! // Wait for the component to finish its asynchronous work.
//! wait_for_value(log, registry, "requests_total[method=GET]$COUNT", |v| v >= 2.0)
//!     .await
//!     .unwrap();
//!
//! // Then assert on the snapshot.
//! MetricsAssert::from_registry(registry)
//!     .assert_contains(dp("requests_total[method=GET]$COUNT", 2))
//!     .assert_does_not_contain_id_matching("errors_total");
//! # }
//! ```

mod assertions;
mod datapoint;
mod inspect;
pub mod registries;
mod wait;

pub use assertions::MetricsAssert;
pub use datapoint::{dp, Datapoint, Statistic};
pub use inspect::{
    list_timers, list_timers_named, list_without_timers, list_without_timers_named,
};
pub use wait::{
    wait_for_value, wait_for_value_named, wait_for_value_with, WaitConfig, WaitError,
    DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT,
};
