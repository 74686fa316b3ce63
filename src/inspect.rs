use crate::datapoint::{Datapoint, Statistic};
use crate::registries;
use prometheus::proto::{LabelPair, Metric, MetricFamily, MetricType};
use prometheus::Registry;

/// Lists one [`Datapoint`] per measurement of every non-timer metric family
/// whose name starts with `starts_with`. An empty prefix lists everything.
///
/// Histogram and summary families are the timer-shaped kinds and are excluded
/// here; use [`list_timers`] for those.
pub fn list_without_timers(registry: &Registry, starts_with: &str) -> Vec<Datapoint> {
    list_matching(registry, starts_with, |ty| !is_timer_family(ty))
}

/// Lists one [`Datapoint`] per measurement of every histogram and summary
/// family whose name starts with `starts_with`.
pub fn list_timers(registry: &Registry, starts_with: &str) -> Vec<Datapoint> {
    list_matching(registry, starts_with, is_timer_family)
}

/// As [`list_without_timers`], resolving the registry by name through the
/// backend map. Returns an empty list if no registry goes by that name.
pub fn list_without_timers_named(registry_name: &str, starts_with: &str) -> Vec<Datapoint> {
    registries::get(registry_name)
        .map(|registry| list_without_timers(&registry, starts_with))
        .unwrap_or_default()
}

/// As [`list_timers`], resolving the registry by name through the backend map.
pub fn list_timers_named(registry_name: &str, starts_with: &str) -> Vec<Datapoint> {
    registries::get(registry_name)
        .map(|registry| list_timers(&registry, starts_with))
        .unwrap_or_default()
}

fn is_timer_family(ty: MetricType) -> bool {
    matches!(ty, MetricType::HISTOGRAM | MetricType::SUMMARY)
}

fn list_matching(
    registry: &Registry,
    starts_with: &str,
    keep: impl Fn(MetricType) -> bool,
) -> Vec<Datapoint> {
    registry
        .gather()
        .iter()
        .filter(|family| keep(family.get_field_type()))
        .filter(|family| family.get_name().starts_with(starts_with))
        .flat_map(family_datapoints)
        .collect()
}

fn family_datapoints(family: &MetricFamily) -> Vec<Datapoint> {
    family
        .get_metric()
        .iter()
        .flat_map(|metric| {
            let id = meter_id(family.get_name(), metric.get_label());
            measurements(family.get_field_type(), metric)
                .into_iter()
                .map(move |(statistic, value)| {
                    Datapoint::new(format!("{id}${statistic}"), value)
                })
        })
        .collect()
}

/// Renders `name[k1=v1,k2=v2]`. A metric without labels renders `name[]`.
fn meter_id(name: &str, labels: &[LabelPair]) -> String {
    let tags = labels
        .iter()
        .map(|label| format!("{}={}", label.get_name(), label.get_value()))
        .collect::<Vec<_>>()
        .join(",");
    format!("{name}[{tags}]")
}

fn measurements(ty: MetricType, metric: &Metric) -> Vec<(Statistic, f64)> {
    match ty {
        MetricType::COUNTER => vec![(Statistic::Count, metric.get_counter().get_value())],
        MetricType::GAUGE => vec![(Statistic::Value, metric.get_gauge().get_value())],
        MetricType::UNTYPED => vec![(Statistic::Value, metric.get_untyped().get_value())],
        MetricType::HISTOGRAM => {
            let histogram = metric.get_histogram();
            vec![
                (Statistic::Count, histogram.get_sample_count() as f64),
                (Statistic::Total, histogram.get_sample_sum()),
            ]
        }
        MetricType::SUMMARY => {
            let summary = metric.get_summary();
            vec![
                (Statistic::Count, summary.get_sample_count() as f64),
                (Statistic::Total, summary.get_sample_sum()),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapoint::dp;
    use prometheus::{Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

    fn test_registry() -> Registry {
        let registry = Registry::new();

        let requests = IntCounter::new("requests_total", "Total requests.").unwrap();
        registry.register(Box::new(requests.clone())).unwrap();
        requests.inc_by(4);

        let queue = Gauge::new("queue_size", "Current queue size.").unwrap();
        registry.register(Box::new(queue.clone())).unwrap();
        queue.set(7.5);

        let errors = IntCounterVec::new(
            Opts::new("errors_total", "Total errors by code."),
            &["code"],
        )
        .unwrap();
        registry.register(Box::new(errors.clone())).unwrap();
        errors.with_label_values(&["500"]).inc();

        let latency = Histogram::with_opts(HistogramOpts::new(
            "request_duration_seconds",
            "Request latency.",
        ))
        .unwrap();
        registry.register(Box::new(latency.clone())).unwrap();
        latency.observe(0.25);
        latency.observe(0.75);

        registry
    }

    #[test]
    fn lists_non_timer_datapoints() {
        let datapoints = list_without_timers(&test_registry(), "");
        assert!(datapoints.contains(&dp("requests_total[]$COUNT", 4)));
        assert!(datapoints.contains(&dp("queue_size[]$VALUE", 7.5)));
        assert!(datapoints.contains(&dp("errors_total[code=500]$COUNT", 1)));
        assert!(
            !datapoints.iter().any(|d| d.id().starts_with("request_duration_seconds")),
            "timers must not leak into the non-timer list: {datapoints:?}"
        );
    }

    #[test]
    fn lists_timer_datapoints() {
        let datapoints = list_timers(&test_registry(), "");
        assert_eq!(
            datapoints,
            vec![
                dp("request_duration_seconds[]$COUNT", 2),
                dp("request_duration_seconds[]$TOTAL", 1.0),
            ]
        );
    }

    #[test]
    fn prefix_filters_families() {
        let registry = test_registry();
        let datapoints = list_without_timers(&registry, "errors");
        assert_eq!(datapoints, vec![dp("errors_total[code=500]$COUNT", 1)]);

        assert!(list_without_timers(&registry, "no_such_metric").is_empty());
        assert!(list_timers(&registry, "no_such_metric").is_empty());
    }

    #[test]
    fn empty_registry_lists_nothing() {
        let registry = Registry::new();
        assert!(list_without_timers(&registry, "").is_empty());
        assert!(list_timers(&registry, "").is_empty());
    }

    #[test]
    fn unknown_registry_name_lists_nothing() {
        assert!(list_without_timers_named("never-registered", "").is_empty());
        assert!(list_timers_named("never-registered", "").is_empty());
    }

    #[test]
    fn meter_id_format() {
        assert_eq!(meter_id("m", &[]), "m[]");

        let mut label = LabelPair::new();
        label.set_name("method".to_string());
        label.set_value("GET".to_string());
        let mut label2 = LabelPair::new();
        label2.set_name("path".to_string());
        label2.set_value("/api".to_string());
        assert_eq!(meter_id("m", &[label, label2]), "m[method=GET,path=/api]");
    }
}
