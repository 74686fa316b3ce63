//! Fluent assertions over a datapoint snapshot.

use crate::datapoint::Datapoint;
use crate::inspect::{list_timers, list_without_timers};
use prometheus::Registry;
use regex::Regex;

pub struct MetricsAssert {
    datapoints: Vec<Datapoint>,
}

impl MetricsAssert {
    /// Snapshots every datapoint currently in the registry, timers included.
    pub fn from_registry(registry: &Registry) -> Self {
        let mut datapoints = list_without_timers(registry, "");
        datapoints.extend(list_timers(registry, ""));
        Self { datapoints }
    }

    pub fn datapoints(&self) -> &[Datapoint] {
        &self.datapoints
    }

    pub fn assert_contains(self, expected: Datapoint) -> Self {
        assert!(
            self.datapoints.contains(&expected),
            "Expected to find datapoint '{}', but the snapshot contains:\n{:?}",
            expected,
            self.datapoints
        );
        self
    }

    pub fn assert_does_not_contain(self, unexpected: Datapoint) -> Self {
        assert!(
            !self.datapoints.contains(&unexpected),
            "Expected not to find datapoint '{}', but the snapshot contains it:\n{:?}",
            unexpected,
            self.datapoints
        );
        self
    }

    pub fn assert_contains_id_matching(self, pattern: &str) -> Self {
        assert!(
            !self.find_datapoints_matching(pattern).is_empty(),
            "Expected to find datapoint matching '{}', but none matched in:\n{:?}",
            pattern,
            self.datapoints
        );
        self
    }

    pub fn assert_does_not_contain_id_matching(self, pattern: &str) -> Self {
        let matches = self.find_datapoints_matching(pattern);
        assert!(
            matches.is_empty(),
            "Expected not to find any datapoint matching '{}', but found the following matches:\n{:?}",
            pattern,
            matches
        );
        self
    }

    fn find_datapoints_matching(&self, pattern: &str) -> Vec<String> {
        let regex = Regex::new(pattern).unwrap_or_else(|_| panic!("Invalid regex: {}", pattern));
        self.datapoints
            .iter()
            .map(|dp| dp.to_string())
            .filter(|line| regex.is_match(line))
            .collect()
    }
}
