use std::fmt;
use std::hash::{Hash, Hasher};

/// A single measurement snapshot taken from a metrics registry: the rendered
/// meter id (`name[k=v,...]$STATISTIC`) and the value recorded for it.
#[derive(Clone, Debug)]
pub struct Datapoint {
    id: String,
    value: f64,
}

impl Datapoint {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

// Datapoints are compared for exact equality, including the value bits.
// Snapshot comparisons in tests want `0.1 + 0.2 != 0.3` to be visible, not
// papered over by an epsilon.
impl PartialEq for Datapoint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.value.to_bits() == other.value.to_bits()
    }
}

impl Eq for Datapoint {}

impl Hash for Datapoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.value.to_bits().hash(state);
    }
}

impl fmt::Display for Datapoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.value)
    }
}

/// Shorthand for building an expected [`Datapoint`] in assertions.
///
/// Accepts anything losslessly convertible to `f64`, so both `dp("m[]$COUNT", 2)`
/// and `dp("m[]$VALUE", 0.5)` read naturally.
pub fn dp(id: impl Into<String>, value: impl Into<f64>) -> Datapoint {
    Datapoint::new(id, value.into())
}

/// The statistic a measurement value belongs to, e.g. the sample count vs the
/// running sum of a histogram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Statistic {
    Count,
    Total,
    Value,
    Max,
    ActiveTasks,
    Duration,
    Unknown,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Total => "TOTAL",
            Self::Value => "VALUE",
            Self::Max => "MAX",
            Self::ActiveTasks => "ACTIVE_TASKS",
            Self::Duration => "DURATION",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
