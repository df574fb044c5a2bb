//! Delivery metrics
//!
//! Records gate outcomes through the `metrics` facade and aggregates them in
//! memory for end-of-run summaries.

use contracts::Level;
use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};

/// Outcome label for an appended event
pub const OUTCOME_APPENDED: &str = "appended";
/// Outcome label for a suppressed event
pub const OUTCOME_SUPPRESSED: &str = "suppressed";
/// Outcome label for a propagated failure
pub const OUTCOME_FAILED: &str = "failed";

/// Register help text for the delivery metrics with the installed recorder
pub fn describe_delivery_metrics() {
    describe_counter!(
        "gate_deliveries_total",
        "Gate outcomes per appender: appended, suppressed or failed"
    );
    describe_counter!("gate_events_total", "Events handed to the dispatcher, by level");
    describe_histogram!(
        "gate_dispatch_latency_us",
        Unit::Microseconds,
        "Time to offer one event to every gate"
    );
}

/// Record one gate outcome
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_delivery;
///
/// match gate.deliver(&event) {
///     Ok(Delivery::Appended) => record_delivery(gate.name(), OUTCOME_APPENDED),
///     // ...
/// }
/// ```
pub fn record_delivery(appender: &str, outcome: &str) {
    counter!(
        "gate_deliveries_total",
        "appender" => appender.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record an event entering the dispatcher
pub fn record_event_dispatched(level: Level) {
    counter!("gate_events_total", "level" => level.name()).increment(1);
}

/// Record time spent dispatching one event to every gate
pub fn record_dispatch_latency_us(latency_us: f64) {
    histogram!("gate_dispatch_latency_us").record(latency_us);
}

/// In-memory delivery aggregator
#[derive(Debug, Clone, Default)]
pub struct DeliveryAggregator {
    /// Events dispatched
    pub total_events: u64,

    /// Gate deliveries that reached an appender
    pub appended: u64,

    /// Gate deliveries suppressed
    pub suppressed: u64,

    /// Gate deliveries that propagated a failure
    pub failed: u64,

    /// Dispatch latency statistics (microseconds)
    pub latency_stats: RunningStats,
}

impl DeliveryAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one dispatched event
    pub fn update(&mut self, appended: u64, suppressed: u64, failed: u64, latency_us: f64) {
        self.total_events += 1;
        self.appended += appended;
        self.suppressed += suppressed;
        self.failed += failed;
        self.latency_stats.push(latency_us);
    }

    /// Fold another aggregator into this one
    pub fn merge(&mut self, other: &DeliveryAggregator) {
        self.total_events += other.total_events;
        self.appended += other.appended;
        self.suppressed += other.suppressed;
        self.failed += other.failed;
        self.latency_stats.merge(&other.latency_stats);
    }

    /// Produce a summary report
    pub fn summary(&self) -> DeliverySummary {
        let deliveries = self.appended + self.suppressed + self.failed;
        DeliverySummary {
            total_events: self.total_events,
            appended: self.appended,
            suppressed: self.suppressed,
            failed: self.failed,
            failure_rate: if deliveries > 0 {
                self.failed as f64 / deliveries as f64 * 100.0
            } else {
                0.0
            },
            latency_us: StatsSummary::from(&self.latency_stats),
        }
    }
}

/// Delivery summary
#[derive(Debug, Clone, Default)]
pub struct DeliverySummary {
    pub total_events: u64,
    pub appended: u64,
    pub suppressed: u64,
    pub failed: u64,
    pub failure_rate: f64,
    pub latency_us: StatsSummary,
}

impl std::fmt::Display for DeliverySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Delivery Summary ===")?;
        writeln!(f, "Events dispatched: {}", self.total_events)?;
        writeln!(f, "Appended: {}", self.appended)?;
        writeln!(f, "Suppressed: {}", self.suppressed)?;
        writeln!(f, "Failed: {} ({:.2}%)", self.failed, self.failure_rate)?;
        writeln!(f, "Dispatch latency (us): {}", self.latency_us)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Combine with statistics gathered elsewhere (Chan et al.)
    pub fn merge(&mut self, other: &RunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let mean = self.mean + delta * other.count as f64 / count as f64;
        self.m2 += other.m2 + delta * delta * (self.count as f64 * other.count as f64) / count as f64;
        self.mean = mean;
        self.count = count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Number of values
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Sample standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
