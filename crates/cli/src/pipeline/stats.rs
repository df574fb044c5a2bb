//! Run statistics.

use std::time::Duration;

use dispatcher::MetricsSnapshot;
use observability::DeliveryAggregator;

/// Statistics from a load run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Total duration of the run
    pub duration: Duration,

    /// Number of workers that delivered events
    pub workers: usize,

    /// Delivery counts and latency merged across workers
    pub delivery: DeliveryAggregator,

    /// Per-gate counters, in gate order
    pub gates: Vec<(String, MetricsSnapshot)>,
}

impl RunStats {
    /// Events dispatched per second
    pub fn eps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.delivery.total_events as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                      Run Statistics                          ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        let summary = self.delivery.summary();

        println!("📊 Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Workers: {}", self.workers);
        println!("   ├─ Events dispatched: {}", summary.total_events);
        println!("   ├─ Events/s: {:.2}", self.eps());
        println!("   └─ Dispatch latency (us): {}", summary.latency_us);

        println!("\n📈 Deliveries");
        println!("   ├─ Appended: {}", summary.appended);
        println!("   ├─ Suppressed: {}", summary.suppressed);
        println!(
            "   └─ Failed: {} ({:.2}%)",
            summary.failed, summary.failure_rate
        );

        if !self.gates.is_empty() {
            println!("\n🚦 Gates");
            for (i, (name, snapshot)) in self.gates.iter().enumerate() {
                let prefix = if i == self.gates.len() - 1 {
                    "└─"
                } else {
                    "├─"
                };
                println!(
                    "   {} {}: appended={} suppressed={} recursive={} failed={}",
                    prefix,
                    name,
                    snapshot.appended,
                    snapshot.suppressed,
                    snapshot.recursive,
                    snapshot.failed
                );
            }
        }

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eps_handles_zero_duration() {
        let stats = RunStats::default();
        assert_eq!(stats.eps(), 0.0);
    }

    #[test]
    fn test_eps() {
        let mut stats = RunStats {
            duration: Duration::from_secs(2),
            ..Default::default()
        };
        for _ in 0..10 {
            stats.delivery.update(1, 0, 0, 5.0);
        }
        assert!((stats.eps() - 5.0).abs() < f64::EPSILON);
    }
}
