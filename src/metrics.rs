use std::time::Duration;

use grf_bench_core::{
    Aggregate,
    macros::{aggregate, metric},
};

/// One measured request.
#[metric]
pub struct HttpMetric {
    pub latency: Duration,
    /// `None` when no response came back at all.
    pub status: Option<u16>,
    /// Body bytes received.
    pub bytes: usize,
}

impl HttpMetric {
    /// Same rule as k6's default `expected_response`: any 2xx or 3xx status.
    pub fn failed(&self) -> bool {
        !matches!(self.status, Some(200..=399))
    }
}

/// Raw samples of all measured requests.
///
/// Latencies are kept individually (in microseconds) so the report can compute exact
/// percentiles.
#[aggregate]
#[derive(Default)]
pub struct HttpAggregate {
    pub latencies_us: Vec<u64>,
    pub failed: u64,
    pub bytes_received: u64,
}

impl HttpAggregate {
    pub fn count(&self) -> u64 {
        self.latencies_us.len() as u64
    }
}

impl Aggregate for HttpAggregate {
    type Metric = HttpMetric;

    fn new() -> Self {
        Self::default()
    }

    fn consume(&mut self, metric: &Self::Metric) {
        self.latencies_us
            .push(u64::try_from(metric.latency.as_micros()).unwrap_or(u64::MAX));
        self.failed += u64::from(metric.failed());
        self.bytes_received += metric.bytes as u64;
    }

    fn merge(&mut self, other: Self) {
        self.latencies_us.extend(other.latencies_us);
        self.failed += other.failed;
        self.bytes_received += other.bytes_received;
    }
}
