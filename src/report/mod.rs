//! End-of-run summary.
//!
//! [`Summary`] mirrors the layout of k6's summary export (`metrics.<name>.values`), so
//! tooling written against k6 reports, such as reading
//! `metrics.http_reqs.values.rate`, works unchanged on ours.
mod html;
mod sinks;
mod text;

pub use sinks::{HtmlFileReporter, JsonFileReporter, ReportFormat, StdoutReporter};

use grf_bench_core::{CheckSet, Report, RunOutcome};
use serde::{Deserialize, Serialize};

use crate::metrics::HttpAggregate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Counter,
    Trend,
    Rate,
}

/// What unit a metric's values are in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contains {
    Default,
    Time,
    Data,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetric<V> {
    #[serde(rename = "type")]
    pub kind: MetricType,
    pub contains: Contains,
    pub values: V,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterValues {
    pub count: u64,
    /// Per second of run time.
    pub rate: f64,
}

/// Milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendValues {
    pub avg: f64,
    pub min: f64,
    pub med: f64,
    pub max: f64,
    #[serde(rename = "p(90)")]
    pub p90: f64,
    #[serde(rename = "p(95)")]
    pub p95: f64,
}

/// `passes` counts the samples that were true, `rate` is their share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateValues {
    pub rate: f64,
    pub passes: u64,
    pub fails: u64,
}

impl RateValues {
    fn new(passes: u64, fails: u64) -> Self {
        let total = passes + fails;
        let rate = if total == 0 {
            0.0
        } else {
            passes as f64 / total as f64
        };
        Self {
            rate,
            passes,
            fails,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub checks: SummaryMetric<RateValues>,
    pub data_received: SummaryMetric<CounterValues>,
    pub http_req_duration: SummaryMetric<TrendValues>,
    /// A "pass" of this rate is a failed request, as in k6.
    pub http_req_failed: SummaryMetric<RateValues>,
    pub http_reqs: SummaryMetric<CounterValues>,
    pub iterations: SummaryMetric<CounterValues>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub name: String,
    pub passes: u64,
    pub fails: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub checks: Vec<CheckSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// The whole run, setup and teardown included. Rates only cover the iterations.
    #[serde(rename = "testRunDurationMs")]
    pub test_run_duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub root_group: Group,
    pub metrics: Metrics,
    pub state: State,
}

impl Report<HttpAggregate> for Summary {}

impl From<RunOutcome<HttpAggregate>> for Summary {
    fn from(outcome: RunOutcome<HttpAggregate>) -> Self {
        let RunOutcome {
            name,
            aggregate,
            checks,
            elapsed,
            total,
        } = outcome;
        let secs = elapsed.as_secs_f64();
        let per_second = |count: u64| if secs > 0.0 { count as f64 / secs } else { 0.0 };
        let counter = |contains, count| SummaryMetric {
            kind: MetricType::Counter,
            contains,
            values: CounterValues {
                count,
                rate: per_second(count),
            },
        };

        let requests = aggregate.count();
        Summary {
            root_group: Group {
                name,
                checks: check_summaries(&checks),
            },
            metrics: Metrics {
                checks: SummaryMetric {
                    kind: MetricType::Rate,
                    contains: Contains::Default,
                    values: RateValues::new(checks.passes(), checks.fails()),
                },
                data_received: counter(Contains::Data, aggregate.bytes_received),
                http_req_duration: SummaryMetric {
                    kind: MetricType::Trend,
                    contains: Contains::Time,
                    values: trend(&aggregate.latencies_us),
                },
                http_req_failed: SummaryMetric {
                    kind: MetricType::Rate,
                    contains: Contains::Default,
                    values: RateValues::new(aggregate.failed, requests - aggregate.failed),
                },
                http_reqs: counter(Contains::Default, requests),
                // one request per iteration
                iterations: counter(Contains::Default, requests),
            },
            state: State {
                test_run_duration_ms: total.as_secs_f64() * 1000.0,
            },
        }
    }
}

fn check_summaries(checks: &CheckSet) -> Vec<CheckSummary> {
    checks
        .iter()
        .map(|c| CheckSummary {
            name: c.name.clone(),
            passes: c.passes,
            fails: c.fails,
        })
        .collect()
}

/// Latency statistics in milliseconds. An empty sample set is all zeros.
fn trend(latencies_us: &[u64]) -> TrendValues {
    let mut sorted: Vec<f64> = latencies_us.iter().map(|us| *us as f64 / 1000.0).collect();
    sorted.sort_by(f64::total_cmp);
    let avg = if sorted.is_empty() {
        0.0
    } else {
        sorted.iter().sum::<f64>() / sorted.len() as f64
    };
    TrendValues {
        avg,
        min: sorted.first().copied().unwrap_or(0.0),
        med: percentile(&sorted, 50.0),
        max: sorted.last().copied().unwrap_or(0.0),
        p90: percentile(&sorted, 90.0),
        p95: percentile(&sorted, 95.0),
    }
}

/// Percentile of sorted samples, interpolating linearly between the two closest ranks.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = pct / 100.0 * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use grf_bench_core::Aggregate;

    use super::*;
    use crate::metrics::HttpMetric;

    fn outcome(
        latencies_ms: &[u64],
        failed_every: usize,
        elapsed: Duration,
    ) -> RunOutcome<HttpAggregate> {
        let mut aggregate = HttpAggregate::new();
        for (i, ms) in latencies_ms.iter().enumerate() {
            let failed = failed_every > 0 && i % failed_every == 0;
            aggregate.consume(&HttpMetric {
                latency: Duration::from_millis(*ms),
                status: Some(if failed { 500 } else { 200 }),
                bytes: 100,
            });
        }
        let mut checks = CheckSet::default();
        checks.record("product is deleted", true);
        checks.record("product is created", true);
        checks.record("product is created", false);
        RunOutcome {
            name: "products".into(),
            aggregate,
            checks,
            elapsed,
            // setup and teardown
            total: elapsed + Duration::from_secs(1),
        }
    }

    #[test]
    fn percentiles_interpolate_between_ranks() {
        let sorted: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(percentile(&sorted, 50.0), 5.5);
        assert!((percentile(&sorted, 90.0) - 9.1).abs() < 1e-9);
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 10.0);
        assert_eq!(percentile(&[4.0], 95.0), 4.0);
        assert_eq!(percentile(&[], 95.0), 0.0);
    }

    #[test]
    fn summary_counts_requests_and_rates() {
        let summary = Summary::from(outcome(&[40, 10, 30, 20], 2, Duration::from_secs(2)));

        let reqs = &summary.metrics.http_reqs.values;
        assert_eq!(reqs.count, 4);
        assert_eq!(reqs.rate, 2.0);
        assert_eq!(summary.metrics.iterations.values.count, 4);
        assert_eq!(summary.metrics.data_received.values.count, 400);

        let duration = &summary.metrics.http_req_duration.values;
        assert_eq!(duration.min, 10.0);
        assert_eq!(duration.max, 40.0);
        assert_eq!(duration.avg, 25.0);
        assert_eq!(duration.med, 25.0);

        let failed = &summary.metrics.http_req_failed.values;
        assert_eq!((failed.passes, failed.fails, failed.rate), (2, 2, 0.5));

        let checks = &summary.metrics.checks.values;
        assert_eq!((checks.passes, checks.fails), (2, 1));
        assert_eq!(summary.root_group.checks.len(), 2);
        assert_eq!(summary.state.test_run_duration_ms, 3000.0);
    }

    #[test]
    fn empty_run_reports_zeros_not_nan() {
        let mut run = outcome(&[], 0, Duration::ZERO);
        run.checks = CheckSet::default();
        let summary = Summary::from(run);

        assert_eq!(summary.metrics.http_reqs.values.rate, 0.0);
        assert_eq!(summary.metrics.http_req_duration.values.avg, 0.0);
        assert_eq!(summary.metrics.http_req_failed.values.rate, 0.0);
        assert_eq!(summary.metrics.checks.values.rate, 0.0);
    }

    #[test]
    fn json_uses_k6_field_names() {
        let summary = Summary::from(outcome(&[10, 20], 0, Duration::from_secs(1)));
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["metrics"]["http_reqs"]["values"]["rate"], 2.0);
        assert_eq!(json["metrics"]["http_reqs"]["type"], "counter");
        assert_eq!(json["metrics"]["http_req_duration"]["contains"], "time");
        assert!(json["metrics"]["http_req_duration"]["values"]["p(95)"].is_number());
        assert_eq!(json["state"]["testRunDurationMs"], 2000.0);
        assert_eq!(json["root_group"]["checks"][0]["name"], "product is deleted");
    }
}
