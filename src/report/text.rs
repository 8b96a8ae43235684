//! Human-readable summary, laid out like k6's end-of-test output.
use std::fmt::{self, Display, Formatter};

use super::{CounterValues, RateValues, Summary};

const LABEL_WIDTH: usize = 32;

fn label(f: &mut Formatter<'_>, name: &str) -> fmt::Result {
    let dots = LABEL_WIDTH.saturating_sub(name.len());
    write!(f, "     {name}{}: ", ".".repeat(dots))
}

fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// `12 kB`, `1.2 MB`
pub(super) fn bytes(count: u64) -> String {
    const UNITS: [&str; 4] = ["B", "kB", "MB", "GB"];
    let mut value = count as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{count} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Milliseconds rendered with a unit that keeps them readable.
pub(super) fn millis(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else if ms >= 1.0 {
        format!("{ms:.2}ms")
    } else {
        format!("{:.2}µs", ms * 1000.0)
    }
}

fn counter(f: &mut Formatter<'_>, name: &str, values: &CounterValues) -> fmt::Result {
    label(f, name)?;
    writeln!(f, "{} {:.2}/s", values.count, values.rate)
}

fn rate(f: &mut Formatter<'_>, name: &str, values: &RateValues) -> fmt::Result {
    label(f, name)?;
    writeln!(
        f,
        "{} ✓ {} ✗ {}",
        percent(values.rate),
        values.passes,
        values.fails
    )
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "     scenario: {}", self.root_group.name)?;
        writeln!(f)?;
        for check in &self.root_group.checks {
            if check.fails == 0 {
                writeln!(f, "     ✓ {}", check.name)?;
            } else {
                let total = check.passes + check.fails;
                writeln!(f, "     ✗ {}", check.name)?;
                writeln!(
                    f,
                    "      ↳  {}% ✓ {} / ✗ {}",
                    check.passes * 100 / total,
                    check.passes,
                    check.fails
                )?;
            }
        }
        if !self.root_group.checks.is_empty() {
            writeln!(f)?;
        }

        let m = &self.metrics;
        rate(f, "checks", &m.checks.values)?;
        label(f, "data_received")?;
        writeln!(
            f,
            "{} {}/s",
            bytes(m.data_received.values.count),
            bytes(m.data_received.values.rate as u64)
        )?;
        let d = &m.http_req_duration.values;
        label(f, "http_req_duration")?;
        writeln!(
            f,
            "avg={} min={} med={} max={} p(90)={} p(95)={}",
            millis(d.avg),
            millis(d.min),
            millis(d.med),
            millis(d.max),
            millis(d.p90),
            millis(d.p95)
        )?;
        rate(f, "http_req_failed", &m.http_req_failed.values)?;
        counter(f, "http_reqs", &m.http_reqs.values)?;
        counter(f, "iterations", &m.iterations.values)?;
        writeln!(f)?;
        writeln!(
            f,
            "     running ({})",
            millis(self.state.test_run_duration_ms)
        )
    }
}
