//! Command line and environment configuration.
use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use grf_bench_core::{RateExecutor, Stage, VuExecutor};

use crate::{error::ConfigError, harness::Variant, report::ReportFormat};

#[derive(Debug, Parser)]
#[command(name = "grf-bench", version, about = "Load test harness for the products API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Seed fixtures, load `GET /products`, clean up and report.
    Run(RunArgs),
    /// Print the feature list as an HTML block.
    Features(FeaturesArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Root URL of the service under test.
    #[arg(long, env = "GRF_BENCH_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    #[arg(long, env = "GRF_BENCH_VARIANT", value_enum, default_value_t = Variant::Products)]
    pub variant: Variant,

    /// Concurrent virtual users.
    #[arg(long, env = "GRF_BENCH_VUS", default_value_t = 10)]
    pub vus: usize,

    /// How long the virtual users keep iterating, e.g. `10s`, `500ms`, `1m30s`.
    #[arg(long, env = "GRF_BENCH_DURATION", value_parser = parse_duration, default_value = "10s")]
    pub duration: Duration,

    /// Total iterations shared by all virtual users. Replaces `--duration`.
    #[arg(long, env = "GRF_BENCH_ITERATIONS")]
    pub iterations: Option<u64>,

    /// Ramp stage `DURATION:RATE` in requests per second. Repeat to chain stages;
    /// any stage switches from virtual users to a constant arrival rate.
    #[arg(long = "stage", value_parser = parse_stage)]
    pub stages: Vec<Stage>,

    /// Per-request timeout.
    #[arg(long, env = "GRF_BENCH_TIMEOUT", value_parser = parse_duration, default_value = "60s")]
    pub timeout: Duration,

    /// Report artifact path. Defaults to `artifacts/benchmark.json` for JSON and
    /// `k6.html` for HTML.
    #[arg(long, env = "GRF_BENCH_OUT")]
    pub out: Option<PathBuf>,

    /// Report artifact format. Defaults to JSON for `products` and HTML for `categories`.
    #[arg(long, env = "GRF_BENCH_FORMAT", value_enum)]
    pub format: Option<ReportFormat>,
}

#[derive(Debug, Clone, Args)]
pub struct FeaturesArgs {
    /// Write the block to a file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// How the measured iterations are scheduled.
#[derive(Debug, Clone)]
pub enum Plan {
    Vus(VuExecutor),
    Rate(RateExecutor),
}

impl RunArgs {
    pub fn plan(&self) -> Plan {
        if !self.stages.is_empty() {
            return Plan::Rate(RateExecutor::builder().stages(self.stages.clone()).build());
        }
        let (duration, iterations) = match self.iterations {
            Some(iterations) => (None, Some(iterations)),
            None => (Some(self.duration), None),
        };
        Plan::Vus(VuExecutor {
            vus: self.vus,
            duration,
            iterations,
        })
    }

    /// Artifact format and path, falling back to the variant's defaults.
    pub fn report_target(&self) -> (ReportFormat, PathBuf) {
        let format = self.format.unwrap_or(match self.variant {
            Variant::Products => ReportFormat::Json,
            Variant::Categories => ReportFormat::Html,
        });
        let path = self.out.clone().unwrap_or_else(|| match format {
            ReportFormat::Json => PathBuf::from("artifacts/benchmark.json"),
            ReportFormat::Html => PathBuf::from("k6.html"),
        });
        (format, path)
    }
}

/// Parse `500ms`, `10s`, `2m`, `1h` or concatenations such as `1m30s`.
/// A bare number is seconds.
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration(input.to_owned());
    let text = input.trim();
    if text.is_empty() {
        return Err(invalid());
    }
    if let Ok(secs) = text.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = text;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(invalid());
        }
        let value: u64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];
        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let secs_per_unit = match &rest[..unit_len] {
            "ms" => None,
            "s" => Some(1),
            "m" => Some(60),
            "h" => Some(3600),
            _ => return Err(invalid()),
        };
        let part = match secs_per_unit {
            None => Duration::from_millis(value),
            Some(n) => Duration::from_secs(value.checked_mul(n).ok_or_else(invalid)?),
        };
        total = total.checked_add(part).ok_or_else(invalid)?;
        rest = &rest[unit_len..];
    }
    Ok(total)
}

/// Parse a ramp stage such as `30s:100`.
pub fn parse_stage(input: &str) -> Result<Stage, ConfigError> {
    let invalid = || ConfigError::InvalidStage(input.to_owned());
    let (duration, rate) = input.split_once(':').ok_or_else(invalid)?;
    let duration = parse_duration(duration).map_err(|_| invalid())?;
    let rate: f64 = rate.trim().parse().map_err(|_| invalid())?;
    if !rate.is_finite() || rate < 0.0 {
        return Err(invalid());
    }
    Ok(Stage::new(duration, rate))
}
