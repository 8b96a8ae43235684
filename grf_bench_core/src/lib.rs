//! grf-bench-core, the small load-testing engine behind `grf-bench`.
//!
//! The engine follows a slim-core design: metrics, aggregates, reports and executors are
//! traits, and a run is composed from them.
//!
//! # Architecture
//!
//! - [`Metric`]: one sample produced by one call of the measured action.
//! - [`Aggregate`]: a mergeable collector of metrics. Every worker keeps its own and the
//!   executor merges them at the end.
//! - [`Check`] / [`CheckSet`]: named pass/fail assertions that are counted, never fatal.
//! - [`Scenario`]: the measured action and its name.
//! - [`Executor`]: owns concurrency. [`VuExecutor`] runs a fixed number of virtual users;
//!   [`RateExecutor`] follows a ramped request rate.
//! - [`Lifecycle`] and [`drive`]: setup once, iterate through an executor, teardown once.
//! - [`Report`] / [`Reporter`]: derive the final numbers, then write them somewhere.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use grf_bench_core::{
//!     Aggregate, CheckSet, Lifecycle, RunOutcome, VuExecutor, drive,
//!     macros::{aggregate, metric},
//! };
//!
//! #[metric]
//! struct Ping;
//!
//! #[aggregate]
//! struct Pings(u64);
//!
//! impl Aggregate for Pings {
//!     type Metric = Ping;
//!     fn new() -> Self { Pings(0) }
//!     fn consume(&mut self, _: &Ping) { self.0 += 1 }
//!     fn merge(&mut self, other: Self) { self.0 += other.0 }
//! }
//!
//! struct Pinger;
//!
//! impl Lifecycle for Pinger {
//!     type Metric = Ping;
//!     async fn setup(&self) -> CheckSet { CheckSet::new() }
//!     async fn iteration(&self) -> Ping { Ping }
//!     async fn teardown(&self) -> CheckSet { CheckSet::new() }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let executor = VuExecutor::builder().vus(10).duration(Duration::from_secs(5)).build();
//!     let outcome: RunOutcome<Pings> = drive("ping", Arc::new(Pinger), &executor).await.unwrap();
//!     println!("{} pings", outcome.aggregate.0);
//! }
//! ```
//!
//! # Feature flags
//! - `internals`: expose the rate executor's governor and worker functions.

// lets the attribute macros refer to `::grf_bench_core` from inside this crate too
extern crate self as grf_bench_core;

/// Metric aggregators
pub mod aggregate;
/// Named pass/fail assertions
pub mod check;
/// Orchestrators that define how things will actually run
pub mod executor;
/// Setup, iterations and teardown
pub mod lifecycle;
/// Single metrics
pub mod metric;
/// Reports and Reporters
pub mod report;
/// The measured action
pub mod scenario;

pub use aggregate::Aggregate;
pub use check::{Check, CheckEntry, CheckSet};
pub use executor::{Executor, RateExecutor, Stage, VuExecutor};
pub use lifecycle::{Lifecycle, RunOutcome, drive};
pub use metric::Metric;
pub use report::{Report, Reporter};
pub use scenario::Scenario;

/// Error type used at the executor and reporter seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Procedural macros to reduce boilerplate
pub mod macros {
    pub use grf_bench_macros::*;
}
