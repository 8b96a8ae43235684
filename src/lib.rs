//! Load-test harness for a Gin REST Framework products service.
//!
//! A run seeds the fixture products, measures `GET /products` under concurrent load
//! with the [`grf_bench_core`] engine, deletes everything it can list and writes a
//! k6-style summary. The [`features`] module renders the framework's feature list for
//! the docs site.

pub mod client;
pub mod config;
pub mod error;
pub mod features;
pub mod harness;
pub mod html;
pub mod metrics;
pub mod model;
pub mod report;
pub mod runner;
pub mod telemetry;
