//! Executors: orchestration of runtime execution
//!
//! The `Executor` trait is the runtime that executes a `Scenario`. Executors own all
//! the concurrency of a run: they decide how many workers (virtual users) exist, when
//! they start, how often they call the scenario's action and when they stop.
//!
//! Two executors are provided:
//!
//! - [`VuExecutor`]: a fixed number of virtual users calling the action back to back,
//!   either for a wall-clock duration or until a shared iteration budget is spent.
//! - [`RateExecutor`]: a token-bucket governor driven by ramp [`Stage`]s that controls
//!   the request rate instead of the number of users.
//!
//! Every worker keeps its own `Aggregate`; the executor merges them when the run is
//! over, so `merge` must be associative and commutative. A worker that panics is logged
//! and contributes an empty aggregate instead of failing the whole run.
pub mod rate;
pub mod vus;

pub use rate::{RateExecutor, Stage};
pub use vus::VuExecutor;

use futures::future::join_all;
use std::future::Future;
use tokio::task::JoinHandle;

use crate::{BoxError, aggregate::Aggregate, scenario::Scenario};

/// The runtime hook that executes a `Scenario`.
///
/// The method is generic over the action rather than the trait, so one executor value
/// can run any scenario, including ones whose action is a closure built internally
/// (see [`crate::lifecycle::drive`]).
pub trait Executor
where
    Self: Send + Sync,
{
    /// Execute the scenario and return the merged aggregate of all workers.
    fn exec<A, F, Fut>(
        &self,
        scenario: &Scenario<A, F, Fut>,
    ) -> impl Future<Output = Result<A, BoxError>> + Send
    where
        A: Aggregate + 'static,
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = A::Metric> + Send + 'static;
}

/// Wait for every worker and fold their aggregates into one.
pub(crate) async fn collect_workers<A: Aggregate>(handles: Vec<JoinHandle<A>>) -> A {
    tracing::info!("Retrieving data from {} workers...", handles.len());
    let mut final_agg = A::new();
    for res in join_all(handles).await {
        match res {
            Ok(agg) => final_agg.merge(agg),
            // one bad worker should not throw away the data of all the others
            Err(e) => tracing::error!("Worker panicked with error: {e}"),
        }
    }
    final_agg
}
