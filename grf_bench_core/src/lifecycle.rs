//! Setup → iterations → teardown.
//!
//! A [`Lifecycle`] describes a whole test: a one-off `setup` that prepares fixtures, the
//! measured `iteration` that executors replay concurrently, and a one-off `teardown`.
//! [`drive`] runs them in that order: setup exactly once before the first iteration,
//! teardown exactly once after the last one, whatever the executor does in between.
use std::{future::Future, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{Aggregate, BoxError, CheckSet, Executor, Metric, Scenario};

/// A complete load test: fixtures in, measured iterations, fixtures out.
///
/// Phases report problems as failed checks in the returned [`CheckSet`] instead of
/// errors, so a broken fixture never aborts the run. `iteration` is called concurrently
/// from many tasks through a shared `Arc<Self>`.
pub trait Lifecycle
where
    Self: Send + Sync + 'static,
{
    /// The sample produced by one iteration.
    type Metric: Metric;

    /// Prepare the system under test. Runs once, before any iteration.
    fn setup(&self) -> impl Future<Output = CheckSet> + Send;

    /// The measured unit of work.
    fn iteration(&self) -> impl Future<Output = Self::Metric> + Send;

    /// Clean up after the run. Runs once, after every iteration has finished.
    fn teardown(&self) -> impl Future<Output = CheckSet> + Send;
}

/// Everything a finished run produced, ready to be turned into a [`crate::Report`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome<A> {
    pub name: String,
    /// Merged aggregate of all iterations.
    pub aggregate: A,
    /// Checks recorded by setup and teardown.
    pub checks: CheckSet,
    /// Wall-clock time spent in the iteration phase. Rates are computed over this.
    pub elapsed: Duration,
    /// Wall-clock time of the whole run, setup and teardown included.
    pub total: Duration,
}

/// Run `lifecycle` through `executor`.
///
/// Fails only when the executor itself refuses to run (bad configuration); teardown is
/// still attempted in that case so fixtures created by setup are not left behind.
pub async fn drive<L, A, E>(
    name: &str,
    lifecycle: Arc<L>,
    executor: &E,
) -> Result<RunOutcome<A>, BoxError>
where
    L: Lifecycle,
    A: Aggregate<Metric = L::Metric> + 'static,
    E: Executor,
{
    let run_started = Instant::now();
    tracing::info!("[{name}] setup");
    let mut checks = lifecycle.setup().await;

    let scenario = Scenario::<A, _, _>::builder()
        .name(name)
        .action({
            let lifecycle = lifecycle.clone();
            move || {
                let lifecycle = lifecycle.clone();
                async move { lifecycle.iteration().await }
            }
        })
        .build();

    tracing::info!("[{name}] iterations");
    let started = Instant::now();
    let result = executor.exec(&scenario).await;
    let elapsed = started.elapsed();

    tracing::info!("[{name}] teardown");
    checks.merge(lifecycle.teardown().await);
    let total = run_started.elapsed();

    Ok(RunOutcome {
        name: name.to_owned(),
        aggregate: result?,
        checks,
        elapsed,
        total,
    })
}
