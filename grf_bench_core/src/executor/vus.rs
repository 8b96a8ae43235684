//! The `VuExecutor`: a fixed pool of virtual users calling the action back to back.
//!
//! Each virtual user is one tokio task running the scenario's action sequentially, so a
//! single user never has two calls in flight. How long users keep going is decided by
//! exactly one of:
//!
//! - `duration`: every user starts a new call while the deadline has not passed yet
//!   (a call already in flight at the deadline is allowed to finish);
//! - `iterations`: a budget shared by all users; each call claims one unit from an
//!   atomic counter, so the total number of calls is exactly `iterations`.
use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{task::JoinHandle, time::Instant};
use typed_builder::TypedBuilder;

use super::{Executor, collect_workers};
use crate::{BoxError, aggregate::Aggregate, scenario::Scenario};

/// Executor running `vus` virtual users, each calling the action back to back.
///
/// Configure exactly one of `duration` or `iterations`; anything else makes `exec` fail
/// before a single user is spawned.
#[derive(Debug, Clone, TypedBuilder)]
pub struct VuExecutor {
    /// Number of concurrent virtual users.
    pub vus: usize,
    #[builder(default, setter(strip_option))]
    pub duration: Option<Duration>,
    #[builder(default, setter(strip_option))]
    pub iterations: Option<u64>,
}

/// When a virtual user stops.
#[derive(Clone)]
enum Budget {
    Until(Instant),
    Shared { claimed: Arc<AtomicU64>, total: u64 },
}

impl Budget {
    fn next(&self) -> bool {
        match self {
            Budget::Until(deadline) => Instant::now() < *deadline,
            Budget::Shared { claimed, total } => claimed.fetch_add(1, Ordering::Relaxed) < *total,
        }
    }
}

impl VuExecutor {
    /// The budget shared by all users and a description of it for the logs.
    fn budget(&self) -> Result<(Budget, String), BoxError> {
        if self.vus == 0 {
            return Err("at least one virtual user is required".into());
        }
        match (self.duration, self.iterations) {
            (Some(duration), None) => Ok((
                Budget::Until(Instant::now() + duration),
                format!("for {duration:?}"),
            )),
            (None, Some(total)) => Ok((
                Budget::Shared {
                    claimed: Arc::new(AtomicU64::new(0)),
                    total,
                },
                format!("{total} shared iterations"),
            )),
            (Some(_), Some(_)) => Err("set either a duration or an iteration count, not both".into()),
            (None, None) => Err("a duration or an iteration count is required".into()),
        }
    }
}

fn spawn_vus<A, F, Fut>(vus: usize, budget: Budget, action: F) -> Vec<JoinHandle<A>>
where
    A: Aggregate + 'static,
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = A::Metric> + Send + 'static,
{
    (0..vus)
        .map(|i| {
            let budget = budget.clone();
            let action = action.clone();
            tokio::spawn(async move {
                let mut agg = A::new();
                let mut done = 0u64;
                while budget.next() {
                    let metric = action().await;
                    agg.consume(&metric);
                    done += 1;
                }
                tracing::debug!("VU {i} finished after {done} iterations.");
                agg
            })
        })
        .collect()
}

impl Executor for VuExecutor {
    async fn exec<A, F, Fut>(&self, scenario: &Scenario<A, F, Fut>) -> Result<A, BoxError>
    where
        A: Aggregate + 'static,
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = A::Metric> + Send + 'static,
    {
        let (budget, described) = self.budget()?;
        tracing::info!(
            "Running scenario: {} with {} VUs ({described})",
            scenario.name,
            self.vus,
        );
        let handles = spawn_vus(self.vus, budget, scenario.action.clone());
        let final_agg = collect_workers(handles).await;
        tracing::info!("Done running scenario: {}!", scenario.name);
        Ok(final_agg)
    }
}
