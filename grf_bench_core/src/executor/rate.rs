//! The `RateExecutor`: a rate-controlled, stage-based execution model.
//!
//! A governor task adds tokens to a pool (a `tokio::sync::Semaphore`) at a rate
//! interpolated linearly across the configured [`Stage`]s, and a fixed set of worker
//! tasks spend one token per call of the scenario's action. Rate generation and work
//! execution stay separate, which keeps the workers' hot path down to "acquire, call,
//! consume".
//!
//! For a stage going from `start_rate` to `end_rate` over `duration`, the governor adds
//! per tick:
//!
//! ```text
//! t = min(elapsed / duration, 1)
//! r(t) = start_rate + (end_rate - start_rate) * t
//! add_total = floor(r(t) * tick_seconds + fractional)
//! fractional = (r(t) * tick_seconds + fractional) - add_total
//! ```
//!
//! saturating at `bucket_capacity`. Carrying `fractional` keeps the long-term average
//! exact when a tick's share is not a whole number of tokens.
use tokio::task::JoinHandle;
use tokio::time::Instant;
use typed_builder::TypedBuilder;

use super::{Executor, collect_workers};
use crate::{BoxError, aggregate::Aggregate, scenario::Scenario};
use internals::*;

use std::{future::Future, sync::Arc, time::Duration};

/// A stage defines a target rate (calls per second) and how long to ramp to it.
///
/// `Stage::new(Duration::from_secs(10), 100.0)` ramps to 100 calls/s over 10s. A stage
/// with `Duration::ZERO` only moves the governor's current rate, it adds no tokens by
/// itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stage {
    pub duration: Duration,
    /// Calls per second
    pub target: f64,
}

impl Stage {
    pub fn new(duration: Duration, target: f64) -> Self {
        Self { duration, target }
    }
}

/// The semaphore implementation uses 3 bits of usize for flags.
/// Anything above this is capped instead of panicking.
const MAX_TOKENS: usize = usize::MAX >> 3;

/// Executor that drives a token bucket governed by ramp stages.
///
/// - `tick`: granularity of governor updates (default 100ms).
/// - `bucket_capacity`: maximum tokens saved up for bursts (default: unbounded).
/// - `workers`: number of worker tasks; defaults to 120 per CPU, which suits async I/O
///   bound actions such as HTTP requests.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RateExecutor {
    /// The sequence of rate-control stages to execute.
    pub stages: Vec<Stage>,
    #[builder(default = Duration::from_millis(100))]
    pub tick: Duration,
    #[builder(default = MAX_TOKENS)]
    pub bucket_capacity: usize,
    #[builder(default = num_cpus::get() * 120)]
    pub workers: usize,
}

impl Executor for RateExecutor {
    async fn exec<A, F, Fut>(&self, scenario: &Scenario<A, F, Fut>) -> Result<A, BoxError>
    where
        A: Aggregate + 'static,
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = A::Metric> + Send + 'static,
    {
        if self.stages.is_empty() {
            return Err("rate executor needs at least one stage".into());
        }
        let (ctx, controls) = ExecutionContext::new();
        tracing::info!("Spawning token governor task...");
        let governor = tokio::spawn(token_governor_task(
            ctx.clone(),
            self.stages.clone(),
            self.tick,
            self.bucket_capacity,
        ));

        tracing::info!("Spawning {} workers...", self.workers);
        let handles = spawn_workers(ctx.clone(), self.workers, scenario.action.clone());

        tracing::info!("Running scenario: {}!", scenario.name);
        controls.start.send(true)?;

        // The governor task ending means it's all over
        if let Err(e) = governor.await {
            tracing::error!("Token governor task failed: {e}");
        }
        tracing::info!("Governor finished, signaling shutdown...");
        controls.shutdown.send(true)?;

        let final_agg = collect_workers(handles).await;
        tracing::info!("Done running scenario: {}!", scenario.name);
        Ok(final_agg)
    }
}

#[cfg(feature = "internals")]
pub use internals::*;

mod internals {
    use super::*;
    use tokio::sync::{
        Semaphore,
        watch::{Receiver, Sender, channel},
    };

    /// Shared execution state for the governor and all worker tasks.
    ///
    /// `start` is a watch channel rather than a `Notify` so tasks that have not been
    /// polled yet when the run starts still see the signal.
    #[derive(Clone)]
    pub struct ExecutionContext {
        pub start: Receiver<bool>,
        pub shutdown: Receiver<bool>,
        /// The token bucket. Workers acquire permits, the governor adds them.
        pub tokens: Arc<Semaphore>,
    }

    /// The sending halves of the lifecycle signals, kept by the executor.
    pub struct Controls {
        pub start: Sender<bool>,
        pub shutdown: Sender<bool>,
    }

    impl ExecutionContext {
        pub fn new() -> (Self, Controls) {
            let (start_tx, start_rx) = channel(false);
            let (shutdown_tx, shutdown_rx) = channel(false);
            (
                Self {
                    start: start_rx,
                    shutdown: shutdown_rx,
                    tokens: Arc::new(Semaphore::new(0)),
                },
                Controls {
                    start: start_tx,
                    shutdown: shutdown_tx,
                },
            )
        }
    }

    /// Governor task that adds tokens to the shared semaphore according to the stages.
    pub async fn token_governor_task(
        ctx: ExecutionContext,
        stages: Vec<Stage>,
        tick: Duration,
        bucket_capacity: usize,
    ) {
        let ExecutionContext {
            mut start,
            mut shutdown,
            tokens,
        } = ctx;
        let main_task = async {
            let mut rate = 0.0;
            let mut fractional = 0.0;

            if start.wait_for(|s| *s).await.is_err() {
                return;
            }
            let j = stages.len();
            for (i, stage) in stages.into_iter().enumerate() {
                tracing::info!("Starting stage: {}/{j}", i + 1);
                if stage.duration.is_zero() {
                    rate = stage.target;
                    continue;
                }

                let stage_start = Instant::now();
                let mut next_tick = Instant::now();
                let start_rate = rate;
                let end_rate = stage.target;

                loop {
                    let elapsed = Instant::now().duration_since(stage_start);
                    if elapsed >= stage.duration {
                        break;
                    }
                    next_tick += tick;

                    let (add_total, f) = calc_token_limit(
                        elapsed,
                        stage.duration,
                        start_rate,
                        end_rate,
                        fractional,
                        tick,
                    );
                    fractional = f;

                    let avail = tokens.available_permits();
                    let add = add_total.min(bucket_capacity.saturating_sub(avail));
                    if add > 0 {
                        tokens.add_permits(add);
                    }
                    tokio::time::sleep_until(next_tick).await;
                }
                // the next stage starts exactly from this stage's target
                rate = end_rate;
            }
        };

        tokio::select! {
            _ = main_task => {
                tracing::debug!("Governor task finished all stages.");
            }
            _ = shutdown.wait_for(|b| *b) => {
                tracing::debug!("Governor received shutdown signal.");
            }
        };
    }

    /// Number of tokens to add this tick, and the fractional part to carry over.
    pub fn calc_token_limit(
        elapsed: Duration,
        stage_duration: Duration,
        start_rate: f64,
        end_rate: f64,
        fractional: f64,
        tick: Duration,
    ) -> (usize, f64) {
        let t = (elapsed.as_secs_f64() / stage_duration.as_secs_f64()).min(1.0);
        let tick_rate = start_rate + (end_rate - start_rate) * t;
        let add_f = tick_rate * tick.as_secs_f64();

        let add_total_f = (add_f + fractional).floor();
        let fractional = (add_f + fractional) - add_total_f;

        let add_total = if add_total_f >= (MAX_TOKENS as f64) {
            MAX_TOKENS
        } else if add_total_f < 0.0 {
            0
        } else {
            add_total_f as usize
        };

        (add_total, fractional)
    }

    /// Spawn `workers` tasks that each spend one token per call of `action`.
    pub fn spawn_workers<A, F, Fut>(
        ctx: ExecutionContext,
        workers: usize,
        action: F,
    ) -> Vec<JoinHandle<A>>
    where
        A: Aggregate + 'static,
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = A::Metric> + Send + 'static,
    {
        (0..workers)
            .map(|i| {
                let ExecutionContext {
                    mut start,
                    mut shutdown,
                    tokens,
                } = ctx.clone();
                let action = action.clone();
                tokio::spawn(async move {
                    let mut agg = A::new();

                    let main_task = async {
                        if start.wait_for(|s| *s).await.is_err() {
                            return;
                        }
                        tracing::debug!("Worker {i} started.");

                        loop {
                            let Ok(permit) = tokens.acquire().await else {
                                tracing::debug!("Worker {i}: token pool closed.");
                                break;
                            };
                            // only the governor hands tokens out
                            permit.forget();

                            let metric = action().await;
                            agg.consume(&metric);
                        }
                    };

                    tokio::select! {
                        _ = main_task => {},
                        _ = shutdown.wait_for(|b| *b) => {}
                    };

                    tracing::debug!("Worker {i} shutting down.");
                    agg
                })
            })
            .collect()
    }
}
