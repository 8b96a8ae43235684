use crate::Metric;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

/// The `Aggregate` trait defines how raw [`Metric`] values are collected and combined
/// into an intermediate, mergeable representation.
///
/// **Important:** an `Aggregate` should **not** compute final statistics such as
/// averages or percentiles. Those derived values belong in a [`crate::Report`], which is
/// built from the finished run. Aggregates store compact, mergeable raw data (counts,
/// sums, samples, error counters) so the report can compute accurate summaries.
///
/// # Role
///
/// - Collect individual [`Metric`] samples produced by a scenario's action.
/// - Be cheaply mergeable so per-worker aggregates can be combined into a global view.
///
/// # Example
/// ```rust
/// use grf_bench_core::{Aggregate, macros::*};
///
/// #[metric]
/// struct MyMetric(u64);
///
/// #[aggregate]
/// struct MyAggregate {
///     count: u64,
///     sum: u128,
/// }
///
/// impl Aggregate for MyAggregate {
///     type Metric = MyMetric;
///
///     fn new() -> Self {
///         Self { count: 0, sum: 0 }
///     }
///
///     fn consume(&mut self, metric: &Self::Metric) {
///         self.count += 1;
///         self.sum += metric.0 as u128;
///     }
///
///     fn merge(&mut self, other: Self) {
///         self.count += other.count;
///         self.sum += other.sum;
///     }
/// }
/// ```
///
/// # Implementor notes
/// - `merge` must be **associative** and **commutative**: worker-local aggregates are
///   merged in arbitrary order.
pub trait Aggregate
where
    Self: Serialize + DeserializeOwned + PartialOrd + PartialEq + Send + Sync + Debug + Clone,
{
    /// The metric type this aggregate summarizes.
    type Metric: Metric;

    /// Create a new, empty instance of the aggregate.
    fn new() -> Self;

    /// Aggregate multiple metrics into the current instance.
    fn aggregate(&mut self, metrics: &[Self::Metric]) {
        metrics.iter().for_each(|m| self.consume(m));
    }

    /// Incorporate a single metric into the aggregate.
    fn consume(&mut self, metric: &Self::Metric);

    /// Combine two different aggregates into one.
    fn merge(&mut self, other: Self);
}
