use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

/// A `Metric` represents a single observed measurement produced by one run of a
/// scenario's action.
///
/// Metrics are the most granular level of data the engine deals with. They may capture
/// latency, the outcome of a request, transferred bytes or any other quantitative aspect
/// of an operation. Metrics are later collected and summarized by an [`crate::Aggregate`],
/// then turned into a [`crate::Report`] and handed to a [`crate::Reporter`].
///
/// ## Design principles
/// - **Small:** a metric is produced on the hot path of every worker, keep it cheap to
///   build and to move.
/// - **Comparable:** metrics must support [`PartialEq`] and [`PartialOrd`].
/// - **Thread-safe and clonable:** metrics must be `Send`, `Sync`, and `Clone`.
/// - **Serializable:** so samples can be persisted or shipped elsewhere when needed.
///
/// ## Example
/// ```rust
/// use grf_bench_core::macros::metric;
/// use std::time::Duration;
///
/// #[metric]
/// struct MyMetric {
///     latency: Duration,
///     success: bool,
/// }
/// ```
pub trait Metric
where
    Self: Serialize + DeserializeOwned + PartialOrd + PartialEq + Send + Sync + Debug + Clone,
{
}
