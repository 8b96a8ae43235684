use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

use crate::{Aggregate, BoxError, RunOutcome};

/// A [`Report`] is the processed form of a finished run.
///
/// Reports turn raw aggregated data into averages, percentiles, rates and totals. They
/// are plain data: no I/O, deterministic, serializable. Anything that writes them
/// somewhere is a [`Reporter`].
pub trait Report<A>
where
    Self: Send + Sync + Debug + From<RunOutcome<A>> + Serialize + DeserializeOwned,
    A: Aggregate,
{
}

/// A [`Reporter`] consumes a [`Report`] and performs the side effects: printing it,
/// writing an artifact, sending it to a service.
///
/// Reporters are object safe so a run can hand the same report to several sinks:
///
/// ```rust,ignore
/// let reporters: Vec<Box<dyn Reporter<MyAggregate, MyReport>>> =
///     vec![Box::new(StdoutReporter), Box::new(JsonFileReporter::new("out.json"))];
/// for reporter in &reporters {
///     reporter.report(&report).await?;
/// }
/// ```
#[async_trait]
pub trait Reporter<A, R>: Send + Sync
where
    A: Aggregate,
    R: Report<A>,
{
    async fn report(&self, report: &R) -> Result<(), BoxError>;
}
