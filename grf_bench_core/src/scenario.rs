use std::{future::Future, marker::PhantomData};

use typed_builder::TypedBuilder;

use crate::Aggregate;

/// The measured unit of a run: a named action that produces one metric per call.
///
/// The action is cloned into every worker, so anything heavy (HTTP clients, connection
/// pools) must be created once outside of it and shared.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Scenario<A, F, Fut>
where
    A: Aggregate,
    F: Fn() -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = A::Metric> + Send,
{
    #[builder(setter(into))]
    pub name: String,
    pub action: F,
    #[builder(default, setter(skip))]
    aggregate: PhantomData<A>,
}
