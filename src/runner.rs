//! Wires the configured harness, executor and reporters into one run.
use std::sync::Arc;

use anyhow::Context;
use grf_bench_core::{Executor, Reporter, drive};

use crate::{
    client::ApiClient,
    config::{Plan, RunArgs},
    harness::{ProductsHarness, Variant},
    metrics::HttpAggregate,
    report::{StdoutReporter, Summary},
};

fn scenario_name(variant: Variant) -> &'static str {
    match variant {
        Variant::Products => "products",
        Variant::Categories => "categories",
    }
}

async fn drive_with<E: Executor>(
    harness: Arc<ProductsHarness>,
    executor: &E,
) -> anyhow::Result<Summary> {
    let name = scenario_name(harness.variant());
    let outcome = drive::<_, HttpAggregate, _>(name, harness, executor)
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("scenario {name} could not run"))?;
    Ok(Summary::from(outcome))
}

/// Run the load test described by `args`, print the summary and write the artifact.
pub async fn run(args: &RunArgs) -> anyhow::Result<Summary> {
    let client = ApiClient::new(&args.base_url, args.timeout)?;
    tracing::info!("benchmarking {} ({:?})", client.base_url(), args.variant);
    let harness = Arc::new(ProductsHarness::new(client, args.variant));

    let summary = match args.plan() {
        Plan::Vus(executor) => drive_with(harness, &executor).await?,
        Plan::Rate(executor) => drive_with(harness, &executor).await?,
    };

    let (format, path) = args.report_target();
    let reporters: [Box<dyn Reporter<HttpAggregate, Summary>>; 2] =
        [Box::new(StdoutReporter), format.reporter(path)];
    for reporter in &reporters {
        reporter
            .report(&summary)
            .await
            .map_err(|e| anyhow::anyhow!(e))
            .context("could not write the report")?;
    }
    Ok(summary)
}
