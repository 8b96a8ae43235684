use anyhow::Context;
use clap::Parser;
use grf_bench::{
    config::{Cli, Command},
    features, runner,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let summary = runner::run(&args).await?;
            let failed = summary.metrics.checks.values.fails;
            if failed > 0 {
                tracing::warn!("{failed} checks failed");
            }
        }
        Command::Features(args) => {
            let html = features::render(&features::FEATURES);
            match args.out {
                Some(path) => tokio::fs::write(&path, html)
                    .await
                    .with_context(|| format!("could not write {}", path.display()))?,
                None => print!("{html}"),
            }
        }
    }
    Ok(())
}
