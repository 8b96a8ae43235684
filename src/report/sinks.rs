use std::path::{Path, PathBuf};

use async_trait::async_trait;
use clap::ValueEnum;
use grf_bench_core::{BoxError, Reporter};
use serde::{Deserialize, Serialize};

use super::Summary;
use crate::metrics::HttpAggregate;

/// Artifact format written at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Html,
}

impl ReportFormat {
    /// A reporter writing this format to `path`.
    pub fn reporter(self, path: impl Into<PathBuf>) -> Box<dyn Reporter<HttpAggregate, Summary>> {
        match self {
            ReportFormat::Json => Box::new(JsonFileReporter::new(path)),
            ReportFormat::Html => Box::new(HtmlFileReporter::new(path)),
        }
    }
}

/// Prints the text summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutReporter;

#[async_trait]
impl Reporter<HttpAggregate, Summary> for StdoutReporter {
    async fn report(&self, report: &Summary) -> Result<(), BoxError> {
        println!("{report}");
        Ok(())
    }
}

async fn write_artifact(path: &Path, contents: String) -> Result<(), BoxError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    tracing::info!("report written to {}", path.display());
    Ok(())
}

/// Writes the summary as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonFileReporter {
    path: PathBuf,
}

impl JsonFileReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Reporter<HttpAggregate, Summary> for JsonFileReporter {
    async fn report(&self, report: &Summary) -> Result<(), BoxError> {
        let json = serde_json::to_string_pretty(report)?;
        write_artifact(&self.path, json).await
    }
}

/// Writes a standalone HTML page.
#[derive(Debug, Clone)]
pub struct HtmlFileReporter {
    path: PathBuf,
}

impl HtmlFileReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Reporter<HttpAggregate, Summary> for HtmlFileReporter {
    async fn report(&self, report: &Summary) -> Result<(), BoxError> {
        write_artifact(&self.path, report.to_html()).await
    }
}
