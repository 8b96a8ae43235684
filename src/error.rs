use thiserror::Error;

/// Failures talking to the service under test.
///
/// The harness never propagates these out of a phase; they are logged and counted as
/// failed checks.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("could not build the http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    UnexpectedStatus { url: String, status: u16 },
    #[error("could not decode the response of {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Invalid command line or environment values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid duration {0:?}, expected e.g. 500ms, 10s, 2m or 1m30s")]
    InvalidDuration(String),
    #[error("invalid stage {0:?}, expected DURATION:RATE such as 30s:100")]
    InvalidStage(String),
}
