use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteLensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Malformed upstream data: {0}")]
    MalformedUpstream(String),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
