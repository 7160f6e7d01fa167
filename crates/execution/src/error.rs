use farmview_data::DataError;
use farmview_protocols::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("chain {0} is not configured")]
    UnknownChain(u64),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Data(#[from] DataError),
}
