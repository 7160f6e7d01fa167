use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid hex in return data: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("return data of {0} bytes is not a whole number of words")]
    MalformedReturnData(usize),

    #[error("no RPC endpoint configured for chain {0}")]
    UnknownChain(u64),
}
