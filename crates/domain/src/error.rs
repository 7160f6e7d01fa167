use thiserror::Error;

/// Errors raised while building domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("amount {raw} with {decimals} decimals does not fit a decimal")]
    AmountOverflow { raw: String, decimals: u8 },

    #[error("invalid decimal value: {0}")]
    InvalidDecimal(String),

    #[error("tab list is empty")]
    EmptyTabs,

    #[error("duplicate tab id: {0}")]
    DuplicateTab(String),

    #[error("unknown tab id: {0}")]
    UnknownTab(String),
}
