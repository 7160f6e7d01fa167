//! On-chain read access for pool and farm contracts.
//!
//! This crate provides:
//! - Call encoding and return decoding for the contract functions the
//!   position view needs
//! - The `ChainReader` abstraction over batched read calls
//! - A JSON-RPC implementation that batches `eth_call` requests

/// Prelude module for convenient imports.
pub mod prelude;

/// Contract call encoding and call results.
pub mod call;
/// Error types.
pub mod error;
/// Batched read abstraction.
pub mod reader;
/// JSON-RPC batched reader.
pub mod rpc;

pub use error::ProtocolError;
