//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use farmview_protocols::prelude::*;
//! ```

pub use crate::call::{Call, CallState, ContractCall};
pub use crate::error::ProtocolError;
pub use crate::reader::ChainReader;
pub use crate::rpc::{JsonRpcReader, JsonRpcReaderConfig};
