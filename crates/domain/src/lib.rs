//! Domain model for liquidity position views.
//!
//! This crate holds the types shared by every other crate in the workspace:
//! - Addresses and fixed-point token amounts
//! - Pool descriptors, staked amounts, pool metrics and derived positions
//! - LP valuation math
//! - Historical price tables, farm routing and tab selection

/// Error types.
pub mod error;
/// Domain entities.
pub mod entities;
/// Farm section routing.
pub mod farm;
/// Historical price table.
pub mod history;
/// Valuation math.
pub mod math;
/// Tab switch selection model.
pub mod tabs;
/// Value objects.
pub mod value_objects;

pub use error::DomainError;
