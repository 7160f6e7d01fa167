pub mod address;
pub mod amount;

pub use address::Address;
pub use amount::{Amount, LP_DECIMALS};
