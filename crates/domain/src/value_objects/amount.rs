use crate::error::DomainError;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimals of LP tokens, staking balances and pool supplies.
pub const LP_DECIMALS: u8 = 18;

/// Widest mantissa a `Decimal` can represent.
const DECIMAL_MANTISSA_BITS: usize = 96;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// An amount with the fixed 18 decimals used by LP contracts.
    pub fn lp(raw: U256) -> Self {
        Self::new(raw, LP_DECIMALS)
    }

    pub fn zero(decimals: u8) -> Self {
        Self::new(U256::zero(), decimals)
    }

    /// Builds an amount from a whole number of units.
    pub fn from_units(units: u64, decimals: u8) -> Self {
        let raw = U256::from(units).saturating_mul(U256::exp10(usize::from(decimals)));
        Self { raw, decimals }
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Exact fixed-point conversion (`formatUnits`) into whole units.
    ///
    /// # Errors
    /// Returns `AmountOverflow` when the raw value needs more than 96 bits or
    /// the decimals exceed the 28 digits of scale a `Decimal` supports.
    pub fn to_decimal(&self) -> Result<Decimal, DomainError> {
        let overflow = || DomainError::AmountOverflow {
            raw: self.raw.to_string(),
            decimals: self.decimals,
        };
        if self.raw.bits() > DECIMAL_MANTISSA_BITS {
            return Err(overflow());
        }
        let mantissa = i128::try_from(self.raw.low_u128()).map_err(|_| overflow())?;
        Decimal::try_from_i128_with_scale(mantissa, u32::from(self.decimals))
            .map(|d| d.normalize())
            .map_err(|_| overflow())
    }
}
