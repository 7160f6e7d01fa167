//! Contract call encoding for LP, pool and farm contracts.
//!
//! Every argument and return value is a 32-byte big-endian word, which covers
//! the four read functions used here.

use crate::error::ProtocolError;
use farmview_domain::value_objects::Address;
use primitive_types::U256;

const WORD: usize = 32;

/// `balanceOf(address)`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
/// `totalSupply()`
pub const TOTAL_SUPPLY_SELECTOR: [u8; 4] = [0x18, 0x16, 0x0d, 0xdd];
/// `getTotalAmounts()`
pub const GET_TOTAL_AMOUNTS_SELECTOR: [u8; 4] = [0xc4, 0xa7, 0x76, 0x1e];
/// `userInfo(uint256,address)`
pub const USER_INFO_SELECTOR: [u8; 4] = [0x93, 0xf1, 0xa4, 0x0b];

/// A read-only contract function with its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractCall {
    /// LP token balance of `owner`.
    BalanceOf { owner: Address },
    /// LP token supply.
    TotalSupply,
    /// Underlying token0/token1 amounts held by the pool.
    GetTotalAmounts,
    /// Farm stake of `account` in pool `pid`; word 0 is the staked amount.
    UserInfo { pid: u64, account: Address },
}

impl ContractCall {
    /// Solidity function name.
    pub fn name(&self) -> &'static str {
        match self {
            ContractCall::BalanceOf { .. } => "balanceOf",
            ContractCall::TotalSupply => "totalSupply",
            ContractCall::GetTotalAmounts => "getTotalAmounts",
            ContractCall::UserInfo { .. } => "userInfo",
        }
    }

    /// First four bytes of the function signature hash.
    pub fn selector(&self) -> [u8; 4] {
        match self {
            ContractCall::BalanceOf { .. } => BALANCE_OF_SELECTOR,
            ContractCall::TotalSupply => TOTAL_SUPPLY_SELECTOR,
            ContractCall::GetTotalAmounts => GET_TOTAL_AMOUNTS_SELECTOR,
            ContractCall::UserInfo { .. } => USER_INFO_SELECTOR,
        }
    }

    /// ABI-encoded calldata.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = self.selector().to_vec();
        match self {
            ContractCall::BalanceOf { owner } => data.extend(address_word(owner)),
            ContractCall::TotalSupply | ContractCall::GetTotalAmounts => {}
            ContractCall::UserInfo { pid, account } => {
                data.extend(u64_word(*pid));
                data.extend(address_word(account));
            }
        }
        data
    }

    /// Calldata as a `0x`-prefixed hex string.
    pub fn encode_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode()))
    }
}

fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 20..].copy_from_slice(address.as_bytes());
    word
}

fn u64_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Splits return data into 32-byte words.
///
/// # Errors
/// Returns `MalformedReturnData` if the length is not a multiple of 32.
pub fn decode_words(data: &[u8]) -> Result<Vec<U256>, ProtocolError> {
    if data.len() % WORD != 0 {
        return Err(ProtocolError::MalformedReturnData(data.len()));
    }
    Ok(data.chunks_exact(WORD).map(U256::from_big_endian).collect())
}

/// Decodes `0x`-prefixed hex return data into words.
///
/// # Errors
/// Fails on invalid hex or a partial trailing word.
pub fn decode_hex_words(data: &str) -> Result<Vec<U256>, ProtocolError> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    let bytes = hex::decode(digits)?;
    decode_words(&bytes)
}

/// A call addressed to a specific contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub contract: Address,
    pub call: ContractCall,
}

impl Call {
    /// Addresses `call` to `contract`.
    pub fn new(contract: Address, call: ContractCall) -> Self {
        Self { contract, call }
    }
}

/// Outcome of one read within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallState {
    /// Not resolved yet.
    Pending,
    /// Resolved with no return data.
    Empty,
    /// Resolved with one or more words.
    Value(Vec<U256>),
    /// Reverted, rejected or lost in transport.
    Failed(String),
}

impl CallState {
    /// `Empty` for no words, `Value` otherwise.
    pub fn from_words(words: Vec<U256>) -> Self {
        if words.is_empty() {
            CallState::Empty
        } else {
            CallState::Value(words)
        }
    }

    /// Whether the call has not resolved yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, CallState::Pending)
    }

    /// Whether the call reverted or was lost.
    pub fn is_failed(&self) -> bool {
        matches!(self, CallState::Failed(_))
    }

    /// Word `index` of a resolved value.
    pub fn word(&self, index: usize) -> Option<U256> {
        match self {
            CallState::Value(words) => words.get(index).copied(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Address {
        "0x1111111111111111111111111111111111111111".parse().unwrap()
    }

    #[test]
    fn test_encode_balance_of() {
        let encoded = ContractCall::BalanceOf { owner: account() }.encode_hex();
        assert_eq!(
            encoded,
            format!("0x70a08231{}{}", "0".repeat(24), "1".repeat(40))
        );
    }

    #[test]
    fn test_encode_no_arg_calls() {
        assert_eq!(ContractCall::TotalSupply.encode_hex(), "0x18160ddd");
        assert_eq!(ContractCall::GetTotalAmounts.encode_hex(), "0xc4a7761e");
    }

    #[test]
    fn test_encode_user_info() {
        let data = ContractCall::UserInfo {
            pid: 7,
            account: account(),
        }
        .encode();
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[..4], &USER_INFO_SELECTOR);
        assert_eq!(data[35], 7);
        assert!(data[4..35].iter().all(|b| *b == 0));
        assert_eq!(&data[48..], account().as_bytes());
    }

    #[test]
    fn test_decode_two_words() {
        let hex = format!("0x{:064x}{:064x}", 5u8, 9u8);
        let words = decode_hex_words(&hex).unwrap();
        assert_eq!(words, vec![U256::from(5), U256::from(9)]);
    }

    #[test]
    fn test_decode_empty_and_malformed() {
        assert!(decode_hex_words("0x").unwrap().is_empty());
        assert!(matches!(
            decode_hex_words("0x0102"),
            Err(ProtocolError::MalformedReturnData(2))
        ));
        assert!(matches!(decode_hex_words("0xzz"), Err(ProtocolError::Hex(_))));
    }

    #[test]
    fn test_call_state_words() {
        assert_eq!(CallState::from_words(vec![]), CallState::Empty);
        let state = CallState::from_words(vec![U256::from(3)]);
        assert_eq!(state.word(0), Some(U256::from(3)));
        assert_eq!(state.word(1), None);
        assert_eq!(CallState::Pending.word(0), None);
    }
}
