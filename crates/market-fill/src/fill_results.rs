//! Decoding of the value returned by simulated market fills.

use alloy::primitives::U256;

/// Size of one ABI word in bytes.
const WORD: usize = 32;

/// Number of words in an encoded [`FillResults`].
const WORDS: usize = 4;

/// Length in bytes of an ABI encoded [`FillResults`].
pub const ENCODED_LEN: usize = WORDS * WORD;

/// Length of a `0x` prefixed hex encoded [`FillResults`].
pub const HEX_ENCODED_LEN: usize = 2 + 2 * ENCODED_LEN;

/// Amounts an exchange fill moved, all in base units.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FillResults {
    pub maker_asset_filled_amount: U256,
    pub taker_asset_filled_amount: U256,
    pub maker_fee_paid: U256,
    pub taker_fee_paid: U256,
}

impl FillResults {
    /// Decodes the four big-endian words of an ABI encoded `FillResults`
    /// tuple.
    ///
    /// Returns `None` unless `data` is exactly four words long. Shorter or
    /// longer outputs (e.g. empty return data of a call that produced
    /// nothing) are not fill results.
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() != ENCODED_LEN {
            return None;
        }
        let word = |index: usize| U256::from_be_slice(&data[index * WORD..(index + 1) * WORD]);
        Some(Self {
            maker_asset_filled_amount: word(0),
            taker_asset_filled_amount: word(1),
            maker_fee_paid: word(2),
            taker_fee_paid: word(3),
        })
    }

    /// Decodes a hex string as returned by `eth_call`: a two character
    /// prefix followed by 256 hex digits. The [`crate::simulator::Simulator`]
    /// receives raw bytes and goes through [`Self::decode`] directly.
    pub fn from_hex(response: &str) -> Option<Self> {
        if response.len() != HEX_ENCODED_LEN {
            return None;
        }
        let bytes = const_hex::decode(response.get(2..)?).ok()?;
        Self::decode(&bytes)
    }
}
