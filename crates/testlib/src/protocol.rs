//! Mainnet addresses of 0x v2 protocol contracts.

use alloy::primitives::{Address, address};

/// Address for the exchange contract.
pub const EXCHANGE: Address = address!("4f833a24e1f95d70f028921e27040ca56e09ab0b");
