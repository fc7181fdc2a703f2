//! Mainnet addresses of commonly used tokens.

use alloy::primitives::{Address, address};

/// Address for the `ZRX` token, the 0x v2 fee asset.
pub const ZRX: Address = address!("e41d2489571d322189246dafa5ebde1f4699f498");

/// Address for the `WETH` token.
pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

/// Address for the `DAI` token.
pub const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");
