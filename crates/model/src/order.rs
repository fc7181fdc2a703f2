//! Contains the signed 0x v2 order with serialization as served by standard
//! relayer APIs.

use {
    alloy::primitives::{Address, Bytes, U256},
    number::serialization::HexOrDecimalU256,
    serde::{Deserialize, Serialize},
    serde_with::serde_as,
};

/// An order signed by its maker, ready to be filled on the exchange.
#[serde_as]
#[derive(Eq, PartialEq, Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOrder {
    pub maker_address: Address,
    /// The only account allowed to fill the order, or the zero address if
    /// anybody can.
    pub taker_address: Address,
    pub fee_recipient_address: Address,
    pub sender_address: Address,
    #[serde_as(as = "HexOrDecimalU256")]
    pub maker_asset_amount: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub taker_asset_amount: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub maker_fee: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub taker_fee: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub expiration_time_seconds: U256,
    #[serde_as(as = "HexOrDecimalU256")]
    pub salt: U256,
    /// Asset the maker gives, see [`crate::asset_data`].
    pub maker_asset_data: Bytes,
    /// Asset the taker gives, see [`crate::asset_data`].
    pub taker_asset_data: Bytes,
    pub exchange_address: Address,
    pub signature: Bytes,
}
