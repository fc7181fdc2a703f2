//! Contains the wire models for market orders filled against the 0x v2
//! exchange.

pub mod asset_data;
pub mod order;
