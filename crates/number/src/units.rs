//! Conversion between display units (human readable decimal amounts) and
//! base units (the integer amounts tokens use on-chain).

use {
    alloy::primitives::U256,
    anyhow::{Context, Result, ensure},
    bigdecimal::{BigDecimal, num_bigint::ToBigInt},
    num::{BigInt, bigint::Sign},
};

/// Scales a display amount by `10^decimals`.
///
/// Fails if the result would still have a fractional part, is negative, or
/// does not fit into 256 bits.
pub fn to_base_units(amount: &BigDecimal, decimals: u8) -> Result<U256> {
    let unit = BigDecimal::new(BigInt::from(1), -i64::from(decimals));
    let scaled = amount * &unit;
    ensure!(
        scaled.is_integer(),
        "invalid unit amount {amount}: too many decimal places for {decimals} decimals"
    );
    let integer = scaled
        .to_bigint()
        .context("base unit amount is not an integer")?;
    let (sign, bytes) = integer.to_bytes_be();
    ensure!(sign != Sign::Minus, "negative unit amount {amount}");
    ensure!(bytes.len() <= 32, "unit amount {amount} exceeds 256 bits");
    Ok(U256::from_be_slice(&bytes))
}
