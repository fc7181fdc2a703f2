//! Gas estimation, simulation and funds validation for market fills of 0x v2
//! orders.

pub mod arguments;
pub mod assets;
pub mod fill_results;
pub mod funds;
pub mod infra;
pub mod market_orders;
pub mod simulator;
pub mod validator;

pub use {
    fill_results::FillResults,
    market_orders::MarketOrders,
    simulator::Side,
    validator::ValidationError,
};
