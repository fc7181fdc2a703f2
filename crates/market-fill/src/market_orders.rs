//! Entry points for estimating, simulating and validating market fills.

use {
    crate::{
        arguments::{Arguments, AssetArgument},
        assets::{AssetResolving, ConfiguredAssets},
        fill_results::FillResults,
        funds::FundsFetching,
        simulator::{Side, Simulator},
        validator::{ValidationError, Validator},
    },
    alloy::primitives::U256,
    anyhow::Result,
    model::order::SignedOrder,
    std::sync::Arc,
    tracing::instrument,
};

/// Market fills through the 0x v2 exchange.
///
/// Buy amounts are the maker asset amount to acquire, sell amounts the taker
/// asset amount to spend.
#[derive(Clone)]
pub struct MarketOrders {
    simulator: Simulator,
    validator: Validator,
}

impl MarketOrders {
    pub fn new(
        simulator: Simulator,
        assets: Arc<dyn AssetResolving>,
        funds: Arc<dyn FundsFetching>,
    ) -> Self {
        Self {
            validator: Validator::new(simulator.clone(), assets, funds),
            simulator,
        }
    }

    /// Connects to the configured node and exchange. The wallet is provided
    /// by the caller.
    pub fn connect(args: &Arguments, funds: Arc<dyn FundsFetching>) -> Result<Self> {
        let assets = ConfiguredAssets::new(
            args.assets.iter().map(AssetArgument::asset),
            &args.fee_asset,
        )?;
        tracing::info!(exchange = ?args.exchange_address, "connected market orders");
        Ok(Self::new(
            Simulator::connect(args),
            Arc::new(assets),
            funds,
        ))
    }

    #[instrument(skip_all)]
    pub async fn estimate_market_buy_orders(
        &self,
        orders: &[SignedOrder],
        amount: U256,
    ) -> Result<U256> {
        self.simulator.estimate_gas(orders, amount, Side::Buy).await
    }

    #[instrument(skip_all)]
    pub async fn call_market_buy_orders(
        &self,
        orders: &[SignedOrder],
        amount: U256,
    ) -> Result<Option<FillResults>> {
        self.simulator.simulate(orders, amount, Side::Buy).await
    }

    #[instrument(skip_all)]
    pub async fn validate_market_buy_orders(
        &self,
        orders: &[SignedOrder],
        amount: U256,
    ) -> Result<FillResults, ValidationError> {
        self.validator.validate(orders, amount, Side::Buy).await
    }

    #[instrument(skip_all)]
    pub async fn estimate_market_sell_orders(
        &self,
        orders: &[SignedOrder],
        amount: U256,
    ) -> Result<U256> {
        self.simulator.estimate_gas(orders, amount, Side::Sell).await
    }

    #[instrument(skip_all)]
    pub async fn call_market_sell_orders(
        &self,
        orders: &[SignedOrder],
        amount: U256,
    ) -> Result<Option<FillResults>> {
        self.simulator.simulate(orders, amount, Side::Sell).await
    }

    #[instrument(skip_all)]
    pub async fn validate_market_sell_orders(
        &self,
        orders: &[SignedOrder],
        amount: U256,
    ) -> Result<FillResults, ValidationError> {
        self.validator.validate(orders, amount, Side::Sell).await
    }
}
