//! Read-only simulation of market fills against the exchange contract.

use {
    crate::{
        arguments::Arguments,
        fill_results::FillResults,
        infra::{Exchange, Node},
    },
    alloy::primitives::{Address, Bytes, U256},
    anyhow::Result,
    model::order::SignedOrder,
    std::{fmt, sync::Arc},
    tracing::instrument,
};

/// Which exchange entry point a market fill goes through.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Side {
    /// Buy up to a maker asset amount (`marketBuyOrders`).
    Buy,
    /// Sell up to a taker asset amount (`marketSellOrders`).
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

/// A read-only contract call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Call {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

/// Resolves the account that fills orders.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait AccountResolving: Send + Sync {
    async fn account(&self) -> Result<Address>;
}

/// Executes calls against the current chain state without committing them.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait CallDispatching: Send + Sync {
    /// Returns the raw output of the call.
    async fn call(&self, call: Call) -> Result<Bytes>;

    /// Returns the gas the call would consume if it were submitted.
    async fn estimate_gas(&self, call: Call) -> Result<U256>;
}

/// Encodes market fills for the exchange contract.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait ExchangeEncoding: Send + Sync {
    /// `amount` is the maker asset amount to buy.
    fn market_buy_orders(&self, orders: &[SignedOrder], amount: U256) -> Result<Bytes>;

    /// `amount` is the taker asset amount to sell.
    fn market_sell_orders(&self, orders: &[SignedOrder], amount: U256) -> Result<Bytes>;

    /// Address of the exchange contract.
    fn address(&self) -> Address;
}

/// Simulates market fills for either side. Holds no state of its own, so
/// concurrent simulations don't interfere with each other.
#[derive(Clone)]
pub struct Simulator {
    account: Arc<dyn AccountResolving>,
    node: Arc<dyn CallDispatching>,
    exchange: Arc<dyn ExchangeEncoding>,
}

impl Simulator {
    pub fn new(
        account: Arc<dyn AccountResolving>,
        node: Arc<dyn CallDispatching>,
        exchange: Arc<dyn ExchangeEncoding>,
    ) -> Self {
        Self {
            account,
            node,
            exchange,
        }
    }

    /// Simulates against the configured node and exchange.
    pub fn connect(args: &Arguments) -> Self {
        let node = Arc::new(Node::new(&args.node_url, args.account));
        Self::new(
            node.clone(),
            node,
            Arc::new(Exchange::new(args.exchange_address)),
        )
    }

    async fn prepare(&self, orders: &[SignedOrder], amount: U256, side: Side) -> Result<Call> {
        let from = self.account.account().await?;
        let data = match side {
            Side::Buy => self.exchange.market_buy_orders(orders, amount)?,
            Side::Sell => self.exchange.market_sell_orders(orders, amount)?,
        };
        Ok(Call {
            from,
            to: self.exchange.address(),
            data,
        })
    }

    /// Estimates the gas a market fill would consume.
    #[instrument(skip_all, fields(%side, orders = orders.len(), %amount))]
    pub async fn estimate_gas(
        &self,
        orders: &[SignedOrder],
        amount: U256,
        side: Side,
    ) -> Result<U256> {
        let call = self.prepare(orders, amount, side).await?;
        let gas = self.node.estimate_gas(call).await?;
        tracing::debug!(%gas, "estimated market fill gas");
        Ok(gas)
    }

    /// Simulates a market fill. Returns `None` if the call output does not
    /// decode as [`FillResults`].
    #[instrument(skip_all, fields(%side, orders = orders.len(), %amount))]
    pub async fn simulate(
        &self,
        orders: &[SignedOrder],
        amount: U256,
        side: Side,
    ) -> Result<Option<FillResults>> {
        let call = self.prepare(orders, amount, side).await?;
        let output = self.node.call(call).await?;
        tracing::debug!(?output, "simulated market fill");
        Ok(FillResults::decode(&output))
    }
}
