//! Checks that the filling account can afford a market fill before it is
//! submitted.
//!
//! Validation runs a fixed pipeline and stops at the first failure:
//! simulate the fill, resolve the taker and fee assets, fetch fresh balances
//! and allowances, then check the taker asset (balance, allowance) followed
//! by the fee asset (balance, allowance).

use {
    crate::{
        assets::{Asset, AssetResolving},
        fill_results::FillResults,
        funds::FundsFetching,
        simulator::{Side, Simulator},
    },
    alloy::primitives::U256,
    model::order::SignedOrder,
    number::units::to_base_units,
    std::sync::Arc,
    tracing::instrument,
};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("no orders to fill")]
    NoOrders,
    #[error("could not call market {0} orders")]
    SimulationFailed(Side),
    #[error("not enough {} to process orders", .0.symbol)]
    InsufficientBalance(Asset),
    #[error("{} is still locked, unlock it to start trading", .0.symbol)]
    InsufficientAllowance(Asset),
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// What the account holds of one asset against what a fill requires, all in
/// base units.
#[derive(Debug)]
struct Funds {
    asset: Asset,
    balance: U256,
    allowance: U256,
    required: U256,
}

impl Funds {
    /// Balance is checked before allowance. Equality passes.
    fn check(self) -> Result<(), ValidationError> {
        if self.required > self.balance {
            tracing::debug!(funds = ?self, "insufficient balance");
            return Err(ValidationError::InsufficientBalance(self.asset));
        }
        if self.required > self.allowance {
            tracing::debug!(funds = ?self, "insufficient allowance");
            return Err(ValidationError::InsufficientAllowance(self.asset));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct Validator {
    simulator: Simulator,
    assets: Arc<dyn AssetResolving>,
    funds: Arc<dyn FundsFetching>,
}

impl Validator {
    pub fn new(
        simulator: Simulator,
        assets: Arc<dyn AssetResolving>,
        funds: Arc<dyn FundsFetching>,
    ) -> Self {
        Self {
            simulator,
            assets,
            funds,
        }
    }

    /// Simulates a market fill and verifies the account can pay the filled
    /// taker amount and the taker fee. Returns the simulated fill results
    /// unchanged on success.
    #[instrument(skip_all, fields(%side))]
    pub async fn validate(
        &self,
        orders: &[SignedOrder],
        amount: U256,
        side: Side,
    ) -> Result<FillResults, ValidationError> {
        let first = orders.first().ok_or(ValidationError::NoOrders)?;
        let fill = self
            .simulator
            .simulate(orders, amount, side)
            .await?
            .ok_or(ValidationError::SimulationFailed(side))?;

        let taker_asset = self.assets.find_by_data(&first.taker_asset_data)?;
        let fee_asset = self.assets.fee_asset()?;

        let (taker, fee) = futures::try_join!(
            self.fetch_funds(taker_asset, fill.taker_asset_filled_amount),
            self.fetch_funds(fee_asset, fill.taker_fee_paid),
        )?;
        for funds in [taker, fee] {
            funds.check()?;
        }

        Ok(fill)
    }

    async fn fetch_funds(&self, asset: Asset, required: U256) -> anyhow::Result<Funds> {
        let (balance, allowance) = futures::try_join!(
            self.funds.balance(&asset.asset_data),
            self.funds.allowance(&asset.asset_data),
        )?;
        Ok(Funds {
            balance: to_base_units(&balance, asset.decimals)?,
            allowance: to_base_units(&allowance, asset.decimals)?,
            asset,
            required,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            assets::MockAssetResolving,
            funds::MockFundsFetching,
            simulator::{
                MockAccountResolving,
                MockCallDispatching,
                MockExchangeEncoding,
                tests::{TAKER, encode},
            },
        },
        alloy::primitives::Bytes,
        anyhow::anyhow,
        bigdecimal::BigDecimal,
        mockall::predicate::eq,
        std::str::FromStr,
        testlib::{
            protocol::EXCHANGE,
            tokens::{WETH, ZRX},
        },
    };

    fn weth() -> Asset {
        Asset::erc20(WETH, "WETH", 0)
    }

    fn zrx() -> Asset {
        Asset::erc20(ZRX, "ZRX", 0)
    }

    fn orders() -> Vec<SignedOrder> {
        vec![SignedOrder {
            taker_asset_data: weth().asset_data,
            ..Default::default()
        }]
    }

    fn fill(taker_filled: u64, taker_fee: u64) -> FillResults {
        FillResults {
            maker_asset_filled_amount: U256::from(1),
            taker_asset_filled_amount: U256::from(taker_filled),
            maker_fee_paid: U256::ZERO,
            taker_fee_paid: U256::from(taker_fee),
        }
    }

    fn simulator(output: Bytes) -> Simulator {
        let mut account = MockAccountResolving::new();
        account.expect_account().returning(|| Ok(TAKER));
        let mut exchange = MockExchangeEncoding::new();
        exchange
            .expect_market_buy_orders()
            .returning(|_, _| Ok(Bytes::from_static(b"buy")));
        exchange
            .expect_market_sell_orders()
            .returning(|_, _| Ok(Bytes::from_static(b"sell")));
        exchange.expect_address().return_const(EXCHANGE);
        let mut node = MockCallDispatching::new();
        node.expect_call().returning(move |_| Ok(output.clone()));
        Simulator::new(Arc::new(account), Arc::new(node), Arc::new(exchange))
    }

    fn registry(taker: Asset, fee: Asset) -> MockAssetResolving {
        let mut assets = MockAssetResolving::new();
        assets
            .expect_find_by_data()
            .with(eq(taker.asset_data.clone()))
            .returning(move |_| Ok(taker.clone()));
        assets.expect_fee_asset().returning(move || Ok(fee.clone()));
        assets
    }

    /// Wallet holding `(balance, allowance)` of WETH and of ZRX, in display
    /// units.
    fn wallet(weth_funds: (&str, &str), zrx_funds: (&str, &str)) -> MockFundsFetching {
        let amounts = [
            (weth().asset_data, weth_funds),
            (zrx().asset_data, zrx_funds),
        ]
        .map(|(data, (balance, allowance))| {
            (
                data,
                BigDecimal::from_str(balance).unwrap(),
                BigDecimal::from_str(allowance).unwrap(),
            )
        });
        let mut wallet = MockFundsFetching::new();
        for (data, balance, allowance) in amounts {
            wallet
                .expect_balance()
                .with(eq(data.clone()))
                .returning(move |_| Ok(balance.clone()));
            wallet
                .expect_allowance()
                .with(eq(data))
                .returning(move |_| Ok(allowance.clone()));
        }
        wallet
    }

    fn validator(fill: FillResults, wallet: MockFundsFetching) -> Validator {
        Validator::new(
            simulator(encode(&fill)),
            Arc::new(registry(weth(), zrx())),
            Arc::new(wallet),
        )
    }

    #[tokio::test]
    async fn exact_funds_pass() {
        observe::tracing::initialize_reentrant("market_fill=debug");
        for side in [Side::Buy, Side::Sell] {
            let validator = validator(fill(100, 5), wallet(("100", "100"), ("5", "5")));
            let result = validator.validate(&orders(), U256::from(100), side).await;
            assert_eq!(result.unwrap(), fill(100, 5));
        }
    }

    #[tokio::test]
    async fn one_unit_short_of_taker_balance() {
        let validator = validator(fill(100, 5), wallet(("99", "100"), ("5", "5")));
        let result = validator
            .validate(&orders(), U256::from(100), Side::Buy)
            .await;
        let err = result.unwrap_err();
        assert!(
            matches!(&err, ValidationError::InsufficientBalance(asset) if asset.symbol == "WETH"),
            "{err:?}"
        );
        assert_eq!(err.to_string(), "not enough WETH to process orders");
    }

    #[tokio::test]
    async fn balance_is_checked_before_allowance() {
        let validator = validator(fill(100, 5), wallet(("10", "10"), ("5", "5")));
        let result = validator
            .validate(&orders(), U256::from(100), Side::Sell)
            .await;
        assert!(
            matches!(&result, Err(ValidationError::InsufficientBalance(asset)) if asset.symbol == "WETH"),
            "{result:?}"
        );
    }

    #[tokio::test]
    async fn insufficient_taker_allowance() {
        let validator = validator(fill(100, 5), wallet(("1000", "99"), ("5", "5")));
        let err = validator
            .validate(&orders(), U256::from(100), Side::Buy)
            .await
            .unwrap_err();
        assert!(
            matches!(&err, ValidationError::InsufficientAllowance(asset) if asset.symbol == "WETH"),
            "{err:?}"
        );
        assert_eq!(
            err.to_string(),
            "WETH is still locked, unlock it to start trading"
        );
    }

    #[tokio::test]
    async fn taker_asset_is_checked_before_fee_asset() {
        let validator = validator(fill(100, 5), wallet(("100", "0"), ("0", "0")));
        let result = validator
            .validate(&orders(), U256::from(100), Side::Buy)
            .await;
        assert!(
            matches!(&result, Err(ValidationError::InsufficientAllowance(asset)) if asset.symbol == "WETH"),
            "{result:?}"
        );
    }

    #[tokio::test]
    async fn insufficient_fee_balance_names_fee_asset() {
        let validator = validator(fill(100, 5), wallet(("100", "100"), ("4", "5")));
        let result = validator
            .validate(&orders(), U256::from(100), Side::Buy)
            .await;
        assert!(
            matches!(&result, Err(ValidationError::InsufficientBalance(asset)) if asset.symbol == "ZRX"),
            "{result:?}"
        );
    }

    #[tokio::test]
    async fn insufficient_fee_allowance() {
        let validator = validator(fill(100, 5), wallet(("100", "100"), ("5", "4")));
        let result = validator
            .validate(&orders(), U256::from(100), Side::Sell)
            .await;
        assert!(
            matches!(&result, Err(ValidationError::InsufficientAllowance(asset)) if asset.symbol == "ZRX"),
            "{result:?}"
        );
    }

    #[tokio::test]
    async fn converts_display_units_with_asset_decimals() {
        let weth = Asset::erc20(WETH, "WETH", 18);
        let zrx = Asset::erc20(ZRX, "ZRX", 18);
        let one_and_a_half = U256::from(1_500_000_000_000_000_000_u64);
        let fill = FillResults {
            taker_asset_filled_amount: one_and_a_half,
            taker_fee_paid: U256::from(1),
            ..Default::default()
        };

        let mut wallet = MockFundsFetching::new();
        wallet
            .expect_balance()
            .returning(|_| Ok(BigDecimal::from_str("1.5").unwrap()));
        wallet
            .expect_allowance()
            .returning(|_| Ok(BigDecimal::from_str("1.5").unwrap()));
        let validator = Validator::new(
            simulator(encode(&fill)),
            Arc::new(registry(weth.clone(), zrx)),
            Arc::new(wallet),
        );
        let orders = vec![SignedOrder {
            taker_asset_data: weth.asset_data,
            ..Default::default()
        }];
        assert_eq!(
            validator
                .validate(&orders, U256::from(1), Side::Buy)
                .await
                .unwrap(),
            fill
        );

        let fill = FillResults {
            taker_asset_filled_amount: one_and_a_half + U256::from(1),
            ..fill
        };
        let mut wallet = MockFundsFetching::new();
        wallet
            .expect_balance()
            .returning(|_| Ok(BigDecimal::from_str("1.5").unwrap()));
        wallet
            .expect_allowance()
            .returning(|_| Ok(BigDecimal::from_str("1.5").unwrap()));
        let validator = Validator::new(
            simulator(encode(&fill)),
            Arc::new(registry(
                Asset::erc20(WETH, "WETH", 18),
                Asset::erc20(ZRX, "ZRX", 18),
            )),
            Arc::new(wallet),
        );
        assert!(matches!(
            validator.validate(&orders, U256::from(1), Side::Buy).await,
            Err(ValidationError::InsufficientBalance(_))
        ));
    }

    #[tokio::test]
    async fn undecodable_simulation_fails() {
        let mut wallet = MockFundsFetching::new();
        wallet.expect_balance().never();
        wallet.expect_allowance().never();
        let validator = Validator::new(
            simulator(Bytes::from_static(&[0; 64])),
            Arc::new(registry(weth(), zrx())),
            Arc::new(wallet),
        );
        let result = validator
            .validate(&orders(), U256::from(100), Side::Sell)
            .await;
        assert!(
            matches!(result, Err(ValidationError::SimulationFailed(Side::Sell))),
            "{result:?}"
        );
    }

    #[tokio::test]
    async fn empty_orders_fail_before_simulating() {
        let mut node = MockCallDispatching::new();
        node.expect_call().never();
        let simulator = Simulator::new(
            Arc::new(MockAccountResolving::new()),
            Arc::new(node),
            Arc::new(MockExchangeEncoding::new()),
        );
        let validator = Validator::new(
            simulator,
            Arc::new(MockAssetResolving::new()),
            Arc::new(MockFundsFetching::new()),
        );
        let result = validator.validate(&[], U256::from(1), Side::Buy).await;
        assert!(matches!(result, Err(ValidationError::NoOrders)), "{result:?}");
    }

    #[tokio::test]
    async fn upstream_failures_propagate() {
        let mut locked_wallet = MockFundsFetching::new();
        locked_wallet
            .expect_balance()
            .returning(|_| Err(anyhow!("wallet locked")));
        locked_wallet
            .expect_allowance()
            .returning(|_| Ok(BigDecimal::from(100)));
        let validator = validator(fill(100, 5), locked_wallet);
        let result = validator
            .validate(&orders(), U256::from(100), Side::Buy)
            .await;
        assert!(
            matches!(&result, Err(ValidationError::Upstream(err)) if err.to_string() == "wallet locked"),
            "{result:?}"
        );

        let mut assets = MockAssetResolving::new();
        assets
            .expect_find_by_data()
            .returning(|_| Err(anyhow!("unknown asset")));
        assets.expect_fee_asset().returning(|| Ok(zrx()));
        let validator = Validator::new(
            simulator(encode(&fill(100, 5))),
            Arc::new(assets),
            Arc::new(wallet(("100", "100"), ("5", "5"))),
        );
        let result = validator
            .validate(&orders(), U256::from(100), Side::Buy)
            .await;
        assert!(matches!(result, Err(ValidationError::Upstream(_))), "{result:?}");
    }

    #[tokio::test]
    async fn fee_asset_as_taker_asset_is_checked_separately() {
        let orders = vec![SignedOrder {
            taker_asset_data: zrx().asset_data,
            ..Default::default()
        }];
        // Taker amount and fee together exceed the funds, each alone does not.
        let validator = Validator::new(
            simulator(encode(&fill(100, 5))),
            Arc::new(registry(zrx(), zrx())),
            Arc::new(wallet(("0", "0"), ("100", "100"))),
        );

        for side in [Side::Buy, Side::Sell] {
            let result = validator.validate(&orders, U256::from(100), side).await;
            assert_eq!(result.unwrap(), fill(100, 5));
        }
    }

    #[tokio::test]
    async fn fractional_base_units_are_upstream_failures() {
        let validator = validator(fill(100, 5), wallet(("100.5", "100"), ("5", "5")));
        let result = validator
            .validate(&orders(), U256::from(100), Side::Buy)
            .await;
        assert!(matches!(result, Err(ValidationError::Upstream(_))), "{result:?}");
    }
}
