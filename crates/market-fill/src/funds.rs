use {alloy::primitives::Bytes, anyhow::Result, bigdecimal::BigDecimal};

/// Read access to the filling account's wallet.
///
/// Amounts are in display units; callers convert them to base units with the
/// asset's decimals. Implementations are expected to return fresh values on
/// every call.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait FundsFetching: Send + Sync {
    /// Balance the account holds of the asset.
    async fn balance(&self, asset_data: &Bytes) -> Result<BigDecimal>;

    /// Amount of the asset the exchange's asset proxy may transfer on behalf
    /// of the account.
    async fn allowance(&self, asset_data: &Bytes) -> Result<BigDecimal>;
}
