//! Asset metadata lookup.

use {
    alloy::primitives::{Address, Bytes},
    anyhow::{Context, Result, ensure},
    std::collections::HashMap,
};

/// A tradeable asset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Asset {
    /// Reference to the asset as used in orders.
    pub asset_data: Bytes,
    pub symbol: String,
    /// Number of decimals between display units and base units.
    pub decimals: u8,
}

impl Asset {
    /// An ERC-20 token asset.
    pub fn erc20(token: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            asset_data: model::asset_data::erc20(token),
            symbol: symbol.into(),
            decimals,
        }
    }
}

#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait AssetResolving: Send + Sync {
    /// Finds the asset referenced by the asset data.
    fn find_by_data(&self, asset_data: &Bytes) -> Result<Asset>;

    /// The asset protocol fees are paid in.
    fn fee_asset(&self) -> Result<Asset>;
}

/// A fixed set of assets known up front.
#[derive(Clone, Debug)]
pub struct ConfiguredAssets {
    assets: HashMap<Bytes, Asset>,
    fee_asset: Asset,
}

impl ConfiguredAssets {
    /// Fails if no asset with the `fee_symbol` is configured or if two assets
    /// share the same asset data.
    pub fn new(assets: impl IntoIterator<Item = Asset>, fee_symbol: &str) -> Result<Self> {
        let mut by_data = HashMap::new();
        for asset in assets {
            let symbol = asset.symbol.clone();
            let previous = by_data.insert(asset.asset_data.clone(), asset);
            ensure!(
                previous.is_none(),
                "asset {symbol} is configured more than once"
            );
        }
        let fee_asset = by_data
            .values()
            .find(|asset| asset.symbol == fee_symbol)
            .cloned()
            .with_context(|| format!("fee asset {fee_symbol} is not a configured asset"))?;
        Ok(Self {
            assets: by_data,
            fee_asset,
        })
    }
}

impl AssetResolving for ConfiguredAssets {
    fn find_by_data(&self, asset_data: &Bytes) -> Result<Asset> {
        self.assets
            .get(asset_data)
            .cloned()
            .with_context(|| format!("unknown asset data {asset_data:?}"))
    }

    fn fee_asset(&self) -> Result<Asset> {
        Ok(self.fee_asset.clone())
    }
}
