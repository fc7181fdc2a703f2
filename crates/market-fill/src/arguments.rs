//! Command line arguments for connecting to a node and exchange.

use {
    crate::assets::Asset,
    alloy::primitives::Address,
    anyhow::{Context, Result, ensure},
    std::{
        fmt::{self, Display, Formatter},
        str::FromStr,
    },
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(clap::Parser)]
pub struct Arguments {
    /// JSON-RPC endpoint of the node simulating fills.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Address of the 0x v2 exchange contract.
    #[clap(long, env)]
    pub exchange_address: Address,

    /// Account that fills orders. Defaults to the first account managed by
    /// the node.
    #[clap(long, env)]
    pub account: Option<Address>,

    /// Tradeable ERC-20 assets in the following format:
    /// `<SYMBOL>|<ADDRESS>|<DECIMALS>,<SYMBOL>|<ADDRESS>|<DECIMALS>`
    #[clap(long, env, use_value_delimiter = true)]
    pub assets: Vec<AssetArgument>,

    /// Symbol of the asset protocol fees are paid in. Must be one of the
    /// configured assets.
    #[clap(long, env, default_value = "ZRX")]
    pub fee_asset: String,

    #[clap(flatten)]
    pub logging: LoggingArguments,
}

#[derive(clap::Parser)]
pub struct LoggingArguments {
    #[clap(long, env, default_value = "warn,market_fill=debug")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    #[clap(long, env, action = clap::ArgAction::Set, default_value = "false")]
    pub use_json_logs: bool,
}

impl From<&LoggingArguments> for observe::Config {
    fn from(logging: &LoggingArguments) -> Self {
        observe::Config::new(
            &logging.log_filter,
            logging.log_stderr_threshold.into_level(),
            logging.use_json_logs,
        )
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetArgument {
    pub symbol: String,
    pub token: Address,
    pub decimals: u8,
}

impl AssetArgument {
    pub fn asset(&self) -> Asset {
        Asset::erc20(self.token, self.symbol.clone(), self.decimals)
    }
}

impl FromStr for AssetArgument {
    type Err = anyhow::Error;

    fn from_str(asset: &str) -> Result<Self> {
        let mut parts = asset.split('|');
        let symbol = parts.next().context("missing asset symbol")?;
        let token = parts.next().context("missing asset address")?;
        let decimals = parts.next().context("missing asset decimals")?;
        ensure!(parts.next().is_none(), "too many arguments for asset");
        ensure!(!symbol.is_empty(), "empty asset symbol");
        Ok(Self {
            symbol: symbol.to_owned(),
            token: token.parse().context("invalid asset address")?,
            decimals: decimals.parse().context("invalid asset decimals")?,
        })
    }
}

impl Display for AssetArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{:?}|{}", self.symbol, self.token, self.decimals)
    }
}

impl Display for LoggingArguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            log_stderr_threshold,
            use_json_logs,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            node_url,
            exchange_address,
            account,
            assets,
            fee_asset,
            logging,
        } = self;

        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "exchange_address: {exchange_address:?}")?;
        match account {
            Some(account) => writeln!(f, "account: {account:?}")?,
            None => writeln!(f, "account: None")?,
        }
        write!(f, "assets: [")?;
        for (i, asset) in assets.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{asset}")?;
        }
        writeln!(f, "]")?;
        writeln!(f, "fee_asset: {fee_asset}")?;
        write!(f, "{logging}")?;
        Ok(())
    }
}
