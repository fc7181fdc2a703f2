use {
    alloy::primitives::U256,
    anyhow::{Context, Result, bail},
    clap::Parser,
    market_fill::{
        arguments::Arguments,
        simulator::{Side, Simulator},
    },
    model::order::SignedOrder,
    std::path::PathBuf,
};

/// Estimates gas for and simulates a market fill of signed orders. Funds are
/// not validated since the wallet is not known here.
#[derive(clap::Parser)]
struct Cli {
    #[clap(flatten)]
    market: Arguments,

    /// JSON file with an array of signed orders in standard relayer format.
    #[clap(long, env)]
    orders: PathBuf,

    /// Maker asset amount to buy or taker asset amount to sell, in base
    /// units.
    #[clap(long, env)]
    amount: U256,

    #[clap(long, env, value_enum)]
    side: Side,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    observe::tracing::initialize(&observe::Config::from(&cli.market.logging));
    tracing::info!("running market fill simulation with arguments:\n{}", cli.market);

    let orders = std::fs::read(&cli.orders)
        .with_context(|| format!("failed to read orders from {}", cli.orders.display()))?;
    let orders: Vec<SignedOrder> =
        serde_json::from_slice(&orders).context("failed to parse orders")?;

    let simulator = Simulator::connect(&cli.market);
    let (gas, fill) = futures::try_join!(
        simulator.estimate_gas(&orders, cli.amount, cli.side),
        simulator.simulate(&orders, cli.amount, cli.side),
    )?;
    let Some(fill) = fill else {
        bail!("could not call market {} orders", cli.side);
    };
    tracing::info!(%gas, ?fill, "simulated market fill");
    Ok(())
}
