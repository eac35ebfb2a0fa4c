use anyhow::Result;
use clap::Parser;

use backtest::provider::PriceHistory;
use engine::cache::CachedHistory;
use engine::cli::{HistoryArgs, LevelArgs};
use engine::levels_report::LevelsReport;
use schwab::rest::SchwabRest;

/// Print the Fibnodes, Confluence and Objective Points of the current swing
#[derive(Parser, Debug)]
struct Args {
    #[command(flatten)]
    history: HistoryArgs,
    #[command(flatten)]
    levels: LevelArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    engine::init_tracing();
    let args = Args::parse();
    let config = args.levels.config()?;

    let rest = SchwabRest::new(&args.history.base_url)?;
    let provider = CachedHistory::new(rest, args.history.cache.clone(), args.history.refresh);
    let request = args.history.request();
    let candles = provider.get_history(&request).await?;

    let report = LevelsReport::build(&request.symbol, &candles, &config)?;
    println!("{}", report.render());

    Ok(())
}
