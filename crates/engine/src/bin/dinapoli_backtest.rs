use anyhow::Result;
use clap::Parser;

use backtest::provider::Backtester;
use engine::cache::CachedHistory;
use engine::cli::{HistoryArgs, LevelArgs};
use engine::sink::{ConsoleSink, JsonSink, ResultSink, default_json_path};
use schwab::rest::SchwabRest;

/// Replay DiNapoli levels over a price history and report how they held
#[derive(Parser, Debug)]
struct Args {
    #[command(flatten)]
    history: HistoryArgs,
    #[command(flatten)]
    levels: LevelArgs,
    /// JSON snapshot path, defaults to backtest_{symbol}_{start}_{end}.json
    #[arg(long)]
    json_out: Option<String>,
    #[arg(long, default_value_t = false)]
    no_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    engine::init_tracing();
    let args = Args::parse();

    let rest = SchwabRest::new(&args.history.base_url)?;
    let provider = CachedHistory::new(rest, args.history.cache.clone(), args.history.refresh);
    let backtester = Backtester::new(provider, args.levels.config()?)?;

    let result = backtester.run(&args.history.request()).await?;

    ConsoleSink.consume(&result)?;

    if !args.no_json {
        let path = args
            .json_out
            .clone()
            .unwrap_or_else(|| default_json_path(&result));
        JsonSink { path }.consume(&result)?;
    }

    Ok(())
}
