mod sync;
mod tui;

use anyhow::Result;
use clap::Parser;

/// Terminal client for the budget server.
#[derive(Debug, Parser)]
#[command(name = "budget-client", version)]
struct Args {
    /// Base URL of the budget server.
    #[arg(long, env = "BUDGET_SERVER", default_value = "http://127.0.0.1:8080")]
    base_url: String,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    tui::run_tui(args.base_url)
}
