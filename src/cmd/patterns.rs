use crate::reports;
use clap::Args;
use keymetry::api::Analyzer;
use keymetry::config::Config;
use keymetry::snapshot::load_events_csv;
use std::process;
use tracing::error;

#[derive(Args, Debug, Clone)]
pub struct PatternsArgs {
    #[command(flatten)]
    pub config: Config,

    /// Raw event CSV (symbol,timestamp_ms).
    #[arg(short, long, default_value = "data/keystroke_events.csv")]
    pub events: String,

    /// How many repeated sequences to show.
    #[arg(long, default_value_t = 20)]
    pub show: usize,
}

pub fn run(args: PatternsArgs, analyzer: &Analyzer) {
    println!("\n🔍 === PATTERN DETECTION === 🔍");

    let events = load_events_csv(&args.events).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });
    let symbols: Vec<String> = events.into_iter().map(|e| e.symbol).collect();
    println!("📂 {} symbols in stream", symbols.len());

    let (sequences, macros) = analyzer.patterns(&symbols);
    reports::print_sequences(&sequences, args.show);
    reports::print_macros(&macros);
}
