use crate::reports;
use clap::Args;
use keymetry::api::Analyzer;
use keymetry::config::Config;
use keymetry::snapshot::load_events_csv;
use std::process;
use tracing::error;

#[derive(Args, Debug, Clone)]
pub struct TimingArgs {
    #[command(flatten)]
    pub config: Config,

    /// Raw event CSV (symbol,timestamp_ms).
    #[arg(short, long, default_value = "data/keystroke_events.csv")]
    pub events: String,

    /// How many hesitations to show.
    #[arg(long, default_value_t = 10)]
    pub show: usize,
}

pub fn run(args: TimingArgs, analyzer: &Analyzer) {
    println!("\n⏱️  === TIMING ANALYSIS === ⏱️");

    let events = load_events_csv(&args.events).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });
    println!("📂 {} events loaded from {}", events.len(), args.events);

    let timing = analyzer.timing(&events);
    reports::print_latency(&timing.stats(), timing.class_counts());
    reports::print_hesitations(timing.hesitations(), args.show);
}
