use crate::reports;
use clap::Args;
use keymetry::api::Analyzer;
use keymetry::config::Config;

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long, default_value_t = 10)]
    pub top: usize,
}

pub fn run(args: StatsArgs, analyzer: &Analyzer) {
    println!("\n📊 === KEYSTROKE STATISTICS === 📊");
    reports::print_summary(&analyzer.summary(args.top));
}
