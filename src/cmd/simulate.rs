use crate::reports;
use clap::Args;
use keymetry::api::Analyzer;
use keymetry::config::Config;
use std::process;
use tracing::error;

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub config: Config,

    /// Also run the optimizer and compare against the stock layout.
    #[arg(short, long, default_value_t = false)]
    pub optimized: bool,

    /// Layer the comparison plan targets.
    #[arg(long, default_value_t = 1)]
    pub layer: u8,
}

pub fn run(args: SimulateArgs, analyzer: &Analyzer) {
    println!("\n🎹 === LAYER SIMULATION === 🎹");

    match analyzer.efficiency(&[]) {
        Ok(report) => reports::print_efficiency(&report),
        Err(e) => {
            error!("❌ {}", e);
            process::exit(1);
        }
    }

    if args.optimized {
        let assignments = analyzer.optimize(args.layer);
        println!(
            "\n⚖️  Stock layout vs plan with {} assignments on layer {}",
            assignments.len(),
            args.layer
        );
        reports::print_comparison(&analyzer.compare(&assignments));
    }
}
