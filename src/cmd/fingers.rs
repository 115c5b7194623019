use crate::reports;
use clap::Args;
use keymetry::api::Analyzer;
use keymetry::config::Config;

#[derive(Args, Debug, Clone)]
pub struct FingersArgs {
    #[command(flatten)]
    pub config: Config,
}

pub fn run(_args: FingersArgs, analyzer: &Analyzer) {
    println!("\n🖐️  === FINGER USAGE === 🖐️");
    reports::print_finger_usage(&analyzer.finger_usage());
}
