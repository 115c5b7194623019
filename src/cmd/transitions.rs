use crate::reports;
use clap::Args;
use keymetry::api::Analyzer;
use keymetry::config::Config;

#[derive(Args, Debug, Clone)]
pub struct TransitionsArgs {
    #[command(flatten)]
    pub config: Config,

    /// How many top transitions to show.
    #[arg(short, long, default_value_t = 10)]
    pub count: usize,

    /// Count floor for the awkward and slow tables.
    #[arg(short, long, default_value_t = 5)]
    pub min_count: u64,
}

pub fn run(args: TransitionsArgs, analyzer: &Analyzer) {
    println!("\n🔁 === TRANSITION ANALYSIS === 🔁");

    let log = analyzer.transition_log();
    if log.is_empty() {
        println!("\nNo transition data in this snapshot.");
        return;
    }

    let model = analyzer.finger_map();
    let weights = &analyzer.config().comfort;

    reports::print_top_transitions(&log.top(args.count, model, weights));
    reports::print_awkward_transitions(&log.awkward(model, weights, args.min_count));
    reports::print_slow_transitions(&log.slow(weights.slow_ms, args.min_count));
}
