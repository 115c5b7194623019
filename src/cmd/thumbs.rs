use crate::reports;
use clap::Args;
use keymetry::api::Analyzer;
use keymetry::config::Config;

#[derive(Args, Debug, Clone)]
pub struct ThumbsArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long, default_value_t = 10)]
    pub top: usize,
}

pub fn run(args: ThumbsArgs, analyzer: &Analyzer) {
    println!("\n👍 === THUMB KEY CANDIDATES === 👍");
    reports::print_thumb_candidates(&analyzer.thumb_candidates(args.top));
}
