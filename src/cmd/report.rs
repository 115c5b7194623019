use clap::Args;
use keymetry::api::Analyzer;
use keymetry::config::Config;
use std::fs;
use std::process;
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: Config,

    /// Write the markdown report here instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn run(args: ReportArgs, analyzer: &Analyzer) {
    let report = analyzer.generate_report();

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &report) {
                error!("❌ could not write report: {}", e);
                process::exit(1);
            }
            info!("📝 report written to {}", path);
        }
        None => println!("{}", report),
    }
}
