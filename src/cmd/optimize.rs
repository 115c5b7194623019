use crate::reports;
use clap::Args;
use keymetry::api::Analyzer;
use keymetry::config::Config;
use keymetry::simulator::layer_name;
use std::fs;
use std::process;
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Layer the plan targets.
    #[arg(short, long, default_value_t = 1)]
    pub layer: u8,

    /// Write the placement rationale markdown here.
    #[arg(long)]
    pub rationale: Option<String>,

    /// Usage context named in the rationale.
    #[arg(long, default_value = "python")]
    pub context: String,
}

pub fn run(args: OptimizeArgs, analyzer: &Analyzer) {
    println!("\n⚙️  === SYMBOL OPTIMIZATION === ⚙️");

    let assignments = analyzer.optimize(args.layer);
    if assignments.is_empty() {
        println!("\nNothing to place: no symbol counts in this snapshot.");
        return;
    }

    reports::print_assignments(&assignments);
    reports::print_layout_grid(layer_name(args.layer as usize), &assignments);

    if let Some(path) = &args.rationale {
        let exporter = analyzer.exporter("Optimized Voyager");
        let md = exporter.render_rationale(analyzer.snapshot(), &assignments, &args.context);
        if let Err(e) = fs::write(path, md) {
            error!("❌ could not write rationale: {}", e);
            process::exit(1);
        }
        info!("📝 rationale written to {}", path);
    }
}
