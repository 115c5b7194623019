use crate::reports;
use clap::Args;
use keymetry::api::Analyzer;
use keymetry::config::Config;
use keymetry::snapshot::load_events_csv;
use std::fs;
use std::path::Path;
use std::process;
use tracing::{error, info, warn};

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub config: Config,

    /// Layout name stamped into the document metadata.
    #[arg(short, long, default_value = "Keymetry Optimized")]
    pub name: String,

    /// Where the Oryx JSON lands.
    #[arg(short, long, default_value = "voyager_layout.json")]
    pub output: String,

    /// Layer the optimizer plan targets.
    #[arg(short, long, default_value_t = 1)]
    pub layer: u8,

    /// Also write a printable cheatsheet markdown here.
    #[arg(long)]
    pub cheatsheet: Option<String>,

    /// Event CSV feeding the cheatsheet's macro table.
    #[arg(long)]
    pub events: Option<String>,
}

pub fn run(args: ExportArgs, analyzer: &Analyzer) {
    println!("\n📦 === ORYX EXPORT === 📦");

    let assignments = analyzer.optimize(args.layer);
    reports::print_assignments(&assignments);

    let document = match analyzer.export_oryx(&args.name, &assignments, Path::new(&args.output)) {
        Ok(doc) => doc,
        Err(e) => {
            error!("❌ {}", e);
            process::exit(1);
        }
    };
    println!(
        "\n💾 {} layers -> {} (uid {})",
        document.layers.len(),
        args.output,
        document.uid
    );

    if let Some(path) = &args.cheatsheet {
        let macros = match &args.events {
            Some(events_path) => match load_events_csv(events_path) {
                Ok(events) => {
                    let symbols: Vec<String> = events.into_iter().map(|e| e.symbol).collect();
                    let (_, macros) = analyzer.patterns(&symbols);
                    macros
                }
                Err(e) => {
                    warn!("⚠️  skipping macro table, events unavailable: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let md = analyzer
            .exporter(&args.name)
            .render_cheatsheet(&assignments, &macros);
        if let Err(e) = fs::write(path, md) {
            error!("❌ could not write cheatsheet: {}", e);
            process::exit(1);
        }
        info!("📝 cheatsheet written to {}", path);
    }
}
