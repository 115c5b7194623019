use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use keymetry::api::Analyzer;
use keymetry::config::Config;
use std::process;
use tracing::{error, info, warn};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "data/keystroke_data.json")]
    data: String,

    #[arg(global = true, long)]
    config: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Stats(cmd::stats::StatsArgs),
    Fingers(cmd::fingers::FingersArgs),
    Transitions(cmd::transitions::TransitionsArgs),
    Timing(cmd::timing::TimingArgs),
    Patterns(cmd::patterns::PatternsArgs),
    Optimize(cmd::optimize::OptimizeArgs),
    Simulate(cmd::simulate::SimulateArgs),
    Thumbs(cmd::thumbs::ThumbsArgs),
    Export(cmd::export::ExportArgs),
    Report(cmd::report::ReportArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    // Parse raw matches first so explicit flags can be told apart from
    // their defaults when merging over a settings file.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    info!("🚀 Initializing Keymetry...");

    // Threshold flags live inside the subcommand's matches, not the root.
    let (mut config, sub_matches) = match &cli.command {
        Commands::Stats(args) => (
            args.config.clone(),
            matches.subcommand_matches("stats").unwrap(),
        ),
        Commands::Fingers(args) => (
            args.config.clone(),
            matches.subcommand_matches("fingers").unwrap(),
        ),
        Commands::Transitions(args) => (
            args.config.clone(),
            matches.subcommand_matches("transitions").unwrap(),
        ),
        Commands::Timing(args) => (
            args.config.clone(),
            matches.subcommand_matches("timing").unwrap(),
        ),
        Commands::Patterns(args) => (
            args.config.clone(),
            matches.subcommand_matches("patterns").unwrap(),
        ),
        Commands::Optimize(args) => (
            args.config.clone(),
            matches.subcommand_matches("optimize").unwrap(),
        ),
        Commands::Simulate(args) => (
            args.config.clone(),
            matches.subcommand_matches("simulate").unwrap(),
        ),
        Commands::Thumbs(args) => (
            args.config.clone(),
            matches.subcommand_matches("thumbs").unwrap(),
        ),
        Commands::Export(args) => (
            args.config.clone(),
            matches.subcommand_matches("export").unwrap(),
        ),
        Commands::Report(args) => (
            args.config.clone(),
            matches.subcommand_matches("report").unwrap(),
        ),
    };

    if let Some(path) = &cli.config {
        info!("⚖️  Loading settings from: {}", path);
        match Config::load_from_file(path) {
            Ok(mut file_config) => {
                // Explicit CLI flags win over the file.
                file_config.merge_from_cli(&config, sub_matches);
                config = file_config;
            }
            Err(e) => warn!("⚠️  Could not load {}: {}. Using CLI values.", path, e),
        }
    }

    info!("📂 Loading snapshot: {}", cli.data);
    let analyzer = Analyzer::from_file(&cli.data, config).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });

    match cli.command {
        Commands::Stats(args) => cmd::stats::run(args, &analyzer),
        Commands::Fingers(args) => cmd::fingers::run(args, &analyzer),
        Commands::Transitions(args) => cmd::transitions::run(args, &analyzer),
        Commands::Timing(args) => cmd::timing::run(args, &analyzer),
        Commands::Patterns(args) => cmd::patterns::run(args, &analyzer),
        Commands::Optimize(args) => cmd::optimize::run(args, &analyzer),
        Commands::Simulate(args) => cmd::simulate::run(args, &analyzer),
        Commands::Thumbs(args) => cmd::thumbs::run(args, &analyzer),
        Commands::Export(args) => cmd::export::run(args, &analyzer),
        Commands::Report(args) => cmd::report::run(args, &analyzer),
    }
}
