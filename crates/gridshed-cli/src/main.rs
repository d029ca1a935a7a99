use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use gridshed_cli::{Cli, Commands};

mod commands;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Some(Commands::Regions {
            territories,
            region_map,
            counties,
            spec,
            out,
        }) => commands::regions::handle(territories, region_map, counties, spec.as_deref(), out),
        Some(Commands::Assign {
            lines,
            regions,
            out_dir,
        }) => commands::assign::handle(lines, regions, out_dir),
        Some(Commands::Analyze {
            lines,
            out,
            stats_dir,
        }) => commands::analyze::handle(lines, out, stats_dir.as_deref()),
        Some(Commands::Merge {
            regions,
            lines_dir,
            out_dir,
        }) => commands::merge::handle(regions, lines_dir, out_dir),
        Some(Commands::Summarize {
            regions,
            merged_dir,
            counties,
            demographics,
            out,
        }) => commands::summarize::handle(regions, merged_dir, counties, demographics, out),
        None => {
            info!("No subcommand provided. Use `gridshed --help` for more information.");
            return;
        }
    };

    match result {
        Ok(_) => info!("Command successful!"),
        Err(e) => {
            error!("Command failed: {:?}", e);
            std::process::exit(1);
        }
    }
}
