use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build planning regions from balancing-authority territories
    Regions {
        /// Territory polygons (GeoJSON)
        #[arg(long)]
        territories: PathBuf,
        /// Balancing-authority-to-region mapping table (CSV)
        #[arg(long)]
        region_map: PathBuf,
        /// County boundaries for region patching (GeoJSON)
        #[arg(long)]
        counties: PathBuf,
        /// Region-build configuration (JSON); defaults match the published
        /// FERC Order 1000 approximation
        #[arg(long)]
        spec: Option<PathBuf>,
        /// Output regions file (GeoJSON)
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Bucket transmission lines by the regions they intersect
    Assign {
        /// Transmission lines (GeoJSON)
        #[arg(long)]
        lines: PathBuf,
        /// Planning regions (GeoJSON)
        #[arg(long)]
        regions: PathBuf,
        /// Output directory; one `transmission<REGION>.geojson` per region
        #[arg(short, long)]
        out_dir: PathBuf,
    },
    /// Derive lengths, capacity estimates, and source years for lines
    Analyze {
        /// Transmission lines (GeoJSON)
        #[arg(long)]
        lines: PathBuf,
        /// Output lines file with derived columns (GeoJSON)
        #[arg(short, long)]
        out: PathBuf,
        /// Also write descriptive-statistics CSVs into this directory
        #[arg(long)]
        stats_dir: Option<PathBuf>,
    },
    /// Merge touching same-owner/voltage/class lines into corridors
    Merge {
        /// Planning regions (GeoJSON); drives the per-region file names
        #[arg(long)]
        regions: PathBuf,
        /// Directory holding `transmission<REGION>.geojson` files
        #[arg(long)]
        lines_dir: PathBuf,
        /// Output directory; one `mergedtransmission<REGION>.geojson` per
        /// region
        #[arg(short, long)]
        out_dir: PathBuf,
    },
    /// Summarize demographics and transmission totals per region
    Summarize {
        /// Planning regions (GeoJSON)
        #[arg(long)]
        regions: PathBuf,
        /// Directory holding `mergedtransmission<REGION>.geojson` files
        #[arg(long)]
        merged_dir: PathBuf,
        /// County boundaries (GeoJSON)
        #[arg(long)]
        counties: PathBuf,
        /// County demographics extract (CSV)
        #[arg(long)]
        demographics: PathBuf,
        /// Output summary table (CSV)
        #[arg(short, long)]
        out: PathBuf,
    },
}
