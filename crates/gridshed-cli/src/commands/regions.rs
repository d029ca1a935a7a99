use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tabwriter::TabWriter;
use tracing::info;

use gridshed_algo::build_regions;
use gridshed_core::RegionSpec;
use gridshed_io::{read_counties, read_region_map, read_territories, write_regions};

pub fn handle(
    territories: &Path,
    region_map: &Path,
    counties: &Path,
    spec: Option<&Path>,
    out: &Path,
) -> Result<()> {
    let spec = match spec {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading region spec '{}'", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing region spec '{}'", path.display()))?
        }
        None => RegionSpec::default(),
    };

    info!("Building regions from {}", territories.display());
    let territories = read_territories(territories)?;
    let region_map = read_region_map(region_map)?;
    let counties = read_counties(counties)?;

    let (regions, summary) = build_regions(&territories, &region_map, &counties, &spec)?;
    write_regions(out, &regions)?;

    println!("Region build summary:");
    println!("  Territories   : {}", summary.input_territories);
    println!("  Joined        : {}", summary.joined_territories);
    println!("  Screened out  : {}", summary.screened_out);
    println!("  Regions       : {}", summary.regions);

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "REGION\tTOTAL CAP\tAVAIL CAP\tPEAK LOAD\tMIN LOAD")?;
    for region in &regions {
        writeln!(
            writer,
            "{}\t{:.1}\t{:.1}\t{:.1}\t{:.1}",
            region.name,
            region.stats.total_cap,
            region.stats.avail_cap,
            region.stats.peak_load,
            region.stats.min_load
        )?;
    }
    writer.flush()?;

    println!("Regions written to {}", out.display());
    Ok(())
}
