use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use gridshed_algo::{summarize_regions, summary_frame, write_csv};
use gridshed_io::{read_counties, read_demographics, read_lines, read_regions};

use crate::commands::{print_frame, region_path};

pub fn handle(
    regions: &Path,
    merged_dir: &Path,
    counties: &Path,
    demographics: &Path,
    out: &Path,
) -> Result<()> {
    let regions = read_regions(regions)?;
    let counties = read_counties(counties)?;
    let demographics = read_demographics(demographics)?;

    let mut lines_by_region = Vec::with_capacity(regions.len());
    for region in &regions {
        let path = region_path(merged_dir, "mergedtransmission", &region.name);
        if !path.exists() {
            warn!(region = %region.name, path = %path.display(), "no merged line file for region");
            lines_by_region.push((region.name.clone(), Vec::new()));
            continue;
        }
        info!(region = %region.name, "loading merged lines");
        lines_by_region.push((region.name.clone(), read_lines(&path)?));
    }

    let summaries = summarize_regions(&regions, &lines_by_region, &counties, &demographics);
    let mut frame = summary_frame(&summaries)?;
    print_frame(&frame)?;
    write_csv(&mut frame, out)?;
    println!("Region summary written to {}", out.display());
    Ok(())
}
