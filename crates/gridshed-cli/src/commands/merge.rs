use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tabwriter::TabWriter;
use tracing::{info, warn};

use gridshed_algo::{analyze_merged, merge_lines};
use gridshed_io::{read_lines, read_regions, write_merged_lines};

use crate::commands::region_path;

pub fn handle(regions: &Path, lines_dir: &Path, out_dir: &Path) -> Result<()> {
    let regions = read_regions(regions)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory '{}'", out_dir.display()))?;

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "REGION\tINPUT\tCORRIDORS\tSKIPPED")?;
    for region in &regions {
        let input = region_path(lines_dir, "transmission", &region.name);
        if !input.exists() {
            warn!(region = %region.name, path = %input.display(), "no line file for region");
            continue;
        }
        info!(region = %region.name, "merging transmission lines");
        let lines = read_lines(&input)?;
        let report = merge_lines(&lines);
        let mut merged = report.merged;
        analyze_merged(&mut merged);

        let output = region_path(out_dir, "mergedtransmission", &region.name);
        write_merged_lines(&output, &merged)?;
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            region.name,
            report.input_features,
            merged.len(),
            report.skipped.len()
        )?;
    }
    writer.flush()?;
    println!("Merged lines written to {}", out_dir.display());
    Ok(())
}
