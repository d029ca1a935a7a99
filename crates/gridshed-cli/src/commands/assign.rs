use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tabwriter::TabWriter;
use tracing::info;

use gridshed_algo::assign_lines;
use gridshed_io::{read_lines, read_regions, write_lines};

use crate::commands::region_path;

pub fn handle(lines: &Path, regions: &Path, out_dir: &Path) -> Result<()> {
    info!(
        "Assigning lines from {} to regions from {}",
        lines.display(),
        regions.display()
    );
    let lines = read_lines(lines)?;
    let regions = read_regions(regions)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory '{}'", out_dir.display()))?;

    let buckets = assign_lines(&lines, &regions);

    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "REGION\tLINES\tFILE")?;
    for bucket in &buckets {
        let path = region_path(out_dir, "transmission", &bucket.region);
        write_lines(&path, &bucket.lines)?;
        writeln!(
            writer,
            "{}\t{}\t{}",
            bucket.region,
            bucket.lines.len(),
            path.display()
        )?;
    }
    writer.flush()?;
    Ok(())
}
