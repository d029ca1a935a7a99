pub mod analyze;
pub mod assign;
pub mod merge;
pub mod regions;
pub mod summarize;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;
use tabwriter::TabWriter;

/// Per-region output file, e.g. `transmissionPJM.geojson`. Region names
/// come from the mapping table and may contain spaces or slashes; strip
/// anything that would not survive as a file name.
pub fn region_path(dir: &Path, prefix: &str, region: &str) -> PathBuf {
    let safe: String = region
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    dir.join(format!("{prefix}{safe}.geojson"))
}

/// Print a DataFrame as an aligned table on stdout.
pub fn print_frame(df: &DataFrame) -> Result<()> {
    let columns: Vec<Utf8Chunked> = df
        .get_columns()
        .iter()
        .map(|series| {
            let cast = series
                .cast(&DataType::Utf8)
                .with_context(|| format!("formatting column '{}'", series.name()))?;
            Ok(cast.utf8().context("formatting cast column")?.clone())
        })
        .collect::<Result<_>>()?;
    let mut writer = TabWriter::new(io::stdout());
    let header: Vec<&str> = df.get_column_names();
    writeln!(writer, "{}", header.join("\t"))?;
    for row in 0..df.height() {
        let cells: Vec<&str> = columns
            .iter()
            .map(|ca| ca.get(row).unwrap_or(""))
            .collect();
        writeln!(writer, "{}", cells.join("\t"))?;
    }
    writer.flush()?;
    Ok(())
}
