use std::path::Path;

use anyhow::Result;
use tracing::info;

use gridshed_algo::{
    analyze_lines, describe_numeric, line_frame, value_counts, write_csv, CATEGORICAL_COLUMNS,
    NUMERIC_COLUMNS,
};
use gridshed_io::{read_lines, write_lines};

use crate::commands::print_frame;

pub fn handle(lines: &Path, out: &Path, stats_dir: Option<&Path>) -> Result<()> {
    info!("Analyzing lines from {}", lines.display());
    let lines = read_lines(lines)?;
    let (lines, summary) = analyze_lines(lines);
    write_lines(out, &lines)?;

    println!("Analysis summary:");
    println!("  Input lines              : {}", summary.input_lines);
    println!(
        "  Dropped (unknown voltage): {}",
        summary.dropped_negative_voltage
    );
    println!("  AC lines                 : {}", summary.ac_lines);
    println!("Analyzed lines written to {}", out.display());

    if let Some(dir) = stats_dir {
        let frame = line_frame(&lines)?;

        let mut described = describe_numeric(&frame, &NUMERIC_COLUMNS)?;
        println!("\nNumeric column statistics:");
        print_frame(&described)?;
        write_csv(&mut described, &dir.join("describe.csv"))?;

        for column in CATEGORICAL_COLUMNS {
            let mut counts = value_counts(&frame, column)?;
            println!("\n{column} value counts:");
            print_frame(&counts)?;
            let file = format!("{}_counts.csv", column.to_lowercase());
            write_csv(&mut counts, &dir.join(file))?;
        }
        println!("\nStatistics written to {}", dir.display());
    }
    Ok(())
}
