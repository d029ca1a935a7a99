//! Descriptive statistics over line columns: the tabular half of the
//! source's per-region data summaries (the plotting half is out of scope).

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use gridshed_core::LineFeature;

/// Numeric columns summarized by [`describe_numeric`].
pub const NUMERIC_COLUMNS: [&str; 4] = [
    "VOLTAGE",
    "YEAR",
    "LINE_LENGTH_MILES",
    "LOG_POWER_CAPACITY",
];

/// Categorical columns summarized by [`value_counts`].
pub const CATEGORICAL_COLUMNS: [&str; 2] = ["STATUS", "TYPE"];

/// Build a DataFrame of the columns of interest from line features.
pub fn line_frame(lines: &[LineFeature]) -> Result<DataFrame> {
    let owners: Vec<&str> = lines.iter().map(|l| l.owner.as_str()).collect();
    let voltages: Vec<f64> = lines.iter().map(|l| l.voltage.value()).collect();
    let statuses: Vec<Option<&str>> = lines.iter().map(|l| l.status.as_deref()).collect();
    let types: Vec<Option<&str>> = lines.iter().map(|l| l.type_desc.as_deref()).collect();
    let years: Vec<Option<i32>> = lines.iter().map(|l| l.source_year).collect();
    let lengths_km: Vec<Option<f64>> =
        lines.iter().map(|l| l.length_km.map(|v| v.value())).collect();
    let lengths_mi: Vec<Option<f64>> =
        lines.iter().map(|l| l.length_mi.map(|v| v.value())).collect();
    let capacities: Vec<Option<f64>> = lines
        .iter()
        .map(|l| l.power_capacity.map(|v| v.value()))
        .collect();
    let log_capacities: Vec<Option<f64>> =
        lines.iter().map(|l| l.log_power_capacity).collect();

    DataFrame::new(vec![
        Series::new("OWNER", owners),
        Series::new("VOLTAGE", voltages),
        Series::new("STATUS", statuses),
        Series::new("TYPE", types),
        Series::new("YEAR", years),
        Series::new("LINE_LENGTH_KM", lengths_km),
        Series::new("LINE_LENGTH_MILES", lengths_mi),
        Series::new("POWER_CAPACITY", capacities),
        Series::new("LOG_POWER_CAPACITY", log_capacities),
    ])
    .context("assembling line DataFrame")
}

/// Describe the named numeric columns: count, mean, std, min, quartiles,
/// max. One output row per column.
pub fn describe_numeric(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let mut names = Vec::new();
    let mut counts: Vec<i64> = Vec::new();
    let mut means = Vec::new();
    let mut stds = Vec::new();
    let mut mins = Vec::new();
    let mut q25s = Vec::new();
    let mut medians = Vec::new();
    let mut q75s = Vec::new();
    let mut maxs = Vec::new();

    for &name in columns {
        let series = df
            .column(name)
            .with_context(|| format!("column '{name}' missing from frame"))?
            .cast(&DataType::Float64)
            .with_context(|| format!("column '{name}' is not numeric"))?;
        let ca = series.f64().context("casting to f64")?;
        names.push(name);
        counts.push((ca.len() - ca.null_count()) as i64);
        means.push(ca.mean());
        stds.push(ca.std(1));
        mins.push(ca.min());
        q25s.push(ca.quantile(0.25, QuantileInterpolOptions::Linear)?);
        medians.push(ca.quantile(0.5, QuantileInterpolOptions::Linear)?);
        q75s.push(ca.quantile(0.75, QuantileInterpolOptions::Linear)?);
        maxs.push(ca.max());
    }

    DataFrame::new(vec![
        Series::new("column", names),
        Series::new("count", counts),
        Series::new("mean", means),
        Series::new("std", stds),
        Series::new("min", mins),
        Series::new("25%", q25s),
        Series::new("50%", medians),
        Series::new("75%", q75s),
        Series::new("max", maxs),
    ])
    .context("assembling describe DataFrame")
}

/// Value counts for one categorical column, most frequent first; ties
/// break alphabetically. Nulls count under "(missing)".
pub fn value_counts(df: &DataFrame, column: &str) -> Result<DataFrame> {
    let series = df
        .column(column)
        .with_context(|| format!("column '{column}' missing from frame"))?;
    let ca = series
        .utf8()
        .with_context(|| format!("column '{column}' is not a string column"))?;
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for value in ca.into_iter() {
        *counts.entry(value.unwrap_or("(missing)")).or_insert(0) += 1;
    }
    let mut rows: Vec<(&str, i64)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    let (values, counts): (Vec<&str>, Vec<i64>) = rows.into_iter().unzip();
    DataFrame::new(vec![
        Series::new("value", values),
        Series::new("count", counts),
    ])
    .context("assembling value-count DataFrame")
}

/// Write a DataFrame as CSV.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory '{}'", parent.display()))?;
    }
    let mut file = File::create(path)
        .with_context(|| format!("creating CSV output '{}'", path.display()))?;
    CsvWriter::new(&mut file)
        .finish(df)
        .with_context(|| format!("writing CSV output '{}'", path.display()))
}
