//! GeoJSON readers and writers for the pipeline's feature types.
//!
//! Property extraction is tolerant of the encodings seen in HIFLD and
//! census exports: numbers may arrive as JSON numbers or numeric strings,
//! unknown properties are ignored. Geometry handling is strict: line
//! datasets must carry (multi-)line geometries and polygon datasets
//! (multi-)polygons; anything else is a validation error naming the
//! offending feature.
//!
//! Every reader assumes the file's coordinates are in the planar projected
//! reference system shared by the whole run; no reprojection happens here.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use geo_types::{Geometry, MultiLineString, MultiPolygon};
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson, JsonObject};

use gridshed_core::{
    state_code, BalancingArea, County, Kilovolts, LineFeature, MergedLine, PlanningRegion,
    TerritoryStats,
};

/// HIFLD marker for unknown voltage; screened out during analysis.
const UNKNOWN_VOLTAGE_KV: f64 = -999_999.0;

fn read_collection(path: &Path) -> Result<FeatureCollection> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading GeoJSON file '{}'", path.display()))?;
    let geojson: GeoJson = contents
        .parse()
        .with_context(|| format!("parsing GeoJSON in '{}'", path.display()))?;
    FeatureCollection::try_from(geojson)
        .with_context(|| format!("'{}' is not a feature collection", path.display()))
}

fn write_collection(path: &Path, features: Vec<Feature>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory '{}'", parent.display()))?;
    }
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    fs::write(path, GeoJson::FeatureCollection(collection).to_string())
        .with_context(|| format!("writing GeoJSON file '{}'", path.display()))
}

fn prop_str(props: &JsonObject, key: &str) -> Option<String> {
    props.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// Numeric property, accepting either a JSON number or a numeric string.
fn prop_f64(props: &JsonObject, key: &str) -> Option<f64> {
    match props.get(key)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn feature_geometry(feature: &Feature, idx: usize) -> Result<Geometry<f64>> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| anyhow!("feature {idx} has no geometry"))?;
    Geometry::<f64>::try_from(geometry)
        .with_context(|| format!("feature {idx} has an unsupported geometry encoding"))
}

fn into_multi_line(
    geometry: Geometry<f64>,
    idx: usize,
    path: &Path,
) -> Result<MultiLineString<f64>> {
    match geometry {
        Geometry::LineString(line) => Ok(MultiLineString(vec![line])),
        Geometry::MultiLineString(lines) => Ok(lines),
        other => Err(anyhow!(
            "feature {idx} in '{}': expected line geometry, found {}",
            path.display(),
            geometry_kind(&other)
        )),
    }
}

fn into_multi_polygon(
    geometry: Geometry<f64>,
    idx: usize,
    path: &Path,
) -> Result<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Ok(MultiPolygon(vec![polygon])),
        Geometry::MultiPolygon(polygons) => Ok(polygons),
        other => Err(anyhow!(
            "feature {idx} in '{}': expected polygon geometry, found {}",
            path.display(),
            geometry_kind(&other)
        )),
    }
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

fn feature_id(feature: &Feature, props: &JsonObject, idx: usize) -> i64 {
    if let Some(Id::Number(n)) = &feature.id {
        if let Some(id) = n.as_i64() {
            return id;
        }
    }
    prop_f64(props, "OBJECTID")
        .or_else(|| prop_f64(props, "ID"))
        .map(|v| v as i64)
        .unwrap_or(idx as i64)
}

/// Read a transmission-line feature collection.
pub fn read_lines(path: &Path) -> Result<Vec<LineFeature>> {
    let collection = read_collection(path)?;
    let empty = JsonObject::new();
    let mut lines = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.iter().enumerate() {
        let props = feature.properties.as_ref().unwrap_or(&empty);
        let geometry = into_multi_line(feature_geometry(feature, idx)?, idx, path)?;
        let owner = prop_str(props, "OWNER").unwrap_or_else(|| "NOT AVAILABLE".to_string());
        let voltage = Kilovolts(prop_f64(props, "VOLTAGE").unwrap_or(UNKNOWN_VOLTAGE_KV));
        let mut line = LineFeature::new(feature_id(feature, props, idx), owner, voltage, geometry);
        line.type_desc = prop_str(props, "TYPE");
        line.status = prop_str(props, "STATUS");
        line.source_date = prop_str(props, "SOURCEDATE");
        line.source_year = prop_f64(props, "YEAR").map(|y| y as i32);
        line.length_km = prop_f64(props, "LINE_LENGTH_KM").map(gridshed_core::Kilometers);
        line.length_mi = prop_f64(props, "LINE_LENGTH_MILES").map(gridshed_core::Miles);
        line.power_capacity = prop_f64(props, "POWER_CAPACITY").map(gridshed_core::Megawatts);
        line.log_power_capacity = prop_f64(props, "LOG_POWER_CAPACITY");
        lines.push(line);
    }
    Ok(lines)
}

fn insert_opt_f64(props: &mut JsonObject, key: &str, value: Option<f64>) {
    if let Some(v) = value {
        props.insert(key.to_string(), serde_json::Value::from(v));
    }
}

fn insert_opt_str(props: &mut JsonObject, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        props.insert(key.to_string(), serde_json::Value::from(v.as_str()));
    }
}

/// Write a transmission-line feature collection.
///
/// Round-trips through [`read_lines`]: derived columns are written when
/// present and recovered on read.
pub fn write_lines(path: &Path, lines: &[LineFeature]) -> Result<()> {
    let features = lines
        .iter()
        .map(|line| {
            let mut props = JsonObject::new();
            props.insert("OBJECTID".to_string(), serde_json::Value::from(line.id));
            props.insert("OWNER".to_string(), serde_json::Value::from(line.owner.as_str()));
            props.insert("VOLTAGE".to_string(), serde_json::Value::from(line.voltage.value()));
            insert_opt_str(&mut props, "TYPE", &line.type_desc);
            insert_opt_str(&mut props, "STATUS", &line.status);
            insert_opt_str(&mut props, "SOURCEDATE", &line.source_date);
            insert_opt_f64(&mut props, "YEAR", line.source_year.map(f64::from));
            insert_opt_f64(&mut props, "LINE_LENGTH_KM", line.length_km.map(|v| v.value()));
            insert_opt_f64(&mut props, "LINE_LENGTH_MILES", line.length_mi.map(|v| v.value()));
            insert_opt_f64(&mut props, "POWER_CAPACITY", line.power_capacity.map(|v| v.value()));
            insert_opt_f64(&mut props, "LOG_POWER_CAPACITY", line.log_power_capacity);
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&line.geometry))),
                id: Some(Id::Number(line.id.into())),
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();
    write_collection(path, features)
}

/// Write merged corridors with their audit trail.
pub fn write_merged_lines(path: &Path, merged: &[MergedLine]) -> Result<()> {
    let features = merged
        .iter()
        .map(|line| {
            let mut props = JsonObject::new();
            props.insert("OWNER".to_string(), serde_json::Value::from(line.owner.as_str()));
            props.insert("VOLTAGE".to_string(), serde_json::Value::from(line.voltage.value()));
            props.insert("TYPE".to_string(), serde_json::Value::from(line.type_desc.as_str()));
            props.insert(
                "MERGED_TYPES".to_string(),
                serde_json::Value::from(line.merged_types.as_str()),
            );
            let member_ids = line
                .member_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            props.insert("MEMBER_IDS".to_string(), serde_json::Value::from(member_ids));
            insert_opt_f64(&mut props, "LINE_LENGTH_KM", line.length_km.map(|v| v.value()));
            insert_opt_f64(&mut props, "LINE_LENGTH_MILES", line.length_mi.map(|v| v.value()));
            insert_opt_f64(&mut props, "POWER_CAPACITY", line.power_capacity.map(|v| v.value()));
            insert_opt_f64(&mut props, "LOG_POWER_CAPACITY", line.log_power_capacity);
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&line.geometry))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();
    write_collection(path, features)
}

/// Read balancing-authority service territories (control areas).
///
/// The six CAP/LOAD/SHAPE stat columns are optional as a group: a record
/// missing any of them reads with `stats: None` and is later removed by the
/// validity screen unless its region is exempt.
pub fn read_territories(path: &Path) -> Result<Vec<BalancingArea>> {
    let collection = read_collection(path)?;
    let empty = JsonObject::new();
    let mut territories = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.iter().enumerate() {
        let props = feature.properties.as_ref().unwrap_or(&empty);
        let geometry = into_multi_polygon(feature_geometry(feature, idx)?, idx, path)?;
        let name = prop_str(props, "NAME")
            .ok_or_else(|| anyhow!("territory feature {idx} has no NAME"))?;
        let state = prop_str(props, "STATE").unwrap_or_default();
        let stats = read_stats(props);
        territories.push(BalancingArea {
            name: gridshed_core::normalize_ba_name(&name),
            state,
            stats,
            geometry,
        });
    }
    Ok(territories)
}

fn read_stats(props: &JsonObject) -> Option<TerritoryStats> {
    Some(TerritoryStats {
        total_cap: prop_f64(props, "TOTAL_CAP")?,
        avail_cap: prop_f64(props, "AVAIL_CAP")?,
        peak_load: prop_f64(props, "PEAK_LOAD")?,
        min_load: prop_f64(props, "MIN_LOAD")?,
        shape_area: prop_f64(props, "SHAPE__Area")?,
        shape_length: prop_f64(props, "SHAPE__Length")?,
    })
}

/// Read county boundaries. Accepts a `GEOID` property or the
/// `STATE_FIPS`/`CNTY_FIPS` pair; state may be a postal code or a full name.
pub fn read_counties(path: &Path) -> Result<Vec<County>> {
    let collection = read_collection(path)?;
    let empty = JsonObject::new();
    let mut counties = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.iter().enumerate() {
        let props = feature.properties.as_ref().unwrap_or(&empty);
        let geometry = into_multi_polygon(feature_geometry(feature, idx)?, idx, path)?;
        let raw_state = prop_str(props, "STATE_NAME")
            .or_else(|| prop_str(props, "STATE"))
            .unwrap_or_default();
        // Counties outside the 50 states (territories, DC) are dropped here,
        // matching the source data's continental-US scope.
        let Some(state) = state_code(&raw_state) else {
            continue;
        };
        let geoid = prop_str(props, "GEOID").or_else(|| {
            let state_fips = prop_str(props, "STATE_FIPS")?;
            let county_fips = prop_str(props, "CNTY_FIPS")?;
            Some(format!("{state_fips}{county_fips}"))
        });
        let geoid =
            geoid.ok_or_else(|| anyhow!("county feature {idx} has no GEOID or FIPS pair"))?;
        counties.push(County {
            geoid,
            name: prop_str(props, "NAME").unwrap_or_default(),
            state: state.to_string(),
            geometry,
        });
    }
    Ok(counties)
}

/// Read dissolved planning regions written by [`write_regions`].
pub fn read_regions(path: &Path) -> Result<Vec<PlanningRegion>> {
    let collection = read_collection(path)?;
    let empty = JsonObject::new();
    let mut regions = Vec::with_capacity(collection.features.len());
    for (idx, feature) in collection.features.iter().enumerate() {
        let props = feature.properties.as_ref().unwrap_or(&empty);
        let geometry = into_multi_polygon(feature_geometry(feature, idx)?, idx, path)?;
        let name = prop_str(props, "REGION")
            .ok_or_else(|| anyhow!("region feature {idx} has no REGION"))?;
        let stats = read_stats(props).unwrap_or_default();
        regions.push(PlanningRegion {
            name,
            stats,
            geometry,
        });
    }
    Ok(regions)
}

/// Write dissolved planning regions with their summed stat columns.
pub fn write_regions(path: &Path, regions: &[PlanningRegion]) -> Result<()> {
    let features = regions
        .iter()
        .map(|region| {
            let mut props = JsonObject::new();
            props.insert("REGION".to_string(), serde_json::Value::from(region.name.as_str()));
            props.insert("TOTAL_CAP".to_string(), serde_json::Value::from(region.stats.total_cap));
            props.insert("AVAIL_CAP".to_string(), serde_json::Value::from(region.stats.avail_cap));
            props.insert("PEAK_LOAD".to_string(), serde_json::Value::from(region.stats.peak_load));
            props.insert("MIN_LOAD".to_string(), serde_json::Value::from(region.stats.min_load));
            props.insert(
                "SHAPE__Area".to_string(),
                serde_json::Value::from(region.stats.shape_area),
            );
            props.insert(
                "SHAPE__Length".to_string(),
                serde_json::Value::from(region.stats.shape_length),
            );
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&region.geometry))),
                id: None,
                properties: Some(props),
                foreign_members: None,
            }
        })
        .collect();
    write_collection(path, features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, polygon};
    use gridshed_core::Kilometers;

    fn sample_line(id: i64) -> LineFeature {
        let geometry = MultiLineString(vec![line_string![
            (x: 0.0, y: 0.0),
            (x: 1000.0, y: 0.0),
        ]]);
        let mut line = LineFeature::new(id, "Example Power", Kilovolts(230.0), geometry)
            .with_type("AC; OVERHEAD");
        line.status = Some("IN SERVICE".to_string());
        line.length_km = Some(Kilometers(1.0));
        line
    }

    #[test]
    fn test_lines_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.geojson");
        let lines = vec![sample_line(1), sample_line(2)];
        write_lines(&path, &lines).unwrap();
        let back = read_lines(&path).unwrap();
        assert_eq!(back, lines);
    }

    #[test]
    fn test_read_lines_tolerates_string_voltage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.geojson");
        fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"OWNER":"X","VOLTAGE":"345","TYPE":"AC"},
                 "geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}}
            ]}"#,
        )
        .unwrap();
        let lines = read_lines(&path).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].voltage, Kilovolts(345.0));
    }

    #[test]
    fn test_read_lines_rejects_polygon_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.geojson");
        fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"OWNER":"X"},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}
            ]}"#,
        )
        .unwrap();
        let err = read_lines(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("feature 0"));
        assert!(message.contains("bad.geojson"));
        assert!(message.contains("expected line geometry, found Polygon"));
    }

    #[test]
    fn test_regions_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.geojson");
        let regions = vec![PlanningRegion {
            name: "ERCOT".to_string(),
            stats: TerritoryStats {
                total_cap: 90000.0,
                avail_cap: 80000.0,
                peak_load: 74000.0,
                min_load: 30000.0,
                shape_area: 1.0,
                shape_length: 2.0,
            },
            geometry: MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 10.0),
                (x: 0.0, y: 10.0),
            ]]),
        }];
        write_regions(&path, &regions).unwrap();
        let back = read_regions(&path).unwrap();
        assert_eq!(back, regions);
    }

    #[test]
    fn test_read_counties_maps_state_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counties.geojson");
        fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature",
                 "properties":{"NAME":"Monroe","STATE_NAME":"Tennessee","STATE_FIPS":"47","CNTY_FIPS":"123"},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}},
                {"type":"Feature",
                 "properties":{"NAME":"San Juan","STATE_NAME":"Puerto Rico","GEOID":"72127"},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}
            ]}"#,
        )
        .unwrap();
        let counties = read_counties(&path).unwrap();
        assert_eq!(counties.len(), 1);
        assert_eq!(counties[0].state, "TN");
        assert_eq!(counties[0].geoid, "47123");
    }

    #[test]
    fn test_missing_file_is_contextual_error() {
        let err = read_lines(Path::new("/nonexistent/lines.geojson")).unwrap_err();
        assert!(err.to_string().contains("lines.geojson"));
    }
}
