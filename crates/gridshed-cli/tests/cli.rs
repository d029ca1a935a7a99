use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_territories(path: &Path) {
    fs::write(
        path,
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature",
             "properties":{"NAME":"Alpha Power","STATE":"TX","TOTAL_CAP":1000.0,
                           "AVAIL_CAP":800.0,"PEAK_LOAD":700.0,"MIN_LOAD":300.0,
                           "SHAPE__Area":1.0,"SHAPE__Length":1.0},
             "geometry":{"type":"Polygon",
                         "coordinates":[[[0,0],[50000,0],[50000,50000],[0,50000],[0,0]]]}},
            {"type":"Feature",
             "properties":{"NAME":"Beta Power","STATE":"TX","TOTAL_CAP":500.0,
                           "AVAIL_CAP":400.0,"PEAK_LOAD":350.0,"MIN_LOAD":100.0,
                           "SHAPE__Area":1.0,"SHAPE__Length":1.0},
             "geometry":{"type":"Polygon",
                         "coordinates":[[[50000,0],[100000,0],[100000,50000],[50000,50000],[50000,0]]]}}
        ]}"#,
    )
    .unwrap();
}

fn write_region_map(path: &Path) {
    fs::write(
        path,
        "Balancing Authority,FERC_1000 Regions\nAlpha Power,ERCOT\nBeta Power,ERCOT\n",
    )
    .unwrap();
}

fn write_counties(path: &Path) {
    fs::write(
        path,
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature",
             "properties":{"NAME":"Anderson","STATE_NAME":"Texas","GEOID":"48001"},
             "geometry":{"type":"Polygon",
                         "coordinates":[[[0,0],[100000,0],[100000,50000],[0,50000],[0,0]]]}}
        ]}"#,
    )
    .unwrap();
}

fn write_lines(path: &Path) {
    // Two touching 230 kV AC segments plus one detached line, all inside
    // the territory footprint.
    fs::write(
        path,
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature",
             "properties":{"OBJECTID":1,"OWNER":"Alpha Power","VOLTAGE":230.0,
                           "TYPE":"AC; OVERHEAD","STATUS":"IN SERVICE","SOURCEDATE":"2017-05-01"},
             "geometry":{"type":"LineString","coordinates":[[1000,1000],[5000,1000]]}},
            {"type":"Feature",
             "properties":{"OBJECTID":2,"OWNER":"Alpha Power","VOLTAGE":230.0,
                           "TYPE":"AC; OVERHEAD","STATUS":"IN SERVICE","SOURCEDATE":"2017-05-01"},
             "geometry":{"type":"LineString","coordinates":[[5000,1000],[9000,1000]]}},
            {"type":"Feature",
             "properties":{"OBJECTID":3,"OWNER":"Beta Power","VOLTAGE":115.0,
                           "TYPE":"DC; OVERHEAD","STATUS":"IN SERVICE"},
             "geometry":{"type":"LineString","coordinates":[[20000,20000],[30000,20000]]}}
        ]}"#,
    )
    .unwrap();
}

fn write_spec(path: &Path) {
    fs::write(
        path,
        r#"{"states":["TX"],"excluded_regions":[],"screen_exempt":[],
            "renames":{},"subtract_overlaps":[],"county_patches":[],
            "keep":["ERCOT"]}"#,
    )
    .unwrap();
}

fn write_demographics(path: &Path) {
    fs::write(
        path,
        "GEOID,Total_Population,Median_Age,Median_Household_Income,White_Population,Black_Population,Asian_Population,Hispanic_Population\n\
         48001,58000,38.2,51000,35000,12000,500,10500\n",
    )
    .unwrap();
}

#[test]
fn gridshed_regions_builds_and_writes() {
    let tmp = tempdir().unwrap();
    let territories = tmp.path().join("territories.geojson");
    let region_map = tmp.path().join("regionmap.csv");
    let counties = tmp.path().join("counties.geojson");
    let spec = tmp.path().join("spec.json");
    let out = tmp.path().join("regions.geojson");
    write_territories(&territories);
    write_region_map(&region_map);
    write_counties(&counties);
    write_spec(&spec);

    let mut cmd = Command::cargo_bin("gridshed").unwrap();
    cmd.args([
        "regions",
        "--territories",
        territories.to_str().unwrap(),
        "--region-map",
        region_map.to_str().unwrap(),
        "--counties",
        counties.to_str().unwrap(),
        "--spec",
        spec.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Region build summary"))
    .stdout(predicate::str::contains("ERCOT"));
    assert!(out.exists());
}

#[test]
fn gridshed_analyze_fills_derived_columns() {
    let tmp = tempdir().unwrap();
    let lines = tmp.path().join("lines.geojson");
    let out = tmp.path().join("analyzed.geojson");
    let stats = tmp.path().join("stats");
    write_lines(&lines);

    let mut cmd = Command::cargo_bin("gridshed").unwrap();
    cmd.args([
        "analyze",
        "--lines",
        lines.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--stats-dir",
        stats.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Analysis summary"))
    .stdout(predicate::str::contains("Numeric column statistics"));
    assert!(out.exists());
    assert!(stats.join("describe.csv").exists());
    assert!(stats.join("type_counts.csv").exists());

    let analyzed = fs::read_to_string(&out).unwrap();
    assert!(analyzed.contains("LINE_LENGTH_KM"));
    assert!(analyzed.contains("POWER_CAPACITY"));
}

#[test]
fn gridshed_full_pipeline_runs() {
    let tmp = tempdir().unwrap();
    let territories = tmp.path().join("territories.geojson");
    let region_map = tmp.path().join("regionmap.csv");
    let counties = tmp.path().join("counties.geojson");
    let spec = tmp.path().join("spec.json");
    let regions = tmp.path().join("regions.geojson");
    let lines = tmp.path().join("lines.geojson");
    let assigned = tmp.path().join("assigned");
    let merged = tmp.path().join("merged");
    let summary = tmp.path().join("summary.csv");
    let demographics = tmp.path().join("demographics.csv");
    write_territories(&territories);
    write_region_map(&region_map);
    write_counties(&counties);
    write_spec(&spec);
    write_lines(&lines);
    write_demographics(&demographics);

    Command::cargo_bin("gridshed")
        .unwrap()
        .args([
            "regions",
            "--territories",
            territories.to_str().unwrap(),
            "--region-map",
            region_map.to_str().unwrap(),
            "--counties",
            counties.to_str().unwrap(),
            "--spec",
            spec.to_str().unwrap(),
            "-o",
            regions.to_str().unwrap(),
        ])
        .assert()
        .success();

    Command::cargo_bin("gridshed")
        .unwrap()
        .args([
            "assign",
            "--lines",
            lines.to_str().unwrap(),
            "--regions",
            regions.to_str().unwrap(),
            "-o",
            assigned.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ERCOT"));
    assert!(assigned.join("transmissionERCOT.geojson").exists());

    Command::cargo_bin("gridshed")
        .unwrap()
        .args([
            "merge",
            "--regions",
            regions.to_str().unwrap(),
            "--lines-dir",
            assigned.to_str().unwrap(),
            "-o",
            merged.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("CORRIDORS"));
    let merged_file = merged.join("mergedtransmissionERCOT.geojson");
    assert!(merged_file.exists());

    // The two touching AC segments collapse into one corridor carrying
    // both source ids; the DC line survives alone.
    let merged_text = fs::read_to_string(&merged_file).unwrap();
    assert!(merged_text.contains("\"MEMBER_IDS\":\"1,2\""));

    Command::cargo_bin("gridshed")
        .unwrap()
        .args([
            "summarize",
            "--regions",
            regions.to_str().unwrap(),
            "--merged-dir",
            merged.to_str().unwrap(),
            "--counties",
            counties.to_str().unwrap(),
            "--demographics",
            demographics.to_str().unwrap(),
            "-o",
            summary.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Region summary written"));
    let summary_text = fs::read_to_string(&summary).unwrap();
    assert!(summary_text.contains("Total_Population"));
    assert!(summary_text.contains("58000"));
}
