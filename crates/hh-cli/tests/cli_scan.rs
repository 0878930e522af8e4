use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use ndarray::Array1;
use ndarray_npy::NpzWriter;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_hhscan"))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

struct Row {
    fom: f64,
    s: f64,
    b: f64,
    sideband: f64,
    bdt: f64,
    xbb: f64,
}

fn row(fom: f64, bdt: f64, xbb: f64) -> Row {
    Row { fom, s: 1.0, b: 5.0, sideband: 20.0, bdt, xbb }
}

/// Write `fom_<category>_abcd_mass115-160_fom_arrays.npz` into `dir`.
fn write_archive(dir: &Path, category: &str, rows: &[Row]) -> PathBuf {
    let path = dir.join(format!("fom_{category}_abcd_mass115-160_fom_arrays.npz"));
    let col = |f: fn(&Row) -> f64| Array1::from(rows.iter().map(f).collect::<Vec<_>>());
    let mut npz = NpzWriter::new(File::create(&path).unwrap());
    npz.add_array("all_fom", &col(|r| r.fom)).unwrap();
    npz.add_array("all_s", &col(|r| r.s)).unwrap();
    npz.add_array("all_b", &col(|r| r.b)).unwrap();
    npz.add_array("all_b_unc", &col(|r| r.b * 0.2)).unwrap();
    npz.add_array("all_sideband_events", &col(|r| r.sideband)).unwrap();
    npz.add_array("all_bdt_cuts", &col(|r| r.bdt)).unwrap();
    npz.add_array("all_xbb_cuts", &col(|r| r.xbb)).unwrap();
    npz.finish().unwrap();
    path
}

fn three_point_rows() -> Vec<Row> {
    vec![row(1.2, 0.7, 0.7), row(0.9, 0.7, 0.75), row(1.5, 0.8, 0.7)]
}

fn full_grid_rows() -> Vec<Row> {
    vec![row(1.2, 0.7, 0.7), row(0.9, 0.7, 0.75), row(1.5, 0.8, 0.7), row(1.1, 0.8, 0.75)]
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn non_empty(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

#[test]
fn scan_reports_minimum_and_writes_maps() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path(), "cat1", &three_point_rows());
    let summary = dir.path().join("summary.json");

    let out = run(&[
        "scan",
        "--plot-dir",
        dir.path().to_str().unwrap(),
        "--category",
        "cat1",
        "--allow-missing",
        "--summary",
        summary.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "scan should succeed, stderr={}", stderr(&out));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Category: cat1"), "stdout={stdout}");
    assert!(stdout.contains("Minimum FoM: 0.9000"), "stdout={stdout}");
    assert!(stdout.contains("BDT cut: 0.7"), "stdout={stdout}");
    assert!(stdout.contains("Xbb cut: 0.75"), "stdout={stdout}");

    for ext in ["png", "pdf"] {
        let fom_map = dir.path().join(format!("fom_cat1_abcd_mass115-160_map.{ext}"));
        assert!(non_empty(&fom_map), "missing {}", fom_map.display());
        for key in ["s", "b", "b_unc", "sideband_events"] {
            let map = dir.path().join(format!("cat1_{key}_map.{ext}"));
            assert!(non_empty(&map), "missing {}", map.display());
        }
    }

    let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&summary).unwrap()).unwrap();
    assert_eq!(v["category"], "cat1");
    assert_eq!(v["fom_min"].as_f64(), Some(0.9));
    assert_eq!(v["n_valid_cells"].as_u64(), Some(3));
    assert_eq!(v["points"].as_array().map(|p| p.len()), Some(1));
    assert_eq!(v["bdt_bounds"], serde_json::json!({}));
    let bounds: hh_core::CutBounds = serde_json::from_value(v["bdt_bounds"].clone()).unwrap();
    assert_eq!(bounds, hh_core::CutBounds::unbounded());
}

#[test]
fn scan_fails_fast_on_missing_cut_pair() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path(), "cat1", &three_point_rows());

    let out = run(&[
        "scan",
        "--plot-dir",
        dir.path().to_str().unwrap(),
        "--category",
        "cat1",
        "--no-plots",
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("no record for bdt_cut=0.8"), "stderr={}", stderr(&out));
}

#[test]
fn scan_bounds_restrict_the_grid() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path(), "cat1", &three_point_rows());

    let out = run(&[
        "scan",
        "--plot-dir",
        dir.path().to_str().unwrap(),
        "--category",
        "cat1",
        "--bdt-max",
        "0.75",
        "--no-plots",
    ]);
    assert!(out.status.success(), "scan should succeed, stderr={}", stderr(&out));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Minimum FoM: 0.9000"), "stdout={stdout}");
}

#[test]
fn scan_with_empty_axis_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path(), "cat1", &full_grid_rows());

    let out = run(&[
        "scan",
        "--plot-dir",
        dir.path().to_str().unwrap(),
        "--category",
        "cat1",
        "--xbb-min",
        "0.9",
        "--no-plots",
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("cut values inside"), "stderr={}", stderr(&out));
}

#[test]
fn scan_without_qualifying_point_fails() {
    let dir = tempfile::tempdir().unwrap();
    let rows: Vec<Row> =
        full_grid_rows().into_iter().map(|r| Row { sideband: 3.0, ..r }).collect();
    write_archive(dir.path(), "cat1", &rows);

    let out = run(&[
        "scan",
        "--plot-dir",
        dir.path().to_str().unwrap(),
        "--category",
        "cat1",
        "--no-plots",
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("no qualifying operating point"), "stderr={}", stderr(&out));
}

#[test]
fn scan_missing_archive_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(&["scan", "--plot-dir", dir.path().to_str().unwrap(), "--category", "nope"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("I/O error"), "stderr={}", stderr(&out));
}

#[test]
fn scan_config_file_selects_quantities_and_formats() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path(), "cat2", &full_grid_rows());
    let cfg = dir.path().join("scan.yaml");
    let yaml = format!(
        "plot_dir: {}\ncategory: cat2\nquantities: [fom]\n{}",
        dir.path().display(),
        "viz:\n  output:\n    formats: [svg]\n",
    );
    std::fs::write(&cfg, yaml).unwrap();

    let out = run(&["scan", "--config", cfg.to_str().unwrap()]);
    assert!(out.status.success(), "scan should succeed, stderr={}", stderr(&out));

    let svg = dir.path().join("fom_cat2_abcd_mass115-160_map.svg");
    let body = std::fs::read_to_string(&svg).unwrap();
    assert!(body.contains(">0.9</text>"));
    assert!(!dir.path().join("fom_cat2_abcd_mass115-160_map.png").exists());
    assert!(!dir.path().join("cat2_s_map.svg").exists());
}

#[test]
fn show_writes_artifact_that_render_reproduces() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path(), "cat1", &full_grid_rows());
    let cfg = dir.path().join("scan.json");
    std::fs::write(&cfg, r#"{"quantities": ["fom"], "viz": {"output": {"formats": ["svg"]}}}"#)
        .unwrap();

    let out = run(&[
        "scan",
        "--config",
        cfg.to_str().unwrap(),
        "--plot-dir",
        dir.path().to_str().unwrap(),
        "--category",
        "cat1",
        "--show",
    ]);
    assert!(out.status.success(), "scan should succeed, stderr={}", stderr(&out));

    let artifact_path = dir.path().join("fom_cat1_abcd_mass115-160_map.json");
    let artifact: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&artifact_path).unwrap()).unwrap();
    assert_eq!(artifact["schema_version"], "hh_fom_heatmap_v0");
    assert_eq!(artifact["x_label"], "BDT Cut");
    assert_eq!(artifact["highlight"], serde_json::json!([[0, 1]]));

    let rendered = dir.path().join("rerendered.svg");
    let out = run(&[
        "render",
        "--input",
        artifact_path.to_str().unwrap(),
        "--output",
        rendered.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "render should succeed, stderr={}", stderr(&out));
    let body = std::fs::read_to_string(&rendered).unwrap();
    assert!(body.contains(">1.1</text>"));
}

#[test]
fn tied_minimum_lists_every_pair_and_outlines_both() {
    let dir = tempfile::tempdir().unwrap();
    let rows =
        vec![row(0.9, 0.7, 0.7), row(1.2, 0.7, 0.75), row(1.3, 0.8, 0.7), row(0.9, 0.8, 0.75)];
    write_archive(dir.path(), "cat1", &rows);
    let cfg = dir.path().join("scan.json");
    std::fs::write(&cfg, r#"{"quantities": ["fom"], "viz": {"output": {"formats": ["svg"]}}}"#)
        .unwrap();

    let out = run(&[
        "scan",
        "--config",
        cfg.to_str().unwrap(),
        "--plot-dir",
        dir.path().to_str().unwrap(),
        "--category",
        "cat1",
        "--show",
    ]);
    assert!(out.status.success(), "scan should succeed, stderr={}", stderr(&out));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Minimum FoM: 0.9000"), "stdout={stdout}");
    assert!(stdout.contains("Tied working points: 2"), "stdout={stdout}");
    assert!(stdout.contains("BDT 0.7 / Xbb 0.7\n"), "stdout={stdout}");
    assert!(stdout.contains("BDT 0.8 / Xbb 0.75\n"), "stdout={stdout}");

    let artifact_path = dir.path().join("fom_cat1_abcd_mass115-160_map.json");
    let artifact: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&artifact_path).unwrap()).unwrap();
    assert_eq!(artifact["highlight"], serde_json::json!([[0, 0], [1, 1]]));
}

#[test]
fn empty_quantity_list_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path(), "cat1", &full_grid_rows());
    let cfg = dir.path().join("scan.yaml");
    std::fs::write(&cfg, "quantities: []\n").unwrap();

    let out = run(&[
        "scan",
        "--config",
        cfg.to_str().unwrap(),
        "--plot-dir",
        dir.path().to_str().unwrap(),
        "--category",
        "cat1",
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("no quantities to plot"), "stderr={}", stderr(&out));
}

#[test]
fn render_rejects_malformed_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    std::fs::write(&input, r#"{"schema_version": "hh_fom_heatmap_v0"}"#).unwrap();
    let out = run(&[
        "render",
        "--input",
        input.to_str().unwrap(),
        "--output",
        dir.path().join("bad.svg").to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("deserialization error"), "stderr={}", stderr(&out));
    assert!(!dir.path().join("bad.svg").exists());
}

#[test]
fn render_png_output() {
    let dir = tempfile::tempdir().unwrap();
    write_archive(dir.path(), "cat1", &full_grid_rows());
    let cfg = dir.path().join("scan.yaml");
    std::fs::write(&cfg, "quantities: [fom]\nviz:\n  output:\n    formats: [svg]\n").unwrap();
    let out = run(&[
        "scan",
        "--config",
        cfg.to_str().unwrap(),
        "--plot-dir",
        dir.path().to_str().unwrap(),
        "--category",
        "cat1",
        "--show",
    ]);
    assert!(out.status.success(), "scan should succeed, stderr={}", stderr(&out));

    let png = dir.path().join("fom.png");
    let out = run(&[
        "render",
        "--input",
        dir.path().join("fom_cat1_abcd_mass115-160_map.json").to_str().unwrap(),
        "--output",
        png.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "render should succeed, stderr={}", stderr(&out));
    let bytes = std::fs::read(&png).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[test]
fn version_prints_tool_name() {
    let out = run(&["version"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("hhscan "), "stdout={stdout}");
}
