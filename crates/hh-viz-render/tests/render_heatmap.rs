use hh_core::CutBounds;
use hh_scan::{
    AggregateOptions, FomRecords, HeatmapArtifact, MissingRecordPolicy, Quantity, ScanAxes,
    aggregate, select_optimum,
};
use hh_viz_render::config::{VizConfig, resolve_config};
use hh_viz_render::{RenderError, render_svg, render_svg_json, save_heatmap};

fn fom_artifact() -> HeatmapArtifact {
    let records = FomRecords::new(
        vec![1.2, 0.9, 1.5],
        vec![1.0, 1.0, 1.0],
        vec![5.0, 5.0, 5.0],
        vec![1.0, 1.0, 1.0],
        vec![20.0, 20.0, 20.0],
        vec![0.7, 0.7, 0.8],
        vec![0.7, 0.75, 0.7],
    )
    .unwrap();
    let axes = ScanAxes::build(&records, CutBounds::unbounded(), CutBounds::unbounded()).unwrap();
    let opts = AggregateOptions { missing: MissingRecordPolicy::Empty, ..Default::default() };
    let grids = aggregate(&records, axes, &opts).unwrap();
    let selection = select_optimum(&grids).unwrap();
    HeatmapArtifact::from_grids(&grids, Quantity::Fom, "cat1", &selection.cells).unwrap()
}

#[test]
fn svg_carries_annotations_labels_and_header() {
    let art = fom_artifact();
    let svg = render_svg(&art, &VizConfig::default()).unwrap();
    assert!(svg.starts_with("<svg"));
    let needles =
        [">1.2</text>", ">0.9</text>", ">1.5</text>", ">BDT Cut</text>", ">Xbb Cut</text>"];
    for needle in needles {
        assert!(svg.contains(needle), "missing {needle}");
    }
    assert!(svg.contains(">CMS</text>"));
    assert!(svg.contains(">0.75</text>"));
}

#[test]
fn minimal_theme_drops_experiment_header() {
    let art = fom_artifact();
    let cfg = resolve_config(Some("theme: minimal\n")).unwrap();
    let svg = render_svg(&art, &cfg).unwrap();
    assert!(!svg.contains(">CMS</text>"));
}

#[test]
fn disabling_annotations_removes_cell_text() {
    let art = fom_artifact();
    let cfg = resolve_config(Some("heatmap:\n  annotate: false\n")).unwrap();
    let svg = render_svg(&art, &cfg).unwrap();
    assert!(!svg.contains(">0.9</text>"));
    assert!(svg.contains(">BDT Cut</text>"));
}

#[test]
fn artifact_json_roundtrip_renders() {
    let art = fom_artifact();
    let json = serde_json::to_string(&art).unwrap();
    let svg = render_svg_json(&json, "fom_heatmap", &VizConfig::default()).unwrap();
    assert!(svg.contains(">0.9</text>"));

    let err = render_svg_json(&json, "pulls", &VizConfig::default()).unwrap_err();
    assert!(matches!(err, RenderError::UnknownKind(_)));
}

#[test]
fn inconsistent_artifact_is_rejected() {
    let mut art = fom_artifact();
    art.z.pop();
    let err = render_svg(&art, &VizConfig::default()).unwrap_err();
    assert!(matches!(err, RenderError::Artifact(_)));
}

#[test]
fn save_svg_only_writes_requested_format() {
    let dir = tempfile::tempdir().unwrap();
    let art = fom_artifact();
    let cfg = resolve_config(Some("output:\n  formats: [svg]\n")).unwrap();
    let written = save_heatmap(&art, dir.path(), "fom_cat1", &cfg).unwrap();
    assert_eq!(written, vec![dir.path().join("fom_cat1.svg")]);
    let body = std::fs::read_to_string(&written[0]).unwrap();
    assert!(body.contains("</svg>"));
}

#[test]
fn save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let art = fom_artifact();
    let cfg = resolve_config(Some("output:\n  formats: [svg]\n")).unwrap();
    let err = save_heatmap(&art, &dir.path().join("nope"), "fom_cat1", &cfg).unwrap_err();
    assert!(matches!(err, RenderError::Io(_)));
}

#[cfg(all(feature = "png", feature = "pdf"))]
#[test]
fn save_writes_png_and_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let art = fom_artifact();
    let cfg = resolve_config(Some("output:\n  dpi: 72\n")).unwrap();
    let written = save_heatmap(&art, dir.path(), "fom_cat1", &cfg).unwrap();
    assert_eq!(written.len(), 2);

    let png = std::fs::read(dir.path().join("fom_cat1.png")).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    let pdf = std::fs::read(dir.path().join("fom_cat1.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF"));
}
