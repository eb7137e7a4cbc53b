use super::*;
use std::fs;
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::input::coords::{parse_coordinates_json, parse_coordinates_tsv, resolve_axes};
use crate::input::samples::{parse_samples_json, parse_samples_tsv};
use crate::model::sample::AttrValue;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("roger_series_input_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn v(s: &str) -> AttrValue {
    AttrValue::Value(s.to_string())
}

#[test]
fn test_detect_format() {
    assert_eq!(detect_format(Path::new("a/samples.tsv")).unwrap(), TableFormat::Tsv);
    assert_eq!(detect_format(Path::new("pca.TXT.gz")).unwrap(), TableFormat::Tsv);
    assert_eq!(detect_format(Path::new("pca.json.gz")).unwrap(), TableFormat::Json);
    assert!(matches!(
        detect_format(Path::new("pca.csv")),
        Err(InputError::InvalidInput(_))
    ));
}

#[test]
fn test_samples_tsv_detects_id_column_and_missing_cells() {
    let data = "group\tSample\tbatch\nA\tS1\t1\nB\tS2\t\n\nA\tS3\n";
    let table = parse_samples_tsv(Cursor::new(data), None).unwrap();
    assert_eq!(table.id_column, "Sample");
    assert_eq!(table.columns, vec!["group".to_string(), "batch".to_string()]);
    assert_eq!(table.len(), 3);
    assert_eq!(table.records[0].sample_id, "S1");
    assert_eq!(table.records[0].attribute("group"), Some(&v("A")));
    assert_eq!(table.records[1].attribute("batch"), Some(&AttrValue::Missing));
    assert_eq!(table.records[2].attribute("batch"), Some(&AttrValue::Missing));
}

#[test]
fn test_samples_tsv_explicit_id_and_duplicates() {
    let data = "name\tgroup\nS1\tA\nS1\tB\n\tC\nS2\tB\n";
    let table = parse_samples_tsv(Cursor::new(data), Some("name")).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[0].attribute("group"), Some(&v("A")));
    assert_eq!(table.records[1].sample_id, "S2");

    let err = parse_samples_tsv(Cursor::new(data), Some("donor")).unwrap_err();
    assert!(matches!(err, InputError::InvalidInput(_)));
}

#[test]
fn test_samples_tsv_empty_is_error() {
    let err = parse_samples_tsv(Cursor::new(""), None).unwrap_err();
    assert!(matches!(err, InputError::Parse(_)));
}

#[test]
fn test_samples_json_absent_vs_null() {
    let data = r#"[
        {"sampleId": "S1", "group": "A", "dose": 10},
        {"sampleId": "S2", "group": null},
        {"sampleId": "S3", "group": "A", "treated": true}
    ]"#;
    let table = parse_samples_json(Cursor::new(data), None).unwrap();
    assert_eq!(table.id_column, "sampleId");
    assert_eq!(table.len(), 3);
    assert_eq!(table.records[0].attribute("dose"), Some(&v("10")));
    assert_eq!(table.records[1].attribute("group"), Some(&AttrValue::Missing));
    assert_eq!(table.records[1].attribute("dose"), None);
    assert_eq!(table.records[2].attribute("treated"), Some(&v("true")));
    assert!(table.columns.contains(&"treated".to_string()));
}

#[test]
fn test_samples_json_requires_array() {
    let err = parse_samples_json(Cursor::new(r#"{"S1": {}}"#), None).unwrap_err();
    assert!(matches!(err, InputError::Parse(_)));
    let err = parse_samples_json(Cursor::new("[1, 2"), None).unwrap_err();
    assert!(matches!(err, InputError::Json(_)));
}

#[test]
fn test_samples_json_explicit_id_column() {
    let data = r#"[{"name": "S1", "group": "A"}, {"name": "S2", "group": "B"}]"#;
    let table = parse_samples_json(Cursor::new(data), Some("name")).unwrap();
    assert_eq!(table.id_column, "name");
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[1].sample_id, "S2");
    assert_eq!(table.columns, vec!["group".to_string()]);

    let err = parse_samples_json(Cursor::new(data), Some("nmae")).unwrap_err();
    assert!(matches!(err, InputError::InvalidInput(_)));
    assert!(err.to_string().contains("nmae"));
}

#[test]
fn test_samples_json_id_key_found_past_first_entry() {
    let data = r#"[
        {"group": "A"},
        {"sample": "S2", "group": "B"},
        {"sample": "S3", "group": "A"}
    ]"#;
    let table = parse_samples_json(Cursor::new(data), None).unwrap();
    assert_eq!(table.id_column, "sample");
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[0].sample_id, "S2");

    let err = parse_samples_json(Cursor::new(r#"[{"group": "A"}]"#), None).unwrap_err();
    assert!(matches!(err, InputError::InvalidInput(_)));
}

#[test]
fn test_resolve_axes_preferences() {
    let comps = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let axes = resolve_axes(&comps(&["PC3", "PC1", "PC2"]), None, None).unwrap();
    assert_eq!(axes, AxisSelection::new("PC1", "PC2"));
    let axes = resolve_axes(&comps(&["PC1", "x", "y"]), None, None).unwrap();
    assert_eq!(axes, AxisSelection::new("x", "y"));
    let axes = resolve_axes(&comps(&["dim_a", "dim_b"]), None, None).unwrap();
    assert_eq!(axes, AxisSelection::new("dim_a", "dim_b"));
    let axes = resolve_axes(&comps(&["PC1", "PC2", "PC3"]), None, Some("pc3")).unwrap();
    assert_eq!(axes, AxisSelection::new("PC1", "PC3"));
    assert!(resolve_axes(&comps(&["PC1"]), None, None).is_err());
    assert!(resolve_axes(&comps(&["PC1", "PC2"]), Some("PC9"), None).is_err());
}

#[test]
fn test_coordinates_tsv_with_labels() {
    let data = "sample\tPC1\tPC2\tPC3\tlabel\nS1\t1.5\t-2\t0\tctrl-1\nS2\t3\t4\t0\t\nS2\t5\t6\t0\tdup\n";
    let set = parse_coordinates_tsv(Cursor::new(data), None, None).unwrap();
    assert_eq!(set.axes, AxisSelection::new("PC1", "PC2"));
    assert_eq!(set.points.len(), 3);
    assert_eq!(set.points[0], CoordinatePoint::new("S1", 1.5, -2.0).with_label("ctrl-1"));
    assert_eq!(set.points[1].label, "S2");
    assert_eq!(set.points[2].sample_id, "S2");
}

#[test]
fn test_coordinates_tsv_bad_number_names_line() {
    let data = "sample\tPC1\tPC2\nS1\t1\t2\nS2\tNA-ish\t2\n";
    let err = parse_coordinates_tsv(Cursor::new(data), None, None).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("PC1"));
    assert!(msg.contains("line 3"));
}

#[test]
fn test_coordinates_tsv_rejects_non_finite() {
    for bad in ["NaN", "inf", "-inf"] {
        let data = format!("sample\tPC1\tPC2\nS1\t1\t2\nS2\t3\t{bad}\n");
        let err = parse_coordinates_tsv(Cursor::new(data), None, None).unwrap_err();
        assert!(matches!(err, InputError::Parse(_)));
        let msg = err.to_string();
        assert!(msg.contains("PC2"));
        assert!(msg.contains("line 3"));
    }
}

#[test]
fn test_coordinates_json() {
    let data = r#"[
        {"sampleId": "S1", "x": 1, "y": 2, "label": "first"},
        {"sampleId": "S2", "x": 3.5, "y": -1}
    ]"#;
    let set = parse_coordinates_json(Cursor::new(data), None, None).unwrap();
    assert_eq!(set.axes, AxisSelection::new("x", "y"));
    assert_eq!(set.points[0], CoordinatePoint::new("S1", 1.0, 2.0).with_label("first"));
    assert_eq!(set.points[1], CoordinatePoint::new("S2", 3.5, -1.0));
}

#[test]
fn test_coordinates_json_missing_component() {
    let data = r#"[{"id": "S1", "PC1": 1, "PC2": 2}, {"id": "S2", "PC1": 1}]"#;
    let err = parse_coordinates_json(Cursor::new(data), None, None).unwrap_err();
    assert!(matches!(err, InputError::Parse(_)));
}

#[test]
fn test_load_gz_and_plain_files() {
    let dir = make_temp_dir();
    let samples_path = dir.join("samples.tsv.gz");
    let mut enc = GzEncoder::new(fs::File::create(&samples_path).unwrap(), Compression::default());
    enc.write_all(b"sample\tgroup\nS1\tA\nS2\tB\n").unwrap();
    enc.finish().unwrap();
    let coords_path = dir.join("pca.tsv");
    fs::write(&coords_path, "sample\tPC1\tPC2\nS1\t1\t1\nS2\t2\t2\n").unwrap();

    let samples = SampleFile {
        path: samples_path,
        id_column: None,
    };
    let coords = CoordinateFile {
        path: coords_path,
        x: None,
        y: None,
    };
    let bundle = load_inputs(&samples, &coords).unwrap();
    assert_eq!(bundle.samples.len(), 2);
    assert_eq!(bundle.samples.records[1].attribute("group"), Some(&v("B")));
    assert_eq!(bundle.coordinates.points.len(), 2);
}

#[test]
fn test_missing_file_is_missing_input() {
    let dir = make_temp_dir();
    let err = load_inputs(
        &SampleFile {
            path: dir.join("nope.tsv"),
            id_column: None,
        },
        &CoordinateFile {
            path: dir.join("nope.json"),
            x: None,
            y: None,
        },
    )
    .unwrap_err();
    match err {
        InputError::MissingInput(path) => assert!(path.ends_with("nope.tsv")),
        other => panic!("unexpected error: {other}"),
    }
}

struct FixedSamples(Result<SampleTable, String>);

impl SampleSource for FixedSamples {
    fn load_samples(&self) -> Result<SampleTable, InputError> {
        self.0.clone().map_err(InputError::InvalidInput)
    }
}

struct FixedCoordinates(Result<Vec<CoordinatePoint>, String>);

impl CoordinateSource for FixedCoordinates {
    fn load_coordinates(&self) -> Result<CoordinateSet, InputError> {
        self.0
            .clone()
            .map(|points| CoordinateSet {
                axes: AxisSelection::new("PC1", "PC2"),
                points,
            })
            .map_err(InputError::InvalidInput)
    }
}

#[test]
fn test_join_barrier_surfaces_either_failure() {
    let ok_samples = FixedSamples(Ok(SampleTable::default()));
    let ok_coords = FixedCoordinates(Ok(vec![CoordinatePoint::new("S1", 0.0, 0.0)]));
    let bundle = load_inputs(&ok_samples, &ok_coords).unwrap();
    assert!(bundle.samples.is_empty());
    assert_eq!(bundle.coordinates.points.len(), 1);

    let bad_coords = FixedCoordinates(Err("coordinates unavailable".to_string()));
    let err = load_inputs(&ok_samples, &bad_coords).unwrap_err();
    assert!(err.to_string().contains("coordinates unavailable"));

    let bad_samples = FixedSamples(Err("samples unavailable".to_string()));
    let err = load_inputs(&bad_samples, &bad_coords).unwrap_err();
    assert!(err.to_string().contains("samples unavailable"));
}
