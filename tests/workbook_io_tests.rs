use serde_json::{json, Value};

use bandplan::io::workbook_io::{self, BandSource, SourceError, Workbook};

fn fixture_path() -> std::path::PathBuf {
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.join("tests").join("data").join("bandplan.json")
}

fn header() -> Vec<Value> {
    ["master", "start", "end", "service", "remark", "content", "Item_No"]
        .iter()
        .map(|name| json!(name))
        .collect()
}

#[test]
fn test_load_workbook_fixture() {
    let workbook = workbook_io::load_workbook(&fixture_path()).unwrap();
    assert_eq!(
        workbook.band_names(),
        vec!["Empty", "Single", "Sparse", "VHF"]
    );

    let rows = workbook.fetch_rows("VHF").unwrap();
    assert_eq!(rows.len(), 11);
    assert_eq!(rows[0].master, json!(1));
    assert_eq!(rows[0].start, 0.0);
    assert_eq!(rows[0].end, 10.0);
    assert_eq!(rows[0].service, "Service 1");
    assert_eq!(rows[0].content, "Allocation 1");
    assert_eq!(rows[0].item_no, Some(100));
    assert_eq!(rows[0].truncated, None);
    assert!(!rows[0].vertical);
    assert_eq!(rows[0].hex.as_deref(), Some("#88ccee"));
    assert_eq!(rows[1].truncated.as_deref(), Some("RA"));
    assert!(rows[1].vertical);
    assert_eq!(rows[2].remark, "secondary");
}

#[test]
fn test_header_only_sheet_is_empty_source() {
    let workbook = workbook_io::load_workbook(&fixture_path()).unwrap();
    let err = workbook.fetch_rows("Empty").unwrap_err();
    assert!(matches!(err, SourceError::EmptySource));
}

#[test]
fn test_missing_band_is_empty_source() {
    let workbook = workbook_io::load_workbook(&fixture_path()).unwrap();
    let err = workbook.fetch_rows("UHF").unwrap_err();
    assert!(matches!(err, SourceError::EmptySource));
}

#[test]
fn test_header_plus_one_row_is_empty_source() {
    let workbook = workbook_io::load_workbook(&fixture_path()).unwrap();
    let err = workbook.fetch_rows("Single").unwrap_err();
    assert!(matches!(err, SourceError::EmptySource));
}

#[test]
fn test_header_plus_two_rows_decodes() {
    let sheet = vec![
        header(),
        vec![json!(1), json!(0), json!(30), json!("Amateur")],
        vec![json!(2), json!(30), json!(60), json!("Fixed")],
    ];
    let rows = workbook_io::decode_sheet(&sheet).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].service, "Fixed");
}

#[test]
fn test_decode_sheet_short_rows_and_extra_columns() {
    let mut head = header();
    head.push(json!("notes"));
    let sheet = vec![
        head,
        vec![json!(2), json!("15"), json!("x")],
        vec![json!(3)],
    ];

    let rows = workbook_io::decode_sheet(&sheet).unwrap();
    assert_eq!(rows[0].master, json!(2));
    assert_eq!(rows[0].start, 15.0);
    assert_eq!(rows[0].end, 0.0);
    assert_eq!(rows[0].service, "");
    assert_eq!(rows[0].item_no, None);
    assert!(rows[0].extra.is_empty());

    let sheet = vec![
        vec![json!("master"), json!("notes")],
        vec![json!(1), json!("kept")],
        vec![json!(2)],
    ];
    let rows = workbook_io::decode_sheet(&sheet).unwrap();
    assert_eq!(rows[0].extra.get("notes"), Some(&json!("kept")));
}

#[test]
fn test_decode_sheet_item_number_forms() {
    let sheet = vec![
        vec![json!("master"), json!("Item_No")],
        vec![json!(1), json!(7.0)],
        vec![json!(1), json!("8")],
        vec![json!(1), json!(7.5)],
    ];
    let rows = workbook_io::decode_sheet(&sheet).unwrap();
    assert_eq!(rows[0].item_no, Some(7));
    assert_eq!(rows[1].item_no, Some(8));
    assert_eq!(rows[2].item_no, None);
}

#[test]
fn test_decode_sheet_empty() {
    assert!(matches!(
        workbook_io::decode_sheet(&[]),
        Err(SourceError::EmptySource)
    ));
    assert!(matches!(
        workbook_io::decode_sheet(&[header()]),
        Err(SourceError::EmptySource)
    ));
    assert!(matches!(
        workbook_io::decode_sheet(&[header(), vec![json!(1), json!(0), json!(3)]]),
        Err(SourceError::EmptySource)
    ));
}

#[test]
fn test_parse_workbook_not_object() {
    let err = workbook_io::parse_workbook("[1, 2]").unwrap_err();
    assert!(matches!(err, SourceError::NotAWorkbook));
}

#[test]
fn test_parse_workbook_malformed_sheet() {
    let err = workbook_io::parse_workbook(r#"{"VHF": {"a": 1}}"#).unwrap_err();
    assert!(matches!(err, SourceError::MalformedSheet { ref band, .. } if band == "VHF"));

    let err = workbook_io::parse_workbook(r#"{"VHF": [["master"], 3]}"#).unwrap_err();
    match err {
        SourceError::MalformedSheet { band, reason } => {
            assert_eq!(band, "VHF");
            assert_eq!(reason, "entry 1 is not an array");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parse_workbook_invalid_json() {
    let err = workbook_io::parse_workbook("not json at all").unwrap_err();
    assert!(matches!(err, SourceError::Parse(_)));
}

#[test]
fn test_load_workbook_file_not_found() {
    let path = std::path::Path::new("/nonexistent/path/bands.json");
    let err = workbook_io::load_workbook(path).unwrap_err();
    assert!(matches!(err, SourceError::Io(_)));
}

#[test]
fn test_load_workbook_async_matches_sync() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let loaded = runtime
        .block_on(workbook_io::load_workbook_async(&fixture_path()))
        .unwrap();
    let expected = workbook_io::load_workbook(&fixture_path()).unwrap();
    assert_eq!(loaded, expected);
}

#[test]
fn test_workbook_from_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bands.json");
    std::fs::write(
        &path,
        r#"{"HF": [["master", "start", "end"], [1, 3, 30], [2, 30, 300]]}"#,
    )
    .unwrap();

    let workbook = workbook_io::load_workbook(&path).unwrap();
    let rows = workbook.fetch_rows("HF").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].end, 300.0);
}

#[test]
fn test_insert_sheet() {
    let mut workbook = Workbook::new();
    workbook.insert_sheet(
        "LF",
        vec![
            header(),
            vec![json!(1), json!(0), json!(3)],
            vec![json!(2), json!(3), json!(30)],
        ],
    );
    assert!(workbook.sheet("LF").is_some());
    assert_eq!(workbook.fetch_rows("LF").unwrap().len(), 2);
}
