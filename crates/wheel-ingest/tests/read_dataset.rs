use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use wheel_ingest::{ParseError, read_dataset};

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn parses_headers_and_rows() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(
        &dir,
        "plan.csv",
        "Activity,Start,End,Category\nSpring launch,2026-03-01,2026-03-14,Marketing\n",
    );

    let dataset = read_dataset(&path).expect("parse csv");
    assert_eq!(
        dataset.headers,
        vec!["Activity", "Start", "End", "Category"]
    );
    assert_eq!(dataset.row_count(), 1);
    assert_eq!(dataset.rows[0][0], "Spring launch");
    assert_eq!(dataset.source_name, "plan.csv");
}

#[test]
fn drops_fully_empty_rows() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(
        &dir,
        "gaps.csv",
        "Name,Date\n,,\nKickoff,2026-01-10\n , \nRetro,2026-06-01\n",
    );

    let dataset = read_dataset(&path).expect("parse csv");
    assert_eq!(dataset.row_count(), 2);
    assert_eq!(dataset.rows[0][0], "Kickoff");
    assert_eq!(dataset.rows[1][0], "Retro");
}

#[test]
fn pads_short_rows_to_header_width() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(&dir, "short.csv", "A,B,C\nonly-one\n");

    let dataset = read_dataset(&path).expect("parse csv");
    assert_eq!(dataset.rows[0], vec!["only-one", "", ""]);
}

#[test]
fn rejects_header_only_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(&dir, "empty.csv", "Activity,Start,End\n");

    match read_dataset(&path) {
        Err(ParseError::TooFewRows { found }) => assert_eq!(found, 1),
        other => panic!("expected TooFewRows, got {other:?}"),
    }
}

#[test]
fn rejects_unknown_extension() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(&dir, "plan.txt", "A,B\n1,2\n");

    assert!(matches!(
        read_dataset(&path),
        Err(ParseError::UnsupportedFormat(ext)) if ext == "txt"
    ));
}

#[test]
fn strips_bom_and_whitespace() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_csv(&dir, "bom.csv", "\u{feff}Name , Date \n Kickoff , 2026-01-10 \n");

    let dataset = read_dataset(&path).expect("parse csv");
    assert_eq!(dataset.headers, vec!["Name", "Date"]);
    assert_eq!(dataset.rows[0], vec!["Kickoff", "2026-01-10"]);
}
