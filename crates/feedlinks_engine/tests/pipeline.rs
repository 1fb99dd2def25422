use std::fs;
use std::path::Path;

use feedlinks_core::{FeedCollection, JsonStyle};
use feedlinks_engine::{
    run_extraction, run_extraction_with, FeedExtractor, RunError, RunSettings, TextEncoding,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

const FIXTURE_INPUT: &str = include_str!("fixtures/input.html");
const FIXTURE_EXPECTED: &str = include_str!("fixtures/expected.json");

fn workspace_with(input: &[u8]) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("input.html"), input).unwrap();
    temp
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn fixture_produces_expected_json() {
    let temp = workspace_with(FIXTURE_INPUT.as_bytes());
    let summary = run_extraction(&RunSettings::in_dir(temp.path())).unwrap();

    let expected: Value = serde_json::from_str(FIXTURE_EXPECTED).unwrap();
    assert_eq!(read_json(&summary.output_path), expected);
    assert_eq!(summary.output_path, temp.path().join("output.json"));
    assert_eq!(summary.encoding, TextEncoding::Utf8);
    assert_eq!((summary.rss_count, summary.atom_count), (3, 2));
    assert!(!summary.lossy);
}

#[test]
fn default_run_writes_compact_ascii() {
    let temp = workspace_with(FIXTURE_INPUT.as_bytes());
    let summary = run_extraction(&RunSettings::in_dir(temp.path())).unwrap();
    let text = fs::read_to_string(summary.output_path).unwrap();
    assert!(!text.contains(' '));
    assert!(text.is_ascii());
    assert!(!text.ends_with('\n'));
}

#[test]
fn indented_run_matches_compact_run() {
    let temp = workspace_with(FIXTURE_INPUT.as_bytes());
    let compact = run_extraction(&RunSettings::in_dir(temp.path())).unwrap();
    let compact_value = read_json(&compact.output_path);

    let settings = RunSettings::in_dir(temp.path()).with_style(JsonStyle::Indented);
    let indented = run_extraction(&settings).unwrap();
    let text = fs::read_to_string(&indented.output_path).unwrap();
    assert!(text.starts_with("{\n    \"rss\": [\n        \""));
    assert_eq!(read_json(&indented.output_path), compact_value);
}

#[test]
fn custom_file_names_are_honoured() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("page.htm"),
        r#"<link href="a" type="application/atom+xml">"#,
    )
    .unwrap();
    let settings = RunSettings {
        input_filename: "page.htm".into(),
        output_filename: "feeds.json".into(),
        ..RunSettings::in_dir(temp.path())
    };
    run_extraction(&settings).unwrap();
    assert_eq!(
        fs::read_to_string(temp.path().join("feeds.json")).unwrap(),
        r#"{"rss":[],"atom":["a"]}"#
    );
}

#[test]
fn missing_input_is_fatal_and_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let err = run_extraction(&RunSettings::in_dir(temp.path())).unwrap_err();
    assert!(matches!(err, RunError::ReadInput { .. }), "got {err:?}");
    assert!(!temp.path().join("output.json").exists());
}

#[test]
fn lossy_input_still_produces_output() {
    let temp = workspace_with(b"<link href=\"r\" type=\"application/rss+xml\">\x81");
    let summary = run_extraction(&RunSettings::in_dir(temp.path())).unwrap();
    assert!(summary.lossy);
    assert_eq!(summary.rss_count, 1);
}

struct FixedExtractor;

impl FeedExtractor for FixedExtractor {
    fn extract(&self, _html: &str) -> FeedCollection {
        let mut feeds = FeedCollection::new();
        feeds.add_rss("fixed");
        feeds
    }
}

#[test]
fn pipeline_accepts_other_extractors() {
    let temp = workspace_with(b"<html></html>");
    let summary =
        run_extraction_with(&RunSettings::in_dir(temp.path()), &FixedExtractor).unwrap();
    assert_eq!(
        fs::read_to_string(summary.output_path).unwrap(),
        r#"{"rss":["fixed"],"atom":[]}"#
    );
}
