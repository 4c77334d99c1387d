// integration tests for the filter and explain commands

use serde_json::json;

use crate::common::{listen, parse_lines, stderr, stdout, TestDir};

fn sample_listens() -> Vec<serde_json::Value> {
    vec![
        listen(100, "Radiohead", "Airbag", json!({ "skipped": 1, "duration_ms": 50000 })),
        listen(200, "Radiohead", "Lucky", json!({ "skipped": 0, "duration_ms": 40000 })),
        listen(300, "Portishead", "Roads", json!({ "skipped": 0, "duration_ms": 20000 })),
    ]
}

#[test]
fn test_filter_keeps_matching_listens() {
    let dir = TestDir::new();
    let input = dir.write_listens("listens.jsonl", &sample_listens());

    let output = dir.run(
        &[
            "filter",
            input.to_str().unwrap(),
            "-f",
            "skipped!=1&&duration_ms>=30e3",
        ],
        None,
    );

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let kept = parse_lines(&output.stdout);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0]["track_metadata"]["track_name"], "Lucky");
}

#[test]
fn test_filter_reads_stdin_and_applies_edits() {
    let dir = TestDir::new();
    let input: String = sample_listens()
        .iter()
        .map(|l| format!("{}\n", l))
        .collect();

    let output = dir.run(
        &[
            "filter",
            "--after",
            "100",
            "-e",
            "artist_name=Thom Yorke",
            "-e",
            "edited=yes",
        ],
        Some(&input),
    );

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let kept = parse_lines(&output.stdout);
    assert_eq!(kept.len(), 2);
    for listen in &kept {
        assert_eq!(listen["track_metadata"]["artist_name"], "Thom Yorke");
        assert_eq!(listen["track_metadata"]["additional_info"]["edited"], "yes");
    }
    assert_eq!(kept[0]["track_metadata"]["track_name"], "Lucky");
    assert_eq!(kept[0]["track_metadata"]["additional_info"]["duration_ms"], 40000);
}

#[test]
fn test_filter_count() {
    let dir = TestDir::new();
    let input = dir.write_listens("listens.jsonl", &sample_listens());

    let output = dir.run(
        &["filter", input.to_str().unwrap(), "-f", "artist_name==Radiohead", "--count"],
        None,
    );

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "2/3");
}

#[test]
fn test_filter_with_exclude_file() {
    let dir = TestDir::new();
    let input = dir.write_listens("listens.jsonl", &sample_listens());
    let exclude = dir.write("exclude.json", r#"{ "track_name": ["Airbag", "Roads"] }"#);
    let out_path = dir.path().join("out.jsonl");

    let output = dir.run(
        &[
            "filter",
            input.to_str().unwrap(),
            "--exclude",
            exclude.to_str().unwrap(),
            "-o",
            out_path.to_str().unwrap(),
        ],
        None,
    );

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(output.stdout.is_empty());

    let written = std::fs::read(&out_path).unwrap();
    let kept = parse_lines(&written);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0]["track_metadata"]["track_name"], "Lucky");
}

#[test]
fn test_invalid_list_file_fails_before_output() {
    let dir = TestDir::new();
    let input = dir.write_listens("listens.jsonl", &sample_listens());
    let include = dir.write("include.json", r#"{ "artist_name": "Foo" }"#);

    let output = dir.run(
        &[
            "filter",
            input.to_str().unwrap(),
            "--include",
            include.to_str().unwrap(),
        ],
        None,
    );

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let err = stderr(&output);
    assert!(err.contains("artist_name"), "stderr={}", err);
    assert!(err.contains("include.json"), "stderr={}", err);
}

#[test]
fn test_invalid_clause_exits_with_expression_error() {
    let dir = TestDir::new();
    let output = dir.run(&["filter", "-f", "duration_ms=>30000"], Some(""));

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("duration_ms=>30000"));
}

#[test]
fn test_invalid_time_bound_exits_with_expression_error() {
    let dir = TestDir::new();
    let output = dir.run(&["filter", "--before", "next tuesday"], Some(""));

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("next tuesday"));
}

#[test]
fn test_malformed_input_line_is_reported() {
    let dir = TestDir::new();
    let output = dir.run(&["filter"], Some("{\"listened_at\": 1}\n"));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("line 1"));
}

#[test]
fn test_multi_valued_attribute_logs_warning() {
    let dir = TestDir::new();
    let input = listen(10, "A", "T", json!({ "artist_names": ["A", "B"] })).to_string();

    let output = dir.run(&["filter", "-f", "artist_names==C"], Some(&input));

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(parse_lines(&output.stdout).len(), 1);
    assert!(stderr(&output).contains("artist_names"));
    assert!(stderr(&output).contains("multiple values"));
}

#[test]
fn test_explain_json() {
    let dir = TestDir::new();
    let output = dir.run(
        &[
            "explain",
            "--json",
            "-f",
            "duration_ms>=30000&&skipped!=1",
            "--before",
            "1970-01-02",
            "-e",
            "artist_name=X",
        ],
        None,
    );

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(value["after"], serde_json::Value::Null);
    assert_eq!(value["before"], "1970-01-02T00:00:00+00:00");
    assert_eq!(
        value["conditions"],
        json!([
            { "key": "duration_ms", "operator": "ge", "operand": "30000" },
            { "key": "skipped", "operator": "ne", "operand": "1" },
        ])
    );
    assert_eq!(value["edits"], json!([{ "key": "artist_name", "value": "X" }]));
}

#[test]
fn test_explain_text() {
    let dir = TestDir::new();
    let output = dir.run(&["explain", "-f", "loved^"], None);

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "where   loved ^");
}
