//! End-to-end tests for the compare, group, columns and cache commands.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use colcmp_cli::cache::CacheStore;
use colcmp_cli::cli::{Cli, Command};
use colcmp_cli::commands::{run_cache, run_columns, run_compare, run_group};
use colcmp_cli::types::CacheOutcome;
use colcmp_model::{ColumnType, Value};

fn temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn parse(args: &[&str]) -> Command {
    let mut argv = vec!["colcmp"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("parse args").command
}

fn path_arg(path: &std::path::Path) -> &str {
    path.to_str().expect("utf8 path")
}

#[test]
fn compare_writes_buckets_and_report() {
    let dir = TempDir::new().expect("tempdir");
    let left = temp_file(&dir, "a.csv", "id,name\n1,x\n2,y\n");
    let right = temp_file(&dir, "b.csv", "id,name\n2,y2\n3,z\n");
    let out = dir.path().join("out");

    let Command::Compare(args) = parse(&[
        "compare",
        path_arg(&left),
        path_arg(&right),
        "--left-keys",
        "id",
        "--right-keys",
        "id",
        "--merge",
        "--format",
        "csv",
        "--output-dir",
        path_arg(&out),
    ]) else {
        panic!("expected compare command");
    };
    let cache = CacheStore::new(dir.path().join("cache"));
    let result = run_compare(&args, &cache).expect("compare");

    assert_eq!(result.reconciliation.match_keys, vec!["2"]);
    assert_eq!(result.reconciliation.only_left_keys, vec!["1"]);
    assert_eq!(result.reconciliation.only_right_keys, vec!["3"]);
    for name in [
        "matched_left.csv",
        "matched_right.csv",
        "only_left.csv",
        "only_right.csv",
        "merged.csv",
        "summary.json",
    ] {
        assert!(out.join(name).is_file(), "missing {name}");
    }
    assert_eq!(
        fs::read_to_string(out.join("merged.csv")).expect("read merged"),
        "Key,F1_id,F1_name,F2_id,F2_name\n2,2,y,2,y2\n"
    );

    insta::assert_json_snapshot!(result.report, @r#"
    {
      "left": "a.csv",
      "right": "b.csv",
      "left_keys": [
        "id"
      ],
      "right_keys": [
        "id"
      ],
      "summary": {
        "left_rows": 2,
        "right_rows": 2,
        "matched_keys": 1,
        "only_left_keys": 1,
        "only_right_keys": 1,
        "matched_left_rows": 1,
        "matched_right_rows": 1,
        "only_left_rows": 1,
        "only_right_rows": 1
      },
      "merged": {
        "rows": 1,
        "rows_with_differences": 1,
        "differences": [
          {
            "column": "id",
            "rows": 0
          },
          {
            "column": "name",
            "rows": 1
          }
        ]
      }
    }
    "#);
}

#[test]
fn compare_with_mismatched_keys_writes_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let left = temp_file(&dir, "a.csv", "id,name\n1,x\n");
    let right = temp_file(&dir, "b.csv", "id,name\n1,x\n");
    let out = dir.path().join("out");

    let Command::Compare(args) = parse(&[
        "compare",
        path_arg(&left),
        path_arg(&right),
        "--left-keys",
        "id,name",
        "--right-keys",
        "id",
        "--output-dir",
        path_arg(&out),
    ]) else {
        panic!("expected compare command");
    };
    let cache = CacheStore::new(dir.path().join("cache"));
    let err = run_compare(&args, &cache).unwrap_err();

    assert!(format!("{err:#}").contains("key column count mismatch"));
    assert!(!out.exists());
}

/// Two single-row tables whose merged view is wider than one worksheet while
/// each input still fits.
fn wide_pair(dir: &TempDir) -> (PathBuf, PathBuf) {
    let header: Vec<String> = (0..8_200).map(|idx| format!("c{idx}")).collect();
    let row: Vec<String> = (0..8_200).map(|idx| idx.to_string()).collect();
    let contents = format!("{}\n{}\n", header.join(","), row.join(","));
    (
        temp_file(dir, "wide_a.csv", &contents),
        temp_file(dir, "wide_b.csv", &contents),
    )
}

fn entries(path: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path)
        .expect("read dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn oversized_merged_view_writes_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let (left, right) = wide_pair(&dir);
    let out = dir.path().join("out");

    let Command::Compare(args) = parse(&[
        "compare",
        path_arg(&left),
        path_arg(&right),
        "--left-keys",
        "c0",
        "--right-keys",
        "c0",
        "--merge",
        "--format",
        "both",
        "--output-dir",
        path_arg(&out),
    ]) else {
        panic!("expected compare command");
    };
    let cache = CacheStore::new(dir.path().join("cache"));
    let err = run_compare(&args, &cache).unwrap_err();

    assert!(format!("{err:#}").contains("exceeds the worksheet size limit"));
    assert!(!out.exists());
    assert!(!cache.runs_dir().exists());
}

#[test]
fn oversized_merged_view_leaves_no_run_dir() {
    let dir = TempDir::new().expect("tempdir");
    let (left, right) = wide_pair(&dir);

    let Command::Compare(args) = parse(&[
        "compare",
        path_arg(&left),
        path_arg(&right),
        "--left-keys",
        "c0",
        "--right-keys",
        "c0",
        "--merge",
    ]) else {
        panic!("expected compare command");
    };
    let cache = CacheStore::new(dir.path().join("cache"));
    run_compare(&args, &cache).unwrap_err();

    assert!(!cache.root().exists());
}

#[test]
fn failed_merged_write_removes_bucket_files() {
    let dir = TempDir::new().expect("tempdir");
    let left = temp_file(&dir, "a.csv", "id,name\n1,x\n");
    let right = temp_file(&dir, "b.csv", "id,name\n1,y\n");
    let out = dir.path().join("out");
    // A directory where merged.csv should go makes the final move fail.
    fs::create_dir_all(out.join("merged.csv")).expect("create blocker");

    let Command::Compare(args) = parse(&[
        "compare",
        path_arg(&left),
        path_arg(&right),
        "--left-keys",
        "id",
        "--right-keys",
        "id",
        "--merge",
        "--format",
        "csv",
        "--output-dir",
        path_arg(&out),
    ]) else {
        panic!("expected compare command");
    };
    let cache = CacheStore::new(dir.path().join("cache"));
    run_compare(&args, &cache).unwrap_err();

    assert_eq!(entries(&out), vec!["merged.csv".to_string()]);
}

#[test]
fn compare_without_output_dir_uses_cache_run_dir() {
    let dir = TempDir::new().expect("tempdir");
    let left = temp_file(&dir, "a.csv", "id\n1\n");
    let right = temp_file(&dir, "b.csv", "id\n1\n");

    let Command::Compare(args) = parse(&[
        "compare",
        path_arg(&left),
        path_arg(&right),
        "--left-keys",
        "id",
        "--right-keys",
        "id",
    ]) else {
        panic!("expected compare command");
    };
    let cache = CacheStore::new(dir.path().join("cache"));
    let result = run_compare(&args, &cache).expect("compare");

    let output_dir = result.output_dir.expect("output dir");
    assert!(output_dir.starts_with(cache.runs_dir()));
    assert!(output_dir.join("matched_left.xlsx").is_file());
    assert!(cache.size().expect("size") > 0);
}

#[test]
fn group_merges_distinct_values() {
    let dir = TempDir::new().expect("tempdir");
    let input = temp_file(&dir, "tags.csv", "dept,tag,owner\nEng,a,kim\nEng,b,lee\nEng,a,kim\n");

    let Command::Group(args) = parse(&[
        "group",
        path_arg(&input),
        "--group-by",
        "dept",
        "--merge",
        "tag",
        "--delete",
        "owner",
        "--dry-run",
    ]) else {
        panic!("expected group command");
    };
    let cache = CacheStore::new(dir.path().join("cache"));
    let result = run_group(&args, &cache).expect("group");

    assert_eq!(result.input_rows, 3);
    assert_eq!(result.grouped.columns(), &["dept", "tag"]);
    assert_eq!(
        result.grouped.rows(),
        &[vec![Value::text("Eng"), Value::text("a, b")]]
    );
    assert!(result.output_dir.is_none());
    assert!(result.files.is_empty());
}

#[test]
fn group_on_deleted_column_fails() {
    let dir = TempDir::new().expect("tempdir");
    let input = temp_file(&dir, "tags.csv", "dept,tag\nEng,a\n");

    let Command::Group(args) = parse(&[
        "group",
        path_arg(&input),
        "--group-by",
        "dept",
        "--delete",
        "dept",
        "--dry-run",
    ]) else {
        panic!("expected group command");
    };
    let cache = CacheStore::new(dir.path().join("cache"));
    let err = run_group(&args, &cache).unwrap_err();

    assert!(format!("{err:#}").contains("no column named 'dept'"));
}

#[test]
fn columns_reports_inferred_types() {
    let dir = TempDir::new().expect("tempdir");
    let input = temp_file(&dir, "mixed.csv", "id,name,blank\n1,x,\n2,y,\n");

    let Command::Columns(args) = parse(&["columns", path_arg(&input)]) else {
        panic!("expected columns command");
    };
    let result = run_columns(&args).expect("columns");

    assert_eq!(result.rows, 2);
    assert!(result.sheets.is_none());
    assert_eq!(
        result.columns,
        vec![
            ("id".to_string(), ColumnType::Number),
            ("name".to_string(), ColumnType::Text),
            ("blank".to_string(), ColumnType::Empty),
        ]
    );
}

#[test]
fn cache_clear_reports_freed_bytes() {
    let dir = TempDir::new().expect("tempdir");
    let cache = CacheStore::new(dir.path().join("cache"));
    let run = cache.run_dir("compare");
    fs::create_dir_all(&run).expect("create run dir");
    fs::write(run.join("x.csv"), "abcd").expect("write");

    let Command::Cache { action } = parse(&["cache", "clear"]) else {
        panic!("expected cache command");
    };
    match run_cache(action, &cache).expect("clear") {
        CacheOutcome::Cleared { freed, .. } => assert_eq!(freed, 4),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(cache.size().expect("size"), 0);
}
