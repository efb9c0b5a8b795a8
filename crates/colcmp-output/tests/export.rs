//! Integration tests for CSV and XLSX export.

use calamine::{Data, Reader, Xlsx, open_workbook};
use tempfile::TempDir;

use colcmp_core::{MergeOptions, MergedView, merge_side_by_side, reconcile};
use colcmp_model::{Table, Value};
use colcmp_output::{
    ExportError, ExportFormat, SHEET_NAME, check_export, export_merged, export_table, write_csv_to,
    write_xlsx,
};

fn table(name: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
    Table::new(
        name,
        columns.iter().map(|c| (*c).to_string()).collect(),
        rows,
    )
    .expect("build table")
}

fn merged_view() -> MergedView {
    let left = table(
        "a",
        &["id", "name"],
        vec![
            vec![Value::Int(1), "x".into()],
            vec![Value::Int(2), "y".into()],
        ],
    );
    let right = table(
        "b",
        &["id", "name"],
        vec![
            vec![Value::Float(2.0), "y2".into()],
            vec![Value::Int(3), "z".into()],
        ],
    );
    let recon = reconcile(&left, &["id"], &right, &["id"]).expect("reconcile");
    merge_side_by_side(&recon, &MergeOptions::default()).expect("merge")
}

fn read_sheet(path: &std::path::Path) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("open workbook");
    assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);
    let range = workbook.worksheet_range(SHEET_NAME).expect("sheet");
    range.rows().map(<[Data]>::to_vec).collect()
}

#[test]
fn merged_csv_snapshot() {
    let view = merged_view();
    let mut out = Vec::new();
    write_csv_to(view.table(), &mut out).expect("write csv");
    let text = String::from_utf8(out).expect("utf8");
    insta::assert_snapshot!(text, @r"
    Key,F1_id,F1_name,F2_id,F2_name
    2,2,y,2,y2
    ");
}

#[test]
fn export_both_writes_csv_and_xlsx() {
    let dir = TempDir::new().expect("tempdir");
    let t = table("t", &["id"], vec![vec![Value::Int(1)]]);

    let written = export_table(dir.path(), "only_left", &t, ExportFormat::Both).expect("export");

    assert_eq!(
        written,
        vec![
            dir.path().join("only_left.csv"),
            dir.path().join("only_left.xlsx")
        ]
    );
    assert!(written.iter().all(|p| p.is_file()));
}

#[test]
fn export_creates_missing_output_dir() {
    let dir = TempDir::new().expect("tempdir");
    let nested = dir.path().join("runs").join("one");
    let t = table("t", &["id"], vec![]);

    let written = export_table(&nested, "grouped", &t, ExportFormat::Csv).expect("export");

    assert_eq!(written.len(), 1);
    assert_eq!(
        std::fs::read_to_string(&written[0]).expect("read"),
        "id\n"
    );
}

#[test]
fn xlsx_keeps_cell_types() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("typed.xlsx");
    let t = table(
        "t",
        &["n", "flag", "label", "blank"],
        vec![
            vec![Value::Int(7), Value::Bool(true), "a".into(), Value::Empty],
            vec![Value::Float(1.5), Value::Bool(false), Value::Int(3), Value::Empty],
        ],
    );

    write_xlsx(&t, &path).expect("write xlsx");
    let rows = read_sheet(&path);

    assert_eq!(rows[0][0], Data::String("n".into()));
    assert_eq!(rows[1][0], Data::Float(7.0));
    assert_eq!(rows[1][1], Data::Bool(true));
    assert_eq!(rows[2][0], Data::Float(1.5));
    // Mixed column is written as text throughout.
    assert_eq!(rows[2][2], Data::String("3".into()));
    assert_eq!(rows[1][3], Data::Empty);
}

#[test]
fn highlighted_merged_workbook_has_merged_values() {
    let dir = TempDir::new().expect("tempdir");
    let view = merged_view();

    let written =
        export_merged(dir.path(), "merged", &view, ExportFormat::Xlsx, true).expect("export");
    let rows = read_sheet(&written[0]);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], Data::String("2".into()));
    assert_eq!(rows[1][2], Data::String("y".into()));
    assert_eq!(rows[1][4], Data::String("y2".into()));
}

#[test]
fn write_to_missing_directory_fails() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("no").join("such").join("file.xlsx");
    let t = table("t", &["id"], vec![vec![Value::Int(1)]]);

    let err = write_xlsx(&t, &path).unwrap_err();

    assert!(matches!(err, ExportError::Xlsx { .. }));
}

#[test]
fn oversized_sheet_leaves_no_files() {
    let dir = TempDir::new().expect("tempdir");
    let out = dir.path().join("out");
    let columns: Vec<String> = (0..16_385).map(|idx| format!("c{idx}")).collect();
    let row = vec![Value::Int(1); columns.len()];
    let wide = Table::new("wide", columns, vec![row]).expect("build table");

    let err = export_table(&out, "grouped", &wide, ExportFormat::Both).unwrap_err();

    assert!(matches!(err, ExportError::SheetLimit { columns: 16_385, .. }));
    assert!(!out.exists());
    assert!(check_export(&out, "grouped", &wide, ExportFormat::Csv).is_ok());
}
