use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{Level, debug, enabled, info, info_span, trace};

use colcmp_core::{
    GroupOptions, MergeOptions, MergedView, Reconciliation, drop_columns, group_and_merge,
    merge_side_by_side, reconcile,
};
use colcmp_ingest::{FileKind, LoadOptions, SheetSelection, list_sheets, load_table};
use colcmp_model::Table;
use colcmp_output::{ExportFormat, ExportSession, check_export, export_table};

use crate::cache::CacheStore;
use crate::cli::{CacheAction, ColumnsArgs, CompareArgs, GroupArgs, OutputArgs, sheet_selection};
use crate::logging::redact_value;
use crate::types::{
    CacheOutcome, ColumnDifferences, ColumnsResult, CompareReport, CompareResult, GroupResult,
    MergedReport, display_name,
};

const REPORT_FILE: &str = "summary.json";

pub fn run_compare(args: &CompareArgs, cache: &CacheStore) -> Result<CompareResult> {
    let span = info_span!(
        "compare",
        left = %args.left.display(),
        right = %args.right.display()
    );
    let _guard = span.enter();

    let left = load(
        &args.left,
        sheet_selection(args.left_sheet.as_deref(), SheetSelection::Only),
    )?;
    let right = load(
        &args.right,
        sheet_selection(args.right_sheet.as_deref(), SheetSelection::Only),
    )?;

    let reconciliation = reconcile(&left, &args.left_keys, &right, &args.right_keys)
        .context("reconcile tables")?;
    let summary = reconciliation.summary();
    info!(
        matched_keys = summary.matched_keys,
        only_left_keys = summary.only_left_keys,
        only_right_keys = summary.only_right_keys,
        "reconciled tables"
    );
    trace_keys(&reconciliation);

    let merged = if args.wants_merge() {
        let options = MergeOptions::default().with_prefixes(&args.left_prefix, &args.right_prefix);
        let view = merge_side_by_side(&reconciliation, &options).context("build merged view")?;
        info!(
            merged_rows = view.table().height(),
            rows_with_differences = view.rows_with_differences(),
            "built merged view"
        );
        Some(view)
    } else {
        None
    };

    let report = CompareReport {
        left: display_name(&args.left),
        right: display_name(&args.right),
        left_keys: args.left_keys.clone(),
        right_keys: args.right_keys.clone(),
        summary,
        merged: merged.as_ref().map(merged_report),
    };

    let (output_dir, files) = if args.output.dry_run {
        debug!("dry run, skipping export");
        (None, Vec::new())
    } else {
        let dir = output_dir(&args.output, cache, "compare");
        let format = ExportFormat::from(args.output.format);
        let tables = buckets(&reconciliation);
        for (stem, table) in &tables {
            check_export(&dir, stem, table, format).with_context(|| format!("export {stem}"))?;
        }
        if let Some(view) = &merged {
            check_export(&dir, "merged", view.table(), format).context("export merged view")?;
        }

        let mut session = ExportSession::begin(&dir).context("prepare output directory")?;
        for (stem, table) in tables {
            session
                .export_table(stem, table, format)
                .with_context(|| format!("export {stem}"))?;
        }
        if let Some(view) = &merged {
            session
                .export_merged("merged", view, format, args.highlight)
                .context("export merged view")?;
        }
        session
            .write_json(REPORT_FILE, &report)
            .context("write report")?;
        let files = session.commit().context("move results into place")?;
        (Some(dir), files)
    };

    Ok(CompareResult {
        left: args.left.clone(),
        right: args.right.clone(),
        reconciliation,
        merged,
        report,
        output_dir,
        files,
    })
}

pub fn run_group(args: &GroupArgs, cache: &CacheStore) -> Result<GroupResult> {
    let span = info_span!("group", input = %args.input.display());
    let _guard = span.enter();

    let table = load(&args.input, SheetSelection::Named(args.sheet.clone()))?;
    let input_rows = table.height();
    let table = if args.delete.is_empty() {
        table
    } else {
        let trimmed = drop_columns(&table, &args.delete).context("delete columns")?;
        debug!(deleted = args.delete.len(), remaining = trimmed.width(), "deleted columns");
        trimmed
    };

    let options = GroupOptions::default()
        .with_delimiter(args.delimiter.as_str())
        .with_keep(args.keep.into());
    let grouped =
        group_and_merge(&table, &args.group_by, &args.merge, &options).context("group rows")?;
    info!(input_rows, groups = grouped.height(), "grouped rows");

    let (output_dir, files) = if args.output.dry_run {
        (None, Vec::new())
    } else {
        let dir = output_dir(&args.output, cache, "group");
        let files = export_table(&dir, "grouped", &grouped, args.output.format.into())
            .context("export grouped table")?;
        (Some(dir), files)
    };

    Ok(GroupResult {
        input: args.input.clone(),
        input_rows,
        deleted: args.delete.clone(),
        grouped,
        output_dir,
        files,
    })
}

pub fn run_columns(args: &ColumnsArgs) -> Result<ColumnsResult> {
    let table = load(
        &args.input,
        sheet_selection(args.sheet.as_deref(), SheetSelection::First),
    )?;
    let sheets = if FileKind::from_path(&args.input).is_some_and(FileKind::is_workbook) {
        Some(
            list_sheets(&args.input)
                .with_context(|| format!("list sheets of {}", args.input.display()))?,
        )
    } else {
        None
    };
    let columns = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), table.schema().column_type(idx)))
        .collect();
    Ok(ColumnsResult {
        table: table.name().to_string(),
        rows: table.height(),
        columns,
        sheets,
    })
}

pub fn run_cache(action: CacheAction, cache: &CacheStore) -> Result<CacheOutcome> {
    let root = cache.runs_dir();
    let bytes = cache
        .size()
        .with_context(|| format!("measure cache {}", root.display()))?;
    match action {
        CacheAction::Size => Ok(CacheOutcome::Size { root, bytes }),
        CacheAction::Clear => {
            cache
                .clear()
                .with_context(|| format!("clear cache {}", root.display()))?;
            Ok(CacheOutcome::Cleared { root, freed: bytes })
        }
    }
}

fn load(path: &Path, sheet: SheetSelection) -> Result<Table> {
    load_table(path, &LoadOptions::default().with_sheet(sheet))
        .with_context(|| format!("load {}", path.display()))
}

fn output_dir(output: &OutputArgs, cache: &CacheStore, command: &str) -> PathBuf {
    output
        .output_dir
        .clone()
        .unwrap_or_else(|| cache.run_dir(command))
}

fn buckets(recon: &Reconciliation) -> [(&'static str, &Table); 4] {
    [
        ("matched_left", &recon.matched_left),
        ("matched_right", &recon.matched_right),
        ("only_left", &recon.only_left),
        ("only_right", &recon.only_right),
    ]
}

fn merged_report(view: &MergedView) -> MergedReport {
    MergedReport {
        rows: view.table().height(),
        rows_with_differences: view.rows_with_differences(),
        differences: view
            .difference_counts()
            .into_iter()
            .map(|(column, rows)| ColumnDifferences { column, rows })
            .collect(),
    }
}

fn trace_keys(recon: &Reconciliation) {
    if !enabled!(Level::TRACE) {
        return;
    }
    for key in &recon.only_left_keys {
        trace!(key = redact_value(key), "key only in left table");
    }
    for key in &recon.only_right_keys {
        trace!(key = redact_value(key), "key only in right table");
    }
}
