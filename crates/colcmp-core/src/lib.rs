//! Row reconciliation and grouping.
//!
//! This crate holds the table operations behind the `colcmp` commands:
//!
//! - **key**: composite key construction and key-column validation
//! - **reconcile**: partitioning two tables into matched and unmatched rows
//! - **merge**: side-by-side view of matched rows with per-cell diff flags
//! - **group**: collapsing rows per group-by tuple with value merging
//! - **columns**: column deletion ahead of grouping
//!
//! Every operation is a pure function over already loaded tables and either
//! returns a complete result or an error; nothing is produced on failure.

pub mod columns;
pub mod group;
pub mod key;
pub mod merge;
pub mod reconcile;

pub use columns::drop_columns;
pub use group::{DEFAULT_DELIMITER, DELIMITER_PRESETS, GroupOptions, KeepPolicy, group_and_merge};
pub use key::{KeyColumns, composite_key, table_keys};
pub use merge::{CellDiff, ComparedColumn, MergeOptions, MergedView, merge_side_by_side};
pub use reconcile::{ReconSummary, Reconciliation, reconcile};
