//! Staged export into an output directory.
//!
//! Every file of a session is first written to a hidden staging directory
//! inside the destination and only renamed into place by
//! [`ExportSession::commit`]. A session dropped before commit removes its
//! staged files and any directories it created, so a failed export leaves
//! the file system as it found it.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use colcmp_core::MergedView;
use colcmp_model::Table;

use crate::delimited::{write_csv, write_merged_csv};
use crate::error::ExportError;
use crate::export::{ExportFormat, check_export};
use crate::xlsx::{write_merged_xlsx, write_xlsx};

const STAGING_PREFIX: &str = ".colcmp-staging-";

#[derive(Debug)]
pub struct ExportSession {
    dir: PathBuf,
    /// Directories this session created, deepest first.
    created: Vec<PathBuf>,
    staging: TempDir,
    /// File names staged so far, in write order.
    staged: Vec<String>,
    committed: bool,
}

impl ExportSession {
    /// Creates `dir` (and missing parents) plus a staging directory inside it.
    pub fn begin(dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let dir = dir.into();
        let created: Vec<PathBuf> = dir
            .ancestors()
            .take_while(|path| !path.as_os_str().is_empty() && !path.exists())
            .map(Path::to_path_buf)
            .collect();
        if let Err(e) = fs::create_dir_all(&dir) {
            remove_dirs(&created);
            return Err(ExportError::io(&dir, e));
        }
        let staging = match tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&dir)
        {
            Ok(staging) => staging,
            Err(e) => {
                remove_dirs(&created);
                return Err(ExportError::io(&dir, e));
            }
        };
        debug!(dir = %dir.display(), staging = %staging.path().display(), "started export");
        Ok(Self {
            dir,
            created,
            staging,
            staged: Vec::new(),
            committed: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stages `table` as `<stem>.<ext>` for each extension of `format`.
    ///
    /// Returns the final paths the files get on commit.
    pub fn export_table(
        &mut self,
        stem: &str,
        table: &Table,
        format: ExportFormat,
    ) -> Result<Vec<PathBuf>, ExportError> {
        check_export(&self.dir, stem, table, format)?;
        let mut targets = Vec::new();
        for ext in format.extensions() {
            let (path, target) = self.stage(format!("{stem}.{ext}"));
            match *ext {
                "csv" => write_csv(table, &path)?,
                _ => write_xlsx(table, &path)?,
            }
            targets.push(target);
        }
        info!(stem, rows = table.height(), files = targets.len(), "exported table");
        Ok(targets)
    }

    /// Like [`export_table`](Self::export_table) for a merged view. With
    /// `highlight`, the workbook output carries green/red fills on compared
    /// cells.
    pub fn export_merged(
        &mut self,
        stem: &str,
        view: &MergedView,
        format: ExportFormat,
        highlight: bool,
    ) -> Result<Vec<PathBuf>, ExportError> {
        check_export(&self.dir, stem, view.table(), format)?;
        let mut targets = Vec::new();
        for ext in format.extensions() {
            let (path, target) = self.stage(format!("{stem}.{ext}"));
            match *ext {
                "csv" => write_merged_csv(view, &path)?,
                _ if highlight => write_merged_xlsx(view, &path)?,
                _ => write_xlsx(view.table(), &path)?,
            }
            targets.push(target);
        }
        info!(
            stem,
            rows = view.table().height(),
            highlight,
            files = targets.len(),
            "exported merged view"
        );
        Ok(targets)
    }

    /// Stages `value` as pretty-printed JSON under `file_name`.
    pub fn write_json<T: Serialize>(
        &mut self,
        file_name: &str,
        value: &T,
    ) -> Result<PathBuf, ExportError> {
        let (path, target) = self.stage(file_name.to_string());
        let file = File::create(&path).map_err(|e| ExportError::io(&target, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)
            .map_err(|e| ExportError::json(&target, e))?;
        writer.flush().map_err(|e| ExportError::io(&target, e))?;
        Ok(target)
    }

    /// Moves every staged file into the output directory, replacing files of
    /// the same name. If a move fails, files already moved are removed again.
    pub fn commit(mut self) -> Result<Vec<PathBuf>, ExportError> {
        let mut moved: Vec<PathBuf> = Vec::with_capacity(self.staged.len());
        for name in &self.staged {
            let target = self.dir.join(name);
            if let Err(e) = fs::rename(self.staging.path().join(name), &target) {
                for path in &moved {
                    remove_quietly(path, fs::remove_file(path));
                }
                return Err(ExportError::io(&target, e));
            }
            moved.push(target);
        }
        self.committed = true;
        info!(dir = %self.dir.display(), files = moved.len(), "committed export");
        Ok(moved)
    }

    fn stage(&mut self, file_name: String) -> (PathBuf, PathBuf) {
        let path = self.staging.path().join(&file_name);
        let target = self.dir.join(&file_name);
        if !self.staged.contains(&file_name) {
            self.staged.push(file_name);
        }
        (path, target)
    }
}

impl Drop for ExportSession {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // The staging dir must go before its parents can be removed.
        remove_quietly(self.staging.path(), fs::remove_dir_all(self.staging.path()));
        remove_dirs(&self.created);
        debug!(dir = %self.dir.display(), "rolled back export");
    }
}

fn remove_dirs(dirs: &[PathBuf]) {
    for dir in dirs {
        remove_quietly(dir, fs::remove_dir(dir));
    }
}

fn remove_quietly(path: &Path, result: io::Result<()>) {
    if let Err(e) = result
        && e.kind() != io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "failed to clean up export");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colcmp_model::Value;

    fn numbers() -> Table {
        Table::new(
            "numbers",
            vec!["n".to_string()],
            vec![vec![Value::Int(1)], vec![Value::Int(2)]],
        )
        .unwrap()
    }

    #[test]
    fn nothing_is_visible_before_commit() {
        let root = tempfile::tempdir().unwrap();
        let mut session = ExportSession::begin(root.path()).unwrap();
        let targets = session
            .export_table("numbers", &numbers(), ExportFormat::Csv)
            .unwrap();
        assert_eq!(targets, vec![root.path().join("numbers.csv")]);
        assert!(!targets[0].exists());

        let files = session.commit().unwrap();
        assert_eq!(files, targets);
        assert_eq!(fs::read_to_string(&files[0]).unwrap(), "n\n1\n2\n");
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 1);
    }

    #[test]
    fn dropped_session_removes_created_dirs() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("a").join("b");
        {
            let mut session = ExportSession::begin(&dir).unwrap();
            session
                .export_table("numbers", &numbers(), ExportFormat::Both)
                .unwrap();
            session.write_json("summary.json", &[1, 2]).unwrap();
        }
        assert!(!root.path().join("a").exists());
    }

    #[test]
    fn dropped_session_keeps_existing_files() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("numbers.csv"), "old").unwrap();
        {
            let mut session = ExportSession::begin(root.path()).unwrap();
            session
                .export_table("numbers", &numbers(), ExportFormat::Csv)
                .unwrap();
        }
        assert_eq!(
            fs::read_to_string(root.path().join("numbers.csv")).unwrap(),
            "old"
        );
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_commit_removes_moved_files() {
        let root = tempfile::tempdir().unwrap();
        // A directory in the way makes the second rename fail.
        fs::create_dir(root.path().join("summary.json")).unwrap();
        let mut session = ExportSession::begin(root.path()).unwrap();
        session
            .export_table("numbers", &numbers(), ExportFormat::Csv)
            .unwrap();
        session.write_json("summary.json", &"report").unwrap();

        let err = session.commit().unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        let names: Vec<String> = fs::read_dir(root.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["summary.json".to_string()]);
    }
}
