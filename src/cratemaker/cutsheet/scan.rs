use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::cratemaker::cutsheet::aggregate::aggregate;
use crate::cratemaker::cutsheet::category::CategoryTable;
use crate::cratemaker::cutsheet::error::{Result, ToolError};
use crate::cratemaker::cutsheet::io::Sheet;
use crate::cratemaker::cutsheet::layout::CutsheetLayout;
use crate::cratemaker::cutsheet::model::{CutsheetReport, CutsheetSummary, ScanFailure, ScanResult};
use crate::cratemaker::cutsheet::progress::ProgressReporter;
use crate::cratemaker::cutsheet::region::locate_data_rows;
use crate::cratemaker::cutsheet::template::{TemplateCheck, check_file};

/// Settings shared by every file of one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub layout: CutsheetLayout,
    pub categories: CategoryTable,
}

impl ScanOptions {
    /// Options for `layout`, with the category table its prefixes describe.
    pub fn from_layout(layout: CutsheetLayout) -> Self {
        let categories = layout.category_table();
        Self { layout, categories }
    }
}

/// Scans `directory` for cutsheets and aggregates each one.
///
/// Only a failure to enumerate the directory is fatal. Files that are not
/// cutsheets are skipped quietly; cutsheets that cannot be aggregated are
/// logged and listed in [`ScanResult::failures`].
#[instrument(level = "info", skip_all, fields(path = %directory.display()))]
pub fn scan_directory(
    directory: &Path,
    options: &ScanOptions,
    progress: &mut dyn ProgressReporter,
) -> Result<ScanResult> {
    let started = Instant::now();
    let candidates = list_candidates(directory, &options.layout)?;
    debug!(candidate_count = candidates.len(), "enumerated candidates");

    let mut result = ScanResult::default();
    for path in candidates {
        let sheet = match check_file(&path, &options.layout) {
            TemplateCheck::Valid(sheet) => sheet,
            TemplateCheck::NotATemplate(reason) => {
                debug!(file = %path.display(), %reason, "skipping non-cutsheet");
                continue;
            }
            TemplateCheck::DecodeFailed(error) => {
                debug!(file = %path.display(), %error, "skipping undecodable file");
                continue;
            }
        };

        match summarize_sheet(&path, &sheet, options, progress) {
            Ok(summary) => result.cutsheets.push(CutsheetReport {
                file: path,
                summary,
            }),
            Err(error) => {
                warn!(file = %path.display(), %error, "skipping cutsheet");
                result.failures.push(ScanFailure {
                    file: path,
                    reason: error.to_string(),
                });
            }
        }
    }

    result.elapsed = started.elapsed();
    info!(
        cutsheet_count = result.count(),
        failure_count = result.failures.len(),
        elapsed_seconds = result.elapsed_seconds(),
        "scan complete"
    );
    Ok(result)
}

/// Locates and aggregates the data region of a validated cut list sheet,
/// reporting progress under the file's name.
#[instrument(level = "debug", skip_all, fields(file = %path.display()))]
pub fn summarize_sheet(
    path: &Path,
    sheet: &Sheet,
    options: &ScanOptions,
    progress: &mut dyn ProgressReporter,
) -> Result<CutsheetSummary> {
    let row_count = locate_data_rows(sheet, sheet.name(), &options.layout)?;
    debug!(row_count, "located data region");

    progress.begin(&display_name(path));
    let summary = aggregate(
        sheet,
        &options.layout,
        &options.categories,
        row_count,
        &mut |increment| progress.advance(increment),
    );
    match summary {
        Ok(_) => progress.finish(),
        Err(_) => progress.abandon(),
    }
    summary
}

/// Regular files in `directory` whose name carries the accepted extension, in
/// enumeration order.
pub fn list_candidates(directory: &Path, layout: &CutsheetLayout) -> Result<Vec<PathBuf>> {
    let access = |source| ToolError::DirectoryAccess {
        path: directory.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in fs::read_dir(directory).map_err(access)? {
        let entry = entry.map_err(access)?;
        let is_file = match entry.file_type() {
            Ok(file_type) => file_type.is_file(),
            Err(error) => {
                debug!(file = %entry.path().display(), %error, "cannot stat entry");
                false
            }
        };
        if is_file && layout.accepts_file_name(&entry.file_name().to_string_lossy()) {
            candidates.push(entry.path());
        }
    }
    Ok(candidates)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn candidates_skip_directories_and_other_extensions() {
        let dir = tempdir().expect("temporary directory");
        fs::write(dir.path().join("a.xlsx"), b"").unwrap();
        fs::write(dir.path().join("B.XLSX"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::write(dir.path().join("xlsx"), b"").unwrap();
        fs::create_dir(dir.path().join("nested.xlsx")).unwrap();

        let mut names: Vec<String> = list_candidates(dir.path(), &CutsheetLayout::default())
            .expect("listed")
            .iter()
            .map(|path| display_name(path))
            .collect();
        names.sort();
        assert_eq!(names, vec!["B.XLSX".to_string(), "a.xlsx".to_string()]);
    }

    #[test]
    fn missing_directory_is_access_error() {
        let dir = tempdir().expect("temporary directory");
        let error = list_candidates(&dir.path().join("absent"), &CutsheetLayout::default())
            .expect_err("missing directory");
        assert!(matches!(error, ToolError::DirectoryAccess { .. }));
    }
}
