use std::path::Path;

use tracing::{debug, instrument};

use crate::cratemaker::cutsheet::error::{Result, ToolError};
use crate::cratemaker::cutsheet::io::{CellSource, CellValue, Sheet, Workbook};
use crate::cratemaker::cutsheet::layout::CutsheetLayout;

/// Outcome of checking a candidate file against the template.
#[derive(Debug)]
pub enum TemplateCheck {
    /// The file is a cutsheet; carries the decoded cut list sheet so it is not
    /// decoded twice.
    Valid(Sheet),
    /// The container decoded but the sheet or marker is missing.
    NotATemplate(String),
    /// The file could not be read or decoded.
    DecodeFailed(ToolError),
}

impl TemplateCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, TemplateCheck::Valid(_))
    }

    /// Converts the outcome into the crate's error taxonomy.
    pub fn into_result(self) -> Result<Sheet> {
        match self {
            TemplateCheck::Valid(sheet) => Ok(sheet),
            TemplateCheck::NotATemplate(reason) => Err(ToolError::TemplateMismatch(reason)),
            TemplateCheck::DecodeFailed(error) => Err(error),
        }
    }
}

/// Checks the file at `path` against `layout`.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn check_file(path: &Path, layout: &CutsheetLayout) -> TemplateCheck {
    match Workbook::open(path) {
        Ok(mut workbook) => check_workbook(&mut workbook, layout),
        Err(error) => TemplateCheck::DecodeFailed(error),
    }
}

/// Checks raw container bytes against `layout`.
pub fn check_bytes(bytes: Vec<u8>, layout: &CutsheetLayout) -> TemplateCheck {
    let mut workbook = match Workbook::from_bytes(bytes) {
        Ok(workbook) => workbook,
        Err(error) => return TemplateCheck::DecodeFailed(error),
    };
    check_workbook(&mut workbook, layout)
}

/// Checks an already decoded workbook against `layout`.
pub fn check_workbook(workbook: &mut Workbook, layout: &CutsheetLayout) -> TemplateCheck {
    let sheet = match workbook.sheet(&layout.sheet_name) {
        Ok(Some(sheet)) => sheet,
        Ok(None) => {
            return TemplateCheck::NotATemplate(format!(
                "missing sheet '{}' (found {})",
                layout.sheet_name,
                workbook.sheet_names().join(", ")
            ));
        }
        Err(error) => return TemplateCheck::DecodeFailed(error),
    };

    match sheet.cell(layout.marker_column, layout.marker_row) {
        Some(CellValue::Text(value)) if value == layout.marker => {
            debug!(sheet = sheet.name(), "template marker found");
            TemplateCheck::Valid(sheet)
        }
        Some(other) => TemplateCheck::NotATemplate(format!(
            "marker cell holds '{}' instead of '{}'",
            other.as_text(),
            layout.marker
        )),
        None => TemplateCheck::NotATemplate("marker cell is empty".to_string()),
    }
}

/// Boolean form of [`check_file`]; every failure reads as "not a cutsheet".
pub fn validate(path: &Path, layout: &CutsheetLayout) -> bool {
    check_file(path, layout).is_valid()
}
