use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::cratemaker::cutsheet::category::CategoryTable;
use crate::cratemaker::cutsheet::error::{Result, ToolError};
use crate::cratemaker::cutsheet::model::Category;

/// Name of the sheet holding the bill of materials.
pub const CUT_LIST_SHEET: &str = "Cut List";
/// Value of the marker cell identifying the template family.
pub const TEMPLATE_MARKER: &str = "CrateMaker";
/// Extension accepted by the scan filter, compared case-insensitively.
pub const CUTSHEET_EXTENSION: &str = "xlsx";
/// Upper bound on data rows before the region is considered unterminated.
pub const DEFAULT_MAX_DATA_ROWS: u32 = 10_000;

/// Geometry of the cutsheet template. Coordinates are zero-based.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CutsheetLayout {
    pub sheet_name: String,
    pub marker: String,
    pub marker_column: u32,
    pub marker_row: u32,
    /// Row index of the first bill-of-materials line.
    pub first_data_row: u32,
    pub part_number_column: u32,
    pub quantity_column: u32,
    pub length_column: u32,
    pub width_column: u32,
    pub max_data_rows: u32,
    pub extension: String,
    /// Extra or replacement prefix assignments.
    pub prefixes: BTreeMap<String, Category>,
}

impl Default for CutsheetLayout {
    fn default() -> Self {
        Self {
            sheet_name: CUT_LIST_SHEET.to_string(),
            marker: TEMPLATE_MARKER.to_string(),
            marker_column: 0,
            marker_row: 0,
            first_data_row: 2,
            part_number_column: 1,
            quantity_column: 2,
            length_column: 3,
            width_column: 4,
            max_data_rows: DEFAULT_MAX_DATA_ROWS,
            extension: CUTSHEET_EXTENSION.to_string(),
            prefixes: BTreeMap::new(),
        }
    }
}

impl CutsheetLayout {
    /// Loads a layout override from a JSON file. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let layout: Self = serde_json::from_str(data)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Rejects layouts whose columns collide or whose limits are unusable.
    pub fn validate(&self) -> Result<()> {
        if self.sheet_name.is_empty() {
            return Err(ToolError::InvalidLayout("sheet name is empty".into()));
        }
        if self.max_data_rows == 0 {
            return Err(ToolError::InvalidLayout("maxDataRows must be positive".into()));
        }
        if self.extension.is_empty() || self.extension.contains('.') {
            return Err(ToolError::InvalidLayout(format!(
                "extension '{}' must be a bare suffix",
                self.extension
            )));
        }
        let columns = [
            ("partNumberColumn", self.part_number_column),
            ("quantityColumn", self.quantity_column),
            ("lengthColumn", self.length_column),
            ("widthColumn", self.width_column),
        ];
        for (idx, (name, column)) in columns.iter().enumerate() {
            if let Some((other, _)) = columns[idx + 1..].iter().find(|(_, c)| c == column) {
                return Err(ToolError::InvalidLayout(format!(
                    "{name} and {other} both use column {column}"
                )));
            }
        }
        Ok(())
    }

    /// Builds the category table, applying any prefix overrides.
    pub fn category_table(&self) -> CategoryTable {
        CategoryTable::default().with_overrides(
            self.prefixes
                .iter()
                .map(|(prefix, category)| (prefix.clone(), *category)),
        )
    }

    /// Whether `file_name` carries the accepted extension. The suffix is the
    /// text after the last '.', and names without a '.' are rejected.
    pub fn accepts_file_name(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, suffix)) => suffix.eq_ignore_ascii_case(&self.extension),
            None => false,
        }
    }
}
