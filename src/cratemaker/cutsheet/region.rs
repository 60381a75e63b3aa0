use crate::cratemaker::cutsheet::error::{Result, ToolError};
use crate::cratemaker::cutsheet::io::CellSource;
use crate::cratemaker::cutsheet::layout::CutsheetLayout;

/// Counts the contiguous data rows starting at the layout's first data row.
///
/// The region ends at the first row whose part-number cell is absent. A sheet
/// whose first data row is already empty has zero rows. If no empty row turns
/// up within `max_data_rows`, the sheet is reported as malformed.
pub fn locate_data_rows(
    sheet: &impl CellSource,
    sheet_name: &str,
    layout: &CutsheetLayout,
) -> Result<u32> {
    for offset in 0..=layout.max_data_rows {
        let row = layout.first_data_row.saturating_add(offset);
        if sheet.cell(layout.part_number_column, row).is_none() {
            return Ok(offset);
        }
    }
    Err(ToolError::MalformedTemplate {
        sheet: sheet_name.to_string(),
        limit: layout.max_data_rows,
    })
}
