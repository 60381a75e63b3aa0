use tracing::trace;

use crate::cratemaker::cutsheet::category::CategoryTable;
use crate::cratemaker::cutsheet::error::{Result, ToolError};
use crate::cratemaker::cutsheet::io::CellSource;
use crate::cratemaker::cutsheet::layout::CutsheetLayout;
use crate::cratemaker::cutsheet::model::{Category, CutsheetSummary};

/// Square inches per square foot.
const SQUARE_INCHES_PER_FOOT: f64 = 144.0;

/// Folds `row_count` data rows into a summary.
///
/// `on_progress` receives `100 / row_count` after every row and is never
/// called for an empty region. A missing numeric cell that the row's category
/// needs aborts with [`ToolError::CorruptRow`].
pub fn aggregate(
    sheet: &impl CellSource,
    layout: &CutsheetLayout,
    table: &CategoryTable,
    row_count: u32,
    on_progress: &mut dyn FnMut(f64),
) -> Result<CutsheetSummary> {
    let mut summary = CutsheetSummary {
        bom_lines: row_count,
        ..CutsheetSummary::default()
    };
    if row_count == 0 {
        return Ok(summary);
    }

    let increment = 100.0 / f64::from(row_count);
    let rows = layout.first_data_row..layout.first_data_row.saturating_add(row_count);
    for row in rows {
        let line = read_line(sheet, layout, table, row)?;
        trace!(row, category = %line.category, quantity = line.quantity, "bom line");
        fold(&mut summary, &line);
        on_progress(increment);
    }

    Ok(summary)
}

/// One classified bill-of-materials row.
#[derive(Debug, Clone, PartialEq)]
pub struct BomLine {
    pub category: Category,
    pub quantity: f64,
    pub length: f64,
    pub width: f64,
}

/// Reads and classifies `row`. Length and width are only read when the
/// category uses them; otherwise they are zero.
pub fn read_line(
    sheet: &impl CellSource,
    layout: &CutsheetLayout,
    table: &CategoryTable,
    row: u32,
) -> Result<BomLine> {
    let part_number = sheet
        .cell(layout.part_number_column, row)
        .map(|cell| cell.as_text())
        .ok_or_else(|| corrupt(row, layout.part_number_column, "missing part number"))?;
    let category = table.classify(&part_number);

    let quantity = read_number(sheet, layout.quantity_column, row, "quantity")?;
    let length = if category.needs_length() {
        read_number(sheet, layout.length_column, row, "length")?
    } else {
        0.0
    };
    let width = if category.needs_width() {
        read_number(sheet, layout.width_column, row, "width")?
    } else {
        0.0
    };

    Ok(BomLine {
        category,
        quantity,
        length,
        width,
    })
}

/// Adds `line` to the category totals it belongs to. Ply area is the rounded
/// per-piece area times the quantity; lumber length is taken as written.
pub fn fold(summary: &mut CutsheetSummary, line: &BomLine) {
    match line.category {
        Category::Lumber => {
            summary.lumber_count += line.quantity;
            summary.lumber_length += line.length;
        }
        Category::Ply => {
            summary.ply_count += line.quantity;
            summary.ply_square_feet += square_feet(line.length, line.width) * line.quantity;
        }
        Category::Foam => summary.foam_count += line.quantity,
        Category::Other => summary.other_count += line.quantity,
    }
}

/// Area in square feet of a `length` × `width` inch panel, rounded to
/// hundredths.
pub fn square_feet(length: f64, width: f64) -> f64 {
    round_hundredths(length * width / SQUARE_INCHES_PER_FOOT)
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn read_number(sheet: &impl CellSource, column: u32, row: u32, field: &str) -> Result<f64> {
    match sheet.cell(column, row) {
        Some(cell) => cell.as_number().ok_or_else(|| {
            corrupt(
                row,
                column,
                &format!("{field} '{}' is not a number", cell.as_text()),
            )
        }),
        None => Err(corrupt(row, column, &format!("missing {field}"))),
    }
}

fn corrupt(row: u32, column: u32, reason: &str) -> ToolError {
    ToolError::CorruptRow {
        row,
        column,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cratemaker::cutsheet::io::GridSheet;

    struct Row<'a> {
        part: &'a str,
        quantity: Option<f64>,
        length: Option<f64>,
        width: Option<f64>,
    }

    fn grid(layout: &CutsheetLayout, rows: &[Row<'_>]) -> GridSheet {
        let mut grid = GridSheet::new();
        for (idx, row) in rows.iter().enumerate() {
            let r = layout.first_data_row + idx as u32;
            grid.set(layout.part_number_column, r, row.part);
            if let Some(quantity) = row.quantity {
                grid.set(layout.quantity_column, r, quantity);
            }
            if let Some(length) = row.length {
                grid.set(layout.length_column, r, length);
            }
            if let Some(width) = row.width {
                grid.set(layout.width_column, r, width);
            }
        }
        grid
    }

    fn row(part: &str, quantity: f64, length: Option<f64>, width: Option<f64>) -> Row<'_> {
        Row {
            part,
            quantity: Some(quantity),
            length,
            width,
        }
    }

    #[test]
    fn mixed_rows_produce_expected_totals() {
        let layout = CutsheetLayout::default();
        let sheet = grid(
            &layout,
            &[
                row("LUM-2x4", 4.0, Some(10.0), None),
                row("PLY-3/4", 2.0, Some(48.0), Some(24.0)),
                row("XXX-bolt", 1.0, None, None),
            ],
        );
        let mut steps = Vec::new();
        let summary = aggregate(
            &sheet,
            &layout,
            &CategoryTable::default(),
            3,
            &mut |step| steps.push(step),
        )
        .expect("aggregated");

        assert_eq!(
            summary,
            CutsheetSummary {
                bom_lines: 3,
                lumber_count: 4.0,
                lumber_length: 10.0,
                ply_count: 2.0,
                ply_square_feet: 16.0,
                foam_count: 0.0,
                other_count: 1.0,
            }
        );
        assert_eq!(steps.len(), 3);
        assert!((steps.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_region_reports_nothing() {
        let layout = CutsheetLayout::default();
        let mut called = false;
        let summary = aggregate(
            &GridSheet::new(),
            &layout,
            &CategoryTable::default(),
            0,
            &mut |_| called = true,
        )
        .expect("aggregated");
        assert_eq!(summary, CutsheetSummary::default());
        assert!(!called);
    }

    #[test]
    fn ply_area_is_rounded_per_row() {
        let layout = CutsheetLayout::default();
        // 10 x 10 / 144 = 0.6944.. rounds to 0.69 per row
        let rows: Vec<Row<'_>> = (0..3)
            .map(|_| row("PLY", 1.0, Some(10.0), Some(10.0)))
            .collect();
        let summary = aggregate(
            &grid(&layout, &rows),
            &layout,
            &CategoryTable::default(),
            3,
            &mut |_| {},
        )
        .expect("aggregated");
        assert!((summary.ply_square_feet - 2.07).abs() < 1e-9);
        assert_eq!(square_feet(48.0, 96.0), 32.0);
    }

    #[test]
    fn unknown_prefix_only_touches_other_count() {
        let layout = CutsheetLayout::default();
        let sheet = grid(&layout, &[row("ZZZ", 6.0, Some(99.0), Some(99.0))]);
        let summary = aggregate(&sheet, &layout, &CategoryTable::default(), 1, &mut |_| {})
            .expect("aggregated");
        assert_eq!(summary.other_count, 6.0);
        assert_eq!(summary.total_count(), 6.0);
        assert_eq!(summary.lumber_length, 0.0);
        assert_eq!(summary.ply_square_feet, 0.0);
    }

    #[test]
    fn foam_ignores_dimension_cells() {
        let layout = CutsheetLayout::default();
        let sheet = grid(&layout, &[row("FOM-2in", 3.0, None, None)]);
        let summary = aggregate(&sheet, &layout, &CategoryTable::default(), 1, &mut |_| {})
            .expect("aggregated");
        assert_eq!(summary.foam_count, 3.0);
    }

    #[test]
    fn missing_quantity_is_corrupt_row() {
        let layout = CutsheetLayout::default();
        let sheet = grid(
            &layout,
            &[
                row("LUM", 1.0, Some(5.0), None),
                Row {
                    part: "XXX",
                    quantity: None,
                    length: None,
                    width: None,
                },
            ],
        );
        let error = aggregate(&sheet, &layout, &CategoryTable::default(), 2, &mut |_| {})
            .expect_err("corrupt row");
        match error {
            ToolError::CorruptRow { row, column, .. } => {
                assert_eq!(row, layout.first_data_row + 1);
                assert_eq!(column, layout.quantity_column);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn ply_without_width_is_corrupt_row() {
        let layout = CutsheetLayout::default();
        let sheet = grid(&layout, &[row("PLY", 1.0, Some(48.0), None)]);
        let error = aggregate(&sheet, &layout, &CategoryTable::default(), 1, &mut |_| {})
            .expect_err("corrupt row");
        assert!(matches!(error, ToolError::CorruptRow { column: 4, .. }));
    }

    #[test]
    fn non_numeric_quantity_is_corrupt_row() {
        let layout = CutsheetLayout::default();
        let mut sheet = grid(&layout, &[row("LUM", 1.0, Some(5.0), None)]);
        sheet.set(layout.quantity_column, layout.first_data_row, "lots");
        let error = aggregate(&sheet, &layout, &CategoryTable::default(), 1, &mut |_| {})
            .expect_err("corrupt row");
        assert!(matches!(error, ToolError::CorruptRow { .. }));
    }

    #[test]
    fn non_finite_text_is_corrupt_row() {
        let layout = CutsheetLayout::default();
        let table = CategoryTable::default();

        let mut sheet = grid(&layout, &[row("LUM-1", 1.0, Some(5.0), None)]);
        sheet.set(layout.quantity_column, layout.first_data_row, "NaN");
        let error = aggregate(&sheet, &layout, &table, 1, &mut |_| {}).expect_err("NaN quantity");
        assert!(matches!(error, ToolError::CorruptRow { column: 2, .. }));

        let mut sheet = grid(&layout, &[row("LUM-1", 1.0, Some(5.0), None)]);
        sheet.set(layout.length_column, layout.first_data_row, "inf");
        let error = aggregate(&sheet, &layout, &table, 1, &mut |_| {}).expect_err("inf length");
        assert!(matches!(error, ToolError::CorruptRow { column: 3, .. }));
    }

    #[test]
    fn fold_is_order_independent() {
        let lines = [
            BomLine {
                category: Category::Ply,
                quantity: 1.0,
                length: 13.0,
                width: 7.0,
            },
            BomLine {
                category: Category::Ply,
                quantity: 2.0,
                length: 48.0,
                width: 24.0,
            },
            BomLine {
                category: Category::Lumber,
                quantity: 5.0,
                length: 96.0,
                width: 0.0,
            },
        ];
        let mut forward = CutsheetSummary::default();
        lines.iter().for_each(|line| fold(&mut forward, line));
        let mut backward = CutsheetSummary::default();
        lines.iter().rev().for_each(|line| fold(&mut backward, line));
        assert!((forward.ply_square_feet - backward.ply_square_feet).abs() < 1e-9);
        assert_eq!(forward.ply_count, backward.ply_count);
        assert_eq!(forward.lumber_length, backward.lumber_length);
    }
}
