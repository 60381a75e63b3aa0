pub mod workbook;

pub use workbook::{CellSource, CellValue, GridSheet, Sheet, Workbook};
