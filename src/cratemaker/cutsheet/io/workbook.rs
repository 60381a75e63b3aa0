use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx};

use crate::cratemaker::cutsheet::error::Result;

/// Typed value of a present cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    /// Numeric view of the cell. Text is accepted when it parses as a number.
    /// NaN and infinities are never numbers here.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(text) => text.trim().parse::<f64>().ok(),
            CellValue::Bool(_) => None,
        };
        value.filter(|value| value.is_finite())
    }

    /// Textual view of the cell as it would be displayed.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Number(value) => value.to_string(),
            CellValue::Text(text) => text.clone(),
            CellValue::Bool(value) => value.to_string(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// Cell lookup by zero-based `(column, row)` coordinate.
pub trait CellSource {
    fn cell(&self, column: u32, row: u32) -> Option<CellValue>;
}

/// Decoded `.xlsx` container, owned for the duration of one file.
pub struct Workbook {
    inner: Xlsx<Cursor<Vec<u8>>>,
}

impl Workbook {
    /// Decodes a workbook from raw container bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let inner = Xlsx::new(Cursor::new(bytes))?;
        Ok(Self { inner })
    }

    /// Reads and decodes the file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names().to_vec()
    }

    /// Returns the named sheet, or `None` when the workbook has no such sheet.
    pub fn sheet(&mut self, name: &str) -> Result<Option<Sheet>> {
        match self.inner.worksheet_range(name) {
            Some(range) => Ok(Some(Sheet {
                name: name.to_string(),
                range: range?,
            })),
            None => Ok(None),
        }
    }
}

/// A worksheet backed by a calamine range. Coordinates are absolute, so the
/// range's own offset does not leak into callers.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    range: Range<DataType>,
}

impl Sheet {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CellSource for Sheet {
    fn cell(&self, column: u32, row: u32) -> Option<CellValue> {
        match self.range.get_value((row, column))? {
            DataType::Empty => None,
            DataType::Float(value) => Some(CellValue::Number(*value)),
            DataType::Int(value) => Some(CellValue::Number(*value as f64)),
            DataType::Bool(value) => Some(CellValue::Bool(*value)),
            DataType::String(value) => Some(CellValue::Text(value.clone())),
            other => Some(CellValue::Text(other.to_string())),
        }
    }
}

/// Sparse in-memory grid for callers that already hold cell data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSheet {
    cells: BTreeMap<(u32, u32), CellValue>,
}

impl GridSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: u32, row: u32, value: impl Into<CellValue>) -> &mut Self {
        self.cells.insert((column, row), value.into());
        self
    }

    pub fn clear(&mut self, column: u32, row: u32) -> &mut Self {
        self.cells.remove(&(column, row));
        self
    }
}

impl CellSource for GridSheet {
    fn cell(&self, column: u32, row: u32) -> Option<CellValue> {
        self.cells.get(&(column, row)).cloned()
    }
}
