use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Material category assigned to a bill-of-materials line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Dimensional lumber, counted and measured by length.
    Lumber,
    /// Sheet goods, counted and measured by area.
    Ply,
    /// Foam, counted only.
    Foam,
    /// Anything whose prefix is not in the category table.
    Other,
}

impl Category {
    /// Whether the row's length cell must be read.
    pub fn needs_length(self) -> bool {
        matches!(self, Category::Lumber | Category::Ply)
    }

    /// Whether the row's width cell must be read.
    pub fn needs_width(self) -> bool {
        matches!(self, Category::Ply)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Lumber => write!(f, "lumber"),
            Category::Ply => write!(f, "ply"),
            Category::Foam => write!(f, "foam"),
            Category::Other => write!(f, "other"),
        }
    }
}

/// Per-file material totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutsheetSummary {
    /// Number of data rows found.
    pub bom_lines: u32,
    pub lumber_count: f64,
    /// Sum of lengths of lumber rows.
    pub lumber_length: f64,
    pub ply_count: f64,
    /// Sum of per-row areas, each rounded to hundredths before summing.
    pub ply_square_feet: f64,
    pub foam_count: f64,
    pub other_count: f64,
}

impl CutsheetSummary {
    /// Total quantity across every category.
    pub fn total_count(&self) -> f64 {
        self.lumber_count + self.ply_count + self.foam_count + self.other_count
    }
}

/// A recognised cutsheet and the totals extracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutsheetReport {
    pub file: PathBuf,
    pub summary: CutsheetSummary,
}

/// A validated cutsheet that could not be aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFailure {
    pub file: PathBuf,
    pub reason: String,
}

/// Outcome of scanning one directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    /// Successful cutsheets in directory enumeration order.
    pub cutsheets: Vec<CutsheetReport>,
    pub failures: Vec<ScanFailure>,
    pub elapsed: Duration,
}

impl ScanResult {
    /// Number of recognised and fully aggregated cutsheets.
    pub fn count(&self) -> usize {
        self.cutsheets.len()
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
