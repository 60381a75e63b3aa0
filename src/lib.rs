//! Core library for the cutsheet-scan command line application.
//!
//! The library exposes the extraction pipeline that powers the command-line
//! interface as well as the tests. Responsibilities are kept narrow: workbook
//! access lives under [`cratemaker::cutsheet::io`], the template check in
//! [`cratemaker::cutsheet::template`], the bill-of-materials fold in
//! [`cratemaker::cutsheet::aggregate`], and directory orchestration under
//! [`cratemaker::cutsheet::scan`].

pub mod cratemaker;

pub use cratemaker::cutsheet::{
    Result, ToolError, aggregate, category, error, io, layout, model, progress, region, scan,
    template,
};
