pub mod aggregate;
pub mod category;
pub mod error;
pub mod io;
pub mod layout;
pub mod model;
pub mod progress;
pub mod region;
pub mod scan;
pub mod template;

pub use error::{Result, ToolError};
