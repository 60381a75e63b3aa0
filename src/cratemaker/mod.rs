pub mod cutsheet;
