//! Data module - CSV loading and typed tables

mod loader;
mod processor;
mod tables;

pub use loader::DataLoader;
pub use tables::{compare_years, parse_year, CropTable, Datasets, RainfallTable};
#[cfg(test)]
pub use tables::{CropRecord, RainfallRecord};
