//! CSV Data Loader Module
//! Reads the crop and rainfall CSV files with Polars and builds the typed tables.

use super::processor::DataProcessor;
use super::tables::{CropTable, Datasets, RainfallTable};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
}

/// Loads both datasets from disk.
#[derive(Debug, Clone)]
pub struct DataLoader {
    crop_path: PathBuf,
    rainfall_path: PathBuf,
}

impl DataLoader {
    pub fn new(crop_path: impl Into<PathBuf>, rainfall_path: impl Into<PathBuf>) -> Self {
        Self {
            crop_path: crop_path.into(),
            rainfall_path: rainfall_path.into(),
        }
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Ok(df)
    }

    pub fn load_crops(file_path: &Path) -> Result<CropTable, LoaderError> {
        let df = Self::load_csv(file_path)?;
        DataProcessor::crop_table(&df)
    }

    pub fn load_rainfall(file_path: &Path) -> Result<RainfallTable, LoaderError> {
        let df = Self::load_csv(file_path)?;
        DataProcessor::rainfall_table(&df)
    }

    /// Load both tables in parallel. A table that fails to load is replaced by
    /// an empty one; the failure is only logged.
    pub fn load(&self) -> Datasets {
        let (crops, rainfall) = rayon::join(
            || Self::load_crops(&self.crop_path),
            || Self::load_rainfall(&self.rainfall_path),
        );

        let crops = match crops {
            Ok(table) => {
                info!(
                    "✅ Crop data loaded: {} rows from {}",
                    table.len(),
                    self.crop_path.display()
                );
                table
            }
            Err(e) => {
                warn!("⚠️ Crop data unavailable ({}), continuing without it", e);
                CropTable::default()
            }
        };

        let rainfall = match rainfall {
            Ok(table) => {
                info!(
                    "✅ Rainfall data loaded: {} rows from {}",
                    table.len(),
                    self.rainfall_path.display()
                );
                debug!(
                    "Rainfall columns: {:?}; monthly values in {:?}",
                    table.columns(),
                    table.months_present()
                );
                table
            }
            Err(e) => {
                warn!("⚠️ Rainfall data unavailable ({}), continuing without it", e);
                RainfallTable::default()
            }
        };

        Datasets::new(crops, rainfall)
    }
}
