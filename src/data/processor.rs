//! Data Processor Module
//! Converts loaded DataFrames into typed crop and rainfall tables.

use super::loader::LoaderError;
use super::tables::*;
use polars::prelude::*;

/// Handles column extraction and type coercion.
pub struct DataProcessor;

impl DataProcessor {
    /// Column names of a DataFrame, in file order.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Extract a column as text, cells kept verbatim. Only nulls become `None`.
    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let column = df
            .column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
        let text = column.cast(&DataType::String)?;
        let ca = text.str()?;

        Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
    }

    /// Extract a column as numbers. Cells that do not parse become `None`.
    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
        let column = df
            .column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
        let values = column.cast(&DataType::Float64)?;
        let ca = values.f64()?;

        Ok(ca.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect())
    }

    /// Numeric column that may be absent from the file.
    fn optional_numeric_column(
        df: &DataFrame,
        name: &str,
    ) -> Result<Vec<Option<f64>>, LoaderError> {
        match Self::numeric_column(df, name) {
            Err(LoaderError::MissingColumn(_)) => Ok(vec![None; df.height()]),
            other => other,
        }
    }

    /// Build the crop table from a crop production DataFrame.
    pub fn crop_table(df: &DataFrame) -> Result<CropTable, LoaderError> {
        let states = Self::text_column(df, CROP_STATE_COL)?;
        let crops = Self::text_column(df, CROP_NAME_COL)?;
        let years = Self::text_column(df, CROP_YEAR_COL)?;
        let production = Self::numeric_column(df, CROP_PRODUCTION_COL)?;

        let records = states
            .into_iter()
            .zip(crops)
            .zip(years)
            .zip(production)
            .map(|(((state, crop), crop_year), production)| CropRecord {
                state,
                crop,
                crop_year,
                production,
            })
            .collect();

        Ok(CropTable::new(Self::column_names(df), records))
    }

    /// Build the rainfall table from an IMD subdivision DataFrame.
    pub fn rainfall_table(df: &DataFrame) -> Result<RainfallTable, LoaderError> {
        let subdivisions = Self::text_column(df, RAIN_SUBDIVISION_COL)?;
        let years = Self::text_column(df, RAIN_YEAR_COL)?;
        let annual = Self::numeric_column(df, RAIN_ANNUAL_COL)?;
        let months = RAIN_MONTH_COLS
            .iter()
            .map(|name| Self::optional_numeric_column(df, name))
            .collect::<Result<Vec<_>, _>>()?;

        let records = subdivisions
            .into_iter()
            .zip(years)
            .zip(annual)
            .enumerate()
            .map(|(i, ((subdivision, year), annual))| {
                let mut monthly = [None; 12];
                for (slot, values) in monthly.iter_mut().zip(&months) {
                    *slot = values[i];
                }
                RainfallRecord {
                    subdivision,
                    year,
                    monthly,
                    annual,
                }
            })
            .collect();

        Ok(RainfallTable::new(Self::column_names(df), records))
    }
}
