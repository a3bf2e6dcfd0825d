//! Dataset Tables Module
//! Typed in-memory tables for crop production and rainfall records.

use std::cmp::Ordering;

/// Source column names of the crop production table.
pub const CROP_STATE_COL: &str = "state_name";
pub const CROP_NAME_COL: &str = "crop";
pub const CROP_YEAR_COL: &str = "crop_year";
pub const CROP_PRODUCTION_COL: &str = "production_";

/// Source column names of the rainfall table.
pub const RAIN_SUBDIVISION_COL: &str = "SUBDIVISION";
pub const RAIN_YEAR_COL: &str = "YEAR";
pub const RAIN_ANNUAL_COL: &str = "ANNUAL";
pub const RAIN_MONTH_COLS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// One crop production observation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropRecord {
    pub state: Option<String>,
    pub crop: Option<String>,
    /// Raw crop year text as it appeared in the file.
    pub crop_year: Option<String>,
    pub production: Option<f64>,
}

/// One rainfall observation for a subdivision and year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RainfallRecord {
    pub subdivision: Option<String>,
    /// Raw year text as it appeared in the file.
    pub year: Option<String>,
    pub monthly: [Option<f64>; 12],
    pub annual: Option<f64>,
}

/// Crop production table, immutable after load.
#[derive(Debug, Clone, Default)]
pub struct CropTable {
    columns: Vec<String>,
    records: Vec<CropRecord>,
}

impl CropTable {
    pub fn new(columns: Vec<String>, records: Vec<CropRecord>) -> Self {
        Self { columns, records }
    }

    /// Build a table from records alone, using the canonical column names.
    pub fn from_records(records: Vec<CropRecord>) -> Self {
        let columns = [CROP_STATE_COL, CROP_NAME_COL, CROP_YEAR_COL, CROP_PRODUCTION_COL]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self::new(columns, records)
    }

    pub fn records(&self) -> &[CropRecord] {
        &self.records
    }

    /// Column names of the source file.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Rainfall table, immutable after load.
#[derive(Debug, Clone, Default)]
pub struct RainfallTable {
    columns: Vec<String>,
    records: Vec<RainfallRecord>,
}

impl RainfallTable {
    pub fn new(columns: Vec<String>, records: Vec<RainfallRecord>) -> Self {
        Self { columns, records }
    }

    pub fn from_records(records: Vec<RainfallRecord>) -> Self {
        let mut columns = vec![RAIN_SUBDIVISION_COL.to_string(), RAIN_YEAR_COL.to_string()];
        columns.extend(RAIN_MONTH_COLS.iter().map(|s| s.to_string()));
        columns.push(RAIN_ANNUAL_COL.to_string());
        Self::new(columns, records)
    }

    pub fn records(&self) -> &[RainfallRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Month columns (JAN..DEC) holding at least one value.
    pub fn months_present(&self) -> Vec<&'static str> {
        RAIN_MONTH_COLS
            .iter()
            .enumerate()
            .filter(|(i, _)| self.records.iter().any(|r| r.monthly[*i].is_some()))
            .map(|(_, name)| *name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Both datasets, loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub crops: CropTable,
    pub rainfall: RainfallTable,
}

impl Datasets {
    pub fn new(crops: CropTable, rainfall: RainfallTable) -> Self {
        Self { crops, rainfall }
    }
}

/// Coerce a year cell to a whole number. Fractional or non-numeric text yields `None`.
pub fn parse_year(raw: &str) -> Option<i64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}

/// Ordering of year keys: numeric when both parse, numbers before text, text otherwise.
pub fn compare_years(a: &str, b: &str) -> Ordering {
    let num = |s: &str| s.trim().parse::<f64>().ok().filter(|v| !v.is_nan());
    match (num(a), num(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
