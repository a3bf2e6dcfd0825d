//! Dataset Fetch Module
//! Downloads the crop production resource from the data.gov.in API and saves it as CSV.

use polars::prelude::*;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const API_BASE: &str = "https://api.data.gov.in/resource";
pub const DEFAULT_RESOURCE: &str = "35be999b-0208-4354-b557-f6ca9a5355de";

type Record = Map<String, Value>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Response has no 'records' array")]
    MissingRecords,
    #[error("Failed to build table: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to write CSV: {0}")]
    Io(#[from] std::io::Error),
}

/// What to download and where to put it.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub api_key: String,
    pub resource: String,
    pub limit: Option<usize>,
    pub output: PathBuf,
}

/// Request the resource and return its `records` array.
pub async fn fetch_records(
    client: &reqwest::Client,
    options: &FetchOptions,
) -> Result<Vec<Record>, FetchError> {
    let url = format!("{}/{}", API_BASE, options.resource);
    let mut query = vec![
        ("api-key", options.api_key.clone()),
        ("format", "json".to_string()),
    ];
    if let Some(limit) = options.limit {
        query.push(("limit", limit.to_string()));
    }

    debug!("GET {}", url);
    let response = client.get(&url).query(&query).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
    }

    let body: Value = response.json().await?;
    parse_records(body)
}

/// Pull the flat record objects out of an API response body.
pub fn parse_records(body: Value) -> Result<Vec<Record>, FetchError> {
    let Value::Object(mut body) = body else {
        return Err(FetchError::MissingRecords);
    };
    let Some(Value::Array(records)) = body.remove("records") else {
        return Err(FetchError::MissingRecords);
    };

    Ok(records
        .into_iter()
        .filter_map(|record| match record {
            Value::Object(map) => Some(flatten(map)),
            _ => None,
        })
        .collect())
}

/// Flatten nested objects into dotted keys (`a.b`).
fn flatten(record: Record) -> Record {
    let mut flat = Map::new();
    for (key, value) in record {
        match value {
            Value::Object(inner) => {
                for (inner_key, inner_value) in flatten(inner) {
                    flat.insert(format!("{}.{}", key, inner_key), inner_value);
                }
            }
            other => {
                flat.insert(key, other);
            }
        }
    }
    flat
}

fn cell_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Build a text DataFrame whose columns are the union of all record keys.
pub fn records_to_frame(records: &[Record]) -> Result<DataFrame, FetchError> {
    let mut names: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key);
            }
        }
    }

    let columns = names
        .iter()
        .map(|name| {
            let values: Vec<Option<String>> = records
                .iter()
                .map(|record| cell_text(record.get(*name)))
                .collect();
            Column::new((*name).into(), values)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Write a DataFrame as CSV, creating the parent directory if needed.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), FetchError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

/// Download the resource and save it. Returns the number of rows written.
pub async fn run(options: &FetchOptions) -> Result<usize, FetchError> {
    let client = reqwest::Client::new();
    let records = fetch_records(&client, options).await?;
    info!("✅ Fetched {} records from resource {}", records.len(), options.resource);

    let mut df = records_to_frame(&records)?;
    info!("Preview:\n{}", df.head(Some(5)));

    write_csv(&mut df, &options.output)?;
    info!("✅ Data saved as '{}'", options.output.display());

    Ok(df.height())
}
