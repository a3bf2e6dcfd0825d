//! Query Response Module
//! The fixed answer shapes and their JSON rendering.

use crate::stats::GroupValue;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const CROP_SOURCE: &str =
    "📊 Data source: District-wise, season-wise crop production statistics (data.gov.in)";
pub const RAINFALL_SOURCE: &str = "📊 Data source: India Meteorological Department (data.gov.in)";
pub const CORRELATION_SOURCES: [&str; 2] = [
    "Crop Data: District-wise crop production (data.gov.in)",
    "Rainfall Data: IMD Rainfall Dataset (data.gov.in)",
];

pub const CROP_NOT_LOADED: &str = "⚠️ Crop data not loaded yet.";
pub const RAINFALL_NOT_LOADED: &str =
    "⚠️ Rainfall dataset not loaded. Please ensure the IMD CSV is available in /data folder.";
pub const CORRELATION_NOT_LOADED: &str =
    "⚠️ Rainfall dataset not loaded. Cannot perform correlation.";
pub const INSUFFICIENT_DATA: &str = "Insufficient overlapping years for correlation";
pub const FALLBACK: &str = "❓ Sorry, I couldn’t understand that. Try asking about *top crops*, \
                            *state comparison*, *rainfall trends*, or *crop-rainfall correlation*.";

/// Production and rainfall for one year present in both tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyComparison {
    #[serde(rename = "YEAR")]
    pub year: i64,
    #[serde(rename = "production_")]
    pub production: f64,
    #[serde(rename = "ANNUAL")]
    pub annual_rainfall: f64,
}

/// Outcome of the rainfall/production correlation.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationReport {
    /// `None` when there are too few overlapping years to compute it.
    pub coefficient: Option<f64>,
    /// Tail of the joined yearly table.
    pub rows: Vec<YearlyComparison>,
}

impl CorrelationReport {
    /// Coefficient with two decimals, or the insufficient-data sentinel.
    pub fn coefficient_text(&self) -> String {
        match self.coefficient {
            Some(r) => format!("{:.2}", r),
            None => INSUFFICIENT_DATA.to_string(),
        }
    }
}

/// Every answer the dispatcher can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    CropDataNotLoaded,
    RainfallNotLoaded,
    CorrelationNotLoaded,
    TopCrops(Vec<GroupValue>),
    TopStates(Vec<GroupValue>),
    TopRainfall(Vec<GroupValue>),
    ProductionTrend(Vec<GroupValue>),
    Correlation(CorrelationReport),
    Fallback,
}

impl Answer {
    /// Human-readable answer sentence.
    pub fn text(&self) -> String {
        match self {
            Answer::CropDataNotLoaded => CROP_NOT_LOADED.to_string(),
            Answer::RainfallNotLoaded => RAINFALL_NOT_LOADED.to_string(),
            Answer::CorrelationNotLoaded => CORRELATION_NOT_LOADED.to_string(),
            Answer::TopCrops(_) => "🌾 Top 5 crops by total production:".to_string(),
            Answer::TopStates(_) => "🏙️ Top 5 states by total crop production:".to_string(),
            Answer::TopRainfall(_) => {
                "🌧️ Top 5 regions in India with highest average annual rainfall:".to_string()
            }
            Answer::ProductionTrend(_) => {
                "📈 Crop production trend over the last 10 years (sample data):".to_string()
            }
            Answer::Correlation(report) => format!(
                "📊 Correlation between rainfall and total crop production (yearly): {}",
                report.coefficient_text()
            ),
            Answer::Fallback => FALLBACK.to_string(),
        }
    }

    /// Render to the `/ask` wire shape.
    pub fn into_response(self) -> AskResponse {
        let answer = self.text();
        let (data, source) = match self {
            Answer::TopCrops(groups) | Answer::TopStates(groups) | Answer::ProductionTrend(groups) => (
                Some(AnswerData::Totals(RankedTotals(groups))),
                Some(Source::Single(CROP_SOURCE)),
            ),
            Answer::TopRainfall(groups) => (
                Some(AnswerData::Totals(RankedTotals(groups))),
                Some(Source::Single(RAINFALL_SOURCE)),
            ),
            Answer::Correlation(report) => (
                Some(AnswerData::Rows(report.rows)),
                Some(Source::Multiple(CORRELATION_SOURCES.to_vec())),
            ),
            Answer::CropDataNotLoaded
            | Answer::RainfallNotLoaded
            | Answer::CorrelationNotLoaded
            | Answer::Fallback => (None, None),
        };

        AskResponse {
            answer,
            data,
            source,
        }
    }
}

/// JSON body returned by `/ask`.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AnswerData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnswerData {
    Totals(RankedTotals),
    Rows(Vec<YearlyComparison>),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Source {
    Single(&'static str),
    Multiple(Vec<&'static str>),
}

/// Group totals serialized as a JSON object that keeps the ranking order.
#[derive(Debug)]
pub struct RankedTotals(pub Vec<GroupValue>);

impl Serialize for RankedTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in &self.0 {
            map.serialize_entry(&group.key, &group.value)?;
        }
        map.end()
    }
}
