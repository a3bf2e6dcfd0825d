//! Query Dispatcher Module
//! Routes a free-text question to the first routine whose keywords it contains.

use super::response::Answer;
use super::routines;
use crate::data::Datasets;
use tracing::debug;

/// Which routine a question was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    TopCrops,
    TopStates,
    TopRainfall,
    ProductionTrend,
    Correlation,
    Unknown,
}

type Predicate = fn(&str) -> bool;

fn asks_top_crops(q: &str) -> bool {
    q.contains("top crops") || q.contains("most produced")
}

fn asks_states(q: &str) -> bool {
    q.contains("compare") || q.contains("states")
}

fn asks_rainfall_only(q: &str) -> bool {
    q.contains("rainfall") && !(q.contains("correlate") || q.contains("crop"))
}

fn asks_trend(q: &str) -> bool {
    q.contains("trend") || q.contains("year")
}

fn asks_correlation(q: &str) -> bool {
    q.contains("correlate") || (q.contains("rainfall") && q.contains("crop"))
}

/// Checked in order; the first match wins.
const ROUTES: [(Predicate, Intent); 5] = [
    (asks_top_crops, Intent::TopCrops),
    (asks_states, Intent::TopStates),
    (asks_rainfall_only, Intent::TopRainfall),
    (asks_trend, Intent::ProductionTrend),
    (asks_correlation, Intent::Correlation),
];

/// Stateless keyword router over the loaded datasets.
pub struct QueryDispatcher;

impl QueryDispatcher {
    /// Classify a question. Matching is case-insensitive substring search.
    pub fn classify(question: &str) -> Intent {
        let question = question.to_lowercase();
        ROUTES
            .iter()
            .find(|(matches, _)| matches(&question))
            .map(|(_, intent)| *intent)
            .unwrap_or(Intent::Unknown)
    }

    /// Answer a question against the datasets.
    pub fn answer(question: &str, datasets: &Datasets) -> Answer {
        if datasets.crops.is_empty() {
            return Answer::CropDataNotLoaded;
        }

        let intent = Self::classify(question);
        debug!("Routed question to {:?}", intent);

        match intent {
            Intent::TopCrops => routines::top_crops(&datasets.crops),
            Intent::TopStates => routines::top_states(&datasets.crops),
            Intent::TopRainfall => routines::top_rainfall(&datasets.rainfall),
            Intent::ProductionTrend => routines::production_trend(&datasets.crops),
            Intent::Correlation => routines::correlation(datasets),
            Intent::Unknown => Answer::Fallback,
        }
    }
}
