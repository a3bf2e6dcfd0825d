//! Aggregation Routines Module
//! The five canned aggregations the dispatcher routes questions to.

use super::response::{Answer, CorrelationReport, YearlyComparison};
use crate::data::{compare_years, parse_year, CropTable, Datasets, RainfallTable};
use crate::stats::{GroupValue, StatsCalculator};
use std::collections::HashMap;

/// Number of groups in every top-N answer.
pub const TOP_N: usize = 5;
/// Number of trailing rows in trend and correlation answers.
pub const TAIL_ROWS: usize = 10;

/// Crops ranked by total production.
pub fn top_crops(crops: &CropTable) -> Answer {
    let rows = crops
        .records()
        .iter()
        .map(|r| (r.crop.as_deref(), r.production));
    let groups = StatsCalculator::group_sum(rows, str::cmp);
    Answer::TopCrops(StatsCalculator::top_n(groups, TOP_N))
}

/// States ranked by total production.
pub fn top_states(crops: &CropTable) -> Answer {
    let rows = crops
        .records()
        .iter()
        .map(|r| (r.state.as_deref(), r.production));
    let groups = StatsCalculator::group_sum(rows, str::cmp);
    Answer::TopStates(StatsCalculator::top_n(groups, TOP_N))
}

/// Subdivisions ranked by mean annual rainfall.
pub fn top_rainfall(rainfall: &RainfallTable) -> Answer {
    if rainfall.is_empty() {
        return Answer::RainfallNotLoaded;
    }

    let rows = rainfall
        .records()
        .iter()
        .map(|r| (r.subdivision.as_deref(), r.annual));
    let groups = StatsCalculator::group_mean(rows, str::cmp);
    Answer::TopRainfall(StatsCalculator::top_n(groups, TOP_N))
}

/// Total production per crop year, in year order.
fn yearly_production(crops: &CropTable) -> Vec<GroupValue> {
    let rows = crops
        .records()
        .iter()
        .map(|r| (r.crop_year.as_deref(), r.production));
    StatsCalculator::group_sum(rows, compare_years)
}

/// Last groups of the yearly production totals.
pub fn production_trend(crops: &CropTable) -> Answer {
    Answer::ProductionTrend(StatsCalculator::tail(yearly_production(crops), TAIL_ROWS))
}

/// Mean annual rainfall per numeric year. Years that do not parse are dropped.
fn yearly_rainfall(rainfall: &RainfallTable) -> HashMap<i64, f64> {
    let keyed: Vec<(Option<String>, Option<f64>)> = rainfall
        .records()
        .iter()
        .map(|r| {
            let year = r.year.as_deref().and_then(parse_year);
            (year.map(|y| y.to_string()), r.annual)
        })
        .collect();

    StatsCalculator::group_mean(keyed.iter().map(|(k, v)| (k.as_deref(), *v)), compare_years)
        .into_iter()
        .filter_map(|g| Some((parse_year(&g.key)?, g.value)))
        .collect()
}

/// Join yearly production with yearly rainfall, keeping production's year order.
pub fn join_by_year(crops: &CropTable, rainfall: &RainfallTable) -> Vec<YearlyComparison> {
    let rain = yearly_rainfall(rainfall);

    yearly_production(crops)
        .into_iter()
        .filter_map(|g| {
            let year = parse_year(&g.key)?;
            let annual_rainfall = *rain.get(&year)?;
            if !g.value.is_finite() || !annual_rainfall.is_finite() {
                return None;
            }
            Some(YearlyComparison {
                year,
                production: g.value,
                annual_rainfall,
            })
        })
        .collect()
}

/// Pearson correlation between yearly production and yearly rainfall.
pub fn correlation(datasets: &Datasets) -> Answer {
    if datasets.rainfall.is_empty() {
        return Answer::CorrelationNotLoaded;
    }

    let joined = join_by_year(&datasets.crops, &datasets.rainfall);
    let coefficient = if joined.len() > 1 {
        let production: Vec<f64> = joined.iter().map(|row| row.production).collect();
        let rainfall: Vec<f64> = joined.iter().map(|row| row.annual_rainfall).collect();
        StatsCalculator::pearson(&production, &rainfall)
    } else {
        None
    };

    Answer::Correlation(CorrelationReport {
        coefficient,
        rows: StatsCalculator::tail(joined, TAIL_ROWS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CropRecord, RainfallRecord};

    fn crop(state: &str, name: &str, year: &str, production: f64) -> CropRecord {
        CropRecord {
            state: Some(state.to_string()),
            crop: Some(name.to_string()),
            crop_year: Some(year.to_string()),
            production: Some(production),
        }
    }

    fn rain(subdivision: &str, year: &str, annual: Option<f64>) -> RainfallRecord {
        RainfallRecord {
            subdivision: Some(subdivision.to_string()),
            year: Some(year.to_string()),
            annual,
            ..Default::default()
        }
    }

    fn keys(groups: &[GroupValue]) -> Vec<&str> {
        groups.iter().map(|g| g.key.as_str()).collect()
    }

    #[test]
    fn test_top_crops_takes_five_largest() {
        let table = CropTable::from_records(vec![
            crop("S1", "F", "2000", 50.0),
            crop("S1", "A", "2000", 100.0),
            crop("S1", "C", "2000", 80.0),
            crop("S1", "B", "2000", 90.0),
            crop("S1", "E", "2000", 60.0),
            crop("S1", "D", "2000", 70.0),
        ]);

        let Answer::TopCrops(groups) = top_crops(&table) else {
            panic!("expected top crops");
        };
        assert_eq!(keys(&groups), vec!["A", "B", "C", "D", "E"]);
        assert!(groups.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn test_top_crops_keeps_distinct_raw_keys() {
        let table = CropTable::from_records(vec![
            crop("S1", "Rice", "2000", 100.0),
            crop("S1", "Rice ", "2000", 50.0),
            crop("S1", " ", "2000", 30.0),
        ]);

        let Answer::TopCrops(groups) = top_crops(&table) else {
            panic!("expected top crops");
        };
        assert_eq!(
            groups,
            vec![
                GroupValue::new("Rice", 100.0),
                GroupValue::new("Rice ", 50.0),
                GroupValue::new(" ", 30.0),
            ]
        );
    }

    #[test]
    fn test_top_states_sums_across_rows() {
        let table = CropTable::from_records(vec![
            crop("Punjab", "Rice", "2000", 10.0),
            crop("Kerala", "Rice", "2000", 15.0),
            crop("Punjab", "Wheat", "2001", 10.0),
        ]);

        let Answer::TopStates(groups) = top_states(&table) else {
            panic!("expected top states");
        };
        assert_eq!(groups, vec![GroupValue::new("Punjab", 20.0), GroupValue::new("Kerala", 15.0)]);
    }

    #[test]
    fn test_top_rainfall_averages_annual() {
        let table = RainfallTable::from_records(vec![
            rain("Kerala", "2000", Some(3000.0)),
            rain("Kerala", "2001", Some(2000.0)),
            rain("Punjab", "2000", Some(600.0)),
            rain("Ladakh", "2000", None),
        ]);

        let Answer::TopRainfall(groups) = top_rainfall(&table) else {
            panic!("expected top rainfall");
        };
        assert_eq!(groups, vec![GroupValue::new("Kerala", 2500.0), GroupValue::new("Punjab", 600.0)]);
    }

    #[test]
    fn test_top_rainfall_not_loaded() {
        assert_eq!(top_rainfall(&RainfallTable::default()), Answer::RainfallNotLoaded);
    }

    #[test]
    fn test_trend_is_tail_of_grouped_years() {
        // Rows arrive out of order; grouping orders them by year before slicing.
        let mut records: Vec<CropRecord> = (2001..=2012)
            .rev()
            .map(|y| crop("S", "Rice", &y.to_string(), y as f64))
            .collect();
        records.push(crop("S", "Wheat", "2012", 1.0));
        let table = CropTable::from_records(records);

        let Answer::ProductionTrend(groups) = production_trend(&table) else {
            panic!("expected trend");
        };
        assert_eq!(groups.len(), TAIL_ROWS);
        assert_eq!(groups[0].key, "2003");
        assert_eq!(groups[9], GroupValue::new("2012", 2013.0));
    }

    #[test]
    fn test_trend_with_few_years_returns_all() {
        let table = CropTable::from_records(vec![
            crop("S", "Rice", "2005", 1.0),
            crop("S", "Rice", "1999", 2.0),
        ]);

        let Answer::ProductionTrend(groups) = production_trend(&table) else {
            panic!("expected trend");
        };
        assert_eq!(keys(&groups), vec!["1999", "2005"]);
    }

    #[test]
    fn test_join_drops_unmatched_and_unparseable_years() {
        let crops = CropTable::from_records(vec![
            crop("S", "Rice", "2000", 10.0),
            crop("S", "Rice", "2001", 20.0),
            crop("S", "Rice", "unknown", 5.0),
            crop("S", "Rice", "2003", 7.0),
        ]);
        let rainfall = RainfallTable::from_records(vec![
            rain("A", "2000", Some(100.0)),
            rain("B", "2000", Some(300.0)),
            rain("A", "2001.0", Some(50.0)),
            rain("A", "2003", None),
        ]);

        let joined = join_by_year(&crops, &rainfall);
        assert_eq!(
            joined,
            vec![
                YearlyComparison { year: 2000, production: 10.0, annual_rainfall: 200.0 },
                YearlyComparison { year: 2001, production: 20.0, annual_rainfall: 50.0 },
            ]
        );
    }

    #[test]
    fn test_correlation_single_row_is_insufficient() {
        let datasets = Datasets::new(
            CropTable::from_records(vec![crop("S", "Rice", "2000", 10.0)]),
            RainfallTable::from_records(vec![rain("A", "2000", Some(100.0))]),
        );

        let Answer::Correlation(report) = correlation(&datasets) else {
            panic!("expected correlation");
        };
        assert_eq!(report.coefficient, None);
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_correlation_computed() {
        let crops = (2000..2004)
            .map(|y| crop("S", "Rice", &y.to_string(), (y - 1999) as f64))
            .collect();
        let rainfall = [1.0, 3.0, 2.0, 4.0]
            .iter()
            .enumerate()
            .map(|(i, v)| rain("A", &(2000 + i).to_string(), Some(*v)))
            .collect();
        let datasets = Datasets::new(
            CropTable::from_records(crops),
            RainfallTable::from_records(rainfall),
        );

        let Answer::Correlation(report) = correlation(&datasets) else {
            panic!("expected correlation");
        };
        assert_eq!(report.coefficient_text(), "0.80");
        assert_eq!(report.rows.len(), 4);
    }

    #[test]
    fn test_correlation_rows_are_tail_of_join() {
        let crops = (1990..2005)
            .map(|y| crop("S", "Rice", &y.to_string(), y as f64))
            .collect();
        let rainfall = (1990..2005)
            .map(|y| rain("A", &y.to_string(), Some((y % 7) as f64)))
            .collect();
        let datasets = Datasets::new(
            CropTable::from_records(crops),
            RainfallTable::from_records(rainfall),
        );

        let Answer::Correlation(report) = correlation(&datasets) else {
            panic!("expected correlation");
        };
        assert_eq!(report.rows.len(), TAIL_ROWS);
        assert_eq!(report.rows[0].year, 1995);
        let r = report.coefficient.unwrap();
        assert!((-1.0..=1.0).contains(&r));
    }

    #[test]
    fn test_correlation_not_loaded() {
        let datasets = Datasets::new(
            CropTable::from_records(vec![crop("S", "Rice", "2000", 10.0)]),
            RainfallTable::default(),
        );
        assert_eq!(correlation(&datasets), Answer::CorrelationNotLoaded);
    }
}
