//! Per-company ESG analytics: yearly series extraction, summary statistics,
//! trend fitting, tier classification and industry benchmarking.
//!
//! Everything here is a pure function of the normalized dataset. Missing or
//! malformed data never aborts a computation; it degrades to documented
//! defaults instead (placeholder series, benchmark of 3).

mod benchmark;
mod series;
mod tier;
mod trend;

pub use benchmark::{Comparison, IndustryBenchmark, DEFAULT_BENCHMARK};
pub use series::{EsgObservation, EsgSeries, RatingGrade, ScoreBand, MAX_SCORE, MIN_SCORE};
pub use tier::{Tier, TierProfile};
pub use trend::{Trend, TrendDirection};

use crate::dataset::{NormalizedDataset, Record};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub average: f64,
    pub max: i64,
    pub max_year: i32,
    pub min: i64,
    pub min_year: i32,
    pub latest: i64,
    pub latest_year: i32,
    pub first_year: i32,
}

impl ScoreSummary {
    fn from_series(series: &EsgSeries) -> Option<Self> {
        let observations = series.observations();
        let first = observations.first()?;
        let latest = observations.last()?;

        let mut max = first;
        let mut min = first;
        for observation in observations {
            if observation.score > max.score {
                max = observation;
            }
            if observation.score < min.score {
                min = observation;
            }
        }

        let total: i64 = observations.iter().map(|observation| observation.score).sum();
        Some(Self {
            average: total as f64 / observations.len() as f64,
            max: max.score,
            max_year: max.year,
            min: min.score,
            min_year: min.year,
            latest: latest.score,
            latest_year: latest.year,
            first_year: first.year,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingStability {
    Stable,
    Volatile,
}

impl RatingStability {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Volatile => "volatile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingProfile {
    pub dominant: String,
    pub dominant_count: usize,
    pub latest: String,
    pub distinct: usize,
    pub stability: RatingStability,
}

impl RatingProfile {
    fn from_series(series: &EsgSeries) -> Option<Self> {
        let observations = series.observations();
        let latest = observations.last()?.rating.clone();

        // first-seen order keeps ties deterministic
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for observation in observations {
            match counts
                .iter_mut()
                .find(|(label, _)| *label == observation.rating)
            {
                Some((_, count)) => *count += 1,
                None => counts.push((observation.rating.as_str(), 1)),
            }
        }

        let (dominant, dominant_count) = counts
            .iter()
            .fold(None::<(&str, usize)>, |best, &(label, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((label, count)),
            })?;

        let stability = if counts.len() <= 2 {
            RatingStability::Stable
        } else {
            RatingStability::Volatile
        };

        Some(Self {
            dominant: dominant.to_string(),
            dominant_count,
            latest,
            distinct: counts.len(),
            stability,
        })
    }
}

/// Derived view of one company's ESG history. Built per query and dropped
/// once the report is rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsResult {
    pub summary: ScoreSummary,
    pub trend: Trend,
    pub tier: Tier,
    pub profile: TierProfile,
    pub benchmark: IndustryBenchmark,
    pub ratings: RatingProfile,
    /// True when the company had no usable observations and the fixed
    /// placeholder series stood in.
    pub placeholder_series: bool,
}

impl AnalyticsResult {
    pub fn comparison(&self) -> Comparison {
        self.benchmark.comparison
    }

    /// Expected score uplift once the transformation lands.
    pub fn expected_uplift(&self) -> f64 {
        if self.tier.is_leading() {
            0.5
        } else {
            1.0
        }
    }
}

/// Builds the company's series and analytics. Never fails: an empty series
/// is replaced by [`EsgSeries::placeholder`].
pub fn analyze(record: &Record, dataset: &NormalizedDataset) -> (EsgSeries, AnalyticsResult) {
    let extracted = series::extract_series(record, dataset);
    let placeholder_series = extracted.is_empty();
    let series = if placeholder_series {
        EsgSeries::placeholder(&year_range(dataset))
    } else {
        extracted
    };

    let analytics = analyze_series(record, dataset, &series, placeholder_series);
    (series, analytics)
}

fn analyze_series(
    record: &Record,
    dataset: &NormalizedDataset,
    series: &EsgSeries,
    placeholder_series: bool,
) -> AnalyticsResult {
    let summary = ScoreSummary::from_series(series).unwrap_or_else(|| fallback_summary(dataset));
    let ratings = RatingProfile::from_series(series).unwrap_or_else(|| RatingProfile {
        dominant: "BBB".to_string(),
        dominant_count: 0,
        latest: "BBB".to_string(),
        distinct: 0,
        stability: RatingStability::Stable,
    });

    let trend = Trend::fit(&series.scores());
    let tier = Tier::from_average(summary.average);
    let benchmark = IndustryBenchmark::compute(
        dataset,
        &record.industry,
        summary.latest_year,
        summary.latest as f64,
    );

    AnalyticsResult {
        summary,
        trend,
        tier,
        profile: *tier.profile(),
        benchmark,
        ratings,
        placeholder_series,
    }
}

// Only reachable if the placeholder series itself is empty.
fn fallback_summary(dataset: &NormalizedDataset) -> ScoreSummary {
    let year = dataset.last_year().unwrap_or(2020);
    ScoreSummary {
        average: 3.0,
        max: 4,
        max_year: year,
        min: 2,
        min_year: year,
        latest: 3,
        latest_year: year,
        first_year: year,
    }
}

fn year_range(dataset: &NormalizedDataset) -> std::ops::RangeInclusive<i32> {
    match (dataset.years.first(), dataset.years.last()) {
        (Some(first), Some(last)) => *first..=*last,
        _ => 2015..=2020,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Table;

    fn dataset(records: Vec<Record>) -> NormalizedDataset {
        NormalizedDataset {
            table: Table::new(records, Vec::new()),
            years: (2015..=2020).collect(),
            rating_columns: (2015..=2020).map(|year| format!("{year}_rating")).collect(),
            score_columns: (2015..=2020).map(|year| format!("{year}_score")).collect(),
        }
    }

    fn company(code: &str, industry: &str, cells: &[(i32, &str, &str)]) -> Record {
        let mut record = Record::new(code, format!("Company {code}"), industry, "2000-01-31");
        for (year, rating, score) in cells {
            record.set_field(format!("{year}_rating"), *rating);
            record.set_field(format!("{year}_score"), *score);
        }
        record
    }

    #[test]
    fn sparse_years_are_skipped_not_imputed() {
        let record = company(
            "1",
            "Finance",
            &[(2015, "A", "4"), (2016, "", "5"), (2017, "AA", "x"), (2018, "AA", "5")],
        );
        let data = dataset(vec![record.clone()]);
        let (series, analytics) = analyze(&record, &data);

        let years: Vec<i32> = series.observations().iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2015, 2018]);
        assert!(!analytics.placeholder_series);
        assert_eq!(analytics.trend.direction, TrendDirection::Stable);
    }

    #[test]
    fn empty_history_uses_placeholder_series() {
        let record = company("1", "Finance", &[]);
        let data = dataset(vec![record.clone()]);
        let (series, analytics) = analyze(&record, &data);

        assert_eq!(series.len(), 6);
        assert!(analytics.placeholder_series);
        assert_eq!(analytics.summary.average, 4.0);
        assert_eq!(analytics.tier, Tier::Good);
        assert_eq!(analytics.summary.latest_year, 2020);
        // nobody has a 2020 score, so the benchmark falls back
        assert_eq!(analytics.benchmark.mean, DEFAULT_BENCHMARK);
        assert_eq!(analytics.comparison(), Comparison::Above);
    }

    #[test]
    fn placeholder_follows_configured_window() {
        let record = company("1", "Finance", &[]);
        let data = NormalizedDataset {
            years: vec![2019, 2020],
            ..dataset(vec![record.clone()])
        };
        let (series, analytics) = analyze(&record, &data);

        assert!(analytics.placeholder_series);
        assert_eq!(series.first().map(|o| o.year), Some(2019));
        assert_eq!(analytics.summary.first_year, 2019);
        assert_eq!(analytics.summary.latest_year, 2020);
    }

    #[test]
    fn summary_tracks_extremes_and_latest() {
        let record = company(
            "1",
            "Finance",
            &[(2016, "BBB", "3"), (2017, "AA", "5"), (2018, "BB", "2"), (2019, "AA", "5")],
        );
        let data = dataset(vec![record.clone()]);
        let (_, analytics) = analyze(&record, &data);
        let summary = &analytics.summary;

        assert_eq!((summary.max, summary.max_year), (5, 2017));
        assert_eq!((summary.min, summary.min_year), (2, 2018));
        assert_eq!((summary.latest, summary.latest_year), (5, 2019));
        assert_eq!(summary.first_year, 2016);
        assert_eq!(summary.average, 3.75);
        assert_eq!(analytics.tier, Tier::Medium);
    }

    #[test]
    fn rating_profile_reports_mode_and_stability() {
        let record = company(
            "1",
            "Finance",
            &[(2015, "A", "4"), (2016, "AA", "5"), (2017, "A", "4"), (2018, "BBB", "3")],
        );
        let data = dataset(vec![record.clone()]);
        let (_, analytics) = analyze(&record, &data);

        assert_eq!(analytics.ratings.dominant, "A");
        assert_eq!(analytics.ratings.dominant_count, 2);
        assert_eq!(analytics.ratings.latest, "BBB");
        assert_eq!(analytics.ratings.stability, RatingStability::Volatile);
    }

    #[test]
    fn benchmark_uses_latest_year_of_same_industry() {
        let target = company("1", "Finance", &[(2019, "A", "4"), (2020, "AA", "5")]);
        let data = dataset(vec![
            target.clone(),
            company("2", "Finance", &[(2020, "A", "4")]),
            company("3", "Finance", &[(2020, "BBB", "3")]),
            company("4", "Energy", &[(2020, "AAA", "6")]),
            company("5", "Finance", &[(2019, "AAA", "6")]),
        ]);
        let (_, analytics) = analyze(&target, &data);

        assert_eq!(analytics.benchmark.year, 2020);
        assert_eq!(analytics.benchmark.peer_count, 3);
        assert_eq!(analytics.benchmark.mean, 4.0);
        assert_eq!(analytics.comparison(), Comparison::Above);
    }

    #[test]
    fn leading_tiers_expect_smaller_uplift() {
        let record = company("1", "Finance", &[(2015, "AAA", "6"), (2016, "AAA", "6")]);
        let data = dataset(vec![record.clone()]);
        let (_, analytics) = analyze(&record, &data);
        assert_eq!(analytics.tier, Tier::Excellent);
        assert_eq!(analytics.expected_uplift(), 0.5);
    }
}
