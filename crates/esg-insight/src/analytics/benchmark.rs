use crate::dataset::NormalizedDataset;
use serde::Serialize;

/// Benchmark used when no peer value is available.
pub const DEFAULT_BENCHMARK: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Above,
    Equal,
    Below,
}

impl Comparison {
    pub fn between(latest: f64, benchmark: f64) -> Self {
        if latest > benchmark {
            Self::Above
        } else if latest == benchmark {
            Self::Equal
        } else {
            Self::Below
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Equal => "equal to",
            Self::Below => "below",
        }
    }
}

/// Latest-year scores of same-industry companies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryBenchmark {
    pub industry: String,
    pub year: i32,
    pub column: Option<String>,
    pub mean: f64,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub peer_count: usize,
    /// Share of peers scoring at or above the company, in percent.
    pub percentile: Option<f64>,
    pub comparison: Comparison,
}

impl IndustryBenchmark {
    /// Peers include the company itself, matching how the figure is read in
    /// the report ("industry average").
    pub fn compute(dataset: &NormalizedDataset, industry: &str, year: i32, latest: f64) -> Self {
        let column = dataset.score_column(year).map(str::to_string);
        let values: Vec<f64> = match column.as_deref() {
            Some(column) => dataset
                .table
                .industry_peers(industry)
                .filter_map(|record| record.field(column))
                .filter_map(|value| value.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
                .collect(),
            None => Vec::new(),
        };

        Self::from_values(industry, year, column, &values, latest)
    }

    pub fn from_values(
        industry: &str,
        year: i32,
        column: Option<String>,
        values: &[f64],
        latest: f64,
    ) -> Self {
        let mean = if values.is_empty() {
            DEFAULT_BENCHMARK
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        let max = values.iter().copied().reduce(f64::max);
        let min = values.iter().copied().reduce(f64::min);
        let percentile = (!values.is_empty()).then(|| {
            let at_or_above = values.iter().filter(|value| **value >= latest).count();
            at_or_above as f64 / values.len() as f64 * 100.0
        });

        Self {
            industry: industry.to_string(),
            year,
            column,
            mean,
            max,
            min,
            peer_count: values.len(),
            percentile,
            comparison: Comparison::between(latest, mean),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peers_three_four_five_against_five() {
        let benchmark =
            IndustryBenchmark::from_values("Finance", 2020, None, &[3.0, 4.0, 5.0], 5.0);
        assert_eq!(benchmark.mean, 4.0);
        assert_eq!(benchmark.comparison, Comparison::Above);
        assert_eq!(benchmark.max, Some(5.0));
        assert_eq!(benchmark.min, Some(3.0));
        assert_eq!(benchmark.peer_count, 3);
        let percentile = benchmark.percentile.expect("percentile");
        assert!((percentile - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn no_peers_defaults_to_three() {
        let benchmark = IndustryBenchmark::from_values("Energy", 2020, None, &[], 3.0);
        assert_eq!(benchmark.mean, DEFAULT_BENCHMARK);
        assert_eq!(benchmark.comparison, Comparison::Equal);
        assert_eq!(benchmark.percentile, None);
    }

    #[test]
    fn comparison_is_strict() {
        assert_eq!(Comparison::between(3.0, 3.5), Comparison::Below);
        assert_eq!(Comparison::between(4.0, 4.0), Comparison::Equal);
    }
}
