use crate::dataset::{NormalizedDataset, Record};
use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 6;

/// Rating label alphabet, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RatingGrade {
    Aaa,
    Aa,
    A,
    Bbb,
    Bb,
    B,
}

impl RatingGrade {
    pub const fn ordered() -> [Self; 6] {
        [Self::Aaa, Self::Aa, Self::A, Self::Bbb, Self::Bb, Self::B]
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "AAA" => Some(Self::Aaa),
            "AA" => Some(Self::Aa),
            "A" => Some(Self::A),
            "BBB" => Some(Self::Bbb),
            "BB" => Some(Self::Bb),
            "B" => Some(Self::B),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Aaa => "AAA",
            Self::Aa => "AA",
            Self::A => "A",
            Self::Bbb => "BBB",
            Self::Bb => "BB",
            Self::B => "B",
        }
    }

    /// Position on the 1..6 chart axis. Defined independently of the
    /// quantified score and not reconciled with it.
    pub const fn chart_value(self) -> u8 {
        match self {
            Self::Aaa => 6,
            Self::Aa => 5,
            Self::A => 4,
            Self::Bbb => 3,
            Self::Bb => 2,
            Self::B => 1,
        }
    }
}

/// Plain-language band for a single year's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Leading,
    AboveAverage,
    Average,
    BelowAverage,
}

impl ScoreBand {
    pub const fn for_score(score: i64) -> Self {
        if score >= 5 {
            Self::Leading
        } else if score >= 4 {
            Self::AboveAverage
        } else if score >= 3 {
            Self::Average
        } else {
            Self::BelowAverage
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Leading => "excellent (industry leading)",
            Self::AboveAverage => "good (above average)",
            Self::Average => "medium (industry average)",
            Self::BelowAverage => "needs improvement (below average)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EsgObservation {
    pub year: i32,
    pub rating: String,
    pub score: i64,
}

impl EsgObservation {
    pub fn new(year: i32, rating: impl Into<String>, score: i64) -> Self {
        Self {
            year,
            rating: rating.into(),
            score,
        }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_score(self.score)
    }

    /// Chart value of the rating label, 0 for labels outside the alphabet.
    pub fn rating_value(&self) -> u8 {
        RatingGrade::parse(&self.rating).map_or(0, RatingGrade::chart_value)
    }
}

/// Year-ordered observations for one company. May be sparse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EsgSeries {
    observations: Vec<EsgObservation>,
}

impl EsgSeries {
    pub fn new(mut observations: Vec<EsgObservation>) -> Self {
        observations.sort_by_key(|observation| observation.year);
        Self { observations }
    }

    pub fn observations(&self) -> &[EsgObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.observations
            .iter()
            .map(|observation| observation.score as f64)
            .collect()
    }

    pub fn first(&self) -> Option<&EsgObservation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&EsgObservation> {
        self.observations.last()
    }

    /// Stand-in of at most six years ending at the last configured year and
    /// never starting before the first one, used when a company has no usable
    /// observations. Short ranges keep the tail of the shape.
    pub fn placeholder(years: &RangeInclusive<i32>) -> Self {
        const SHAPE: [(&str, i64); 6] = [
            ("BBB", 3),
            ("BBB", 3),
            ("A", 4),
            ("A", 4),
            ("AA", 5),
            ("AA", 5),
        ];
        let end = *years.end();
        let start = (end - (SHAPE.len() as i32 - 1)).max(*years.start()).min(end);
        let span = (end - start + 1) as usize;
        Self::new(
            SHAPE[SHAPE.len() - span..]
                .iter()
                .zip(start..=end)
                .map(|((rating, score), year)| EsgObservation::new(year, *rating, *score))
                .collect(),
        )
    }
}

/// Collects the company's (year, rating, score) triples. A year is skipped
/// when either column is missing, the rating is blank, or the score is not
/// an integer in 1..=6.
pub(crate) fn extract_series(record: &Record, dataset: &NormalizedDataset) -> EsgSeries {
    let mut observations = Vec::new();
    for &year in &dataset.years {
        let (Some(rating_column), Some(score_column)) =
            (dataset.rating_column(year), dataset.score_column(year))
        else {
            continue;
        };

        let (Some(rating), Some(raw_score)) =
            (record.field(rating_column), record.field(score_column))
        else {
            continue;
        };

        match parse_score(raw_score) {
            Some(score) => observations.push(EsgObservation::new(year, rating, score)),
            None => {
                debug!(code = %record.code, year, raw_score, "skipping malformed score");
            }
        }
    }

    if observations.is_empty() {
        warn!(code = %record.code, "no usable ESG observations; using placeholder series");
    }
    EsgSeries::new(observations)
}

/// Accepts `"5"` and integral decimals such as `"5.0"`.
pub(crate) fn parse_score(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let score = match raw.parse::<i64>() {
        Ok(score) => score,
        Err(_) => {
            let value = raw.parse::<f64>().ok()?;
            if !value.is_finite() || value.fract() != 0.0 {
                return None;
            }
            value as i64
        }
    };
    (MIN_SCORE..=MAX_SCORE).contains(&score).then_some(score)
}
