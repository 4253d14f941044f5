use serde::Serialize;

const FAST_THRESHOLD: f64 = 0.2;
const MIN_POINTS: usize = 3;
// Grid the fitted slope is snapped to before classification.
const SLOPE_RESOLUTION: f64 = 1e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    FastRising,
    SlowRising,
    Stable,
    SlowFalling,
    FastFalling,
}

impl TrendDirection {
    /// Boundary values fall into the milder class: exactly 0.2 is slow
    /// rising and exactly -0.2 is slow falling.
    pub fn classify(slope: f64) -> Self {
        if slope > FAST_THRESHOLD {
            Self::FastRising
        } else if slope > 0.0 {
            Self::SlowRising
        } else if slope < -FAST_THRESHOLD {
            Self::FastFalling
        } else if slope < 0.0 {
            Self::SlowFalling
        } else {
            Self::Stable
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FastRising => "fast rising",
            Self::SlowRising => "slow rising",
            Self::Stable => "stable",
            Self::SlowFalling => "slow falling",
            Self::FastFalling => "fast falling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub slope: f64,
    pub direction: TrendDirection,
}

impl Trend {
    /// Least-squares slope of `scores` against their index. Fewer than three
    /// points count as stable with a zero slope.
    pub fn fit(scores: &[f64]) -> Self {
        let slope = if scores.len() >= MIN_POINTS {
            snap(least_squares_slope(scores))
        } else {
            0.0
        };
        Self {
            slope,
            direction: TrendDirection::classify(slope),
        }
    }
}

fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let (covariance, variance) = values.iter().enumerate().fold(
        (0.0, 0.0),
        |(covariance, variance), (index, value)| {
            let dx = index as f64 - mean_x;
            (covariance + dx * (value - mean_y), variance + dx * dx)
        },
    );

    if variance == 0.0 {
        0.0
    } else {
        covariance / variance
    }
}

fn snap(slope: f64) -> f64 {
    let snapped = (slope * SLOPE_RESOLUTION).round() / SLOPE_RESOLUTION;
    // avoid reporting -0.0
    if snapped == 0.0 {
        0.0
    } else {
        snapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_resolve_to_milder_class() {
        assert_eq!(TrendDirection::classify(0.2), TrendDirection::SlowRising);
        assert_eq!(TrendDirection::classify(0.2000001), TrendDirection::FastRising);
        assert_eq!(TrendDirection::classify(-0.2), TrendDirection::SlowFalling);
        assert_eq!(TrendDirection::classify(-0.2000001), TrendDirection::FastFalling);
        assert_eq!(TrendDirection::classify(0.0), TrendDirection::Stable);
    }

    #[test]
    fn fitted_slope_of_exactly_two_tenths_is_slow_rising() {
        // index 0..5 against these scores has a slope of exactly 0.2
        let trend = Trend::fit(&[3.0, 3.0, 3.0, 3.0, 4.0]);
        assert_eq!(trend.slope, 0.2);
        assert_eq!(trend.direction, TrendDirection::SlowRising);

        let trend = Trend::fit(&[4.0, 3.0, 3.0, 3.0, 3.0]);
        assert_eq!(trend.slope, -0.2);
        assert_eq!(trend.direction, TrendDirection::SlowFalling);
    }

    #[test]
    fn rising_series_fits_expected_slope() {
        let trend = Trend::fit(&[4.0, 5.0, 5.0]);
        assert_eq!(trend.slope, 0.5);
        assert_eq!(trend.direction, TrendDirection::FastRising);
    }

    #[test]
    fn short_or_flat_series_is_stable() {
        assert_eq!(Trend::fit(&[1.0, 6.0]).direction, TrendDirection::Stable);
        assert_eq!(Trend::fit(&[]).slope, 0.0);
        let flat = Trend::fit(&[4.0, 4.0, 4.0, 4.0]);
        assert_eq!(flat.slope, 0.0);
        assert_eq!(flat.direction, TrendDirection::Stable);
    }
}
