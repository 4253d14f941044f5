use serde::Serialize;

/// Four ordered bands derived from a company's average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Excellent,
    Good,
    Medium,
    NeedsImprovement,
}

/// Descriptive attributes attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierProfile {
    pub level: &'static str,
    pub foundation: &'static str,
    pub cycle: &'static str,
    pub risk: &'static str,
    pub industry_rank: &'static str,
}

const EXCELLENT: TierProfile = TierProfile {
    level: "excellent",
    foundation: "strong",
    cycle: "6-12 months",
    risk: "low",
    industry_rank: "top 10%",
};

const GOOD: TierProfile = TierProfile {
    level: "good",
    foundation: "fairly strong",
    cycle: "12-24 months",
    risk: "medium-low",
    industry_rank: "top 30%",
};

const MEDIUM: TierProfile = TierProfile {
    level: "medium",
    foundation: "average",
    cycle: "12-24 months",
    risk: "medium",
    industry_rank: "top 50%",
};

const NEEDS_IMPROVEMENT: TierProfile = TierProfile {
    level: "needs improvement",
    foundation: "weak",
    cycle: "24-36 months",
    risk: "high",
    industry_rank: "bottom 50%",
};

impl Tier {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Excellent,
            Self::Good,
            Self::Medium,
            Self::NeedsImprovement,
        ]
    }

    /// Lower bounds are inclusive: 4.0 is good, 3.0 is medium.
    pub fn from_average(average: f64) -> Self {
        if average >= 5.0 {
            Self::Excellent
        } else if average >= 4.0 {
            Self::Good
        } else if average >= 3.0 {
            Self::Medium
        } else {
            Self::NeedsImprovement
        }
    }

    pub const fn profile(self) -> &'static TierProfile {
        match self {
            Self::Excellent => &EXCELLENT,
            Self::Good => &GOOD,
            Self::Medium => &MEDIUM,
            Self::NeedsImprovement => &NEEDS_IMPROVEMENT,
        }
    }

    pub const fn label(self) -> &'static str {
        self.profile().level
    }

    /// Leading tiers aim for a smaller score uplift.
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Excellent | Self::Good)
    }
}
