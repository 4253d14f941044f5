use crate::analytics::Tier;

/// Tier-keyed narrative fragments. Tiers differ only in text, so a lookup
/// table is all the dispatch needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierTemplate {
    pub positioning: &'static str,
    pub core_recommendation: &'static str,
    pub focus: &'static str,
}

static TEMPLATES: [(Tier, TierTemplate); 4] = [
    (
        Tier::Excellent,
        TierTemplate {
            positioning: "As an ESG leader, the company should build an industry benchmark for digital ESG management, establishing an ESG data platform and an AI-driven risk early-warning system to lead ESG development in its industry.",
            core_recommendation: "Maintain the leading position and keep innovating.",
            focus: "digital innovation",
        },
    ),
    (
        Tier::Good,
        TierTemplate {
            positioning: "As a company with good ESG performance, it should streamline data collection and set up visual management dashboards to further raise the digital maturity of ESG management.",
            core_recommendation: "Consolidate existing strengths and accelerate improvement.",
            focus: "digital innovation",
        },
    ),
    (
        Tier::Medium,
        TierTemplate {
            positioning: "As a company with medium ESG performance, it should strengthen its data foundation, deploy standardized management software, and advance digital transformation in phases with a focus on data quality.",
            core_recommendation: "Focus on foundations and improve steadily.",
            focus: "data quality improvement",
        },
    ),
    (
        Tier::NeedsImprovement,
        TierTemplate {
            positioning: "As a company whose ESG performance needs improvement, it should first close data gaps, adopt lightweight tools, and lift ESG management step by step starting from basic data management.",
            core_recommendation: "Carry out comprehensive remediation and build solid foundations.",
            focus: "data quality improvement",
        },
    ),
];

pub fn template_for(tier: Tier) -> &'static TierTemplate {
    TEMPLATES
        .iter()
        .find(|(candidate, _)| *candidate == tier)
        .map(|(_, template)| template)
        .unwrap_or(&TEMPLATES[TEMPLATES.len() - 1].1)
}

pub const IMPLEMENTATION_PHASES: [&str; 3] = [
    "Preparation phase (1-3 months): current-state survey, requirements analysis, solution design, team setup",
    "Implementation phase (3-12 months): system deployment, data migration, staff training, pilot operation",
    "Optimization phase (12-24 months): impact assessment, continuous improvement, end-to-end digitalization",
];

pub const FOCUS_AREAS: [&str; 3] = [
    "Data collection: build automated ESG data collection to improve accuracy and timeliness",
    "Risk monitoring: build an ESG risk early-warning model to identify and respond to ESG risks in time",
    "Performance evaluation: establish a digital ESG performance evaluation system and track improvements regularly",
];

pub const RISKS: [&str; 4] = [
    "Technology risk: poor system selection can cause compatibility issues; choose a mature ESG management system",
    "Data risk: low data quality undermines analysis results; establish data quality controls",
    "Adoption risk: limited digital skills slow the rollout; strengthen training and internal communication",
    "Investment risk: the transformation requires significant spending; invest in phases and control costs",
];

/// Fixed advisory lines printed by the minimal fallback document.
pub const ADVISORY_LINES: [&str; 2] = [
    "Overall ESG performance provides a foundation for digital transformation.",
    "Digital transformation is recommended to be completed within 12-24 months.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_has_its_own_positioning() {
        let positions: Vec<&str> = Tier::ordered()
            .iter()
            .map(|tier| template_for(*tier).positioning)
            .collect();
        for (index, text) in positions.iter().enumerate() {
            assert!(!text.is_empty());
            assert!(positions[index + 1..].iter().all(|other| other != text));
        }
    }

    #[test]
    fn lower_tiers_focus_on_data_quality() {
        assert_eq!(template_for(Tier::Medium).focus, "data quality improvement");
        assert_eq!(template_for(Tier::Excellent).focus, "digital innovation");
    }
}
