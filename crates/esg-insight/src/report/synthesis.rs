use super::document::Report;
use super::sanitize::sanitize;
use super::templates::{template_for, FOCUS_AREAS, IMPLEMENTATION_PHASES, RISKS};
use crate::analytics::{AnalyticsResult, EsgSeries};
use crate::dataset::Record;

pub const PROFILE_SECTION: &str = "1. Company Profile";
pub const ASSESSMENT_SECTION: &str = "2. Comprehensive ESG Assessment";
pub const STRATEGY_SECTION: &str = "3. Digital Transformation Strategy";
pub const RISK_SECTION: &str = "4. Risks and Expected Benefits";
pub const CONCLUSION_SECTION: &str = "5. Conclusion";

pub fn report_title(name: &str, code: &str) -> String {
    format!("{name}({code}) ESG Digital Transformation Analysis Report")
}

/// Turns analytics into the narrative report. Every text is sanitized before
/// it leaves this function.
pub fn synthesize(record: &Record, analytics: &AnalyticsResult, series: &EsgSeries) -> Report {
    let mut report = Report::new(
        report_title(&record.name, &record.code),
        record.name.clone(),
        record.code.clone(),
    );
    report.spacer();

    company_profile(&mut report, record, analytics, series);
    assessment(&mut report, record, analytics);
    strategy(&mut report, analytics);
    risks_and_benefits(&mut report, analytics);
    conclusion(&mut report, record, analytics);

    report.map_text(sanitize)
}

fn company_profile(
    report: &mut Report,
    record: &Record,
    analytics: &AnalyticsResult,
    series: &EsgSeries,
) {
    let coverage = match (series.first(), series.last()) {
        (Some(first), Some(last)) => format!("{}-{}", first.year, last.year),
        _ => format!(
            "{}-{}",
            analytics.summary.first_year, analytics.summary.latest_year
        ),
    };

    report
        .section(PROFILE_SECTION)
        .item(format!("Company name: {}", record.name))
        .item(format!("Stock code: {}", record.code))
        .item(format!("Industry: {}", record.industry))
        .item(format!("Listing date: {}", record.listing_date))
        .item(format!("Data coverage: ESG ratings for {coverage}"));
    if analytics.placeholder_series {
        report.item("Note: no usable yearly ESG data was found; reference values are shown");
    }
    report.spacer();
}

fn assessment(report: &mut Report, record: &Record, analytics: &AnalyticsResult) {
    let summary = &analytics.summary;
    let profile = &analytics.profile;
    let benchmark = &analytics.benchmark;

    report
        .section(ASSESSMENT_SECTION)
        .sub_heading("2.1 Overall Level")
        .body(format!(
            "{}'s average ESG score is {:.1} out of 6, a {} level within the {} industry, ranking in the industry {}, with a {} foundation for sustainable development.",
            record.name, summary.average, profile.level, record.industry, profile.industry_rank, profile.foundation
        ))
        .sub_heading("2.2 Key Indicators")
        .item(format!("Average score: {:.1}", summary.average))
        .item(format!("Highest score: {} ({})", summary.max, summary.max_year))
        .item(format!("Lowest score: {} ({})", summary.min, summary.min_year))
        .item(format!("Latest score: {} ({})", summary.latest, summary.latest_year))
        .item(format!("Industry average: {:.1}", benchmark.mean))
        .item(format!(
            "Industry comparison: {} the industry average",
            benchmark.comparison.label()
        ))
        .item(format!(
            "Trend: {} (slope {:.2})",
            analytics.trend.direction.label(),
            analytics.trend.slope
        ));

    if let (Some(max), Some(min), Some(percentile)) =
        (benchmark.max, benchmark.min, benchmark.percentile)
    {
        report.item(format!(
            "Industry range in {}: {:.1} to {:.1} across {} companies; {:.0}% of peers score at or above the company",
            benchmark.year, min, max, benchmark.peer_count, percentile
        ));
    }

    let ratings = &analytics.ratings;
    report
        .sub_heading("2.3 Rating Analysis")
        .item(format!(
            "Dominant rating: {} ({} times)",
            ratings.dominant, ratings.dominant_count
        ))
        .item(format!(
            "Latest rating: {} ({})",
            ratings.latest, summary.latest_year
        ))
        .item(format!("Rating stability: {}", ratings.stability.label()))
        .spacer();
}

fn strategy(report: &mut Report, analytics: &AnalyticsResult) {
    let template = template_for(analytics.tier);

    report
        .section(STRATEGY_SECTION)
        .sub_heading("3.1 Strategic Positioning")
        .body(template.positioning)
        .sub_heading("3.2 Implementation Path");
    for phase in IMPLEMENTATION_PHASES {
        report.item(phase);
    }
    report.sub_heading("3.3 Focus Areas");
    for area in FOCUS_AREAS {
        report.item(area);
    }
    report.spacer();
}

fn risks_and_benefits(report: &mut Report, analytics: &AnalyticsResult) {
    let profile = &analytics.profile;

    report.section(RISK_SECTION).sub_heading(format!(
        "4.1 Main Risks (risk level: {})",
        profile.risk
    ));
    for risk in RISKS {
        report.item(risk);
    }

    report
        .sub_heading("4.2 Expected Benefits")
        .item("Efficiency: ESG management efficiency up 30%-50%, with less manual work")
        .item("Quality: data accuracy above 95% and more stable rating results")
        .item("Decision support: data-driven ESG decisions for management")
        .item(format!(
            "Rating uplift: ESG rating expected to rise 1-2 grades within {}, with the score improving by {:.1} or more",
            profile.cycle,
            analytics.expected_uplift()
        ))
        .item("Value creation: stronger ESG brand value and investor confidence")
        .spacer();
}

fn conclusion(report: &mut Report, record: &Record, analytics: &AnalyticsResult) {
    let profile = &analytics.profile;
    let template = template_for(analytics.tier);

    report
        .section(CONCLUSION_SECTION)
        .body(format!(
            "{}'s ESG score shows a {} trend and currently sits at a {} level, in the {} of the {} industry. Digital ESG transformation is recommended within {}, focusing on {}, to lift ESG management and lay a solid foundation for sustainable growth.",
            record.name,
            analytics.trend.direction.label(),
            profile.level,
            profile.industry_rank,
            record.industry,
            profile.cycle,
            template.focus
        ))
        .body(format!("Core recommendation: {}", template.core_recommendation));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{analyze, Tier};
    use crate::dataset::{NormalizedDataset, Table};
    use crate::report::BlockKind;

    fn dataset_with(record: Record) -> NormalizedDataset {
        NormalizedDataset {
            table: Table::new(vec![record], Vec::new()),
            years: (2015..=2020).collect(),
            rating_columns: (2015..=2020).map(|year| format!("{year}_rating")).collect(),
            score_columns: (2015..=2020).map(|year| format!("{year}_score")).collect(),
        }
    }

    fn pingan() -> Record {
        Record::new("000001", "PingAn Bank", "Finance", "1991-04-03")
            .with_field("2018_rating", "A")
            .with_field("2018_score", "4")
            .with_field("2019_rating", "AA")
            .with_field("2019_score", "5")
            .with_field("2020_rating", "AA")
            .with_field("2020_score", "5")
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let record = pingan();
        let dataset = dataset_with(record.clone());
        let (series, analytics) = analyze(&record, &dataset);
        let report = synthesize(&record, &analytics, &series);

        let sections: Vec<&str> = report
            .blocks()
            .iter()
            .filter(|block| block.kind == BlockKind::Section)
            .map(|block| block.text.as_str())
            .collect();
        assert_eq!(
            sections,
            vec![
                PROFILE_SECTION,
                ASSESSMENT_SECTION,
                STRATEGY_SECTION,
                RISK_SECTION,
                CONCLUSION_SECTION
            ]
        );
        assert_eq!(report.blocks()[0].kind, BlockKind::Title);
        assert_eq!(
            report.title,
            "PingAn Bank(000001) ESG Digital Transformation Analysis Report"
        );
    }

    #[test]
    fn strategy_text_follows_tier() {
        let record = pingan();
        let dataset = dataset_with(record.clone());
        let (series, mut analytics) = analyze(&record, &dataset);

        for tier in Tier::ordered() {
            analytics.tier = tier;
            analytics.profile = *tier.profile();
            let report = synthesize(&record, &analytics, &series);
            let strategy = report.section_text(STRATEGY_SECTION);
            assert!(strategy.contains(template_for(tier).positioning));
            assert!(report
                .section_text(RISK_SECTION)
                .contains(tier.profile().risk));
        }
    }

    #[test]
    fn text_is_sanitized() {
        let record = Record::new("000009", "Star★Corp", "Tech#", "2001-01-01");
        let dataset = dataset_with(record.clone());
        let (series, analytics) = analyze(&record, &dataset);
        let report = synthesize(&record, &analytics, &series);

        assert!(report.blocks().iter().all(|block| !block.text.contains('★')));
        assert_eq!(report.company_name, "StarCorp");
        assert!(report.section_text(PROFILE_SECTION).contains("Industry: Tech"));
    }
}
