use super::table::RawTable;
use super::SchemaConfig;
use chrono::{Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SAMPLE_SEED: u64 = 42;
const SAMPLE_SIZE: usize = 100;
const INDUSTRIES: [&str; 5] = ["金融", "制造", "科技", "能源", "消费"];
const RATINGS: [(&str, f64); 5] = [
    ("AAA", 0.1),
    ("AA", 0.3),
    ("A", 0.3),
    ("BBB", 0.2),
    ("BB", 0.1),
];

/// Companies that always head the sample table.
const ANCHORS: [(&str, &str, &str, &str); 5] = [
    ("000001", "平安银行", "1991-04-03", "金融"),
    ("000002", "万科A", "1991-01-29", "地产"),
    ("000003", "贵州茅台", "2001-08-27", "消费"),
    ("000004", "美的集团", "2013-09-18", "制造"),
    ("000005", "格力电器", "1996-11-18", "制造"),
];

/// Deterministic stand-in dataset used when no data file can be found or the
/// supplied table cannot be normalized. Uses the column layout described by
/// `schema`, so it flows through normalization like any real export.
pub fn sample_table(schema: &SchemaConfig) -> RawTable {
    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);

    let mut codes = Vec::with_capacity(SAMPLE_SIZE);
    let mut names = Vec::with_capacity(SAMPLE_SIZE);
    let mut listed = Vec::with_capacity(SAMPLE_SIZE);
    let mut industries = Vec::with_capacity(SAMPLE_SIZE);

    for (code, name, listing_date, industry) in ANCHORS {
        codes.push(Some(code.to_string()));
        names.push(Some(name.to_string()));
        listed.push(Some(listing_date.to_string()));
        industries.push(Some(industry.to_string()));
    }

    for index in ANCHORS.len()..SAMPLE_SIZE {
        codes.push(Some(format!("{}", 600_000 + index)));
        names.push(Some(format!("企业{index:02}")));
        listed.push(Some(month_end(index - ANCHORS.len())));
        let industry = INDUSTRIES[rng.gen_range(0..INDUSTRIES.len())];
        industries.push(Some(industry.to_string()));
    }

    let mut table = RawTable::new()
        .with_column(schema.code_column.clone(), codes)
        .with_column(schema.name_column.clone(), names)
        .with_column(schema.listing_date_column.clone(), listed)
        .with_column(schema.industry_column.clone(), industries);

    for year in schema.years.clone() {
        let ratings: Vec<Option<String>> = (0..SAMPLE_SIZE)
            .map(|_| Some(weighted_rating(&mut rng).to_string()))
            .collect();
        let scores: Vec<Option<String>> = (0..SAMPLE_SIZE)
            .map(|_| Some(rng.gen_range(1..=6).to_string()))
            .collect();
        table.push_column(schema.rating_column_name(year), ratings);
        table.push_column(schema.score_column_name(year), scores);
    }

    table
}

fn weighted_rating(rng: &mut StdRng) -> &'static str {
    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (label, weight) in RATINGS {
        cumulative += weight;
        if draw < cumulative {
            return label;
        }
    }
    RATINGS[RATINGS.len() - 1].0
}

// Month-end listing dates starting at 2000-01-31.
fn month_end(offset: usize) -> String {
    let first = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    let month_start = first
        .checked_add_months(Months::new(offset as u32))
        .unwrap_or(first);
    let next_month = month_start
        .checked_add_months(Months::new(1))
        .unwrap_or(month_start);
    let last_day = next_month.pred_opt().unwrap_or(month_start);
    last_day.format("%Y-%m-%d").to_string()
}
