mod columns;
pub mod loader;
mod normalizer;
mod sample;
mod table;

pub use columns::{column_for_year, ColumnMarker};
pub use loader::{DatasetSource, LoadError};
pub use sample::sample_table;
pub use table::{display_key, RawColumn, RawTable, Record, Table};

use normalizer::{normalize_column_name, text_or_placeholder};
use std::collections::HashSet;
use std::ops::RangeInclusive;
use tracing::{info, warn};

pub const UNKNOWN_CODE: &str = "unknown-code";
pub const UNKNOWN_COMPANY: &str = "unknown-company";
pub const UNKNOWN_INDUSTRY: &str = "unknown-industry";
pub const UNKNOWN_DATE: &str = "unknown-date";

/// Describes where identity and year-indexed fields live in a source table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    pub code_column: String,
    pub name_column: String,
    pub industry_column: String,
    pub listing_date_column: String,
    pub rating_marker: ColumnMarker,
    pub score_marker: ColumnMarker,
    pub years: RangeInclusive<i32>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            code_column: "证券代码".to_string(),
            name_column: "证券简称".to_string(),
            industry_column: "行业分类".to_string(),
            listing_date_column: "上市日期".to_string(),
            rating_marker: ColumnMarker::new("华证ESG评级", "评级"),
            score_marker: ColumnMarker::new("_量化值", "量化值"),
            years: 2015..=2020,
        }
    }
}

impl SchemaConfig {
    pub fn with_years(mut self, years: RangeInclusive<i32>) -> Self {
        self.years = years;
        self
    }

    /// Column name the sample dataset uses for a year's rating label.
    pub fn rating_column_name(&self, year: i32) -> String {
        format!("{year}年{}", self.rating_marker.strict)
    }

    /// Column name the sample dataset uses for a year's quantified score.
    pub fn score_column_name(&self, year: i32) -> String {
        format!("{year}{}", self.score_marker.strict)
    }
}

/// Output of [`normalize`]: a well-formed table plus the discovered
/// year-indexed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDataset {
    pub table: Table,
    pub years: Vec<i32>,
    pub rating_columns: Vec<String>,
    pub score_columns: Vec<String>,
}

impl NormalizedDataset {
    pub fn rating_column(&self, year: i32) -> Option<&str> {
        column_for_year(&self.rating_columns, year)
    }

    pub fn score_column(&self, year: i32) -> Option<&str> {
        column_for_year(&self.score_columns, year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("source table has no rows")]
    Empty,
    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("year range {start}..={end} is empty")]
    EmptyYearRange { start: i32, end: i32 },
}

/// Normalizes a raw table. Never fails: any schema problem is logged and
/// answered with the built-in sample table so downstream code always sees a
/// non-empty, well-formed dataset.
pub fn normalize(raw: &RawTable, schema: &SchemaConfig) -> NormalizedDataset {
    match try_normalize(raw, schema) {
        Ok(dataset) => {
            info!(
                companies = dataset.table.len(),
                rating_columns = dataset.rating_columns.len(),
                score_columns = dataset.score_columns.len(),
                "dataset normalized"
            );
            dataset
        }
        Err(err) => {
            warn!(error = %err, "dataset normalization failed; using sample dataset");
            fallback_dataset(schema)
        }
    }
}

/// Strict variant of [`normalize`] that reports what went wrong.
pub fn try_normalize(
    raw: &RawTable,
    schema: &SchemaConfig,
) -> Result<NormalizedDataset, SchemaError> {
    if schema.years.is_empty() {
        return Err(SchemaError::EmptyYearRange {
            start: *schema.years.start(),
            end: *schema.years.end(),
        });
    }

    let rows = raw.row_count();
    if rows == 0 {
        return Err(SchemaError::Empty);
    }

    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(raw.columns().len());
    for column in raw.columns() {
        let name = normalize_column_name(&column.name);
        if column.values.len() != rows {
            return Err(SchemaError::RaggedColumn {
                column: name,
                expected: rows,
                found: column.values.len(),
            });
        }
        let name = dedupe_column_name(name, &mut seen);
        cleaned.push((name, &column.values));
    }

    let cell = |column: &str, row: usize| {
        cleaned
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, values)| values[row].as_deref())
    };

    let identity: HashSet<&str> = [
        schema.code_column.as_str(),
        schema.name_column.as_str(),
        schema.industry_column.as_str(),
        schema.listing_date_column.as_str(),
    ]
    .into_iter()
    .collect();

    let names: Vec<&str> = cleaned.iter().map(|(name, _)| name.as_str()).collect();
    let rating_columns =
        columns::discover(names.iter().copied(), &schema.rating_marker, &schema.years);
    let score_columns =
        columns::discover(names.iter().copied(), &schema.score_marker, &schema.years);

    if rating_columns.is_empty() || score_columns.is_empty() {
        warn!(
            rating_columns = rating_columns.len(),
            score_columns = score_columns.len(),
            "no year-indexed ESG columns discovered"
        );
    }

    let year_indexed: HashSet<&str> = rating_columns
        .iter()
        .chain(&score_columns)
        .map(String::as_str)
        .collect();

    let mut records = Vec::with_capacity(rows);
    for row in 0..rows {
        let mut record = Record::new(
            text_or_placeholder(cell(&schema.code_column, row), UNKNOWN_CODE),
            text_or_placeholder(cell(&schema.name_column, row), UNKNOWN_COMPANY),
            text_or_placeholder(cell(&schema.industry_column, row), UNKNOWN_INDUSTRY),
            text_or_placeholder(cell(&schema.listing_date_column, row), UNKNOWN_DATE),
        );
        for (name, values) in &cleaned {
            if identity.contains(name.as_str()) {
                continue;
            }
            let Some(value) = values[row].as_deref() else {
                continue;
            };
            let missing = if year_indexed.contains(name.as_str()) {
                normalizer::is_missing_marker(value)
            } else {
                normalizer::is_blank_cell(value)
            };
            if !missing {
                record.set_field(name.clone(), value);
            }
        }
        records.push(record);
    }

    Ok(NormalizedDataset {
        table: Table::new(records, names.into_iter().map(str::to_string).collect()),
        years: schema.years.clone().collect(),
        rating_columns,
        score_columns,
    })
}

/// Repeated headers get a `.1`, `.2`, ... suffix so every column stays
/// addressable and the first occurrence keeps the plain name.
fn dedupe_column_name(name: String, seen: &mut HashSet<String>) -> String {
    if seen.insert(name.clone()) {
        return name;
    }
    let renamed = (1..)
        .map(|n| format!("{name}.{n}"))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or_else(|| name.clone());
    warn!(column = %name, renamed = %renamed, "duplicate column header renamed");
    seen.insert(renamed.clone());
    renamed
}

fn fallback_dataset(schema: &SchemaConfig) -> NormalizedDataset {
    let schema = if schema.years.is_empty() {
        SchemaConfig {
            years: SchemaConfig::default().years,
            ..schema.clone()
        }
    } else {
        schema.clone()
    };

    let raw = sample_table(&schema);
    match try_normalize(&raw, &schema) {
        Ok(dataset) => dataset,
        // The sample table is built from the schema itself; reaching this arm
        // means the schema names collide, so keep only the anchor company.
        Err(err) => {
            warn!(error = %err, "sample dataset rejected; using single placeholder company");
            NormalizedDataset {
                table: Table::new(
                    vec![Record::new("000001", "平安银行", "金融", "1991-04-03")],
                    Vec::new(),
                ),
                years: schema.years.clone().collect(),
                rating_columns: Vec::new(),
                score_columns: Vec::new(),
            }
        }
    }
}
