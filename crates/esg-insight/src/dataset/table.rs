use serde::Serialize;
use std::collections::BTreeMap;

/// Column-major table as handed over by the data-loading layer.
///
/// Cells are raw text; `None` marks a missing value. Columns keep their
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<RawColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<Option<String>>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column<N, I, V>(mut self, name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = Option<V>>,
        V: Into<String>,
    {
        self.push_column(name, values);
        self
    }

    pub fn push_column<N, I, V>(&mut self, name: N, values: I)
    where
        N: Into<String>,
        I: IntoIterator<Item = Option<V>>,
        V: Into<String>,
    {
        self.columns.push(RawColumn {
            name: name.into(),
            values: values.into_iter().map(|value| value.map(Into::into)).collect(),
        });
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Row count as seen by the first column.
    pub fn row_count(&self) -> usize {
        self.columns
            .first()
            .map(|column| column.values.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// One listed company after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub code: String,
    pub name: String,
    pub industry: String,
    pub listing_date: String,
    pub display_key: String,
    #[serde(skip)]
    pub(crate) fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        industry: impl Into<String>,
        listing_date: impl Into<String>,
    ) -> Self {
        let code = code.into();
        let name = name.into();
        let industry = industry.into();
        let display_key = display_key(&name, &code, &industry);
        Self {
            code,
            name,
            industry,
            listing_date: listing_date.into(),
            display_key,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(column, value);
        self
    }

    /// Blank values are not stored, so `field` never yields an empty string.
    pub fn set_field(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            self.fields.insert(column.into(), trimmed.to_string());
        }
    }

    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// Search key shown to users: `name(code)-industry`.
pub fn display_key(name: &str, code: &str, industry: &str) -> String {
    format!("{name}({code})-{industry}")
}

/// Normalized, read-only company table. Never empty once produced by
/// [`normalize`](super::normalize).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
    columns: Vec<String>,
}

impl Table {
    pub fn new(records: Vec<Record>, columns: Vec<String>) -> Self {
        Self { records, columns }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every column name of the source table, trimmed, in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn display_keys(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.display_key.clone())
            .collect()
    }

    /// Display keys in lexical order, the listing order offered for selection.
    pub fn sorted_display_keys(&self) -> Vec<String> {
        let mut keys = self.display_keys();
        keys.sort();
        keys
    }

    pub fn industry_peers<'a>(&'a self, industry: &'a str) -> impl Iterator<Item = &'a Record> {
        self.records
            .iter()
            .filter(move |record| record.industry == industry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_builds_display_key_and_skips_blank_fields() {
        let record = Record::new("000001", "PingAn Bank", "Finance", "1991-04-03")
            .with_field("2020_score", " 5 ")
            .with_field("2019_score", "   ");

        assert_eq!(record.display_key, "PingAn Bank(000001)-Finance");
        assert_eq!(record.field("2020_score"), Some("5"));
        assert_eq!(record.field("2019_score"), None);
    }

    #[test]
    fn raw_table_reports_rows_from_first_column() {
        let table = RawTable::new()
            .with_column("code", [Some("1"), Some("2")])
            .with_column("name", [Some("a"), None]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["code", "name"]);
        assert!(RawTable::new().is_empty());
    }
}
