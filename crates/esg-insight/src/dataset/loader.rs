use super::normalizer::is_blank_cell;
use super::sample::sample_table;
use super::table::RawTable;
use super::SchemaConfig;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Locations probed for the ESG export when no explicit path is configured.
pub const DEFAULT_DATA_PATHS: [&str; 3] = [
    "esg_quant_data.csv",
    "./data/esg_quant_data.csv",
    "../esg_quant_data.csv",
];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read ESG export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ESG CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset contains no companies")]
    NoCompanies,
}

/// Where the raw table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Sample,
}

impl DatasetSource {
    /// Loads `explicit` when given, otherwise the first existing default
    /// location, otherwise the built-in sample. Only an explicit path that
    /// fails to load is reported as an error.
    pub fn discover(
        explicit: Option<&Path>,
        schema: &SchemaConfig,
    ) -> Result<(RawTable, DatasetSource), LoadError> {
        if let Some(path) = explicit {
            let table = read_path(path)?;
            info!(path = %path.display(), rows = table.row_count(), "loaded ESG export");
            return Ok((table, DatasetSource::File(path.to_path_buf())));
        }

        for candidate in DEFAULT_DATA_PATHS {
            let path = Path::new(candidate);
            if !path.is_file() {
                continue;
            }
            match read_path(path) {
                Ok(table) => {
                    info!(path = %path.display(), rows = table.row_count(), "loaded ESG export");
                    return Ok((table, DatasetSource::File(path.to_path_buf())));
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable ESG export");
                }
            }
        }

        warn!("no ESG export found; running on the built-in sample dataset");
        Ok((sample_table(schema), DatasetSource::Sample))
    }

    pub fn label(&self) -> String {
        match self {
            DatasetSource::File(path) => path.display().to_string(),
            DatasetSource::Sample => "built-in sample".to_string(),
        }
    }
}

pub fn read_path<P: AsRef<Path>>(path: P) -> Result<RawTable, LoadError> {
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Reads a headered CSV export into a column-major [`RawTable`].
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected. Short
/// rows are padded with missing cells and surplus cells are dropped.
pub fn read_csv<R: Read>(mut reader: R) -> Result<RawTable, LoadError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = String::from_utf8_lossy(&bytes);

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for record in csv_reader.records() {
        let record = record?;
        for (index, column) in columns.iter_mut().enumerate() {
            let value = record
                .get(index)
                .filter(|value| !is_blank_cell(value))
                .map(str::to_string);
            column.push(value);
        }
    }

    let mut table = RawTable::new();
    for (name, values) in headers.into_iter().zip(columns) {
        table.push_column(name, values);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn reads_columns_and_missing_cells() {
        let csv = "证券代码,证券简称,2015_量化值\n000001,平安银行,5\n000002,,NaN\n000003\n";
        let table = read_csv(Cursor::new(csv)).expect("parse");

        assert_eq!(table.row_count(), 3);
        let columns = table.columns();
        assert_eq!(columns[0].name, "证券代码");
        assert_eq!(columns[1].values[1], None);
        assert_eq!(columns[2].values[0].as_deref(), Some("5"));
        assert_eq!(columns[2].values[1], None);
        assert_eq!(columns[2].values[2], None);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let mut bytes = b"code,name\n1,".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.push(b'\n');
        let table = read_csv(Cursor::new(bytes)).expect("parse");
        let name = table.columns()[1].values[0].clone().expect("name present");
        assert!(name.contains('\u{fffd}'));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let error = DatasetSource::discover(
            Some(Path::new("./does-not-exist.csv")),
            &SchemaConfig::default(),
        )
        .expect_err("expected io error");

        match error {
            LoadError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn explicit_path_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "证券代码,证券简称\n000001,平安银行").expect("write csv");

        let (table, source) = DatasetSource::discover(Some(file.path()), &SchemaConfig::default())
            .expect("loads");
        assert_eq!(table.row_count(), 1);
        assert_eq!(source, DatasetSource::File(file.path().to_path_buf()));
    }
}
