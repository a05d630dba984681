// src/data/mod.rs
pub mod dates;

use csv::ReaderBuilder;
use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use tracing::{debug, warn};

use crate::error::KpiError;

/// Cell values treated as missing once trimmed; the usual CSV null spellings.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

fn is_missing(raw: &str) -> bool {
    NA_MARKERS.contains(&clean_str(raw))
}

/// An issue-tracker export held in memory, one `Option<String>` per cell.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Trimmed, de-duplicated column names in file order.
    headers: Vec<String>,
    index: HashMap<String, usize>,
    /// Every row is padded to `headers.len()`.
    rows: Vec<Vec<Option<String>>>,
}

impl RecordSet {
    /// Open `path` and parse it as a comma-separated file with a header row.
    #[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, KpiError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| KpiError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Parse CSV text from any reader. `origin` only labels errors and logs.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, KpiError> {
        let csv_err = |source| KpiError::Csv {
            path: origin.to_path_buf(),
            source,
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // short rows are padded below, long rows rejected
            .from_reader(reader);

        let raw_headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let headers = dedupe_headers(raw_headers);
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();

        let width = headers.len();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(csv_err)?;
            if record.len() > width {
                return Err(KpiError::RaggedRow {
                    path: origin.to_path_buf(),
                    row: record.position().map_or(rows.len() + 2, |p| p.line() as usize),
                    found: record.len(),
                    expected: width,
                });
            }
            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|cell| (!is_missing(cell)).then(|| cell.to_string()))
                .collect();
            row.resize(width, None);
            rows.push(row);
        }

        debug!(columns = width, rows = rows.len(), "loaded record set");
        Ok(Self {
            headers,
            index,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Values of column `name` in row order; `None` marks a missing cell.
    pub fn column<'a>(
        &'a self,
        name: &str,
    ) -> Result<impl Iterator<Item = Option<&'a str>> + 'a, KpiError> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| KpiError::MissingColumns(vec![name.to_string()]))?;
        Ok(self.rows.iter().map(move |row| row[idx].as_deref()))
    }
}

/// Later repeats of a header become `name.1`, `name.2`, ... so every column
/// stays addressable.
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        if !out.contains(&name) {
            seen.insert(name.clone(), 0);
            out.push(name);
            continue;
        }
        let counter = seen.entry(name.clone()).or_insert(0);
        let renamed = loop {
            *counter += 1;
            let candidate = format!("{}.{}", name, counter);
            if !out.contains(&candidate) {
                break candidate;
            }
        };
        warn!(column = %name, renamed = %renamed, "duplicate column header");
        out.push(renamed);
    }
    out
}
