use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KpiError {
    #[error("failed to open {path:?}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("row {row} of {path:?} has {found} fields but the header has {expected}")]
    RaggedRow {
        path: PathBuf,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("invalid config {path:?}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Every absent column, in the order the metric asked for them.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}
