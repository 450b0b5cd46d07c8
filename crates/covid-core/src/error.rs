// File: crates/covid-core/src/error.rs
// Summary: Library error type shared by loaders, widgets and the PNG pipeline.

use std::path::PathBuf;

pub type Result<T, E = ChartError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("failed to read {}", path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV input")]
    Csv(#[from] csv::Error),

    #[error("required column `{0}` not found in header")]
    MissingColumn(&'static str),

    #[error("invalid GeoJSON: {0}")]
    Geo(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("render failed: {0}")]
    Render(&'static str),

    #[error("no monthly aggregates to draw")]
    EmptyAggregation,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
