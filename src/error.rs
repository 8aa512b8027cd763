use std::io;
use std::path::PathBuf;

/// Errors raised while extracting statistics or exchanging tables.
#[derive(thiserror::Error, Debug)]
pub enum PostError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read VTK file {path:?}: {message}")]
    Vtk { path: PathBuf, message: String },

    #[error("{path:?} has no inline unstructured grid piece")]
    NoInlinePiece { path: PathBuf },

    #[error("cell array '{name}' not found in {path:?}")]
    MissingArray { path: PathBuf, name: String },

    #[error("cell array '{name}' has {found} values, expected {expected}")]
    ArrayLength {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("region {region} has no cells at step {step}")]
    EmptyRegion { step: usize, region: usize },

    #[error("region {region} has zero total weight at step {step}")]
    ZeroWeight { step: usize, region: usize },

    #[error("column '{name}' not found in {path:?}")]
    MissingColumn { path: PathBuf, name: String },

    #[error("column '{name}' has {found} rows, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("malformed counts in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("CSV error on {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl PostError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PostError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        PostError::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PostError>;
