use crate::error::{PostError, Result};
use std::path::{Path, PathBuf};

/// Per-cell arrays of one time step, the only parts of a snapshot the
/// aggregation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub scalar: Vec<f64>,
    pub region: Vec<i64>,
    pub weight: Vec<f64>,
}

impl Snapshot {
    pub fn new(scalar: Vec<f64>, region: Vec<i64>, weight: Vec<f64>) -> Result<Self> {
        let expected = region.len();
        if scalar.len() != expected {
            return Err(PostError::ArrayLength {
                name: "scalar".to_string(),
                expected,
                found: scalar.len(),
            });
        }
        if weight.len() != expected {
            return Err(PostError::ArrayLength {
                name: "weight".to_string(),
                expected,
                found: weight.len(),
            });
        }
        Ok(Snapshot {
            scalar,
            region,
            weight,
        })
    }
}

/// Numbered sequence of snapshot files: `<dir>/<prefix><step>.vtu` with the
/// step zero-padded to `padding` digits.
#[derive(Debug, Clone)]
pub struct SnapshotSeries {
    pub dir: PathBuf,
    pub prefix: String,
    pub padding: usize,
}

impl SnapshotSeries {
    pub const DEFAULT_PADDING: usize = 6;

    pub fn new(dir: impl AsRef<Path>, prefix: &str) -> Self {
        SnapshotSeries {
            dir: dir.as_ref().to_path_buf(),
            prefix: prefix.to_string(),
            padding: Self::DEFAULT_PADDING,
        }
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn path(&self, step: usize) -> PathBuf {
        self.dir.join(format!(
            "{}{:0width$}.vtu",
            self.prefix,
            step,
            width = self.padding
        ))
    }
}
