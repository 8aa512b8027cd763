use crate::snapshot::SnapshotSeries;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Names of the cell arrays read from each snapshot
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub scalar: String,
    pub region: String,
    pub weight: String,
}

impl FieldConfig {
    pub fn new(scalar: &str) -> Self {
        FieldConfig {
            scalar: scalar.to_string(),
            region: "frac_num".to_string(),
            weight: "cell_volumes".to_string(),
        }
    }
}

/// Batch description loaded from TOML. Every key is optional; the defaults
/// describe the upwind transport batch (3 methods, 3 grids, 21 runs each).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub methods: Vec<String>,
    pub grids: Vec<String>,
    pub runs_per_grid: usize,
    pub field: String,
    pub steps: usize,
    pub time_step: f64,
    pub regions: usize,
    pub snapshot_prefix: String,
    pub padding: usize,
    pub output_suffix: String,
    pub label_prefix: String,
    pub fail_fast: bool,
    pub stage: Option<StageConfig>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            input_root: PathBuf::from("./"),
            output_root: PathBuf::from("./CSV/"),
            methods: vec!["MVEM".to_string(), "Tpfa".to_string(), "RT0".to_string()],
            grids: vec!["1k".to_string(), "3k".to_string(), "10k".to_string()],
            runs_per_grid: 21,
            field: "scalar".to_string(),
            steps: 300,
            time_step: 0.05,
            regions: 3,
            snapshot_prefix: "solution_2_".to_string(),
            padding: SnapshotSeries::DEFAULT_PADDING,
            output_suffix: "_UPWIND".to_string(),
            label_prefix: "cot_".to_string(),
            fail_fast: false,
            stage: None,
        }
    }
}

/// Figures copied into the article's image folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub figures: Vec<String>,
}

impl BatchConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config {:?}", path))
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn fields(&self) -> FieldConfig {
        FieldConfig::new(&self.field)
    }

    /// Every (method, grid, run) combination, grouped by method then grid,
    /// runs numbered from 1.
    pub fn runs(&self) -> Vec<RunDescriptor> {
        let mut runs = Vec::with_capacity(self.methods.len() * self.grids.len() * self.runs_per_grid);
        for method in &self.methods {
            for grid in &self.grids {
                for index in 1..=self.runs_per_grid {
                    runs.push(RunDescriptor {
                        method: method.clone(),
                        grid: grid.clone(),
                        index,
                    });
                }
            }
        }
        runs
    }
}

/// One simulation run and the folder convention locating its files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunDescriptor {
    pub method: String,
    pub grid: String,
    pub index: usize,
}

impl std::fmt::Display for RunDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/run {}", self.method, self.grid, self.index)
    }
}

impl RunDescriptor {
    pub fn input_dir(&self, config: &BatchConfig) -> PathBuf {
        config.input_root.join(format!(
            "solution_{}_{}_{}",
            self.method, self.grid, self.index
        ))
    }

    pub fn snapshots(&self, config: &BatchConfig) -> SnapshotSeries {
        SnapshotSeries::new(self.input_dir(config), &config.snapshot_prefix)
            .with_padding(config.padding)
    }

    pub fn dof_flow_file(&self, config: &BatchConfig) -> PathBuf {
        self.input_dir(config).join("dof_flow.csv")
    }

    pub fn dof_transport_file(&self, config: &BatchConfig) -> PathBuf {
        self.input_dir(config).join("dof_transport.csv")
    }

    pub fn outflow_file(&self, config: &BatchConfig) -> PathBuf {
        self.input_dir(config).join("outflow.csv")
    }

    /// Output folder shared by every grid and run of this method.
    pub fn output_dir(&self, config: &BatchConfig) -> PathBuf {
        method_output_dir(config, &self.method)
    }

    /// `<stat>_<run>_<grid>.csv`, e.g. `Cmean_3_10k.csv`.
    pub fn stat_file(&self, config: &BatchConfig, stat: &str) -> PathBuf {
        self.output_dir(config)
            .join(format!("{}_{}_{}.csv", stat, self.index, self.grid))
    }

    pub fn production_file(&self, config: &BatchConfig) -> PathBuf {
        self.stat_file(config, "production")
    }
}

pub fn method_output_dir(config: &BatchConfig, method: &str) -> PathBuf {
    config
        .output_root
        .join(format!("{}{}", method, config.output_suffix))
}

/// `<name>_<grid>.csv` in the method's output folder.
pub fn grid_file(config: &BatchConfig, method: &str, name: &str, grid: &str) -> PathBuf {
    method_output_dir(config, method).join(format!("{}_{}.csv", name, grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let config = BatchConfig::from_toml("steps = 10\nmethods = [\"Tpfa\"]\n").unwrap();
        assert_eq!(config.steps, 10);
        assert_eq!(config.methods, vec!["Tpfa"]);
        assert_eq!(config.regions, 3);
        assert_eq!(config.padding, 6);
        assert!(config.stage.is_none());
    }

    #[test]
    fn runs_are_numbered_from_one() {
        let config = BatchConfig {
            methods: vec!["RT0".to_string()],
            grids: vec!["1k".to_string(), "3k".to_string()],
            runs_per_grid: 2,
            ..BatchConfig::default()
        };
        let runs = config.runs();
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0].index, 1);
        assert_eq!(runs[3].grid, "3k");
        assert_eq!(runs[3].index, 2);
    }

    #[test]
    fn paths_follow_folder_convention() {
        let config = BatchConfig {
            input_root: PathBuf::from("data"),
            output_root: PathBuf::from("CSV"),
            ..BatchConfig::default()
        };
        let run = RunDescriptor {
            method: "MVEM".to_string(),
            grid: "10k".to_string(),
            index: 4,
        };
        assert_eq!(
            run.snapshots(&config).path(12),
            Path::new("data/solution_MVEM_10k_4/solution_2_000012.vtu")
        );
        assert_eq!(
            run.stat_file(&config, "Cmin"),
            Path::new("CSV/MVEM_UPWIND/Cmin_4_10k.csv")
        );
        assert_eq!(
            run.production_file(&config),
            Path::new("CSV/MVEM_UPWIND/production_4_10k.csv")
        );
        assert_eq!(
            grid_file(&config, "MVEM", "numdofF", "10k"),
            Path::new("CSV/MVEM_UPWIND/numdofF_10k.csv")
        );
    }

    #[test]
    fn stage_section_is_parsed() {
        let config = BatchConfig::from_toml(
            "[stage]\nsource = \"img\"\ndestination = \"paper\"\nfigures = [\"label.pdf\"]\n",
        )
        .unwrap();
        let stage = config.stage.unwrap();
        assert_eq!(stage.figures, vec!["label.pdf"]);
    }
}
