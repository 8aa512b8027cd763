use crate::error::{PostError, Result};

/// Named numeric columns of equal length, in output order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(PostError::DuplicateColumn(name));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != values.len() {
                return Err(PostError::ColumnLength {
                    name,
                    expected: first.len(),
                    found: values.len(),
                });
            }
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    /// Builds `[time, <prefix>0, <prefix>1, ...]` from a `steps x regions`
    /// statistic and one time value per step.
    pub fn from_region_series(times: &[f64], stat: &[Vec<f64>], prefix: &str) -> Result<Self> {
        if times.len() != stat.len() {
            return Err(PostError::ColumnLength {
                name: "time".to_string(),
                expected: stat.len(),
                found: times.len(),
            });
        }
        let regions = stat.first().map_or(0, Vec::len);

        let mut table = Table::new();
        table.push_column("time", times.to_vec())?;
        for region in 0..regions {
            let name = format!("{}{}", prefix, region);
            let mut column = Vec::with_capacity(stat.len());
            for row in stat {
                let value = row.get(region).ok_or_else(|| PostError::ColumnLength {
                    name: name.clone(),
                    expected: regions,
                    found: row.len(),
                })?;
                column.push(*value);
            }
            table.push_column(name, column)?;
        }
        Ok(table)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn row(&self, index: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c[index]).collect()
    }
}

/// `step * time_step` for every step of a run.
pub fn time_column(steps: usize, time_step: f64) -> Vec<f64> {
    (0..steps).map(|step| step as f64 * time_step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_series_layout() {
        let stat = vec![vec![1.0, 2.0], vec![1.1, 2.1], vec![1.2, 2.2]];
        let times = time_column(3, 0.05);
        let table = Table::from_region_series(&times, &stat, "cot_").unwrap();

        assert_eq!(table.names(), ["time", "cot_0", "cot_1"]);
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.row(2), vec![0.1, 1.2, 2.2]);
        assert_eq!(table.row(1), vec![0.05, 1.1, 2.1]);
    }

    #[test]
    fn time_length_must_match_steps() {
        let stat = vec![vec![1.0], vec![2.0]];
        assert!(matches!(
            Table::from_region_series(&[0.0], &stat, "cot_"),
            Err(PostError::ColumnLength { .. })
        ));
    }

    #[test]
    fn ragged_statistics_are_rejected() {
        let stat = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(Table::from_region_series(&[0.0, 1.0], &stat, "cot_").is_err());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut table = Table::new();
        table.push_column("time", vec![0.0]).unwrap();
        assert!(matches!(
            table.push_column("time", vec![1.0]),
            Err(PostError::DuplicateColumn(_))
        ));
    }
}
