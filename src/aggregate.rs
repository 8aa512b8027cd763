use crate::config::FieldConfig;
use crate::error::{PostError, Result};
use crate::io::vtu::read_snapshot;
use crate::snapshot::{Snapshot, SnapshotSeries};

/// Weighted average, minimum and maximum of the scalar over one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

// Running sums for one region during the grouped pass.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    weighted_sum: f64,
    weight_sum: f64,
    min: f64,
    max: f64,
    cells: usize,
}

impl Accumulator {
    fn new() -> Self {
        Accumulator {
            weighted_sum: 0.0,
            weight_sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            cells: 0,
        }
    }

    fn add(&mut self, value: f64, weight: f64) {
        self.weighted_sum += value * weight;
        self.weight_sum += weight;
        // NaN sticks once it is in, like a masked numpy reduction
        if value.is_nan() || value < self.min {
            self.min = value;
        }
        if value.is_nan() || value > self.max {
            self.max = value;
        }
        self.cells += 1;
    }

    fn finish(self, step: usize, region: usize) -> Result<RegionStats> {
        if self.cells == 0 {
            return Err(PostError::EmptyRegion { step, region });
        }
        if self.weight_sum == 0.0 {
            return Err(PostError::ZeroWeight { step, region });
        }
        // a constant region, one cell included, averages to exactly that value
        let avg = if self.min == self.max {
            self.min
        } else {
            self.weighted_sum / self.weight_sum
        };
        Ok(RegionStats {
            avg,
            min: self.min,
            max: self.max,
        })
    }
}

fn region_index(id: i64, regions: usize) -> Option<usize> {
    usize::try_from(id).ok().filter(|&r| r < regions)
}

/// Statistics for regions `0..regions` of one snapshot, computed in a single
/// scan of the cell arrays. Cells tagged outside that range are ignored.
pub fn snapshot_stats(snapshot: &Snapshot, regions: usize, step: usize) -> Result<Vec<RegionStats>> {
    let mut acc = vec![Accumulator::new(); regions];

    for ((&id, &value), &weight) in snapshot
        .region
        .iter()
        .zip(&snapshot.scalar)
        .zip(&snapshot.weight)
    {
        if let Some(r) = region_index(id, regions) {
            acc[r].add(value, weight);
        }
    }

    acc.into_iter()
        .enumerate()
        .map(|(region, a)| a.finish(step, region))
        .collect()
}

/// Per-step, per-region statistics of a run, each stored as `steps x regions`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionSeries {
    pub avg: Vec<Vec<f64>>,
    pub min: Vec<Vec<f64>>,
    pub max: Vec<Vec<f64>>,
}

impl RegionSeries {
    pub fn with_capacity(steps: usize) -> Self {
        RegionSeries {
            avg: Vec::with_capacity(steps),
            min: Vec::with_capacity(steps),
            max: Vec::with_capacity(steps),
        }
    }

    pub fn push_step(&mut self, stats: &[RegionStats]) {
        self.avg.push(stats.iter().map(|s| s.avg).collect());
        self.min.push(stats.iter().map(|s| s.min).collect());
        self.max.push(stats.iter().map(|s| s.max).collect());
    }
}

/// Aggregates an already loaded sequence of snapshots, step `i` being the
/// `i`-th item.
pub fn series_from_snapshots<I>(snapshots: I, regions: usize) -> Result<RegionSeries>
where
    I: IntoIterator<Item = Result<Snapshot>>,
{
    let snapshots = snapshots.into_iter();
    let mut series = RegionSeries::with_capacity(snapshots.size_hint().0);
    for (step, snapshot) in snapshots.enumerate() {
        let stats = snapshot_stats(&snapshot?, regions, step)?;
        series.push_step(&stats);
    }
    Ok(series)
}

/// Reads steps `0..steps` of `series` one file at a time and aggregates the
/// scalar field per region.
pub fn region_statistics(
    series: &SnapshotSeries,
    fields: &FieldConfig,
    steps: usize,
    regions: usize,
) -> Result<RegionSeries> {
    let snapshots = (0..steps).map(|step| {
        let path = series.path(step);
        log::debug!("Aggregating step {} from {:?}", step, path);
        read_snapshot(&path, fields)
    });
    series_from_snapshots(snapshots, regions)
}

/// Cell count of each region followed by the total over all regions.
pub fn cell_counts(snapshot: &Snapshot, regions: usize) -> Vec<u64> {
    let mut counts = vec![0u64; regions + 1];
    for &id in &snapshot.region {
        if let Some(r) = region_index(id, regions) {
            counts[r] += 1;
        }
    }
    counts[regions] = counts[..regions].iter().sum();
    counts
}

/// Region cell counts of a run, taken from step 0 since the partition does
/// not change between steps.
pub fn count_cells(series: &SnapshotSeries, fields: &FieldConfig, regions: usize) -> Result<Vec<u64>> {
    let snapshot = read_snapshot(&series.path(0), fields)?;
    Ok(cell_counts(&snapshot, regions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(scalar: &[f64], region: &[i64], weight: &[f64]) -> Snapshot {
        Snapshot::new(scalar.to_vec(), region.to_vec(), weight.to_vec()).unwrap()
    }

    #[test]
    fn uniform_value_is_preserved() {
        let s = snapshot(&[2.5; 6], &[0, 1, 2, 0, 1, 2], &[0.3; 6]);
        let stats = snapshot_stats(&s, 3, 0).unwrap();
        for st in stats {
            assert!((st.avg - 2.5).abs() < 1e-12);
            assert_eq!(st.min, 2.5);
            assert_eq!(st.max, 2.5);
        }
    }

    #[test]
    fn weights_shift_the_average() {
        let s = snapshot(&[1.0, 3.0], &[0, 0], &[3.0, 1.0]);
        let stats = snapshot_stats(&s, 1, 0).unwrap();
        assert!((stats[0].avg - 1.5).abs() < 1e-12);
        assert_eq!(stats[0].min, 1.0);
        assert_eq!(stats[0].max, 3.0);
    }

    #[test]
    fn single_cell_region() {
        let s = snapshot(&[4.0, 7.25], &[0, 1], &[1.0, 0.2]);
        let stats = snapshot_stats(&s, 2, 0).unwrap();
        assert_eq!(
            stats[1],
            RegionStats {
                avg: 7.25,
                min: 7.25,
                max: 7.25
            }
        );
    }

    #[test]
    fn constant_region_average_is_exact() {
        for (value, weight) in [(7.25, 0.2), (0.1, 3.0), (1.0 / 3.0, 0.7)] {
            let s = snapshot(&[value, value], &[0, 0], &[weight, weight / 3.0]);
            let stats = snapshot_stats(&s, 1, 0).unwrap();
            assert_eq!(stats[0].avg, value);
        }
    }

    #[test]
    fn empty_region_is_an_error() {
        let s = snapshot(&[1.0, 2.0], &[0, 0], &[1.0, 1.0]);
        let err = snapshot_stats(&s, 2, 4).unwrap_err();
        assert!(matches!(err, PostError::EmptyRegion { step: 4, region: 1 }));
    }

    #[test]
    fn zero_weight_is_an_error() {
        let s = snapshot(&[1.0, 2.0], &[0, 1], &[1.0, 0.0]);
        let err = snapshot_stats(&s, 2, 0).unwrap_err();
        assert!(matches!(err, PostError::ZeroWeight { step: 0, region: 1 }));
    }

    #[test]
    fn nan_propagates_to_all_three() {
        let s = snapshot(&[1.0, f64::NAN, 3.0], &[0, 0, 0], &[1.0, 1.0, 1.0]);
        let stats = snapshot_stats(&s, 1, 0).unwrap();
        assert!(stats[0].avg.is_nan());
        assert!(stats[0].min.is_nan());
        assert!(stats[0].max.is_nan());
    }

    #[test]
    fn unclassified_cells_are_ignored() {
        let s = snapshot(&[1.0, 100.0, 2.0], &[0, -1, 5], &[1.0, 1.0, 1.0]);
        let stats = snapshot_stats(&s, 1, 0).unwrap();
        assert_eq!(stats[0].max, 1.0);
        assert_eq!(cell_counts(&s, 1), vec![1, 1]);
    }

    #[test]
    fn counts_end_with_total() {
        let s = snapshot(&[0.0; 7], &[0, 1, 1, 2, 2, 2, 0], &[1.0; 7]);
        let counts = cell_counts(&s, 3);
        assert_eq!(counts, vec![2, 2, 3, 7]);
        assert_eq!(counts[..3].iter().sum::<u64>(), counts[3]);
    }

    #[test]
    fn series_stops_at_first_failing_step() {
        let good = snapshot(&[1.0], &[0], &[1.0]);
        let bad = snapshot(&[1.0], &[1], &[1.0]);
        let err = series_from_snapshots(vec![Ok(good), Ok(bad)], 1).unwrap_err();
        assert!(matches!(err, PostError::EmptyRegion { step: 1, region: 0 }));
    }
}
