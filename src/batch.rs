use crate::aggregate::{count_cells, region_statistics};
use crate::config::{BatchConfig, RunDescriptor, grid_file};
use crate::error::{PostError, Result};
use crate::io::csv::{read_dof_counts, write_csv, write_int_rows};
use crate::io::results::{BatchReport, GroupCounts, RunFailure, RunSummary};
use crate::table::{Table, time_column};
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::fs;

/// Extracts one run: three statistics tables, cell and DOF counts, and the
/// copied outflow file.
pub fn process_run(config: &BatchConfig, run: &RunDescriptor) -> Result<RunSummary> {
    let fields = config.fields();
    let series = run.snapshots(config);

    let stats = region_statistics(&series, &fields, config.steps, config.regions)?;
    let times = time_column(config.steps, config.time_step);

    let mut nan_rows = 0;
    for (name, stat) in [("Cmin", &stats.min), ("Cmax", &stats.max), ("Cmean", &stats.avg)] {
        let table = Table::from_region_series(&times, stat, &config.label_prefix)?;
        let report = write_csv(&run.stat_file(config, name), &table)?;
        if !report.is_clean() {
            log::warn!("{}: {} has {} NaN rows", run, name, report.nan_rows.len());
        }
        nan_rows += report.nan_rows.len();
    }

    let cells = count_cells(&series, &fields, config.regions)?;
    let dof_flow = read_dof_counts(&run.dof_flow_file(config))?;
    let dof_transport = read_dof_counts(&run.dof_transport_file(config))?;

    let outflow = run.outflow_file(config);
    fs::copy(&outflow, run.production_file(config)).map_err(|e| PostError::io(&outflow, e))?;

    Ok(RunSummary {
        run: run.clone(),
        cells,
        dof_flow,
        dof_transport,
        nan_rows,
    })
}

fn write_group(config: &BatchConfig, method: &str, grid: &str, counts: &GroupCounts) -> Result<()> {
    write_int_rows(&grid_file(config, method, "num_cells", grid), &counts.cells)?;
    write_int_rows(&grid_file(config, method, "numdofF", grid), &counts.dof_flow)?;
    write_int_rows(&grid_file(config, method, "numdofT", grid), &counts.dof_transport)?;
    Ok(())
}

/// Processes `runs` in order. A failed run is recorded and the batch moves
/// on, or stops there when `fail_fast` is set. Count tables of a
/// (method, grid) group are only written when all of its runs succeeded.
pub fn run_batch(
    config: &BatchConfig,
    runs: &[RunDescriptor],
    fail_fast: bool,
    pb: &ProgressBar,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    let mut groups: Vec<((String, String), GroupCounts)> = Vec::new();
    let mut group_index: HashMap<(String, String), usize> = HashMap::new();

    for run in runs {
        pb.set_message(run.to_string());
        let key = (run.method.clone(), run.grid.clone());
        let slot = *group_index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, GroupCounts::default()));
            groups.len() - 1
        });

        match process_run(config, run) {
            Ok(summary) => {
                log::info!("Finished {}", run);
                groups[slot].1.add(&summary);
                report.completed.push(summary);
            }
            Err(error) => {
                log::error!("Run {} failed: {}", run, error);
                groups[slot].1.failed = true;
                report.failed.push(RunFailure {
                    run: run.clone(),
                    error,
                });
                if fail_fast {
                    pb.abandon();
                    break;
                }
            }
        }
        pb.inc(1);
    }

    for ((method, grid), counts) in &groups {
        if counts.failed {
            log::warn!(
                "Skipping count tables for {}/{}: not every run succeeded",
                method,
                grid
            );
            continue;
        }
        write_group(config, method, grid, counts)?;
    }

    if !pb.is_finished() {
        pb.finish_and_clear();
    }
    Ok(report)
}
