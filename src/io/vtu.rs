use crate::config::FieldConfig;
use crate::error::{PostError, Result};
use crate::snapshot::Snapshot;
use std::fs;
use std::path::Path;
use vtkio::model::{Attribute, DataSet, Piece};
use vtkio::{IOBuffer, Vtk};

// Looks up a named cell array, either top level or nested in a field block.
fn cell_array(attributes: &[Attribute], name: &str) -> Option<IOBuffer> {
    attributes.iter().find_map(|attr| match attr {
        Attribute::DataArray(array) if array.name == name => Some(array.data.clone()),
        Attribute::Field { data_array, .. } => data_array
            .iter()
            .find(|array| array.name == name)
            .map(|array| array.data.clone()),
        _ => None,
    })
}

fn required_array(attributes: &[Attribute], name: &str, path: &Path) -> Result<IOBuffer> {
    cell_array(attributes, name).ok_or_else(|| PostError::MissingArray {
        path: path.to_path_buf(),
        name: name.to_string(),
    })
}

fn as_f64(buffer: IOBuffer, name: &str, path: &Path) -> Result<Vec<f64>> {
    buffer.cast_into::<f64>().ok_or_else(|| PostError::Vtk {
        path: path.to_path_buf(),
        message: format!("cell array '{}' is not convertible to f64", name),
    })
}

// Region ids may be stored as floats but must hold whole numbers.
fn integral_ids(values: Vec<f64>, name: &str, path: &Path) -> Result<Vec<i64>> {
    values
        .into_iter()
        .map(|v| {
            if v.is_finite() && v.fract() == 0.0 {
                Ok(v as i64)
            } else {
                Err(PostError::Vtk {
                    path: path.to_path_buf(),
                    message: format!("cell array '{}' holds non-integral id {}", name, v),
                })
            }
        })
        .collect()
}

fn as_i64(buffer: IOBuffer, name: &str, path: &Path) -> Result<Vec<i64>> {
    integral_ids(as_f64(buffer, name, path)?, name, path)
}

/// Reads the scalar, region id and weight cell arrays of one `.vtu` file.
///
/// Every inline piece of the grid is read and the arrays are concatenated
/// in piece order.
pub fn read_snapshot(path: &Path, fields: &FieldConfig) -> Result<Snapshot> {
    // missing files surface as Io whatever the format
    fs::metadata(path).map_err(|e| PostError::io(path, e))?;

    let vtk = Vtk::import(path).map_err(|e| match e {
        vtkio::Error::IO(source) => PostError::io(path, source),
        other => PostError::Vtk {
            path: path.to_path_buf(),
            message: format!("{:?}", other),
        },
    })?;

    let pieces = match vtk.data {
        DataSet::UnstructuredGrid { pieces, .. } => pieces,
        _ => {
            return Err(PostError::NoInlinePiece {
                path: path.to_path_buf(),
            });
        }
    };

    let mut scalar = Vec::new();
    let mut region = Vec::new();
    let mut weight = Vec::new();
    let mut found_piece = false;

    for piece in pieces {
        let Piece::Inline(piece) = piece else {
            continue;
        };
        found_piece = true;
        let cell = &piece.data.cell;

        scalar.extend(as_f64(
            required_array(cell, &fields.scalar, path)?,
            &fields.scalar,
            path,
        )?);
        region.extend(as_i64(
            required_array(cell, &fields.region, path)?,
            &fields.region,
            path,
        )?);
        weight.extend(as_f64(
            required_array(cell, &fields.weight, path)?,
            &fields.weight,
            path,
        )?);
    }

    if !found_piece {
        return Err(PostError::NoInlinePiece {
            path: path.to_path_buf(),
        });
    }

    log::trace!("Read {} cells from {:?}", region.len(), path);
    Snapshot::new(scalar, region, weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_float_ids_are_accepted() {
        let ids = integral_ids(vec![0.0, 1.0, 2.0], "frac_num", Path::new("a.vtu")).unwrap();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn fractional_ids_are_rejected() {
        let err = integral_ids(vec![0.0, 0.5], "frac_num", Path::new("a.vtu")).unwrap_err();
        assert!(matches!(err, PostError::Vtk { .. }));
        assert!(integral_ids(vec![f64::NAN], "frac_num", Path::new("a.vtu")).is_err());
    }
}
