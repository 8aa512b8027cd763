use crate::config::StageConfig;
use crate::error::{PostError, Result};
use std::fs;

/// Copies every listed figure from the image folder into the article's
/// folder, overwriting older copies. Returns how many files were copied.
pub fn stage_figures(stage: &StageConfig) -> Result<usize> {
    fs::create_dir_all(&stage.destination).map_err(|e| PostError::io(&stage.destination, e))?;

    for figure in &stage.figures {
        let src = stage.source.join(figure);
        let dst = stage.destination.join(figure);
        fs::copy(&src, &dst).map_err(|e| PostError::io(&src, e))?;
        log::debug!("Copied {:?} -> {:?}", src, dst);
    }
    Ok(stage.figures.len())
}
