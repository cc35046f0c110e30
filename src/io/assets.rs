//! Layer asset naming and discovery

use crate::io::configuration::IMAGE_EXTENSION;
use crate::io::error::{Result, file_system};
use std::path::{Path, PathBuf};

/// File name of the layer image for an option, with all whitespace removed
pub fn asset_file_name(option: &str) -> String {
    let stem: String = option.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{stem}.{IMAGE_EXTENSION}")
}

/// Location of the layer image for a category option
pub fn asset_path(assets_dir: &Path, category: &str, option: &str) -> PathBuf {
    assets_dir.join(category).join(asset_file_name(option))
}

/// Number of layer images in each category sub-folder, sorted by folder name
///
/// # Errors
///
/// Returns an error if the assets directory or one of its sub-folders can't be read
pub fn layer_counts(assets_dir: &Path) -> Result<Vec<(String, usize)>> {
    let mut counts = Vec::new();

    for entry in std::fs::read_dir(assets_dir).map_err(file_system(assets_dir, "read assets"))? {
        let path = entry.map_err(file_system(assets_dir, "read assets"))?.path();
        if !path.is_dir() {
            continue;
        }

        let mut images = 0;
        for layer in std::fs::read_dir(&path).map_err(file_system(&path, "read assets"))? {
            let layer_path = layer.map_err(file_system(&path, "read assets"))?.path();
            if layer_path.extension().and_then(|s| s.to_str()) == Some(IMAGE_EXTENSION) {
                images += 1;
            }
        }

        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        counts.push((name, images));
    }

    counts.sort();
    Ok(counts)
}

/// Maximum distinct collection size the asset folders allow
///
/// The product of image counts across category sub-folders, saturating at `usize::MAX`.
/// A directory without sub-folders allows nothing.
///
/// # Errors
///
/// Returns an error if the assets directory can't be read
pub fn max_collection_size(assets_dir: &Path) -> Result<usize> {
    let counts = layer_counts(assets_dir)?;
    if counts.is_empty() {
        return Ok(0);
    }
    Ok(counts
        .iter()
        .fold(1_usize, |acc, (_, n)| acc.saturating_mul(*n)))
}
