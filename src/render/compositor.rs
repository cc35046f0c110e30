//! Layer loading and alpha compositing for token images

use crate::generation::character::{Character, Collection};
use crate::io::assets::asset_path;
use crate::io::configuration::IMAGE_EXTENSION;
use crate::io::error::{Result, TokenatorError, file_system, is_per_token};
use image::{DynamicImage, RgbImage, RgbaImage, imageops};
use std::path::{Path, PathBuf};

/// Human-readable label for error messages
pub fn character_label(character: &Character) -> String {
    character.id().map_or_else(
        || format!("[{}]", character.canonical_key()),
        |id| format!("#{id}"),
    )
}

/// Resolve the layer images of a character in compositing order
///
/// # Errors
///
/// Returns `AssetLoad` if the character has no option for a category in `layer_order`
pub fn plan_layers(
    character: &Character,
    layer_order: &[&str],
    assets_dir: &Path,
) -> Result<Vec<(String, PathBuf)>> {
    layer_order
        .iter()
        .map(|&category| {
            let option = character.get(category).ok_or_else(|| TokenatorError::AssetLoad {
                character: character_label(character),
                category: category.to_string(),
                path: assets_dir.join(category),
                source: image::ImageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "character has no option for this category",
                )),
            })?;
            Ok((category.to_string(), asset_path(assets_dir, category, option)))
        })
        .collect()
}

/// Composite `layer` over `base` in place ("over" operator, straight alpha)
pub fn alpha_composite(base: &mut RgbaImage, layer: &RgbaImage) {
    imageops::overlay(base, layer, 0, 0);
}

fn load_layer(character: &Character, category: &str, path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|source| TokenatorError::AssetLoad {
        character: character_label(character),
        category: category.to_string(),
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

/// Render one character into a flattened, opaque image
///
/// Layers are composited in `layer_order`, the first being the base.
///
/// # Errors
///
/// Returns an error naming the character, category and asset if a layer is
/// missing, can't be decoded, or differs in size from the base layer
pub fn render(character: &Character, layer_order: &[&str], assets_dir: &Path) -> Result<RgbImage> {
    let layers = plan_layers(character, layer_order, assets_dir)?;

    let mut composite: Option<RgbaImage> = None;
    for (category, path) in &layers {
        let layer = load_layer(character, category, path)?;
        composite = match composite {
            None => Some(layer),
            Some(mut base) => {
                if base.dimensions() != layer.dimensions() {
                    return Err(TokenatorError::LayerSizeMismatch {
                        character: character_label(character),
                        category: category.clone(),
                        path: path.clone(),
                        expected: base.dimensions(),
                        found: layer.dimensions(),
                    });
                }
                alpha_composite(&mut base, &layer);
                Some(base)
            }
        };
    }

    let composite = composite.unwrap_or_else(|| RgbaImage::new(0, 0));
    Ok(DynamicImage::ImageRgba8(composite).to_rgb8())
}

/// Output location of a token
pub fn token_path(output_dir: &Path, project: &str, id: u32) -> PathBuf {
    output_dir
        .join(project)
        .join(format!("{project}_{id}.{IMAGE_EXTENSION}"))
}

/// Write a rendered token to `<output>/<project>/<project>_<id>.png`
///
/// # Errors
///
/// Returns `TokenExport` if the image can't be encoded or written
pub fn save_token(image: &RgbImage, output_dir: &Path, project: &str, id: u32) -> Result<PathBuf> {
    let path = token_path(output_dir, project, id);
    image
        .save(&path)
        .map_err(|source| TokenatorError::TokenExport {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// Outcome of rendering every character in a collection
#[derive(Debug, Default)]
pub struct RenderSummary {
    /// Saved tokens by identifier
    pub rendered: Vec<(u32, PathBuf)>,
    /// Tokens that failed, with the reason
    pub failures: Vec<(u32, TokenatorError)>,
}

impl RenderSummary {
    /// Number of tokens attempted
    pub fn total(&self) -> usize {
        self.rendered.len() + self.failures.len()
    }

    /// Whether every token was saved
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Convert into an error when any token failed
    ///
    /// # Errors
    ///
    /// Returns `RenderFailures` if at least one token failed
    pub fn into_result(self) -> Result<Vec<(u32, PathBuf)>> {
        if self.failures.is_empty() {
            Ok(self.rendered)
        } else {
            Err(TokenatorError::RenderFailures {
                failed: self.failures.len(),
                total: self.total(),
            })
        }
    }
}

/// Render and save every numbered character in the collection
///
/// Per-token failures are collected and rendering continues. `on_token` is
/// called after each attempt with the identifier and its result.
///
/// # Errors
///
/// Returns an error if the project directory can't be created, if a character
/// has no identifier, or on a failure that isn't specific to one token
pub fn render_collection(
    collection: &Collection,
    layer_order: &[&str],
    assets_dir: &Path,
    output_dir: &Path,
    project: &str,
    mut on_token: impl FnMut(u32, &Result<PathBuf>),
) -> Result<RenderSummary> {
    let project_dir = output_dir.join(project);
    std::fs::create_dir_all(&project_dir).map_err(file_system(&project_dir, "create directory"))?;

    let mut summary = RenderSummary::default();
    for character in collection.characters() {
        let id = character.id().ok_or_else(|| {
            crate::io::error::invalid_parameter(
                "character",
                &character.canonical_key(),
                &"characters must be numbered before rendering",
            )
        })?;

        let result = render(character, layer_order, assets_dir)
            .and_then(|image| save_token(&image, output_dir, project, id));
        on_token(id, &result);

        match result {
            Ok(path) => summary.rendered.push((id, path)),
            Err(error) if is_per_token(&error) => summary.failures.push((id, error)),
            Err(error) => return Err(error),
        }
    }

    Ok(summary)
}
