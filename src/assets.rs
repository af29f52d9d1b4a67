//! Loading of image assets from disk.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use log::info;
use macroquad::texture::Image;

use crate::simulation::track::TrackMap;

/// Reads and decodes an image file.
///
/// Decoding does not need a window, so this also works in headless mode.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    let image = Image::from_file_with_format(&bytes, None)
        .map_err(|e| anyhow::anyhow!("{e:?}"))
        .with_context(|| format!("failed to decode image {}", path.display()))?;
    Ok(image)
}

/// Builds the boundary map from an already decoded track image.
pub fn track_from_image(image: &Image, border_color: [u8; 4]) -> TrackMap {
    TrackMap::from_rgba(
        image.width as usize,
        image.height as usize,
        &image.bytes,
        border_color,
    )
}

/// Loads the track bitmap and extracts its boundary pixels.
pub fn load_track(path: impl AsRef<Path>, border_color: [u8; 4]) -> Result<TrackMap> {
    let path = path.as_ref();
    let image = load_image(path)?;
    let track = track_from_image(&image, border_color);
    ensure!(
        track.width() > 0 && track.height() > 0,
        "track image {} is empty",
        path.display()
    );

    info!(
        "Loaded track {} ({}x{}, {} boundary pixels)",
        path.display(),
        track.width(),
        track.height(),
        track.boundary_pixel_count()
    );
    Ok(track)
}
