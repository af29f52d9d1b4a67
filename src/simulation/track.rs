//! Boundary lookup for the track bitmap.

/// Immutable per-pixel mask of boundary pixels.
///
/// The track image is only ever asked one question: is this pixel a
/// boundary colour. The mask is computed once when the image is loaded.
#[derive(Debug, Clone)]
pub struct TrackMap {
    width: usize,
    height: usize,
    boundary: Vec<bool>,
}

impl TrackMap {
    /// Builds a track from tightly packed RGBA8 pixel data.
    ///
    /// # Arguments
    ///
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `bytes` - Row-major RGBA bytes, `width * height * 4` long
    /// * `border_color` - Exact RGBA value that marks a boundary pixel
    ///
    /// Missing trailing pixels (short buffers) are treated as boundary.
    pub fn from_rgba(width: usize, height: usize, bytes: &[u8], border_color: [u8; 4]) -> Self {
        let mut boundary = vec![true; width * height];
        for (cell, pixel) in boundary.iter_mut().zip(bytes.chunks_exact(4)) {
            *cell = pixel == border_color;
        }

        Self {
            width,
            height,
            boundary,
        }
    }

    /// Builds a track by evaluating `is_boundary(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, is_boundary: impl Fn(usize, usize) -> bool) -> Self {
        let boundary = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| is_boundary(x, y))
            .collect();

        Self {
            width,
            height,
            boundary,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if the pixel is a boundary pixel.
    ///
    /// Coordinates outside the image count as boundary.
    #[inline]
    pub fn is_boundary(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return true;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return true;
        }
        self.boundary[y * self.width + x]
    }

    /// Number of boundary pixels inside the image.
    pub fn boundary_pixel_count(&self) -> usize {
        self.boundary.iter().filter(|&&b| b).count()
    }
}
