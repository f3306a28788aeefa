use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::{CutoutError, Result};
use crate::geometry::BoundingBox;
use crate::placement::PlacementAnchor;
use crate::raster::Rasterization;

/// Largest cutout edge tolerated before downscaling kicks in.
pub const DEFAULT_SIZE_THRESHOLD: u32 = 500;

/// An extracted object image, ready for placement on a canvas.
///
/// Pixels covered by the rasterized set carry the sampled source color at
/// full opacity; every other pixel is fully transparent. The buffer lives in
/// the bounding box's local frame.
#[derive(Debug, Clone)]
pub struct Cutout {
    image: RgbaImage,
    anchor: PlacementAnchor,
    anchor_clamped: bool,
    source_bounds: BoundingBox,
    scale_divisor: u32,
}

impl Cutout {
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn anchor(&self) -> PlacementAnchor {
        self.anchor
    }

    /// Whether the requested anchor sat outside the canvas and had to be
    /// pulled back into [0, 1] on either axis.
    pub fn anchor_clamped(&self) -> bool {
        self.anchor_clamped
    }

    /// Bounding box of the polygon in source-image coordinates.
    pub fn source_bounds(&self) -> BoundingBox {
        self.source_bounds
    }

    /// Integer factor both dimensions were divided by; 1 when the buffer
    /// fit under the size threshold untouched.
    pub fn scale_divisor(&self) -> u32 {
        self.scale_divisor
    }
}

/// Builds positioned cutouts from rasterized pixel sets.
#[derive(Debug, Clone)]
pub struct CutoutBuilder {
    size_threshold: u32,
}

impl CutoutBuilder {
    pub fn new() -> Self {
        Self {
            size_threshold: DEFAULT_SIZE_THRESHOLD,
        }
    }

    pub fn with_size_threshold(mut self, size_threshold: u32) -> Self {
        // A zero threshold could never be satisfied.
        self.size_threshold = size_threshold.max(1);
        self
    }

    /// Samples the source colors at the rasterized coordinates into a fresh
    /// transparent buffer, downscales oversized buffers, and attaches the
    /// placement anchor (clamped to [0, 1] per axis when out of range).
    ///
    /// Every rasterized pixel must lie inside the source image; an
    /// out-of-range coordinate is a caller contract violation and fails with
    /// [`CutoutError::OutOfBounds`] rather than being clamped.
    pub fn build(
        &self,
        source: &RgbaImage,
        raster: &Rasterization,
        anchor: PlacementAnchor,
    ) -> Result<Cutout> {
        let bounds = raster.bounds;
        let mut buffer = RgbaImage::new(bounds.width(), bounds.height());

        for pixel in &raster.pixels {
            if pixel.x < 0
                || pixel.y < 0
                || pixel.x as u32 >= source.width()
                || pixel.y as u32 >= source.height()
            {
                return Err(CutoutError::OutOfBounds {
                    x: pixel.x,
                    y: pixel.y,
                    width: source.width(),
                    height: source.height(),
                });
            }

            let color = source.get_pixel(pixel.x as u32, pixel.y as u32);
            let local_x = (pixel.x - bounds.x_min) as u32;
            let local_y = (pixel.y - bounds.y_min) as u32;
            buffer.put_pixel(local_x, local_y, Rgba([color[0], color[1], color[2], 255]));
        }

        let (image, scale_divisor) = self.downscale(buffer);
        let (anchor, anchor_clamped) = anchor.clamped();

        Ok(Cutout {
            image,
            anchor,
            anchor_clamped,
            source_bounds: bounds,
            scale_divisor,
        })
    }

    /// Divides both dimensions by the smallest integer factor that brings
    /// the longest edge under the threshold. Nearest-neighbor resampling
    /// keeps the set/unset mask binary; buffers already small enough pass
    /// through untouched (never upscaled).
    fn downscale(&self, buffer: RgbaImage) -> (RgbaImage, u32) {
        let (width, height) = buffer.dimensions();
        let longest = width.max(height);
        if longest <= self.size_threshold {
            return (buffer, 1);
        }

        let divisor = longest.div_ceil(self.size_threshold);
        let scaled = imageops::resize(
            &buffer,
            (width / divisor).max(1),
            (height / divisor).max(1),
            FilterType::Nearest,
        );
        (scaled, divisor)
    }
}

impl Default for CutoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}
