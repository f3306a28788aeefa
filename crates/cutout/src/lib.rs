//! # Object Cutout Extraction Library
//!
//! Extracts labeled object regions from annotated photographs: a polygon
//! outline is rasterized into its interior pixel set, the source colors are
//! sampled at those coordinates, and the result is packaged as a standalone
//! masked image ready for placement on a canvas.
//!
//! ## Core Features
//!
//! - **Exact geometry**: bounding boxes, shoelace areas, and a documented
//!   even-odd containment tie-break (min edges inside, max edges outside)
//! - **Strategy-agnostic rasterization**: the polygon-fill scan and a
//!   best-effort segmentation refinement share one output contract
//! - **Positioned cutouts**: transparent-masked RGBA buffers with a
//!   normalized placement anchor and integer downscaling for oversized
//!   regions
//!
//! ## Quick Start
//!
//! ```rust
//! use cutout::{CutoutBuilder, PlacementAnchor, Polygon, RasterStrategy, Vertex};
//! use image::RgbaImage;
//!
//! let polygon = Polygon::new(vec![
//!     Vertex::new(2, 2),
//!     Vertex::new(12, 2),
//!     Vertex::new(12, 12),
//!     Vertex::new(2, 12),
//! ]);
//! let source = RgbaImage::from_pixel(16, 16, image::Rgba([80, 120, 40, 255]));
//!
//! let raster = RasterStrategy::PolygonFill
//!     .rasterizer()
//!     .rasterize(&polygon, &source)?;
//! let cutout = CutoutBuilder::new().build(&source, &raster, PlacementAnchor::CENTER)?;
//! assert_eq!(cutout.image().dimensions(), (10, 10));
//! # Ok::<(), cutout::CutoutError>(())
//! ```

pub mod builder;
pub mod error;
pub mod geometry;
pub mod placement;
pub mod raster;

pub use builder::{Cutout, CutoutBuilder, DEFAULT_SIZE_THRESHOLD};
pub use error::{CutoutError, Result};
pub use geometry::{BoundingBox, Polygon, Vertex};
pub use placement::PlacementAnchor;
pub use raster::{
    PixelSet, PolygonFillRasterizer, RasterStrategy, Rasterization, Rasterizer,
    SegmentationRefinedRasterizer,
};

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn extraction_pipeline_end_to_end() {
        let mut source = RgbaImage::from_pixel(40, 40, image::Rgba([255, 255, 255, 255]));
        for y in 10..20 {
            for x in 10..20 {
                source.put_pixel(x, y, image::Rgba([30, 60, 90, 255]));
            }
        }

        let polygon = Polygon::new(vec![
            Vertex::new(10, 10),
            Vertex::new(20, 10),
            Vertex::new(20, 20),
            Vertex::new(10, 20),
        ]);

        let raster = RasterStrategy::PolygonFill
            .rasterizer()
            .rasterize(&polygon, &source)
            .expect("rasterization should succeed");
        assert_eq!(raster.pixels.len(), 100);

        let cutout = CutoutBuilder::new()
            .build(&source, &raster, PlacementAnchor::new(0.25, 0.75))
            .expect("cutout construction should succeed");

        assert_eq!(cutout.image().dimensions(), (10, 10));
        assert_eq!(cutout.anchor(), PlacementAnchor::new(0.25, 0.75));
        for pixel in cutout.image().pixels() {
            assert_eq!(*pixel, image::Rgba([30, 60, 90, 255]));
        }
    }

    #[test]
    fn rasterized_pixels_never_escape_the_bounding_box() {
        let source = RgbaImage::new(128, 128);
        let polygon = Polygon::new(vec![
            Vertex::new(5, 40),
            Vertex::new(60, 5),
            Vertex::new(110, 50),
            Vertex::new(70, 100),
            Vertex::new(20, 90),
        ]);

        let raster = RasterStrategy::PolygonFill
            .rasterizer()
            .rasterize(&polygon, &source)
            .unwrap();
        let bounds = polygon.bounding_box().unwrap();
        for pixel in &raster.pixels {
            assert!(bounds.contains(*pixel));
        }
    }
}
