use image::RgbaImage;

use crate::error::Result;
use crate::geometry::{Polygon, Vertex};
use crate::raster::{Rasterization, Rasterizer};

/// Exact interior scan: every integer coordinate inside the bounding box is
/// tested against the even-odd containment rule. O(boxArea * vertexCount),
/// which is fine for photograph-scale boxes and polygons of tens of
/// vertices. The source image is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonFillRasterizer;

impl Rasterizer for PolygonFillRasterizer {
    fn rasterize(&self, polygon: &Polygon, _source: &RgbaImage) -> Result<Rasterization> {
        let bounds = polygon.bounding_box()?;

        let mut pixels = Vec::new();
        for y in bounds.y_min..=bounds.y_max {
            for x in bounds.x_min..=bounds.x_max {
                let point = Vertex::new(x, y);
                if polygon.contains(point) {
                    pixels.push(point);
                }
            }
        }

        Ok(Rasterization { pixels, bounds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> RgbaImage {
        RgbaImage::new(width, height)
    }

    #[test]
    fn square_rasterizes_to_exactly_one_hundred_pixels() {
        // With the half-open tie-break the x_min/y_min edges are inside and
        // the x_max/y_max edges are not, so a 10x10 square fills 10x10.
        let polygon = Polygon::new(vec![
            Vertex::new(0, 0),
            Vertex::new(10, 0),
            Vertex::new(10, 10),
            Vertex::new(0, 10),
        ]);

        let raster = PolygonFillRasterizer
            .rasterize(&polygon, &blank(16, 16))
            .unwrap();
        assert_eq!(raster.pixels.len(), 100);
        for pixel in &raster.pixels {
            assert!((0..10).contains(&pixel.x));
            assert!((0..10).contains(&pixel.y));
        }
    }

    #[test]
    fn degenerate_polygon_yields_an_empty_pixel_set() {
        let polygon = Polygon::new(vec![
            Vertex::new(2, 2),
            Vertex::new(8, 2),
            Vertex::new(14, 2),
        ]);

        let raster = PolygonFillRasterizer
            .rasterize(&polygon, &blank(16, 16))
            .unwrap();
        assert!(raster.pixels.is_empty());
        assert_eq!(raster.bounds.height(), 0);
    }

    #[test]
    fn too_few_vertices_is_an_error() {
        let polygon = Polygon::new(vec![Vertex::new(0, 0), Vertex::new(4, 4)]);
        assert!(
            PolygonFillRasterizer
                .rasterize(&polygon, &blank(8, 8))
                .is_err()
        );
    }
}
