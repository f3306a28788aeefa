use image::{GrayImage, Luma, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::open;

use crate::error::Result;
use crate::geometry::{Polygon, Vertex};
use crate::raster::{PolygonFillRasterizer, Rasterization, Rasterizer};

const FOREGROUND: Luma<u8> = Luma([255u8]);
const BACKGROUND: Luma<u8> = Luma([0u8]);

/// Best-effort refinement of the polygon fill toward the photographed
/// object's actual boundary.
///
/// Works over a margin window around the bounding box, clipped to the
/// source image: the polygon interior seeds the foreground and everything
/// else in the window seeds the background, mirroring a rect-seeded
/// segmentation. Each iteration reassigns window pixels to whichever class
/// mean color sits closer; a final morphological open drops speckle.
/// Output keeps only the shared rasterizer contract (pixels within the
/// bounding box); pixel-exact agreement with the hand-drawn outline is
/// explicitly not promised.
#[derive(Debug, Clone)]
pub struct SegmentationRefinedRasterizer {
    pub iterations: usize,
}

impl Default for SegmentationRefinedRasterizer {
    fn default() -> Self {
        Self { iterations: 5 }
    }
}

/// In-image working window, inclusive bounds.
struct Window {
    x0: i32,
    y0: i32,
    width: u32,
    height: u32,
}

impl Window {
    /// Bounding box plus a margin, clipped to the source extent. `None`
    /// when the box misses the image entirely.
    fn around(bounds: &crate::geometry::BoundingBox, source: &RgbaImage) -> Option<Self> {
        let longest = bounds.width().max(bounds.height()) as i32;
        let margin = (longest / 10).max(4);

        let x0 = (bounds.x_min - margin).max(0);
        let y0 = (bounds.y_min - margin).max(0);
        let x1 = (bounds.x_max + margin).min(source.width() as i32 - 1);
        let y1 = (bounds.y_max + margin).min(source.height() as i32 - 1);
        if x1 < x0 || y1 < y0 {
            return None;
        }

        Some(Self {
            x0,
            y0,
            width: (x1 - x0 + 1) as u32,
            height: (y1 - y0 + 1) as u32,
        })
    }
}

impl Rasterizer for SegmentationRefinedRasterizer {
    fn rasterize(&self, polygon: &Polygon, source: &RgbaImage) -> Result<Rasterization> {
        let seed = PolygonFillRasterizer.rasterize(polygon, source)?;
        let bounds = seed.bounds;
        if seed.pixels.is_empty() {
            return Ok(seed);
        }
        let Some(window) = Window::around(&bounds, source) else {
            return Ok(Rasterization {
                pixels: Vec::new(),
                bounds,
            });
        };

        let mut mask = GrayImage::new(window.width, window.height);
        for pixel in &seed.pixels {
            let lx = pixel.x - window.x0;
            let ly = pixel.y - window.y0;
            if lx >= 0 && ly >= 0 && (lx as u32) < window.width && (ly as u32) < window.height {
                mask.put_pixel(lx as u32, ly as u32, FOREGROUND);
            }
        }

        for _ in 0..self.iterations {
            let Some((fg_mean, bg_mean)) = class_means(source, &mask, &window) else {
                break;
            };

            for ly in 0..window.height {
                for lx in 0..window.width {
                    let color = sample(source, window.x0 + lx as i32, window.y0 + ly as i32);
                    let class = if distance_squared(color, fg_mean)
                        <= distance_squared(color, bg_mean)
                    {
                        FOREGROUND
                    } else {
                        BACKGROUND
                    };
                    mask.put_pixel(lx, ly, class);
                }
            }
        }

        let mask = open(&mask, Norm::LInf, 1);

        // Keep the rasterizer contract: only pixels the bounding-box frame
        // can address survive the refinement.
        let mut pixels = Vec::new();
        for (lx, ly, value) in mask.enumerate_pixels() {
            if *value != FOREGROUND {
                continue;
            }
            let x = window.x0 + lx as i32;
            let y = window.y0 + ly as i32;
            if x >= bounds.x_min && x < bounds.x_max && y >= bounds.y_min && y < bounds.y_max {
                pixels.push(Vertex::new(x, y));
            }
        }

        Ok(Rasterization { pixels, bounds })
    }
}

/// Window pixels are in-image by construction, so sampling never misses.
fn sample(source: &RgbaImage, x: i32, y: i32) -> [f64; 3] {
    let pixel = source.get_pixel(x as u32, y as u32);
    [pixel[0] as f64, pixel[1] as f64, pixel[2] as f64]
}

fn distance_squared(a: [f64; 3], b: [f64; 3]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}

/// Mean color of each class over the window. `None` once either class runs
/// out of pixels, which ends the refinement.
fn class_means(
    source: &RgbaImage,
    mask: &GrayImage,
    window: &Window,
) -> Option<([f64; 3], [f64; 3])> {
    let mut fg_sum = [0.0f64; 3];
    let mut bg_sum = [0.0f64; 3];
    let mut fg_count = 0usize;
    let mut bg_count = 0usize;

    for (lx, ly, value) in mask.enumerate_pixels() {
        let color = sample(source, window.x0 + lx as i32, window.y0 + ly as i32);
        let (sum, count) = if *value == FOREGROUND {
            (&mut fg_sum, &mut fg_count)
        } else {
            (&mut bg_sum, &mut bg_count)
        };
        for (total, channel) in sum.iter_mut().zip(color) {
            *total += channel;
        }
        *count += 1;
    }

    if fg_count == 0 || bg_count == 0 {
        return None;
    }

    let fg_mean = fg_sum.map(|total| total / fg_count as f64);
    let bg_mean = bg_sum.map(|total| total / bg_count as f64);
    Some((fg_mean, bg_mean))
}
