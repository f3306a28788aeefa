use geo::Area;
use geo_types::{Coord, LineString, Polygon as GeoPolygon};
use serde::{Deserialize, Serialize};

use crate::error::{CutoutError, Result};

/// A point in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Vertex {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Smallest axis-aligned box containing every vertex of a polygon.
/// Bounds are inclusive over the vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl BoundingBox {
    /// Horizontal extent. Interior pixels always satisfy
    /// `x_min <= x < x_max` under the containment tie-break, so a buffer of
    /// this width holds every interior pixel.
    pub fn width(&self) -> u32 {
        (self.x_max - self.x_min) as u32
    }

    /// Vertical extent, see [`BoundingBox::width`].
    pub fn height(&self) -> u32 {
        (self.y_max - self.y_min) as u32
    }

    pub fn contains(&self, point: Vertex) -> bool {
        point.x >= self.x_min
            && point.x <= self.x_max
            && point.y >= self.y_min
            && point.y <= self.y_max
    }
}

/// A closed outline: ordered vertices, first and last implicitly connected.
///
/// Vertex order matters for nothing but the traversal direction; area and
/// containment are winding-independent. A polygon with three or more
/// vertices but zero area is well-formed and simply has no interior pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    vertices: Vec<Vertex>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn require_closed(&self) -> Result<()> {
        if self.vertices.len() < 3 {
            return Err(CutoutError::InvalidPolygon(self.vertices.len()));
        }
        Ok(())
    }

    /// Inclusive vertex bounds, min/max taken over each axis independently.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        self.require_closed()?;

        let mut x_min = i32::MAX;
        let mut y_min = i32::MAX;
        let mut x_max = i32::MIN;
        let mut y_max = i32::MIN;

        for vertex in &self.vertices {
            x_min = x_min.min(vertex.x);
            y_min = y_min.min(vertex.y);
            x_max = x_max.max(vertex.x);
            y_max = y_max.max(vertex.y);
        }

        Ok(BoundingBox {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Area magnitude by the shoelace formula, computed in f64 so
    /// image-scale integer coordinates never overflow. The result does not
    /// depend on the winding direction or on which vertex the list starts at.
    pub fn area(&self) -> Result<f64> {
        self.require_closed()?;

        let ring: Vec<Coord<f64>> = self
            .vertices
            .iter()
            .map(|v| Coord {
                x: v.x as f64,
                y: v.y as f64,
            })
            .collect();

        Ok(GeoPolygon::new(LineString::new(ring), vec![]).unsigned_area())
    }

    /// Even-odd ray cast toward +x.
    ///
    /// Tie-break on boundaries: an edge counts as crossed only while the
    /// point's y lies in the half-open span `[min(y1, y2), max(y1, y2))`,
    /// and only when the point sits strictly left of the crossing. Shared
    /// vertices therefore never double-count, and for an axis-aligned box
    /// the x_min/y_min edges are inside while the x_max/y_max edges are
    /// outside.
    pub fn contains(&self, point: Vertex) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        let px = point.x as f64;
        let py = point.y as f64;

        let mut inside = false;
        let mut j = self.vertices.len() - 1;
        for i in 0..self.vertices.len() {
            let (x1, y1) = (self.vertices[i].x as f64, self.vertices[i].y as f64);
            let (x2, y2) = (self.vertices[j].x as f64, self.vertices[j].y as f64);

            if (y1 > py) != (y2 > py) {
                let crossing_x = x1 + (py - y1) / (y2 - y1) * (x2 - x1);
                if px < crossing_x {
                    inside = !inside;
                }
            }
            j = i;
        }

        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Vertex::new(0, 0),
            Vertex::new(10, 0),
            Vertex::new(10, 10),
            Vertex::new(0, 10),
        ])
    }

    #[test]
    fn bounding_box_is_min_max_over_axes() {
        let polygon = Polygon::new(vec![
            Vertex::new(4, 7),
            Vertex::new(-2, 12),
            Vertex::new(9, 1),
        ]);
        let bounds = polygon.bounding_box().unwrap();
        assert_eq!(
            bounds,
            BoundingBox {
                x_min: -2,
                y_min: 1,
                x_max: 9,
                y_max: 12,
            }
        );
    }

    #[test]
    fn bounding_box_rejects_too_few_vertices() {
        let polygon = Polygon::new(vec![Vertex::new(0, 0), Vertex::new(5, 5)]);
        assert!(matches!(
            polygon.bounding_box(),
            Err(CutoutError::InvalidPolygon(2))
        ));
    }

    #[test]
    fn square_area_is_one_hundred() {
        assert_eq!(square().area().unwrap(), 100.0);
    }

    #[test]
    fn area_invariant_under_rotation_and_reversal() {
        let base = square();
        let expected = base.area().unwrap();

        let mut rotated = base.vertices().to_vec();
        rotated.rotate_left(2);
        assert_eq!(Polygon::new(rotated).area().unwrap(), expected);

        let mut reversed = base.vertices().to_vec();
        reversed.reverse();
        assert_eq!(Polygon::new(reversed).area().unwrap(), expected);
    }

    #[test]
    fn containment_tie_break_keeps_min_edges_drops_max_edges() {
        let polygon = square();

        assert!(polygon.contains(Vertex::new(0, 0)));
        assert!(polygon.contains(Vertex::new(0, 5)));
        assert!(polygon.contains(Vertex::new(5, 0)));
        assert!(polygon.contains(Vertex::new(5, 5)));

        assert!(!polygon.contains(Vertex::new(10, 5)));
        assert!(!polygon.contains(Vertex::new(5, 10)));
        assert!(!polygon.contains(Vertex::new(10, 10)));
        assert!(!polygon.contains(Vertex::new(11, 5)));
        assert!(!polygon.contains(Vertex::new(-1, 5)));
    }

    #[test]
    fn containment_handles_concave_outlines() {
        // A "U" shape: points inside the notch are outside the polygon.
        let polygon = Polygon::new(vec![
            Vertex::new(0, 0),
            Vertex::new(12, 0),
            Vertex::new(12, 12),
            Vertex::new(8, 12),
            Vertex::new(8, 4),
            Vertex::new(4, 4),
            Vertex::new(4, 12),
            Vertex::new(0, 12),
        ]);

        assert!(polygon.contains(Vertex::new(2, 8)));
        assert!(polygon.contains(Vertex::new(10, 8)));
        assert!(!polygon.contains(Vertex::new(6, 8)));
        assert!(polygon.contains(Vertex::new(6, 2)));
    }

    #[test]
    fn degenerate_polygon_has_zero_area_and_no_interior() {
        let polygon = Polygon::new(vec![
            Vertex::new(0, 0),
            Vertex::new(5, 0),
            Vertex::new(10, 0),
        ]);
        assert_eq!(polygon.area().unwrap(), 0.0);
        assert!(!polygon.contains(Vertex::new(5, 0)));
    }
}
