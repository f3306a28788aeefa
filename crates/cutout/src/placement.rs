use serde::{Deserialize, Serialize};
use tracing::warn;

/// Normalized canvas position in [0, 1] x [0, 1], used to place a cutout on
/// a destination canvas proportionally to its resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementAnchor {
    pub x: f32,
    pub y: f32,
}

impl PlacementAnchor {
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp each coordinate to [0, 1] independently. Returns the adjusted
    /// anchor and whether anything had to move; a clamp is a non-fatal
    /// adjustment and is logged as a warning.
    pub fn clamped(self) -> (Self, bool) {
        let clamped = Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        };
        let adjusted = clamped != self;
        if adjusted {
            warn!(
                from = ?(self.x, self.y),
                to = ?(clamped.x, clamped.y),
                "anchor outside the canvas, position adjusted"
            );
        }
        (clamped, adjusted)
    }

    /// Polar offset from this anchor: `angle_degrees` is measured from the
    /// +x axis in [0, 180], a negative angle flips the offset below the
    /// anchor, and `distance` is normalized like the anchor axes (halved,
    /// matching the scene-file convention). The result is clamped.
    pub fn offset(self, angle_degrees: f32, distance: f32) -> (Self, bool) {
        let mut y_direction = -1.0f32;
        let mut angle = angle_degrees;
        if angle < 0.0 {
            y_direction = 1.0;
            angle = -angle;
        }

        let radians = angle.to_radians();
        let dx = radians.cos() * (distance / 2.0);
        let dy = y_direction * radians.sin() * (distance / 2.0);

        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
        .clamped()
    }
}

impl Default for PlacementAnchor {
    fn default() -> Self {
        Self::CENTER
    }
}
