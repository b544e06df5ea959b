use serde::{Deserialize, Serialize};

/// Planar coordinates on a floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the planar Euclidean distance to another position.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Closest point on a segment together with its clamped parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub point: Position,
    /// Parameter along `start + t * (end - start)`, clamped to `[0, 1]`.
    pub t: f64,
}

/// Project `point` onto the segment `start..end`.
///
/// A degenerate segment (both ends equal) projects everything onto `start`.
pub fn project_onto_segment(point: Position, start: Position, end: Position) -> Projection {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_squared = dx * dx + dy * dy;
    if length_squared <= f64::EPSILON {
        return Projection {
            point: start,
            t: 0.0,
        };
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_squared)
        .clamp(0.0, 1.0);
    Projection {
        point: Position::new(start.x + t * dx, start.y + t * dy),
        t,
    }
}

/// Snap the door so that the door-to-corridor hop runs along a single axis.
///
/// Whichever axis already differs least between the two points is made equal
/// by moving the door onto the projection's coordinate.
pub fn align_door(door: Position, projection: Position) -> Position {
    let dx = (door.x - projection.x).abs();
    let dy = (door.y - projection.y).abs();
    if dx <= dy {
        Position::new(projection.x, door.y)
    } else {
        Position::new(door.x, projection.y)
    }
}
