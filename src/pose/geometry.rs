//! Joint angle and midpoint helpers over normalized landmarks.

use super::landmark::Landmark;

/// Returned by [`angle`] when a ray has zero length
pub const DEGENERATE_ANGLE: f32 = 0.0;

const MIN_RAY_LENGTH: f32 = 1e-6;

/// Componentwise average; visibility is the weaker of the two
pub fn midpoint(p1: &Landmark, p2: &Landmark) -> Landmark {
    Landmark {
        x: (p1.x + p2.x) / 2.0,
        y: (p1.y + p2.y) / 2.0,
        z: (p1.z + p2.z) / 2.0,
        visibility: p1.visibility.min(p2.visibility),
    }
}

/// Angle at vertex `b` between rays b→a and b→c, in degrees [0, 180].
///
/// `None` when either ray is degenerate.
pub fn try_angle(a: &Landmark, b: &Landmark, c: &Landmark) -> Option<f32> {
    let v1 = (a.x - b.x, a.y - b.y);
    let v2 = (c.x - b.x, c.y - b.y);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if !(mag1 > MIN_RAY_LENGTH && mag2 > MIN_RAY_LENGTH) {
        return None;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees().clamp(0.0, 180.0))
}

/// Angle at vertex `b`, or [`DEGENERATE_ANGLE`] for coincident points
pub fn angle(a: &Landmark, b: &Landmark, c: &Landmark) -> f32 {
    try_angle(a, b, c).unwrap_or(DEGENERATE_ANGLE)
}

/// Deviation of the segment from→to away from image-up, in degrees [0, 180]
pub fn angle_from_vertical(from: &Landmark, to: &Landmark) -> Option<f32> {
    // image Y grows downward, so "up" is a point above `from`
    let above = Landmark { y: from.y - 1.0, ..*from };
    try_angle(&above, from, to)
}
