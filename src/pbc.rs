use nalgebra::Vector2;

/// Apply the minimum-image convention to a displacement in a square box.
///
/// Each component is shifted by the nearest integer multiple of
/// `box_length`, so the result satisfies `|d_k| <= box_length / 2`.
#[inline]
pub fn minimum_image(mut d: Vector2<f64>, box_length: f64) -> Vector2<f64> {
    for k in 0..2 {
        d[k] -= box_length * (d[k] / box_length).round();
    }
    d
}

/// Fold an absolute position back into `[0, box_length)` along each axis.
///
/// Only used for output. The integrator works on unwrapped coordinates.
#[inline]
pub fn wrap_position(mut x: Vector2<f64>, box_length: f64) -> Vector2<f64> {
    for k in 0..2 {
        x[k] -= box_length * (x[k] / box_length).floor();
    }
    x
}
