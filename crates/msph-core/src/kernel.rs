use glam::Vec3;
use std::f32::consts::PI;

/// Poly6 smoothing kernel for density interpolation.
///
/// Returns `315 / (64 * PI) * ((h^2 - r^2) / h^3)^3` on the open support
/// `0 < r < h`, and `0.0` at the origin and at or beyond `h`.
#[inline]
pub fn poly6(r: f32, h: f32) -> f32 {
    if r <= 0.0 || r >= h {
        return 0.0;
    }
    let x = (h * h - r * r) / (h * h * h);
    315.0 / (64.0 * PI) * x * x * x
}

/// Spiky kernel gradient, used for every spatial derivative in the pipeline
/// (pressure gradient, phase flux, mixture stress divergence).
///
/// Returns `(r / |r|) * (-45 / PI) * ((h - |r|) / h^3)^2` on the open support
/// `0 < |r| < h`, and `Vec3::ZERO` otherwise. The coefficient is negative, so
/// the gradient points from the evaluation point toward the neighbor.
#[inline]
pub fn spiky_gradient(r: Vec3, h: f32) -> Vec3 {
    let r_len = r.length();
    if r_len <= 0.0 || r_len >= h {
        return Vec3::ZERO;
    }
    let x = (h - r_len) / (h * h * h);
    r * (-45.0 / PI * x * x / r_len)
}
