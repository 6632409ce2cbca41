use bytemuck::{Pod, Zeroable};

use crate::config::ShowMode;
use crate::particle::ParticleSet;

pub const FLUID_RADIUS: f32 = 0.4;
pub const WALL_RADIUS: f32 = 0.15;
const WALL_COLOR: [f32; 3] = [0.3, 0.3, 0.3];

/// GPU-uploadable preview vertex: 32 bytes, position + radius + rgb color.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct PreviewVertex {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

/// Fill `out` with one vertex per particle (fluid first, walls after).
/// Composition mode maps the first two phase fractions to the red and green
/// channels; pressure mode maps normalized pressure to a red/green ramp.
pub fn fill(particles: &ParticleSet, mode: ShowMode, out: &mut Vec<PreviewVertex>) {
    out.clear();
    out.reserve(particles.total_count);

    for i in 0..particles.total_count {
        let (radius, color) = if particles.is_wall(i) {
            (WALL_RADIUS, WALL_COLOR)
        } else {
            (FLUID_RADIUS, fluid_color(particles, mode, i))
        };
        out.push(PreviewVertex {
            position: particles.pos[i].to_array(),
            radius,
            color,
            _pad: 0.0,
        });
    }
}

fn fluid_color(particles: &ParticleSet, mode: ShowMode, i: usize) -> [f32; 3] {
    match mode {
        ShowMode::Composition => {
            let row = particles.alpha_row(i);
            let red = row[0].clamp(0.0, 1.0);
            let green = if row.len() > 1 { row[1].clamp(0.0, 1.0) } else { 0.0 };
            [red, green, 0.0]
        }
        ShowMode::Pressure => {
            let ratio = ((particles.pressure[i] + 30.0) / 130.0).clamp(0.0, 1.0);
            [ratio, 1.0 - ratio, 0.0]
        }
    }
}
