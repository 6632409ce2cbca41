use glam::Vec3;

use crate::config::{FluidBlock, SimConfig, WallLayout};
use crate::error::SimError;

/// Result of particle emission. `pos` holds fluid particles first, wall
/// particles as the contiguous suffix; `alpha` covers the fluid prefix only.
pub struct Emitted {
    pub pos: Vec<Vec3>,
    pub alpha: Vec<f32>,
    pub fluid_count: usize,
}

/// Lay out the initial particle state: fluid block lattices followed by the
/// static tank walls. Runs once at init; wall positions never change.
pub fn emit(config: &SimConfig) -> Result<Emitted, SimError> {
    let mut pos = Vec::new();
    let mut alpha = Vec::new();

    for block in &config.emitter.blocks {
        emit_block(block, &mut pos, &mut alpha);
    }
    let fluid_count = pos.len();
    if fluid_count == 0 {
        return Err(SimError::Config("emitter produced no fluid particles".into()));
    }

    if let Some(wall) = &config.emitter.wall {
        emit_tank(wall, config.bound_vec(), &mut pos);
    }
    log::info!(
        "emitted {} fluid and {} wall particles",
        fluid_count,
        pos.len() - fluid_count
    );

    Ok(Emitted {
        pos,
        alpha,
        fluid_count,
    })
}

fn emit_block(block: &FluidBlock, pos: &mut Vec<Vec3>, alpha: &mut Vec<f32>) {
    let origin = Vec3::from_array(block.origin);
    for z in 0..block.dims[2] {
        for y in 0..block.dims[1] {
            for x in 0..block.dims[0] {
                pos.push(origin + block.spacing * Vec3::new(x as f32, y as f32, z as f32));
                alpha.extend_from_slice(&block.alpha);
            }
        }
    }
}

/// Tank walls: a floor slab covering the full footprint, then four side
/// walls of `layers` sheets each, rising to `height_fraction` of the box.
/// Particles sit at `(i + 1) * gap` per axis so the outermost sheet stays
/// inside the box.
fn emit_tank(wall: &WallLayout, bound: Vec3, pos: &mut Vec<Vec3>) {
    let gap = wall.gap;
    let layers = wall.layers;
    let nx = ((bound.x / gap) as u32).saturating_sub(4);
    let ny = ((bound.y / gap) as u32).saturating_sub(4);
    let nz = ((bound.z * wall.height_fraction / gap) as u32).saturating_sub(4);

    let mut place = |i: u32, j: u32, k: u32| {
        pos.push(Vec3::new(
            (i + 1) as f32 * gap,
            (j + 1) as f32 * gap,
            (k + 1) as f32 * gap,
        ));
    };

    // floor, always the full `layers` thickness
    for i in 0..nx {
        for j in 0..ny {
            for k in 0..layers {
                place(i, j, k);
            }
        }
    }
    // front and back walls (low / high y)
    for i in 0..nx {
        for j in 0..layers.min(ny) {
            for k in layers..nz {
                place(i, j, k);
            }
        }
        for j in ny.saturating_sub(layers).max(layers.min(ny))..ny {
            for k in layers..nz {
                place(i, j, k);
            }
        }
    }
    // left and right walls (low / high x), excluding the corners already laid
    for j in layers.min(ny)..ny.saturating_sub(layers) {
        for i in 0..layers.min(nx) {
            for k in layers..nz {
                place(i, j, k);
            }
        }
        for i in nx.saturating_sub(layers).max(layers.min(nx))..nx {
            for k in layers..nz {
                place(i, j, k);
            }
        }
    }
}
