//! Momentum update (`cal_acc`) and symplectic integration (`advect`).

use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimConfig;
use crate::grid::UniformGrid;
use crate::kernel::spiky_gradient;
use crate::particle::ParticleSet;

/// Distance kept between particles and the box faces.
pub const BOUNDARY_MARGIN: f32 = 0.5;
/// Velocity scale applied when a particle is reflected off a face.
const REFLECT_DAMPING: f32 = 0.999;

/// Acceleration from gravity, the pressure gradient and the mixture stress
/// divergence. Wall neighbors enter the pressure gradient with the querying
/// particle's own pressure mirrored onto them (no-penetration pressure
/// without giving walls a phase composition); they carry no drift, so the
/// mixture stress sums over fluid neighbors only.
pub fn accelerate(p: &mut ParticleSet, grid: &UniformGrid, cfg: &SimConfig) {
    let phases = p.phases;
    let fluid = p.fluid_count;
    let h = cfg.h;
    let g = cfg.gravity_vec();
    let rho0 = &cfg.rho0;

    let pos = &p.pos;
    let alpha = &p.alpha;
    let drift = &p.drift;
    let rho_m = &p.rho_m;
    let rho_bar = &p.rho_bar;
    let prs = &p.pressure;

    par_iter_mut!(p.acc).enumerate().for_each(|(i, acc_i)| {
        let mut prs_grad = Vec3::ZERO;
        let mut tdm = Vec3::ZERO;

        for &j in grid.neighbors(i) {
            let j = j as usize;
            let dw = spiky_gradient(pos[i] - pos[j], h);
            if j < fluid {
                prs_grad += rho_m[j] * (prs[i] + prs[j]) / (2.0 * rho_bar[j]) * dw;

                let mut stress = Vec3::ZERO;
                for k in 0..phases {
                    let djk = drift[j * phases + k];
                    let dik = drift[i * phases + k];
                    stress += (alpha[j * phases + k] * djk * djk.dot(dw)
                        + alpha[i * phases + k] * dik * dik.dot(dw))
                        * rho0[k];
                }
                tdm -= rho_m[j] / rho_bar[j] * stress;
            } else {
                // mirror pressure: rho0_0 * (p_i + p_i) / (2 * rho0_0) = p_i
                prs_grad += rho0[0] * (prs[i] + prs[i]) / (2.0 * rho0[0]) * dw;
            }
        }

        *acc_i = g + (tdm - prs_grad) / rho_m[i];
    });
}

/// Symplectic Euler with damping, then boundary reflection:
/// `vel <- damp * vel + dt * acc; pos <- pos + dt * vel`.
pub fn integrate(p: &mut ParticleSet, cfg: &SimConfig) {
    let fluid = p.fluid_count;
    let dt = cfg.dt;
    let damp = cfg.damp;
    let bound = cfg.bound_vec();
    let acc = &p.acc;

    par_iter_mut!(p.vel)
        .zip(par_iter_mut!(p.pos[..fluid]))
        .enumerate()
        .for_each(|(i, (vel, pos))| {
            *vel = *vel * damp + acc[i] * dt;
            *pos += *vel * dt;
            reflect(pos, vel, bound);
        });
}

/// Position-level boundary correction. Clamps to the box with margin and
/// inverts the velocity component only when it still points outward, so a
/// particle already moving inward is not reflected twice.
#[inline]
fn reflect(pos: &mut Vec3, vel: &mut Vec3, bound: Vec3) {
    for axis in 0..3 {
        let hi = bound[axis] - BOUNDARY_MARGIN;
        if pos[axis] > hi {
            pos[axis] = hi;
            if vel[axis] > 0.0 {
                vel[axis] = -REFLECT_DAMPING * vel[axis];
            }
        }
        if pos[axis] < BOUNDARY_MARGIN {
            pos[axis] = BOUNDARY_MARGIN;
            if vel[axis] < 0.0 {
                vel[axis] = -REFLECT_DAMPING * vel[axis];
            }
        }
    }
}
