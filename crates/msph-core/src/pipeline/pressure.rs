//! Density and pressure evaluation (`cal_press`).

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{EosMode, SimConfig};
use crate::grid::UniformGrid;
use crate::kernel::poly6;
use crate::particle::ParticleSet;

/// Interpolated densities below this floor are replaced by the mixture rest
/// density; protects isolated particles and later divisions.
const RHO_BAR_FLOOR: f32 = 1e-6;

/// Evaluate mixture rest density, interpolated density and pressure for
/// every fluid particle. Three sub-passes: `rho_bar` reads the completed
/// `rho_m` of its neighbors, so the mixture densities must all be in place
/// first.
pub fn update(p: &mut ParticleSet, grid: &UniformGrid, cfg: &SimConfig) {
    let phases = p.phases;
    let fluid = p.fluid_count;
    let h = cfg.h;
    let rho0 = &cfg.rho0;

    // mixture rest density: rho_m = sum_k alpha_k * rho0_k
    {
        let alpha = &p.alpha;
        par_iter_mut!(p.rho_m).enumerate().for_each(|(i, rm)| {
            let row = &alpha[i * phases..(i + 1) * phases];
            *rm = row.iter().zip(rho0.iter()).map(|(a, r0)| a * r0).sum();
        });
    }

    // interpolated density; walls contribute as pure phase-0 mixture
    {
        let pos = &p.pos;
        let rho_m = &p.rho_m;
        let rho0_0 = rho0[0];
        par_iter_mut!(p.rho_bar).enumerate().for_each(|(i, rb)| {
            let pi = pos[i];
            let mut sum = 0.0f32;
            for &j in grid.neighbors(i) {
                let j = j as usize;
                let w = poly6((pi - pos[j]).length(), h);
                sum += if j < fluid { rho_m[j] * w } else { rho0_0 * w };
            }
            *rb = if sum < RHO_BAR_FLOOR { rho_m[i] } else { sum };
        });
    }

    // equation of state; nonnegative by construction since density >= rho_m
    {
        let rho_m = &p.rho_m;
        let rho_bar = &p.rho_bar;
        match cfg.eos_mode {
            EosMode::Tait => {
                let (k1, k2) = (cfg.k1, cfg.k2);
                par_iter_mut!(p.pressure).enumerate().for_each(|(i, prs)| {
                    let density = rho_bar[i].max(rho_m[i]);
                    *prs = k1 * rho_m[i] * ((density / rho_m[i]).powf(k2) - 1.0) / k2;
                });
            }
            EosMode::Linear => {
                let k3 = cfg.k3;
                par_iter_mut!(p.pressure).enumerate().for_each(|(i, prs)| {
                    let density = rho_bar[i].max(rho_m[i]);
                    *prs = k3 * (density - rho_m[i]);
                });
            }
        }
    }
}

/// Pressure change per unit change in the volume fraction of phase `ph`,
/// evaluated at the particle's current densities. Used to re-inject the EOS
/// work lost when fractions are clamped or rescaled.
#[inline]
pub fn alpha_pressure_slope(cfg: &SimConfig, ph: usize, rho_m: f32, rho_bar: f32) -> f32 {
    match cfg.eos_mode {
        EosMode::Tait => {
            cfg.k1 * cfg.rho0[ph] * ((cfg.k2 - 1.0) * (rho_bar / rho_m).powf(cfg.k2) + 1.0) / cfg.k2
        }
        EosMode::Linear => cfg.k3 * cfg.rho0[ph],
    }
}
