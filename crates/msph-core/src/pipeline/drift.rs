//! Per-phase drift-velocity prediction (`cal_drift`).

use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimConfig;
use crate::grid::UniformGrid;
use crate::kernel::spiky_gradient;
use crate::particle::ParticleSet;

/// Predict the velocity of each phase relative to the mixture. Reads the
/// acceleration of the *previous* substep (the lag is intentional) and skips
/// wall neighbors entirely.
pub fn update(p: &mut ParticleSet, grid: &UniformGrid, cfg: &SimConfig) {
    let phases = p.phases;
    let fluid = p.fluid_count;
    let h = cfg.h;
    let tao = cfg.tao;
    let miscible = cfg.miscible;
    let g = cfg.gravity_vec();
    let rho0 = &cfg.rho0;

    let pos = &p.pos;
    let acc = &p.acc;
    let alpha = &p.alpha;
    let rho_m = &p.rho_m;
    let rho_bar = &p.rho_bar;
    let prs = &p.pressure;

    par_chunks_mut!(p.drift, phases)
        .enumerate()
        .for_each(|(i, drift_row)| {
            let rm = rho_m[i];
            let arow = &alpha[i * phases..(i + 1) * phases];

            for k in 0..phases {
                // body-force part, scaled by the density contrast of phase k
                let mut coef = rho0[k];
                for ph in 0..phases {
                    coef -= arow[ph] * rho0[ph] * rho0[ph] / rm;
                }
                let first = (g - acc[i]) * tao * coef;

                // SPH pressure gradient of phase k over fluid neighbors; the
                // ph loop below reuses it, it depends only on k
                let pk_i = if miscible { arow[k] * prs[i] } else { prs[i] };
                let mut grad = Vec3::ZERO;
                for &j in grid.neighbors(i) {
                    let j = j as usize;
                    if j >= fluid {
                        continue;
                    }
                    let pk_j = if miscible {
                        alpha[j * phases + k] * prs[j]
                    } else {
                        prs[j]
                    };
                    grad += rho_m[j] * (pk_j - pk_i) * spiky_gradient(pos[i] - pos[j], h)
                        / rho_bar[j];
                }

                let mut second = Vec3::ZERO;
                for ph in 0..phases {
                    second -= arow[ph] * rho0[ph] * grad / rm;
                    // Self-phase re-add. The default compares the phase index
                    // against the particle index; `fix-drift-self-phase`
                    // switches to the phase comparison.
                    #[cfg(feature = "fix-drift-self-phase")]
                    let self_phase = ph == k;
                    #[cfg(not(feature = "fix-drift-self-phase"))]
                    let self_phase = ph == i;
                    if self_phase {
                        second += grad;
                    }
                }

                drift_row[k] = first - second * tao;
            }
        });
}
