//! Volume-fraction transport (`adv_alpha`) and normalization (`check_alpha`).

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimConfig;
use crate::grid::UniformGrid;
use crate::kernel::spiky_gradient;
use crate::particle::ParticleSet;
use crate::pipeline::pressure::alpha_pressure_slope;

/// Below this total the fractions are considered lost and redistributed
/// uniformly.
const ALPHA_TOTAL_FLOOR: f32 = 1e-6;

/// Advance the volume fractions by convection plus inter-phase drift
/// transport (explicit Euler). The rates are staged in `delta`
/// (`fluid_count * phases`) so every particle reads a consistent pre-pass
/// snapshot of its neighbors' fractions.
pub fn advect(p: &mut ParticleSet, grid: &UniformGrid, cfg: &SimConfig, delta: &mut [f32]) {
    let phases = p.phases;
    let fluid = p.fluid_count;
    debug_assert_eq!(delta.len(), fluid * phases);
    let h = cfg.h;

    let pos = &p.pos;
    let vel = &p.vel;
    let alpha = &p.alpha;
    let drift = &p.drift;
    let rho_m = &p.rho_m;
    let rho_bar = &p.rho_bar;

    par_chunks_mut!(delta, phases)
        .enumerate()
        .for_each(|(i, drow)| {
            for k in 0..phases {
                let aik = alpha[i * phases + k];
                let dik = drift[i * phases + k];
                let mut convection = 0.0f32;
                let mut drift_flux = 0.0f32;
                for &j in grid.neighbors(i) {
                    let j = j as usize;
                    if j >= fluid {
                        continue;
                    }
                    let dw = spiky_gradient(pos[i] - pos[j], h);
                    let ajk = alpha[j * phases + k];
                    convection +=
                        rho_m[j] * (aik + ajk) / (2.0 * rho_bar[j]) * (vel[j] - vel[i]).dot(dw);
                    drift_flux += rho_m[j] / rho_bar[j]
                        * (ajk * drift[j * phases + k] + aik * dik).dot(dw);
                }
                drow[k] = convection + drift_flux;
            }
        });

    let dt = cfg.dt;
    par_iter_mut!(p.alpha)
        .zip(par_iter!(delta))
        .for_each(|(a, d)| *a -= d * dt);
}

/// Clamp and renormalize the fractions of every particle, then add the
/// pressure correction corresponding to the mass change the renormalization
/// introduced, so the EOS stays locally consistent.
///
/// Post-conditions: fractions are in `[0, 1]` and sum to 1 per particle.
/// Running this twice in a row is idempotent up to round-off.
pub fn normalize(p: &mut ParticleSet, cfg: &SimConfig) {
    let phases = p.phases;
    let rho_m = &p.rho_m;
    let rho_bar = &p.rho_bar;

    par_chunks_mut!(p.alpha, phases)
        .zip(par_iter_mut!(p.pressure))
        .enumerate()
        .for_each(|(i, (arow, prs))| {
            // Wipe the second phase before normalizing (off by default).
            #[cfg(feature = "legacy-alpha-reset")]
            if phases > 1 {
                arow[1] = 0.0;
            }

            let tot: f32 = arow.iter().filter(|a| **a > 0.0).sum();
            let mut del_p = 0.0f32;
            if tot < ALPHA_TOTAL_FLOOR {
                let uniform = 1.0 / phases as f32;
                for ph in 0..phases {
                    let cur = arow[ph];
                    arow[ph] = uniform;
                    del_p -=
                        alpha_pressure_slope(cfg, ph, rho_m[i], rho_bar[i]) * (uniform - cur);
                }
            } else {
                for ph in 0..phases {
                    let cur = arow[ph];
                    arow[ph] = if cur < 0.0 { 0.0 } else { cur / tot };
                    del_p -=
                        alpha_pressure_slope(cfg, ph, rho_m[i], rho_bar[i]) * (arow[ph] - cur);
                }
            }
            *prs += del_p;
        });
}
