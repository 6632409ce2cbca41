use glam::Vec3;

use crate::config::SimConfig;
use crate::emitter;
use crate::error::SimError;
use crate::grid::UniformGrid;
use crate::particle::ParticleSet;
use crate::pipeline::{alpha, drift, momentum, pressure};

/// Tolerance on the per-particle volume-fraction sum after normalization.
const ALPHA_SUM_TOLERANCE: f32 = 1e-6;

/// The simulation driver: owns the particle arrays and the spatial index,
/// and runs the substep pipeline in its fixed order.
pub struct Simulation {
    pub particles: ParticleSet,
    pub config: SimConfig,
    grid: UniformGrid,
    /// Scratch for the staged volume-fraction rates.
    alpha_delta: Vec<f32>,
    step_index: u64,
    overflow_warned: bool,
}

impl Simulation {
    /// Build a simulation using the configured emitter.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let emitted = emitter::emit(&config)?;
        Self::with_particles(config, emitted.pos, emitted.alpha, emitted.fluid_count)
    }

    /// Build a simulation from externally emitted particles. `pos` holds all
    /// particles with the wall suffix starting at `fluid_count`; `alpha`
    /// holds `fluid_count * phases` volume fractions.
    pub fn with_particles(
        config: SimConfig,
        pos: Vec<Vec3>,
        alpha: Vec<f32>,
        fluid_count: usize,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if fluid_count == 0 || fluid_count > pos.len() {
            return Err(SimError::Config(format!(
                "fluid count {fluid_count} inconsistent with {} particles",
                pos.len()
            )));
        }
        if alpha.len() != fluid_count * config.phases {
            return Err(SimError::Config(format!(
                "{} alpha entries for {} fluid particles of {} phases",
                alpha.len(),
                fluid_count,
                config.phases
            )));
        }
        let particles = ParticleSet::new(pos, alpha, fluid_count, config.phases);
        let grid = UniformGrid::new(
            config.bound_vec(),
            config.cell_size,
            config.h,
            config.cell_capacity,
            config.neighbor_capacity,
            fluid_count,
        );
        let alpha_delta = vec![0.0; fluid_count * config.phases];
        Ok(Self {
            particles,
            config,
            grid,
            alpha_delta,
            step_index: 0,
            overflow_warned: false,
        })
    }

    /// Substeps completed so far.
    #[inline]
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// The spatial index of the current substep (read-only).
    #[inline]
    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    /// Advance one substep: neighbor search, pressure, drift, fraction
    /// transport and normalization, momentum, integration. Invariants are
    /// checked after normalization and after integration.
    pub fn substep(&mut self) -> Result<(), SimError> {
        let report = self
            .grid
            .build(&self.particles.pos, self.particles.fluid_count);
        if report.overflowed() {
            if cfg!(debug_assertions) {
                return Err(SimError::IndexOverflow {
                    kind: report.kind(),
                    step: self.step_index,
                });
            }
            if !self.overflow_warned {
                log::warn!(
                    "spatial index overflow ({}) at substep {}; neighborhoods are truncated",
                    report.kind(),
                    self.step_index
                );
                self.overflow_warned = true;
            }
        }

        pressure::update(&mut self.particles, &self.grid, &self.config);
        drift::update(&mut self.particles, &self.grid, &self.config);
        alpha::advect(
            &mut self.particles,
            &self.grid,
            &self.config,
            &mut self.alpha_delta,
        );
        alpha::normalize(&mut self.particles, &self.config);
        self.check_fractions()?;
        momentum::accelerate(&mut self.particles, &self.grid, &self.config);
        momentum::integrate(&mut self.particles, &self.config);
        self.check_positions()?;

        self.step_index += 1;
        Ok(())
    }

    /// Run `substeps_per_frame` substeps.
    pub fn advance_frame(&mut self) -> Result<(), SimError> {
        for _ in 0..self.config.substeps_per_frame {
            self.substep()?;
        }
        Ok(())
    }

    /// Fluid positions of the current state, the slice a frame sink consumes.
    #[inline]
    pub fn fluid_positions(&self) -> &[Vec3] {
        &self.particles.pos[..self.particles.fluid_count]
    }

    fn check_fractions(&self) -> Result<(), SimError> {
        let p = &self.particles;
        for i in 0..p.fluid_count {
            let sum: f32 = p.alpha_row(i).iter().sum();
            // Written so a NaN sum also fails the check.
            if !((sum - 1.0).abs() <= ALPHA_SUM_TOLERANCE) {
                return Err(SimError::DomainInvariant {
                    step: self.step_index,
                    particle: i,
                    what: format!("volume fractions sum to {sum}"),
                });
            }
            if p.rho_m[i] <= 0.0 {
                return Err(SimError::DomainInvariant {
                    step: self.step_index,
                    particle: i,
                    what: format!("mixture density {}", p.rho_m[i]),
                });
            }
        }
        Ok(())
    }

    fn check_positions(&self) -> Result<(), SimError> {
        let p = &self.particles;
        for i in 0..p.fluid_count {
            if !p.pos[i].is_finite() {
                return Err(SimError::DomainInvariant {
                    step: self.step_index,
                    particle: i,
                    what: format!("non-finite position {:?}", p.pos[i]),
                });
            }
        }
        Ok(())
    }
}
