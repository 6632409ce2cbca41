use glam::Vec3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::SimError;

/// Equation of state for the weakly-compressible pressure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EosMode {
    /// Tait-style: `p = k1 * rho_m * ((rho / rho_m)^k2 - 1) / k2`.
    #[default]
    Tait,
    /// Linear stiffness: `p = k3 * (rho - rho_m)`.
    Linear,
}

/// What the preview colors encode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowMode {
    /// Phase composition: alpha_0 -> red, alpha_1 -> green.
    #[default]
    Composition,
    /// Normalized pressure on a red/green ramp.
    Pressure,
}

/// A lattice block of fluid particles with a fixed phase composition.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FluidBlock {
    /// World position of the block's first particle.
    pub origin: [f32; 3],
    /// Particles per axis.
    pub dims: [u32; 3],
    /// Lattice spacing.
    pub spacing: f32,
    /// Volume fractions shared by every particle of the block; one entry per
    /// phase, summing to 1.
    pub alpha: Vec<f32>,
}

/// Tank wall sampling: a floor slab plus four side walls made of
/// `layers`-deep sheets of static particles spaced `gap` apart.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WallLayout {
    pub gap: f32,
    pub layers: u32,
    /// Walls rise to this fraction of the box height.
    pub height_fraction: f32,
}

impl Default for WallLayout {
    fn default() -> Self {
        Self {
            gap: 0.6 * 1.3,
            layers: 6,
            height_fraction: 1.0 / 3.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitterConfig {
    pub blocks: Vec<FluidBlock>,
    /// `None` leaves the box without wall particles (boundary reflection
    /// still applies).
    pub wall: Option<WallLayout>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            blocks: vec![FluidBlock {
                origin: [35.0, 35.0, 10.0],
                dims: [25, 25, 43],
                spacing: 1.3,
                alpha: vec![1.0, 0.0],
            }],
            wall: Some(WallLayout::default()),
        }
    }
}

/// Full simulation configuration. Loadable from JSON (`//` comment lines are
/// tolerated); missing keys fall back to the defaults below, unknown keys
/// are rejected.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Number of phases P.
    pub phases: usize,
    /// Rest density per phase, `phases` entries.
    pub rho0: Vec<f32>,
    /// Smoothing length.
    pub h: f32,
    pub particle_radius: f32,
    pub particle_distance: f32,
    /// Fixed time step per substep.
    pub dt: f32,
    pub substeps_per_frame: u32,
    pub frames: u32,
    pub eos_mode: EosMode,
    /// Tait stiffness.
    pub k1: f32,
    /// Tait exponent.
    pub k2: f32,
    /// Linear stiffness.
    pub k3: f32,
    /// Inter-phase coupling time constant (tau).
    pub tao: f32,
    /// Velocity damping factor per substep, strictly below 1.
    pub damp: f32,
    /// Simulation box extents; the domain is `[0, bound]` per axis.
    pub bound: [f32; 3],
    /// Alpha-weighted phase pressure in the drift predictor.
    pub miscible: bool,
    pub gravity: [f32; 3],
    /// Grid cell side, at least `1.1 * h`.
    pub cell_size: f32,
    /// Cell bucket capacity (S_cell).
    pub cell_capacity: usize,
    /// Per-particle neighbor list capacity (N_nei).
    pub neighbor_capacity: usize,
    pub show_mode: ShowMode,
    pub emitter: EmitterConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        let particle_radius = 1.0;
        let h = 4.0 * particle_radius;
        Self {
            phases: 2,
            rho0: vec![1000.0, 500.0],
            h,
            particle_radius,
            particle_distance: 1.3,
            dt: 0.2 * (h / 60.0).sqrt().min(h / 500.0),
            substeps_per_frame: 10,
            frames: 1200,
            eos_mode: EosMode::Tait,
            k1: 200.0,
            k2: 7.0,
            k3: 1000.0,
            tao: 1e-8,
            damp: 0.9993,
            bound: [100.0, 100.0, 200.0],
            miscible: false,
            gravity: [0.0, 0.0, -9.8],
            cell_size: 6.0,
            cell_capacity: 1024,
            neighbor_capacity: 1024,
            show_mode: ShowMode::Composition,
            emitter: EmitterConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load from a JSON file, stripping `//` comment lines first.
    pub fn from_json_file(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON configuration string.
    pub fn from_json_str(text: &str) -> Result<Self, SimError> {
        let cleaned: String = text
            .lines()
            .filter(|l| !l.trim_start().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        let config: SimConfig =
            serde_json::from_str(&cleaned).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Init-time sanity checks; every failure is fatal.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.phases == 0 {
            return Err(SimError::Config("phases must be at least 1".into()));
        }
        if self.rho0.len() != self.phases {
            return Err(SimError::Config(format!(
                "rho0 has {} entries for {} phases",
                self.rho0.len(),
                self.phases
            )));
        }
        if self.rho0.iter().any(|r| *r <= 0.0) {
            return Err(SimError::Config("rest densities must be positive".into()));
        }
        if self.h <= 0.0 {
            return Err(SimError::Config("smoothing length h must be positive".into()));
        }
        if self.dt <= 0.0 {
            return Err(SimError::Config("time step dt must be positive".into()));
        }
        if !(0.0 < self.damp && self.damp < 1.0) {
            return Err(SimError::Config("damp must lie in (0, 1)".into()));
        }
        if self.cell_size < 1.1 * self.h {
            return Err(SimError::Config(format!(
                "cell_size {} is below 1.1 * h = {}",
                self.cell_size,
                1.1 * self.h
            )));
        }
        if self.bound.iter().any(|b| *b <= 0.0) {
            return Err(SimError::Config("bound extents must be positive".into()));
        }
        if self.tao < 0.0 {
            return Err(SimError::Config("tao must be nonnegative".into()));
        }
        match self.eos_mode {
            EosMode::Tait if self.k1 <= 0.0 || self.k2 <= 0.0 => {
                return Err(SimError::Config("Tait EOS requires positive k1 and k2".into()));
            }
            EosMode::Linear if self.k3 <= 0.0 => {
                return Err(SimError::Config("linear EOS requires positive k3".into()));
            }
            _ => {}
        }
        if self.cell_capacity == 0 || self.neighbor_capacity == 0 {
            return Err(SimError::Config("bucket capacities must be at least 1".into()));
        }
        for (b, block) in self.emitter.blocks.iter().enumerate() {
            if block.alpha.len() != self.phases {
                return Err(SimError::Config(format!(
                    "emitter block {b}: {} alpha entries for {} phases",
                    block.alpha.len(),
                    self.phases
                )));
            }
            if block.spacing <= 0.0 {
                return Err(SimError::Config(format!("emitter block {b}: nonpositive spacing")));
            }
            if block.dims.iter().any(|d| *d == 0) {
                return Err(SimError::Config(format!("emitter block {b}: empty dims")));
            }
            for axis in 0..3 {
                let extent = block.origin[axis]
                    + (block.dims[axis] - 1) as f32 * block.spacing;
                if block.origin[axis] < 0.0 || extent > self.bound[axis] {
                    return Err(SimError::Config(format!(
                        "emitter block {b} leaves the box on axis {axis}"
                    )));
                }
            }
        }
        if let Some(wall) = &self.emitter.wall {
            if wall.gap <= 0.0 {
                return Err(SimError::Config("wall gap must be positive".into()));
            }
            if !(0.0 < wall.height_fraction && wall.height_fraction <= 1.0) {
                return Err(SimError::Config("wall height_fraction must lie in (0, 1]".into()));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn gravity_vec(&self) -> Vec3 {
        Vec3::from_array(self.gravity)
    }

    #[inline]
    pub fn bound_vec(&self) -> Vec3 {
        Vec3::from_array(self.bound)
    }
}
