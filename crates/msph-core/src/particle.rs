use glam::Vec3;

/// SoA particle storage.
///
/// Fluid particles occupy indices `0..fluid_count`; wall (boundary ghost)
/// particles are the contiguous suffix `fluid_count..total_count` and carry
/// only a position. The per-phase arrays `alpha` and `drift` are row-major
/// `[particle][phase]`.
pub struct ParticleSet {
    pub fluid_count: usize,
    pub total_count: usize,
    pub phases: usize,
    /// Positions, fluid then wall suffix.
    pub pos: Vec<Vec3>,
    /// Velocities (fluid only).
    pub vel: Vec<Vec3>,
    /// Accelerations from the previous substep (fluid only). The drift
    /// predictor reads this lagged value; do not reorder the pipeline.
    pub acc: Vec<Vec3>,
    /// Volume fraction of each phase, `fluid_count * phases`.
    pub alpha: Vec<f32>,
    /// Per-phase drift velocity relative to the mixture, `fluid_count * phases`.
    pub drift: Vec<Vec3>,
    /// Mixture rest density (fluid only).
    pub rho_m: Vec<f32>,
    /// SPH-interpolated density (fluid only).
    pub rho_bar: Vec<f32>,
    /// Pressure (fluid only).
    pub pressure: Vec<f32>,
}

impl ParticleSet {
    /// Build particle state from emitted positions and fractions. `pos`
    /// holds all particles with the wall suffix starting at `fluid_count`;
    /// `alpha` holds `fluid_count * phases` fractions.
    pub fn new(pos: Vec<Vec3>, alpha: Vec<f32>, fluid_count: usize, phases: usize) -> Self {
        debug_assert!(fluid_count <= pos.len());
        debug_assert_eq!(alpha.len(), fluid_count * phases);
        let total_count = pos.len();
        Self {
            fluid_count,
            total_count,
            phases,
            pos,
            vel: vec![Vec3::ZERO; fluid_count],
            acc: vec![Vec3::ZERO; fluid_count],
            alpha,
            drift: vec![Vec3::ZERO; fluid_count * phases],
            rho_m: vec![0.0; fluid_count],
            rho_bar: vec![0.0; fluid_count],
            pressure: vec![0.0; fluid_count],
        }
    }

    /// Wall particles are the index suffix; this comparison is the sole
    /// fluid/wall discriminator in the SPH sums.
    #[inline]
    pub fn is_wall(&self, j: usize) -> bool {
        j >= self.fluid_count
    }

    #[inline]
    pub fn wall_count(&self) -> usize {
        self.total_count - self.fluid_count
    }

    /// Volume fractions of particle `i`, one entry per phase.
    #[inline]
    pub fn alpha_row(&self, i: usize) -> &[f32] {
        &self.alpha[i * self.phases..(i + 1) * self.phases]
    }

    /// Drift velocities of particle `i`, one entry per phase.
    #[inline]
    pub fn drift_row(&self, i: usize) -> &[Vec3] {
        &self.drift[i * self.phases..(i + 1) * self.phases]
    }
}
