//! Multi-phase mixture-model SPH fluid simulation.
//!
//! A single simulation particle carries fractional volume of up to P phases
//! (volume fractions `alpha`), each phase with its own rest density and a
//! drift velocity relative to the mixture. Every substep runs a fixed
//! pipeline of bulk-synchronous passes:
//!
//! 1. uniform-grid neighbor search ([`grid`])
//! 2. density and pressure ([`pipeline::pressure`])
//! 3. drift-velocity prediction ([`pipeline::drift`])
//! 4. volume-fraction advection and normalization ([`pipeline::alpha`])
//! 5. momentum update and symplectic integration ([`pipeline::momentum`])
//!
//! Passes are parallel over particles when the `parallel` feature is on;
//! ordering between passes is always strict.

#[macro_use]
mod parallel;

pub mod config;
pub mod emitter;
pub mod error;
pub mod grid;
pub mod kernel;
pub mod particle;
pub mod pipeline;
pub mod ply;
pub mod preview;
pub mod solver;

pub use config::{EosMode, ShowMode, SimConfig};
pub use error::SimError;
pub use particle::ParticleSet;
pub use solver::Simulation;
