use thiserror::Error;

/// Simulation error taxonomy.
#[derive(Debug, Error)]
pub enum SimError {
    /// Rejected at init; the simulation never starts.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A fixed-capacity grid bucket was exhausted during neighbor search.
    /// Fatal in debug builds; release builds truncate the neighborhood and
    /// warn once instead.
    #[error("spatial index overflow ({kind}) at substep {step}; raise the bucket capacities")]
    IndexOverflow { kind: &'static str, step: u64 },

    /// A per-particle invariant failed after a pipeline pass. Always fatal.
    #[error("invariant violated at substep {step}, particle {particle}: {what}")]
    DomainInvariant {
        step: u64,
        particle: usize,
        what: String,
    },

    /// Frame export failure; the driver treats this as non-fatal and skips
    /// the frame.
    #[error("frame export failed: {0}")]
    Io(#[from] std::io::Error),
}
