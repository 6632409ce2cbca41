//! The per-substep physics passes, in execution order. Each pass is
//! bulk-synchronous: it gathers from the neighbor lists and writes only its
//! own particle's fields, so intra-pass parallelism needs no locks. The
//! ordering between passes is load-bearing: every pass reads fields an
//! earlier one has just written.

pub mod alpha;
pub mod drift;
pub mod momentum;
pub mod pressure;
