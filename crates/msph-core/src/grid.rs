use glam::Vec3;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Uniform bucket grid over the simulation box.
///
/// `build()` runs two passes: every particle (fluid and wall) is appended to
/// its cell bucket with an atomic counter, then every fluid particle scans
/// the 3x3x3 cell stencil around its own cell and records all indices within
/// the cutoff `1.1 * h` in a fixed-capacity neighbor list. The 1.1 slack
/// absorbs the half-cell bias of the cell mapping.
///
/// Buckets never grow: an overflowing append drops the entry and raises a
/// flag in the [`BuildReport`]. The caller decides whether that is fatal.
pub struct UniformGrid {
    cell_size: f32,
    dims: [i32; 3],
    cell_capacity: usize,
    neighbor_capacity: usize,
    /// Neighbor cutoff, `1.1 * h`.
    cutoff: f32,
    /// Particles per cell, reset every build.
    cell_count: Vec<AtomicU32>,
    /// Cell buckets, `cells * cell_capacity`, atomically appended.
    cell_members: Vec<AtomicU32>,
    /// Valid neighbor entries per fluid particle.
    nei_count: Vec<u32>,
    /// Neighbor lists, `fluid_count * neighbor_capacity`.
    nei: Vec<u32>,
    cell_overflow: AtomicBool,
    neighbor_overflow: AtomicBool,
}

/// Outcome of a [`UniformGrid::build`] call.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildReport {
    pub cell_overflow: bool,
    pub neighbor_overflow: bool,
}

impl BuildReport {
    #[inline]
    pub fn overflowed(&self) -> bool {
        self.cell_overflow || self.neighbor_overflow
    }

    pub fn kind(&self) -> &'static str {
        match (self.cell_overflow, self.neighbor_overflow) {
            (true, true) => "cell bucket and neighbor list",
            (true, false) => "cell bucket",
            _ => "neighbor list",
        }
    }
}

impl UniformGrid {
    /// Create a grid covering `[0, bound]` with the given cell side.
    /// `cell_size` must be at least `1.1 * h` so the 3x3x3 stencil is
    /// sufficient for the cutoff.
    pub fn new(
        bound: Vec3,
        cell_size: f32,
        h: f32,
        cell_capacity: usize,
        neighbor_capacity: usize,
        fluid_count: usize,
    ) -> Self {
        debug_assert!(cell_size >= 1.1 * h);
        let dims = [
            (bound.x / cell_size).ceil().max(1.0) as i32,
            (bound.y / cell_size).ceil().max(1.0) as i32,
            (bound.z / cell_size).ceil().max(1.0) as i32,
        ];
        let cells = (dims[0] * dims[1] * dims[2]) as usize;
        Self {
            cell_size,
            dims,
            cell_capacity,
            neighbor_capacity,
            cutoff: 1.1 * h,
            cell_count: (0..cells).map(|_| AtomicU32::new(0)).collect(),
            cell_members: (0..cells * cell_capacity).map(|_| AtomicU32::new(0)).collect(),
            nei_count: vec![0; fluid_count],
            nei: vec![0; fluid_count * neighbor_capacity],
            cell_overflow: AtomicBool::new(false),
            neighbor_overflow: AtomicBool::new(false),
        }
    }

    /// Rebuild cell buckets and neighbor lists from current positions.
    /// `positions` holds all particles, fluid first; neighbor lists are
    /// produced for the `fluid_count` prefix only.
    pub fn build(&mut self, positions: &[Vec3], fluid_count: usize) -> BuildReport {
        debug_assert_eq!(self.nei_count.len(), fluid_count);

        for c in self.cell_count.iter_mut() {
            *c.get_mut() = 0;
        }
        self.cell_overflow.store(false, Ordering::Relaxed);
        self.neighbor_overflow.store(false, Ordering::Relaxed);

        let dims = self.dims;
        let inv_cell = 1.0 / self.cell_size;
        let cell_capacity = self.cell_capacity;
        let neighbor_capacity = self.neighbor_capacity;
        let cutoff = self.cutoff;

        // Cell coordinate of a position: floor(pos / c - 0.5), clamped into
        // the grid. The -0.5 bias centers the stencil on the particle.
        let coords = move |p: Vec3| -> [i32; 3] {
            [
                ((p.x * inv_cell - 0.5).floor() as i32).clamp(0, dims[0] - 1),
                ((p.y * inv_cell - 0.5).floor() as i32).clamp(0, dims[1] - 1),
                ((p.z * inv_cell - 0.5).floor() as i32).clamp(0, dims[2] - 1),
            ]
        };
        let index = move |c: [i32; 3]| -> usize { (c[0] + dims[0] * (c[1] + dims[1] * c[2])) as usize };

        // Pass 1: append every particle to its cell bucket.
        {
            let cell_count = &self.cell_count;
            let cell_members = &self.cell_members;
            let cell_overflow = &self.cell_overflow;
            par_range!(0..positions.len()).for_each(|i| {
                let cell = index(coords(positions[i]));
                let slot = cell_count[cell].fetch_add(1, Ordering::Relaxed) as usize;
                if slot < cell_capacity {
                    cell_members[cell * cell_capacity + slot].store(i as u32, Ordering::Relaxed);
                } else {
                    cell_overflow.store(true, Ordering::Relaxed);
                }
            });
        }

        // Pass 2: neighbor list for every fluid particle from the 3x3x3 stencil.
        {
            let cell_count = &self.cell_count;
            let cell_members = &self.cell_members;
            let neighbor_overflow = &self.neighbor_overflow;
            par_chunks_mut!(self.nei, neighbor_capacity)
                .zip(par_iter_mut!(self.nei_count))
                .enumerate()
                .for_each(|(i, (row, count))| {
                    let pi = positions[i];
                    let home = coords(pi);
                    let mut n = 0usize;
                    for dz in -1..=1i32 {
                        for dy in -1..=1i32 {
                            for dx in -1..=1i32 {
                                let c = [home[0] + dx, home[1] + dy, home[2] + dz];
                                if c[0] < 0 || c[0] >= dims[0]
                                    || c[1] < 0 || c[1] >= dims[1]
                                    || c[2] < 0 || c[2] >= dims[2]
                                {
                                    continue;
                                }
                                let cell = index(c);
                                let occupied =
                                    (cell_count[cell].load(Ordering::Relaxed) as usize).min(cell_capacity);
                                for s in 0..occupied {
                                    let j = cell_members[cell * cell_capacity + s].load(Ordering::Relaxed);
                                    if j as usize == i {
                                        continue;
                                    }
                                    if (positions[j as usize] - pi).length() < cutoff {
                                        if n < neighbor_capacity {
                                            row[n] = j;
                                            n += 1;
                                        } else {
                                            neighbor_overflow.store(true, Ordering::Relaxed);
                                        }
                                    }
                                }
                            }
                        }
                    }
                    *count = n as u32;
                });
        }

        BuildReport {
            cell_overflow: self.cell_overflow.load(Ordering::Relaxed),
            neighbor_overflow: self.neighbor_overflow.load(Ordering::Relaxed),
        }
    }

    /// Neighbor indices of fluid particle `i` (fluid and wall, self excluded,
    /// order unspecified). Valid until the next `build()`.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[u32] {
        let start = i * self.neighbor_capacity;
        &self.nei[start..start + self.nei_count[i] as usize]
    }

    #[inline]
    pub fn neighbor_count(&self, i: usize) -> usize {
        self.nei_count[i] as usize
    }
}
