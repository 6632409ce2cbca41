//! Switchable serial/parallel iteration.
//!
//! With the `parallel` feature the macros expand to rayon parallel iterators;
//! without it they expand to the std equivalents, so every pass has a single
//! code path. The serial build is bit-reproducible; the parallel build sums
//! neighbor contributions in nondeterministic order.

macro_rules! par_iter {
    ($e: expr) => {{
        #[cfg(not(feature = "parallel"))]
        let it = $e.iter();
        #[cfg(feature = "parallel")]
        let it = $e.par_iter();
        it
    }};
}

macro_rules! par_iter_mut {
    ($e: expr) => {{
        #[cfg(not(feature = "parallel"))]
        let it = $e.iter_mut();
        #[cfg(feature = "parallel")]
        let it = $e.par_iter_mut();
        it
    }};
}

macro_rules! par_chunks_mut {
    ($e: expr, $n: expr) => {{
        #[cfg(not(feature = "parallel"))]
        let it = $e.chunks_mut($n);
        #[cfg(feature = "parallel")]
        let it = $e.par_chunks_mut($n);
        it
    }};
}

macro_rules! par_range {
    ($r: expr) => {{
        #[cfg(not(feature = "parallel"))]
        let it = $r.into_iter();
        #[cfg(feature = "parallel")]
        let it = $r.into_par_iter();
        it
    }};
}
