//! Synthetic CPU work for `/cpu`.
//!
//! A [`Workload`] is one unit of CPU-bound work; [`burn`] repeats it a fixed
//! number of times on the calling thread. The default unit hashes a constant
//! three-byte input with SHA-256.

use std::hint::black_box;

use sha2::{Digest, Sha256};

/// A single, repeatable unit of CPU-bound work.
pub trait Workload {
    fn run_once(&self);
}

/// SHA-256 over a fixed input.
#[derive(Debug, Clone, Copy)]
pub struct Sha256Workload {
    input: &'static [u8],
}

impl Sha256Workload {
    pub const fn new(input: &'static [u8]) -> Self {
        Self { input }
    }
}

impl Default for Sha256Workload {
    fn default() -> Self {
        Self::new(b"abc")
    }
}

impl Workload for Sha256Workload {
    fn run_once(&self) {
        black_box(Sha256::digest(black_box(self.input)));
    }
}

/// Run `units` iterations of `workload` synchronously.
///
/// No yielding and no cancellation: the caller's thread is busy until every
/// unit has run.
pub fn burn<W: Workload + ?Sized>(workload: &W, units: u64) {
    for _ in 0..units {
        workload.run_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counter(Cell<u64>);

    impl Workload for Counter {
        fn run_once(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_burn_runs_exact_units() {
        let counter = Counter(Cell::new(0));
        burn(&counter, 1234);
        assert_eq!(counter.0.get(), 1234);
    }

    #[test]
    fn test_burn_zero_units() {
        let counter = Counter(Cell::new(0));
        burn(&counter, 0);
        assert_eq!(counter.0.get(), 0);
    }

    #[test]
    fn test_sha256_workload_runs() {
        burn(&Sha256Workload::default(), 10);
    }
}
