//! Test utilities for Carve development.
//!
//! - [`workload`]: seeded, reproducible allocate/release sequences.
//! - [`checks`]: assertion helpers over live handles and allocator state.

pub mod checks;
pub mod workload;

pub use checks::{assert_disjoint, assert_fully_free};
pub use workload::{run_workload, run_workload_with, Op, WorkloadOutcome, WorkloadSpec};
