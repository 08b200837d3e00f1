//! Carve: a fixed-arena, power-of-two buddy allocator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Carve sub-crates. For most users, adding `carve` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use carve::prelude::*;
//!
//! let mut alloc = BuddyAllocator::new(ArenaConfig::new(1000)).unwrap();
//!
//! // 100 bytes rounds up to a 128-byte block at the start of the arena.
//! let pixels = alloc.allocate(100).unwrap();
//! assert_eq!((pixels.offset(), pixels.size()), (0, 128));
//! alloc.data_mut(pixels).unwrap().fill(0x7F);
//!
//! let stats = alloc.stats();
//! assert_eq!(stats.used, 128);
//! println!("{stats}");
//!
//! alloc.deallocate(pixels);
//! assert_eq!(alloc.stats().free, 1024);
//!
//! // Releasing twice is ignored; the strict variant reports it.
//! alloc.deallocate(pixels);
//! assert!(matches!(
//!     alloc.try_deallocate(pixels),
//!     Err(ArenaError::InvalidHandle { .. })
//! ));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `carve-arena` | `BuddyAllocator`, config, stats, invariant checks |
//! | [`types`] | `carve-core` | `BlockHandle`, `Order`, `Generation`, order arithmetic |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The allocator, its configuration and usage reporting (`carve-arena`).
pub use carve_arena as arena;

/// Handles, orders and power-of-two arithmetic (`carve-core`).
pub use carve_core as types;

/// Common imports for typical usage.
///
/// ```rust
/// use carve::prelude::*;
/// ```
pub mod prelude {
    // Allocator
    pub use carve_arena::{ArenaConfig, BuddyAllocator};

    // Reporting
    pub use carve_arena::{AllocCounters, ArenaStats, LiveBlock};

    // Errors
    pub use carve_arena::{ArenaError, InvariantViolation};

    // Core types
    pub use carve_core::{BlockHandle, Generation, Order};
}
