//! Fixed-arena power-of-two buddy allocator.
//!
//! Carves one pre-reserved byte buffer into power-of-two blocks, hands them
//! out through opaque generation-stamped handles, and coalesces freed
//! buddies back into larger blocks.
//!
//! # Architecture
//!
//! ```text
//! BuddyAllocator (orchestrator)
//! ├── Arena        (Vec<u8>, power-of-two capacity, never resized)
//! ├── BlockIndex   (offset → BlockEntry for every live block)
//! ├── FreeLists    (order → ordered set of free block offsets)
//! └── AllocCounters (lifetime allocation/split/merge counts)
//! ```
//!
//! The arena holds only payload bytes. All structure lives in the index
//! and free lists, so a block's bytes are never read or written by the
//! allocator except to zero a fresh allocation.
//!
//! # Example
//!
//! ```rust
//! use carve_arena::BuddyAllocator;
//!
//! let mut alloc = BuddyAllocator::with_capacity(1000).unwrap();
//! assert_eq!(alloc.capacity(), 1024);
//!
//! let a = alloc.allocate(100).unwrap();
//! let b = alloc.allocate(50).unwrap();
//! assert_eq!((a.offset(), a.size()), (0, 128));
//! assert_eq!((b.offset(), b.size()), (128, 64));
//! assert_eq!(alloc.stats().used, 192);
//!
//! alloc.deallocate(a);
//! alloc.deallocate(b);
//! assert_eq!(alloc.stats().free, 1024);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod arena;
pub mod config;
pub mod error;
pub mod free_list;
pub mod index;
pub mod invariants;
pub mod stats;

// Public re-exports for the primary API surface.
pub use allocator::BuddyAllocator;
pub use carve_core::{BlockHandle, Generation, Order};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use invariants::{InvariantViolation, ViolationKind};
pub use stats::{AllocCounters, ArenaStats, LiveBlock};
