//! Allocator error types.

use std::error::Error;
use std::fmt;

use carve_core::Generation;

/// Errors that can occur during allocator operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// No free block of the normalized size exists.
    ///
    /// Recoverable: retry with a smaller size or after releasing blocks.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Block size the request normalized to, or `None` if rounding
        /// up overflowed.
        normalized: Option<usize>,
        /// Largest free block at the time of the failure.
        largest_free: usize,
    },
    /// A handle whose offset is not the start of any live block.
    InvalidHandle {
        /// Offset encoded in the handle.
        offset: usize,
    },
    /// A handle for a block that was released; its offset now belongs to
    /// a newer allocation.
    StaleHandle {
        /// Offset encoded in the handle.
        offset: usize,
        /// Generation encoded in the handle.
        handle_generation: Generation,
        /// Generation of the block currently live at that offset.
        live_generation: Generation,
    },
    /// The allocator configuration was rejected at construction.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                normalized: Some(normalized),
                largest_free,
            } => {
                write!(
                    f,
                    "out of memory: requested {requested} bytes (block {normalized}), largest free block {largest_free} bytes"
                )
            }
            Self::OutOfMemory {
                requested,
                normalized: None,
                ..
            } => {
                write!(f, "out of memory: requested {requested} bytes exceeds addressable block size")
            }
            Self::InvalidHandle { offset } => {
                write!(f, "invalid handle: no live block at offset {offset}")
            }
            Self::StaleHandle {
                offset,
                handle_generation,
                live_generation,
            } => {
                write!(
                    f,
                    "stale handle: offset {offset} generation {handle_generation}, live generation {live_generation}"
                )
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}
