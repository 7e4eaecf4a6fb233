//! Fixed-capacity bump-pointer arenas.
//!
//! An arena preallocates one contiguous buffer and satisfies allocation
//! requests by advancing a cursor through it. There is no per-object free:
//! everything is reclaimed at once by [`LinearArena::reset`]. This is the
//! only library crate in the workspace that contains `unsafe` code, confined to
//! `raw.rs` and a handful of call sites marked `#[allow(unsafe_code)]`.
//!
//! # Architecture
//!
//! ```text
//! LinearArena<B: Backing> (cursor, alignment, bounds)
//! ├── HeapBuffer      owned, from the global allocator  -> HeapArena
//! ├── BorrowedBuffer  a caller's &mut [u8]              -> BorrowedArena<'buf>
//! └── InlineBuffer<N> [u8; N] inside the arena value    -> InlineArena<N>
//! ```
//!
//! All three share the same operations:
//!
//! - [`alloc_aligned`](LinearArena::alloc_aligned) /
//!   [`alloc_tight`](LinearArena::alloc_tight): raw [`Placement`]s.
//! - [`alloc`](LinearArena::alloc), [`alloc_with`](LinearArena::alloc_with)
//!   and the tight and slice variants: typed values.
//! - [`reset`](LinearArena::reset), [`has`](LinearArena::has),
//!   [`remaining`](LinearArena::remaining).
//!
//! # Failure
//!
//! The only runtime failure of an allocation is
//! [`ArenaError::OutOfCapacity`] (plus [`ArenaError::Misaligned`] for typed
//! tight placements). A failed call leaves the arena untouched.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod backing;
pub mod config;
pub mod error;
pub mod linear;
mod raw;
mod typed;

// Public re-exports for the primary API surface.
pub use backing::{Backing, BorrowedBuffer, HeapBuffer, InlineBuffer};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use linear::{BorrowedArena, HeapArena, InlineArena, LinearArena, Placement};
