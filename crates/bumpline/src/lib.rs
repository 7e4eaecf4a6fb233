//! Bumpline: fixed-capacity bump-pointer arenas for scratch memory.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! Bumpline sub-crates. For most users, adding `bumpline` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use bumpline::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! struct Hit {
//!     entity: u32,
//!     distance: f32,
//! }
//!
//! // One arena per frame, sized once up front.
//! let mut frame = HeapArena::new(4096)?;
//!
//! for tick in 0..3u32 {
//!     let hit = frame.alloc(Hit { entity: tick, distance: 1.5 })?;
//!     let scores = frame.alloc_slice_fill(8, 0u16)?;
//!     scores[0] = 7;
//!     assert_eq!(hit.entity, tick);
//!     assert!(frame.has(&*hit));
//!
//!     // Everything from this frame goes away at once.
//!     frame.reset();
//!     assert_eq!(frame.remaining(), 4096);
//! }
//! # Ok::<(), ArenaError>(())
//! ```
//!
//! # Choosing a buffer
//!
//! | Arena | Buffer | Freed by |
//! |-------|--------|----------|
//! | [`arena::HeapArena`] | global allocator, sized at runtime | the arena, on drop |
//! | [`arena::BorrowedArena`] | a caller's `&mut [u8]` | the caller |
//! | [`arena::InlineArena`] | `[u8; N]` inside the arena value | nobody |
//!
//! ```rust
//! use bumpline::prelude::*;
//!
//! // Inline: no heap allocation at all.
//! let small = InlineArena::<64>::new();
//! let a = small.alloc_tight(5)?;
//! assert_eq!(a.offset(), 0);
//!
//! // Borrowed: reuse a buffer you already own.
//! let mut storage = vec![0u8; 256];
//! let borrowed = BorrowedArena::from_slice(&mut storage);
//! let b = borrowed.alloc_aligned(8, 24)?;
//! assert_eq!(b.len(), 24);
//! # Ok::<(), ArenaError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Arena core, buffer ownership variants, config and errors
/// (`bumpline-arena`).
///
/// Most users only need the arena aliases and [`arena::ArenaError`] from
/// this module; they are also available in the [`prelude`].
pub use bumpline_arena as arena;

/// Common imports for typical Bumpline usage.
///
/// ```rust
/// use bumpline::prelude::*;
/// ```
pub mod prelude {
    // Arenas
    pub use bumpline_arena::{BorrowedArena, HeapArena, InlineArena, LinearArena, Placement};

    // Config and errors
    pub use bumpline_arena::{ArenaConfig, ArenaError};
}
