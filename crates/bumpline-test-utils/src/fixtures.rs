//! Reusable allocation fixtures.
//!
//! - [`AllocOp`]: one raw allocation request, replayable against any arena.
//! - [`DropCounter`]: a value that counts how often it is dropped, for
//!   checking that arenas never run destructors.

use std::cell::Cell;
use std::rc::Rc;

use bumpline_arena::{ArenaError, Backing, LinearArena, Placement};

/// A single raw allocation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocOp {
    /// `alloc_tight(size)`.
    Tight(usize),
    /// `alloc_aligned(align, size)`.
    Aligned { align: usize, size: usize },
}

impl AllocOp {
    /// Alignment the resulting placement must honour.
    pub fn align(&self) -> usize {
        match *self {
            Self::Tight(_) => 1,
            Self::Aligned { align, .. } => align,
        }
    }

    /// Bytes requested, excluding padding.
    pub fn size(&self) -> usize {
        match *self {
            Self::Tight(size) | Self::Aligned { size, .. } => size,
        }
    }

    pub fn apply<'a, B: Backing>(
        &self,
        arena: &'a LinearArena<B>,
    ) -> Result<Placement<'a>, ArenaError> {
        match *self {
            Self::Tight(size) => arena.alloc_tight(size),
            Self::Aligned { align, size } => arena.alloc_aligned(align, size),
        }
    }
}

/// Increments a shared counter when dropped.
#[derive(Debug)]
pub struct DropCounter {
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    /// Create a counter and the handle used to read it.
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let drops = Rc::new(Cell::new(0));
        (
            Self {
                drops: Rc::clone(&drops),
            },
            drops,
        )
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
