//! The bump-pointer arena core.
//!
//! A [`LinearArena`] is a fixed-size byte buffer plus a cursor. Every
//! allocation advances the cursor; nothing is ever freed individually.
//! [`LinearArena::reset`] zeroes the whole buffer and rewinds the cursor in
//! one step.
//!
//! Allocation takes `&self`, so any number of placements may be alive at
//! once. Reset takes `&mut self`, so the borrow checker rules out a
//! placement outliving the reset that reclaims it.

use std::cell::Cell;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use tracing::trace;

use crate::backing::{Backing, BorrowedBuffer, HeapBuffer, InlineBuffer};
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::raw;

/// Arena that owns a heap buffer and frees it on drop.
pub type HeapArena = LinearArena<HeapBuffer>;

/// Arena over a caller's buffer, which it never frees.
pub type BorrowedArena<'buf> = LinearArena<BorrowedBuffer<'buf>>;

/// Arena whose `N`-byte buffer is stored inside the arena value.
pub type InlineArena<const N: usize> = LinearArena<InlineBuffer<N>>;

/// A fixed-capacity bump allocator over a [`Backing`] buffer.
///
/// # Invariants
///
/// - `0 <= used() <= capacity()`.
/// - `remaining() == capacity() - used()`.
/// - Placements returned between two resets never overlap.
///
/// # Thread Safety
///
/// The cursor is a [`Cell`], so the arena is `!Sync`. Use one arena per
/// thread, or lock externally.
///
/// # Destructors
///
/// The arena never runs destructors, neither on [`reset`](Self::reset) nor
/// on drop. Values that own resources must be torn down by the caller
/// (e.g. with [`std::ptr::drop_in_place`]) before the arena is reset, or
/// they are leaked.
#[derive(Debug)]
pub struct LinearArena<B: Backing> {
    backing: B,
    /// Offset of the next free byte.
    cursor: Cell<usize>,
}

impl<B: Backing> LinearArena<B> {
    /// Build an arena over `backing`, starting empty.
    pub fn from_backing(backing: B) -> Self {
        Self {
            backing,
            cursor: Cell::new(0),
        }
    }

    /// Total size of the buffer in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.backing.capacity()
    }

    /// Bytes consumed since the last reset, padding included.
    #[inline]
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Bytes still available.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.cursor.get()
    }

    /// The underlying buffer.
    pub fn backing(&self) -> &B {
        &self.backing
    }

    /// Carve `size` bytes whose address is a multiple of `align`.
    ///
    /// Up to `align - 1` bytes of padding may be skipped first; they stay
    /// unusable until the next reset. On failure the arena is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two.
    pub fn alloc_aligned(&self, align: usize, size: usize) -> Result<Placement<'_>, ArenaError> {
        assert!(
            align.is_power_of_two(),
            "alignment {align} is not a power of two"
        );
        let start = self
            .cursor
            .get()
            .checked_add(self.padding_for(align))
            .ok_or_else(|| self.out_of_capacity(size, align))?;
        self.bump(start, size, align)
    }

    /// Carve `size` bytes at the cursor, with no padding.
    ///
    /// The placement is only as aligned as the cursor happens to be.
    pub fn alloc_tight(&self, size: usize) -> Result<Placement<'_>, ArenaError> {
        self.bump(self.cursor.get(), size, 1)
    }

    /// Zero the whole buffer and rewind the cursor to the start.
    ///
    /// Never fails. Destructors of placed values are not run.
    #[allow(unsafe_code)]
    pub fn reset(&mut self) {
        trace!(used = self.used(), capacity = self.capacity(), "arena reset");
        // SAFETY: &mut self means no placement borrows the buffer, and
        // base..base + capacity is the backing's own range.
        unsafe { raw::zero(self.backing.base(), self.capacity()) };
        self.cursor.set(0);
    }

    /// Whether `ptr` points into the buffer, allocated yet or not.
    pub fn has<T: ?Sized>(&self, ptr: *const T) -> bool {
        self.offset_of(ptr).is_some()
    }

    /// Byte offset of `ptr` from the start of the buffer, if it points
    /// inside it.
    pub fn offset_of<T: ?Sized>(&self, ptr: *const T) -> Option<usize> {
        let base = self.backing.base().as_ptr().addr();
        let offset = ptr.cast::<u8>().addr().checked_sub(base)?;
        (offset < self.capacity()).then_some(offset)
    }

    /// Padding needed to bring the cursor's address to a multiple of `align`.
    pub(crate) fn padding_for(&self, align: usize) -> usize {
        let addr = self.backing.base().as_ptr().addr() + self.cursor.get();
        addr.wrapping_neg() & (align - 1)
    }

    pub(crate) fn out_of_capacity(&self, requested: usize, align: usize) -> ArenaError {
        trace!(
            requested,
            align,
            remaining = self.remaining(),
            "arena allocation refused"
        );
        ArenaError::OutOfCapacity {
            requested,
            align,
            remaining: self.remaining(),
            capacity: self.capacity(),
        }
    }

    #[allow(unsafe_code)]
    fn bump(&self, start: usize, size: usize, align: usize) -> Result<Placement<'_>, ArenaError> {
        let end = start
            .checked_add(size)
            .filter(|&end| end <= self.capacity())
            .ok_or_else(|| self.out_of_capacity(size, align))?;
        self.cursor.set(end);
        Ok(Placement {
            // SAFETY: start <= end <= capacity.
            ptr: unsafe { raw::offset_ptr(self.backing.base(), start) },
            offset: start,
            len: size,
            _arena: PhantomData,
        })
    }
}

impl LinearArena<HeapBuffer> {
    /// Allocate a zeroed `capacity`-byte buffer with the default base
    /// alignment.
    pub fn new(capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(&ArenaConfig::new(capacity))
    }

    /// Allocate the buffer described by `config`.
    pub fn with_config(config: &ArenaConfig) -> Result<Self, ArenaError> {
        HeapBuffer::new(config).map(Self::from_backing)
    }
}

impl<'buf> LinearArena<BorrowedBuffer<'buf>> {
    /// Use `buf` as the arena's storage for `'buf`.
    pub fn from_slice(buf: &'buf mut [u8]) -> Self {
        Self::from_backing(BorrowedBuffer::new(buf))
    }
}

impl<const N: usize> LinearArena<InlineBuffer<N>> {
    /// Create an arena with a zeroed inline buffer of `N` bytes.
    pub const fn new() -> Self {
        Self {
            backing: InlineBuffer::new(),
            cursor: Cell::new(0),
        }
    }
}

impl<const N: usize> Default for LinearArena<InlineBuffer<N>> {
    fn default() -> Self {
        Self::new()
    }
}

/// A run of bytes carved out of a [`LinearArena`].
///
/// Borrows the arena, so it cannot outlive the next reset. Not `Clone`:
/// each placement is the only handle to its bytes.
#[derive(Debug)]
pub struct Placement<'a> {
    ptr: NonNull<u8>,
    offset: usize,
    len: usize,
    _arena: PhantomData<&'a [u8]>,
}

impl<'a> Placement<'a> {
    /// Offset of the first byte from the start of the arena buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes in the placement.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the placement is zero bytes long.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Address of the first byte.
    pub fn as_ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// The placement's bytes.
    ///
    /// Fresh placements read as zero, except in a borrowed arena that has
    /// not been reset yet, where they hold the caller's original contents.
    #[allow(unsafe_code)]
    pub fn into_slice(self) -> &'a mut [u8] {
        // SAFETY: the range is initialised, in bounds, and owned by this
        // placement alone until the arena is reset.
        unsafe { raw::bytes_mut(self.ptr, self.len) }
    }

    /// Move `value` into the placement.
    ///
    /// # Panics
    ///
    /// Panics if the placement is not exactly `size_of::<T>()` bytes or not
    /// aligned for `T`.
    #[allow(unsafe_code)]
    pub(crate) fn write<T>(self, value: T) -> &'a mut T {
        assert_eq!(self.len, mem::size_of::<T>());
        assert!(self.ptr.cast::<T>().is_aligned());
        // SAFETY: size and alignment checked above; exclusive as in into_slice.
        unsafe { raw::write_value(self.ptr, value) }
    }

    /// Fill the placement with `len` values of `T` produced by `fill`.
    ///
    /// # Panics
    ///
    /// Panics if the placement is not exactly `len` slots of `T` or not
    /// aligned for `T`.
    #[allow(unsafe_code)]
    pub(crate) fn write_slice<T, F>(self, len: usize, fill: F) -> &'a mut [T]
    where
        F: FnMut(usize) -> T,
    {
        assert_eq!(Some(self.len), len.checked_mul(mem::size_of::<T>()));
        assert!(self.ptr.cast::<T>().is_aligned());
        // SAFETY: size and alignment checked above; exclusive as in into_slice.
        unsafe { raw::write_slice(self.ptr, len, fill) }
    }
}
