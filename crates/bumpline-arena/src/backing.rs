//! Backing buffers: who provides the bytes and who gives them back.
//!
//! The arena core only needs a base pointer and a capacity. The three
//! [`Backing`] implementations differ in where those come from:
//!
//! - [`HeapBuffer`]: allocated from the global allocator, freed on drop.
//! - [`BorrowedBuffer`]: a caller's `&mut [u8]`, never freed by the arena.
//! - [`InlineBuffer`]: a fixed-size array stored inside the arena value.
//!
//! The trait is sealed; these are the only buffer kinds.

use std::alloc::Layout;
use std::cell::UnsafeCell;
use std::marker::PhantomData;
use std::ptr::NonNull;

use tracing::debug;

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::raw;

mod private {
    pub trait Sealed {}
}

/// A contiguous byte buffer that a [`LinearArena`](crate::LinearArena) can
/// carve placements out of.
///
/// Implementors guarantee that `base()..base() + capacity()` is
/// initialised, writable through the returned pointer, and stays valid for
/// as long as the implementor is neither moved nor dropped.
pub trait Backing: private::Sealed {
    /// Address of the first byte.
    fn base(&self) -> NonNull<u8>;

    /// Size of the buffer in bytes.
    fn capacity(&self) -> usize;
}

/// A buffer obtained from the global allocator and owned exclusively.
///
/// The block is zeroed on allocation and released exactly once, when the
/// buffer is dropped. Moving a `HeapBuffer` does not move the bytes.
#[derive(Debug)]
pub struct HeapBuffer {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl HeapBuffer {
    /// Allocate a zeroed buffer described by `config`.
    ///
    /// Fails with [`ArenaError::InvalidConfig`] if the config does not
    /// validate, or [`ArenaError::OutOfCapacity`] if the global allocator
    /// cannot satisfy the request.
    pub fn new(config: &ArenaConfig) -> Result<Self, ArenaError> {
        let layout = config.layout()?;
        let ptr = raw::alloc_zeroed(layout).ok_or(ArenaError::OutOfCapacity {
            requested: layout.size(),
            align: layout.align(),
            remaining: 0,
            capacity: layout.size(),
        })?;
        debug!(
            capacity = layout.size(),
            base_align = layout.align(),
            "allocated arena buffer"
        );
        Ok(Self { ptr, layout })
    }

    /// Alignment of the base address.
    pub fn base_align(&self) -> usize {
        self.layout.align()
    }
}

impl private::Sealed for HeapBuffer {}

impl Backing for HeapBuffer {
    fn base(&self) -> NonNull<u8> {
        self.ptr
    }

    fn capacity(&self) -> usize {
        self.layout.size()
    }
}

#[allow(unsafe_code)]
impl Drop for HeapBuffer {
    fn drop(&mut self) {
        debug!(capacity = self.layout.size(), "releasing arena buffer");
        // SAFETY: ptr came from alloc_zeroed(self.layout) and this is the
        // only place that frees it.
        unsafe { raw::dealloc(self.ptr, self.layout) }
    }
}

// SAFETY: HeapBuffer owns its block exclusively, like Box<[u8]>.
#[allow(unsafe_code)]
unsafe impl Send for HeapBuffer {}

/// A caller-supplied buffer, borrowed mutably for `'buf`.
///
/// The borrow guarantees the bytes outlive the arena. The arena never frees
/// them; the initial contents are whatever the caller left there until the
/// first reset zeroes them.
#[derive(Debug)]
pub struct BorrowedBuffer<'buf> {
    ptr: NonNull<u8>,
    len: usize,
    _buf: PhantomData<&'buf mut [u8]>,
}

impl<'buf> BorrowedBuffer<'buf> {
    /// Wrap `buf` for use as arena storage.
    pub fn new(buf: &'buf mut [u8]) -> Self {
        Self {
            len: buf.len(),
            ptr: NonNull::from(buf).cast::<u8>(),
            _buf: PhantomData,
        }
    }
}

impl private::Sealed for BorrowedBuffer<'_> {}

impl Backing for BorrowedBuffer<'_> {
    fn base(&self) -> NonNull<u8> {
        self.ptr
    }

    fn capacity(&self) -> usize {
        self.len
    }
}

// SAFETY: BorrowedBuffer is a reborrowed &mut [u8], which is Send.
#[allow(unsafe_code)]
unsafe impl Send for BorrowedBuffer<'_> {}

/// A zeroed `N`-byte buffer stored inline, 16-byte aligned.
///
/// There is no separate allocation: the bytes live and die with the value
/// that contains them.
#[derive(Debug)]
#[repr(C, align(16))]
pub struct InlineBuffer<const N: usize> {
    bytes: UnsafeCell<[u8; N]>,
}

impl<const N: usize> InlineBuffer<N> {
    /// Size of the buffer in bytes.
    pub const CAPACITY: usize = N;

    /// Create a zeroed buffer.
    pub const fn new() -> Self {
        Self {
            bytes: UnsafeCell::new([0; N]),
        }
    }
}

impl<const N: usize> Default for InlineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> private::Sealed for InlineBuffer<N> {}

impl<const N: usize> Backing for InlineBuffer<N> {
    fn base(&self) -> NonNull<u8> {
        NonNull::from(&self.bytes).cast::<u8>()
    }

    fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_buffer_honours_base_align() {
        let buf = HeapBuffer::new(&ArenaConfig::new(100).with_base_align(64)).unwrap();
        assert_eq!(buf.capacity(), 100);
        assert_eq!(buf.base_align(), 64);
        assert_eq!(buf.base().as_ptr() as usize % 64, 0);
    }

    #[test]
    fn heap_buffer_rejects_zero_capacity() {
        let err = HeapBuffer::new(&ArenaConfig::new(0)).unwrap_err();
        assert!(matches!(err, ArenaError::InvalidConfig { .. }));
    }

    #[test]
    fn heap_buffer_allocator_failure_is_out_of_capacity() {
        let size = isize::MAX as usize - 4096;
        let err = HeapBuffer::new(&ArenaConfig::new(size)).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfCapacity {
                requested: size,
                align: ArenaConfig::DEFAULT_BASE_ALIGN,
                remaining: 0,
                capacity: size,
            }
        );
    }

    #[test]
    fn borrowed_buffer_covers_the_slice() {
        let mut storage = [7u8; 24];
        let expected = storage.as_mut_ptr();
        let buf = BorrowedBuffer::new(&mut storage);
        assert_eq!(buf.base().as_ptr(), expected);
        assert_eq!(buf.capacity(), 24);
    }

    #[test]
    fn inline_buffer_is_16_byte_aligned() {
        let buf = InlineBuffer::<40>::new();
        assert_eq!(buf.base().as_ptr() as usize % 16, 0);
        assert_eq!(buf.capacity(), 40);
        assert_eq!(InlineBuffer::<40>::CAPACITY, 40);
    }
}
