//! Low-level primitives for arena memory operations.
//!
//! The arena's pointer work is funnelled through these functions, each with
//! a `// SAFETY:` comment. Callers in [`crate::linear`] and
//! [`crate::backing`] uphold the stated preconditions and mark their call
//! sites with `#[allow(unsafe_code)]`.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};

/// Obtain a zeroed block for `layout` from the global allocator.
///
/// Returns `None` if the allocator refuses. `layout.size()` must be non-zero.
pub(crate) fn alloc_zeroed(layout: Layout) -> Option<NonNull<u8>> {
    debug_assert!(layout.size() > 0);
    // SAFETY: layout has non-zero size (checked by ArenaConfig::validate).
    NonNull::new(unsafe { alloc::alloc_zeroed(layout) })
}

/// Return a block obtained from [`alloc_zeroed`] to the global allocator.
///
/// # Safety
///
/// `ptr` must come from `alloc_zeroed(layout)` with the same `layout` and
/// must not be used afterwards.
pub(crate) unsafe fn dealloc(ptr: NonNull<u8>, layout: Layout) {
    // SAFETY: forwarded from the caller.
    unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
}

/// Address `offset` bytes past `base`.
///
/// # Safety
///
/// `offset` must not exceed the size of the buffer starting at `base`.
pub(crate) unsafe fn offset_ptr(base: NonNull<u8>, offset: usize) -> NonNull<u8> {
    // SAFETY: in bounds or one past the end, per the caller.
    unsafe { base.add(offset) }
}

/// Overwrite `len` bytes starting at `base` with zero.
///
/// # Safety
///
/// `base..base + len` must be valid for writes and not borrowed.
pub(crate) unsafe fn zero(base: NonNull<u8>, len: usize) {
    // SAFETY: forwarded from the caller.
    unsafe { ptr::write_bytes(base.as_ptr(), 0, len) }
}

/// View `len` bytes at `ptr` as a mutable slice for `'a`.
///
/// # Safety
///
/// The range must be initialised, valid for `'a`, and not aliased by any
/// other live reference.
pub(crate) unsafe fn bytes_mut<'a>(ptr: NonNull<u8>, len: usize) -> &'a mut [u8] {
    // SAFETY: forwarded from the caller.
    unsafe { std::slice::from_raw_parts_mut(ptr.as_ptr(), len) }
}

/// Move `value` into the slot at `ptr` and hand back a reference to it.
///
/// # Safety
///
/// `ptr` must be aligned for `T`, valid for `size_of::<T>()` bytes of
/// writes for `'a`, and not aliased by any other live reference.
pub(crate) unsafe fn write_value<'a, T>(ptr: NonNull<u8>, value: T) -> &'a mut T {
    let slot = ptr.cast::<T>();
    // SAFETY: aligned, in bounds and exclusive per the caller.
    unsafe {
        slot.as_ptr().write(value);
        &mut *slot.as_ptr()
    }
}

/// Fill `len` slots of `T` at `ptr` from `fill` and return them as a slice.
///
/// # Safety
///
/// Same as [`write_value`], for `len * size_of::<T>()` bytes.
pub(crate) unsafe fn write_slice<'a, T, F>(ptr: NonNull<u8>, len: usize, mut fill: F) -> &'a mut [T]
where
    F: FnMut(usize) -> T,
{
    let base = ptr.cast::<T>().as_ptr();
    for i in 0..len {
        // SAFETY: i < len, so the slot is in bounds of the caller's range.
        unsafe { base.add(i).write(fill(i)) };
    }
    // SAFETY: all len slots were initialised above.
    unsafe { std::slice::from_raw_parts_mut(base, len) }
}
