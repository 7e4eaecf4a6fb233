//! Typed construction on top of the byte-level arena.
//!
//! These helpers pick the size and alignment from the type, reserve the
//! space, then move the value in. They hand back plain `&mut` references
//! tied to the arena borrow; the arena never runs the values' destructors.

use std::alloc::Layout;
use std::mem;

use crate::backing::Backing;
use crate::error::ArenaError;
use crate::linear::{LinearArena, Placement};

impl<B: Backing> LinearArena<B> {
    /// Place `value` at the next address aligned for `T`.
    pub fn alloc<T>(&self, value: T) -> Result<&mut T, ArenaError> {
        self.alloc_with(|| value)
    }

    /// Reserve an aligned slot for `T`, then fill it with `make()`.
    ///
    /// `make` only runs once the space is secured, so a failed call never
    /// constructs a value.
    pub fn alloc_with<T, F>(&self, make: F) -> Result<&mut T, ArenaError>
    where
        F: FnOnce() -> T,
    {
        let placement = self.alloc_aligned(mem::align_of::<T>(), mem::size_of::<T>())?;
        Ok(placement.write(make()))
    }

    /// Place `value` exactly at the cursor, without padding.
    ///
    /// Fails with [`ArenaError::Misaligned`] if the cursor is not aligned
    /// for `T`; the arena is unchanged in that case.
    pub fn alloc_tight_value<T>(&self, value: T) -> Result<&mut T, ArenaError> {
        self.alloc_tight_with(|| value)
    }

    /// Tight variant of [`alloc_with`](Self::alloc_with).
    pub fn alloc_tight_with<T, F>(&self, make: F) -> Result<&mut T, ArenaError>
    where
        F: FnOnce() -> T,
    {
        let size = mem::size_of::<T>();
        let align = mem::align_of::<T>();
        if size > self.remaining() {
            return Err(self.out_of_capacity(size, 1));
        }
        if self.padding_for(align) != 0 {
            return Err(ArenaError::Misaligned {
                offset: self.used(),
                align,
            });
        }
        let placement = self.alloc_tight(size)?;
        Ok(placement.write(make()))
    }

    /// Copy `src` into a fresh aligned slice.
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> Result<&mut [T], ArenaError> {
        let placement = self.alloc_array::<T>(src.len())?;
        Ok(placement.write_slice(src.len(), |i| src[i]))
    }

    /// Allocate `len` copies of `value` as an aligned slice.
    pub fn alloc_slice_fill<T: Copy>(&self, len: usize, value: T) -> Result<&mut [T], ArenaError> {
        let placement = self.alloc_array::<T>(len)?;
        Ok(placement.write_slice(len, |_| value))
    }

    fn alloc_array<T>(&self, len: usize) -> Result<Placement<'_>, ArenaError> {
        let layout = Layout::array::<T>(len)
            .map_err(|_| {
            self.out_of_capacity(len.saturating_mul(mem::size_of::<T>()), mem::align_of::<T>())
        })?;
        self.alloc_aligned(layout.align(), layout.size())
    }
}

#[cfg(test)]
mod tests {
    use crate::linear::{HeapArena, InlineArena};
    use crate::ArenaConfig;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Particle {
        pos: [f32; 3],
        ttl: u16,
    }

    #[test]
    fn alloc_places_aligned_value() {
        let arena = HeapArena::new(64).unwrap();
        arena.alloc_tight(1).unwrap();
        let value = arena.alloc(0xDEAD_BEEF_u64).unwrap();
        assert_eq!(*value, 0xDEAD_BEEF);
        let offset = arena.offset_of(&*value).unwrap();
        assert_eq!(offset, 8);
        assert_eq!(arena.used(), 16);
    }

    #[test]
    fn alloc_with_runs_constructor_in_place() {
        let arena = InlineArena::<64>::new();
        let p = arena
            .alloc_with(|| Particle {
                pos: [1.0, 2.0, 3.0],
                ttl: 30,
            })
            .unwrap();
        p.ttl -= 1;
        assert_eq!(p.ttl, 29);
        assert_eq!(p.pos[2], 3.0);
        assert!(arena.has(&*p));
        assert_eq!(arena.used(), mem::size_of::<Particle>());
    }

    #[test]
    fn failed_alloc_with_never_constructs() {
        let arena = InlineArena::<4>::new();
        let mut built = false;
        let err = arena
            .alloc_with(|| {
                built = true;
                0u64
            })
            .unwrap_err();
        assert!(err.is_out_of_capacity());
        assert!(!built);
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn many_values_live_at_once() {
        let arena = HeapArena::new(256).unwrap();
        let a = arena.alloc(1u32).unwrap();
        let b = arena.alloc(String::from("scratch")).unwrap();
        let c = arena.alloc(3u8).unwrap();
        *a += 1;
        b.push('!');
        assert_eq!((*a, b.as_str(), *c), (2, "scratch!", 3));
        // Not dropped by the arena; tear down explicitly.
        drop(std::mem::take(b));
    }

    #[test]
    fn tight_value_at_aligned_cursor() {
        let arena = HeapArena::with_config(&ArenaConfig::new(16).with_base_align(8)).unwrap();
        let a = arena.alloc_tight_value(7u32).unwrap();
        let b = arena.alloc_tight_value(9u32).unwrap();
        assert_eq!(arena.offset_of(&*b), Some(4));
        assert_eq!((*a, *b), (7, 9));
    }

    #[test]
    fn tight_value_at_misaligned_cursor_fails_cleanly() {
        let arena = HeapArena::new(16).unwrap();
        arena.alloc_tight(1).unwrap();
        let err = arena.alloc_tight_value(5u32).unwrap_err();
        assert_eq!(err, ArenaError::Misaligned { offset: 1, align: 4 });
        assert_eq!(arena.used(), 1);
        // A byte-aligned type still fits tightly.
        assert!(arena.alloc_tight_value(5u8).is_ok());
    }

    #[test]
    fn tight_value_capacity_check_ignores_alignment() {
        let arena = HeapArena::new(16).unwrap();
        arena.alloc_tight(13).unwrap();
        let err = arena.alloc_tight_value(0u32).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfCapacity {
                requested: 4,
                align: 1,
                remaining: 3,
                capacity: 16,
            }
        );
    }

    #[test]
    fn zero_sized_values_consume_nothing() {
        let arena = InlineArena::<8>::new();
        arena.alloc(()).unwrap();
        arena.alloc_tight_value(()).unwrap();
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn slice_copy_round_trips() {
        let arena = HeapArena::new(128).unwrap();
        arena.alloc_tight(3).unwrap();
        let src = [1.5f64, -2.0, 4.25];
        let copy = arena.alloc_slice_copy(&src).unwrap();
        assert_eq!(copy, &src);
        assert_eq!(arena.offset_of(copy.as_ptr()), Some(8));
    }

    #[test]
    fn slice_fill_and_empty_slices() {
        let arena = HeapArena::new(32).unwrap();
        let filled = arena.alloc_slice_fill(4, 0xAAu16).unwrap();
        assert_eq!(filled, &[0xAA; 4]);
        let empty: &mut [u64] = arena.alloc_slice_fill(0, 1).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn slice_layout_overflow_is_out_of_capacity() {
        let arena = HeapArena::new(32).unwrap();
        let err = arena.alloc_slice_fill(usize::MAX / 4, 0u64).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfCapacity {
                requested: usize::MAX,
                align: 8,
                remaining: 32,
                capacity: 32,
            }
        );
        let err = arena.alloc_slice_fill(usize::MAX / 8, 0u64).unwrap_err();
        assert!(matches!(
            err,
            ArenaError::OutOfCapacity { requested, .. } if requested == (usize::MAX / 8) * 8
        ));
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn values_are_gone_after_reset() {
        let mut arena = InlineArena::<16>::new();
        *arena.alloc(0xFFFF_FFFF_u32).unwrap() -= 1;
        arena.reset();
        let again = arena.alloc(1u8).unwrap();
        assert_eq!(arena.offset_of(&*again), Some(0));
        let rest = arena.alloc_tight(15).unwrap().into_slice();
        assert!(rest.iter().all(|&b| b == 0));
    }
}
