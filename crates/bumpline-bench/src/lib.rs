//! Benchmark profiles for the Bumpline arenas.
//!
//! - [`frame_config`]: a 1 MiB per-frame scratch arena.
//! - [`fill_frame`]: the reference per-frame workload, a mix of typed values
//!   and slices placed until the frame budget is spent.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use bumpline_arena::{ArenaConfig, Backing, LinearArena};

/// Bytes in the reference frame arena.
pub const FRAME_BYTES: usize = 1 << 20;

/// A small record typical of per-frame scratch data.
#[derive(Clone, Copy, Debug, Default)]
pub struct Contact {
    pub a: u32,
    pub b: u32,
    pub normal: [f32; 3],
    pub depth: f32,
}

/// Config for the reference frame arena.
pub fn frame_config() -> ArenaConfig {
    ArenaConfig::new(FRAME_BYTES).with_base_align(64)
}

/// Place `contacts` contacts, each followed by an 8-element index slice.
///
/// Stops early when the arena runs out; returns how many contacts fit.
pub fn fill_frame<B: Backing>(arena: &LinearArena<B>, contacts: u32) -> u32 {
    for i in 0..contacts {
        let placed = arena
            .alloc(Contact {
                a: i,
                b: i.wrapping_add(1),
                depth: 0.25,
                ..Contact::default()
            })
            .and_then(|_| arena.alloc_slice_fill(8, i as u16));
        if placed.is_err() {
            return i;
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpline_arena::HeapArena;

    #[test]
    fn frame_workload_fits_reference_arena() {
        let arena = HeapArena::with_config(&frame_config()).unwrap();
        assert_eq!(fill_frame(&arena, 10_000), 10_000);
        assert!(arena.used() < FRAME_BYTES);
    }

    #[test]
    fn frame_workload_stops_when_full() {
        let arena = HeapArena::new(256).unwrap();
        let fitted = fill_frame(&arena, 1_000);
        assert!(fitted < 1_000);
        assert!(arena.remaining() < 64);
    }
}
