//! Test utilities for Bumpline development.
//!
//! Provides a [`PlacementLedger`] that checks every placement handed out by
//! an arena against the bounds, alignment and non-overlap guarantees, and
//! [`init_tracing`] for seeing the arena's log output in tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use bumpline_arena::{Backing, LinearArena, Placement};
use tracing_subscriber::EnvFilter;

pub mod fixtures;

/// Install a test-friendly `tracing` subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// One recorded placement, as byte offsets into the arena buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Whether two spans share at least one byte. Empty spans share none.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.len > 0 && other.len > 0 && self.offset < other.end() && other.offset < self.end()
    }
}

/// Records placements from one arena and panics on the first one that
/// breaks a layout guarantee.
///
/// Call [`clear`](PlacementLedger::clear) whenever the arena is reset.
#[derive(Debug)]
pub struct PlacementLedger {
    capacity: usize,
    spans: Vec<Span>,
}

impl PlacementLedger {
    pub fn for_arena<B: Backing>(arena: &LinearArena<B>) -> Self {
        Self {
            capacity: arena.capacity(),
            spans: Vec::new(),
        }
    }

    /// Check `placement` (requested at `align`) and remember it.
    ///
    /// # Panics
    ///
    /// Panics if the placement leaves the buffer, is misaligned, or
    /// overlaps a placement recorded since the last clear.
    pub fn record(&mut self, placement: &Placement<'_>, align: usize) -> Span {
        let span = Span {
            offset: placement.offset(),
            len: placement.len(),
        };
        assert!(
            span.end() <= self.capacity,
            "placement {span:?} runs past capacity {}",
            self.capacity
        );
        assert_eq!(
            placement.as_ptr().as_ptr().addr() % align,
            0,
            "placement {span:?} is not aligned to {align}"
        );
        if let Some(prev) = self.spans.iter().find(|prev| prev.overlaps(&span)) {
            panic!("placement {span:?} overlaps earlier placement {prev:?}");
        }
        if let Some(last) = self.spans.last() {
            assert!(
                span.offset >= last.end(),
                "placement {span:?} is not after {last:?}"
            );
        }
        self.spans.push(span);
        span
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Bytes covered by recorded placements, padding excluded.
    pub fn payload_bytes(&self) -> usize {
        self.spans.iter().map(|s| s.len).sum()
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }
}
