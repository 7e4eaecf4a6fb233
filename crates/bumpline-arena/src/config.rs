//! Arena configuration parameters.

use std::alloc::Layout;

use crate::error::ArenaError;

/// Configuration for a heap-backed arena.
///
/// Controls the size of the backing buffer and the alignment of its first
/// byte. Validated at construction; the arena never grows or shrinks
/// afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the backing buffer in bytes.
    ///
    /// Default: 1024. Must be non-zero.
    pub capacity: usize,

    /// Alignment of the buffer's base address in bytes.
    ///
    /// Default: 16, enough for every primitive type on mainstream targets.
    /// Must be a power of two. Requests with a larger alignment still work,
    /// they just pay for more padding.
    pub base_align: usize,
}

impl ArenaConfig {
    /// Default buffer size in bytes.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Default base alignment in bytes.
    pub const DEFAULT_BASE_ALIGN: usize = 16;

    /// Create a config for a buffer of `capacity` bytes.
    ///
    /// Uses the default base alignment.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            base_align: Self::DEFAULT_BASE_ALIGN,
        }
    }

    /// Replace the base alignment.
    #[must_use]
    pub fn with_base_align(mut self, base_align: usize) -> Self {
        self.base_align = base_align;
        self
    }

    /// Check the config without allocating anything.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.capacity == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "capacity must be non-zero",
            });
        }
        if !self.base_align.is_power_of_two() {
            return Err(ArenaError::InvalidConfig {
                reason: "base_align must be a power of two",
            });
        }
        Ok(())
    }

    /// Layout of the backing buffer described by this config.
    pub fn layout(&self) -> Result<Layout, ArenaError> {
        self.validate()?;
        Layout::from_size_align(self.capacity, self.base_align).map_err(|_| {
            ArenaError::InvalidConfig {
                reason: "capacity rounded up to base_align overflows isize",
            }
        })
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_kilobyte() {
        let config = ArenaConfig::default();
        assert_eq!(config.capacity, 1024);
        assert_eq!(config.base_align, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = ArenaConfig::new(0).validate().unwrap_err();
        assert!(matches!(err, ArenaError::InvalidConfig { .. }));
    }

    #[test]
    fn non_power_of_two_base_align_rejected() {
        let err = ArenaConfig::new(64).with_base_align(12).layout().unwrap_err();
        assert!(matches!(err, ArenaError::InvalidConfig { .. }));
    }

    #[test]
    fn layout_matches_fields() {
        let layout = ArenaConfig::new(100).with_base_align(64).layout().unwrap();
        assert_eq!(layout.size(), 100);
        assert_eq!(layout.align(), 64);
    }

    #[test]
    fn oversized_layout_rejected() {
        let err = ArenaConfig::new(usize::MAX).layout().unwrap_err();
        assert!(matches!(err, ArenaError::InvalidConfig { .. }));
    }
}
