//! Arena-specific error types.

use thiserror::Error;

/// Errors that can occur during arena construction and allocation.
///
/// A failed allocation never changes the arena: the cursor and the
/// remaining capacity are exactly what they were before the call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// The request (including alignment padding) does not fit in the
    /// remaining space, or the global allocator could not provide the
    /// backing buffer of an owning arena.
    #[error(
        "arena out of capacity: requested {requested} bytes at alignment {align}, \
         {remaining} of {capacity} bytes remaining"
    )]
    OutOfCapacity {
        /// Number of bytes requested, excluding padding.
        requested: usize,
        /// Alignment of the request (1 for tight allocations).
        align: usize,
        /// Bytes remaining in the arena at the time of the request. Zero when
        /// the backing buffer itself could not be allocated.
        remaining: usize,
        /// Total capacity of the arena.
        capacity: usize,
    },
    /// A typed tight placement was requested at a cursor that is not
    /// aligned for the type.
    #[error("cursor offset {offset} is not aligned to {align} bytes for a tight placement")]
    Misaligned {
        /// Cursor offset at the time of the request.
        offset: usize,
        /// Alignment the type requires.
        align: usize,
    },
    /// An [`ArenaConfig`](crate::ArenaConfig) failed validation.
    #[error("invalid arena config: {reason}")]
    InvalidConfig {
        /// What was wrong with the config.
        reason: &'static str,
    },
}

impl ArenaError {
    /// Returns `true` for [`ArenaError::OutOfCapacity`].
    pub fn is_out_of_capacity(&self) -> bool {
        matches!(self, Self::OutOfCapacity { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_capacity_display_names_the_numbers() {
        let err = ArenaError::OutOfCapacity {
            requested: 8,
            align: 4,
            remaining: 3,
            capacity: 16,
        };
        assert_eq!(
            err.to_string(),
            "arena out of capacity: requested 8 bytes at alignment 4, 3 of 16 bytes remaining"
        );
        assert!(err.is_out_of_capacity());
    }

    #[test]
    fn misaligned_is_not_out_of_capacity() {
        let err = ArenaError::Misaligned {
            offset: 1,
            align: 8,
        };
        assert!(!err.is_out_of_capacity());
        assert!(err.to_string().contains("offset 1"));
    }
}
