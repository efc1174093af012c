//! Error types for the Vessel container library.
//!
//! Allocation exhaustion is not represented here: the allocator layer
//! treats it as fatal once the recovery hook gives up. What remains are
//! the size computations that can be rejected before any memory is
//! requested.

use std::error::Error;
use std::fmt;

/// Errors from sizing a storage request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// `count * elem_size` does not fit in `isize::MAX` bytes.
    CapacityOverflow {
        /// Number of elements requested.
        count: usize,
        /// Size of one element in bytes.
        elem_size: usize,
    },
    /// The size/alignment pair is not a valid memory layout.
    InvalidLayout {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { count, elem_size } => {
                write!(
                    f,
                    "capacity overflow: {count} elements of {elem_size} bytes"
                )
            }
            Self::InvalidLayout { size, align } => {
                write!(f, "invalid layout: size {size}, align {align}")
            }
        }
    }
}

impl Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_capacity_overflow() {
        let err = AllocError::CapacityOverflow {
            count: usize::MAX,
            elem_size: 8,
        };
        assert_eq!(
            err.to_string(),
            format!("capacity overflow: {} elements of 8 bytes", usize::MAX)
        );
    }

    #[test]
    fn display_invalid_layout() {
        let err = AllocError::InvalidLayout { size: 16, align: 3 };
        assert_eq!(err.to_string(), "invalid layout: size 16, align 3");
    }
}
