//! Error types shared by the containers.

use thiserror::Error;

/// The allocator could not satisfy a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("memory allocation failed")]
pub struct AllocError;

/// Errors reported by the checked container operations.
///
/// Most misuse of the containers is a contract violation and panics; these are the conditions
/// that callers can reasonably want to handle.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// The requested element count cannot be represented as a single block.
    #[error("capacity overflow: requested {requested} elements, max {max}")]
    CapacityOverflow {
        /// Number of elements requested.
        requested: usize,
        /// Largest element count the allocator supports.
        max: usize,
    },
    /// The allocator refused the block.
    #[error("allocation of {bytes} bytes failed")]
    AllocFailed {
        /// Size of the refused block in bytes.
        bytes: usize,
    },
    /// An index past the live elements.
    #[error("index {index} out of range for length {len}")]
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of live elements.
        len: usize,
    },
    /// A null key was used where a key has to be stored.
    #[error("null key cannot be stored in a dictionary")]
    NullKey,
}

/// Result type used throughout the crate.
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
