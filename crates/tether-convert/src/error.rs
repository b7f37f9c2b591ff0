//! Conversion error types.

use crate::host::HostTypeId;

/// Errors that can occur while registering or dispatching conversions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// A conversion was requested for a host type with no record.
    #[error("no conversion record registered for {ty}")]
    UnregisteredType { ty: HostTypeId },

    /// A second record was registered for the same host type.
    #[error("a conversion record for {ty} is already registered")]
    AlreadyRegistered { ty: HostTypeId },

    /// A native pointer was requested from a host value that does not wrap native memory.
    #[error("expected a wrapper for {expected}, got a host {found} value")]
    NotAWrapper {
        expected: HostTypeId,
        found: &'static str,
    },

    /// The upcast collaborator declared a cast path but could not resolve it.
    #[error("no cast path from {from} to {to}")]
    CastFailed { from: HostTypeId, to: HostTypeId },
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
