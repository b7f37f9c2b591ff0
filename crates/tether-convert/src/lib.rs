//! Runtime conversion layer for tether bindings.
//!
//! Moves values between a dynamic host language's object model and native
//! memory: pointer handoff, value copies and implicit construction from
//! compatible host values, with identity-preserving re-wrapping of value
//! types.
//!
//! ## Modules
//!
//! - [`host`] — Reference-counted host values, wrappers and type handles
//! - [`native`] — Native addresses and the [`NativeHeap`] arena
//! - [`chain`] — Host → native converters and the ordered implicit conversion chain
//! - [`record`] — Per-type [`ConversionRecord`]s
//! - [`registry`] — The [`ConversionTable`] owning one record per type
//! - [`dispatch`] — Pointer/value dispatch on records and through a [`Dispatcher`]
//! - [`identity`] — The identity table collaborator and [`WrapperMap`]
//! - [`upcast`] — The upcast collaborator and [`CastTable`]

pub mod chain;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod identity;
pub mod native;
pub mod record;
pub mod registry;
pub mod upcast;

// Re-export key types for convenience
pub use chain::{Conversion, ConversionChain, ToNative};
pub use dispatch::{native_pointer, Dispatcher};
pub use error::ConvertError;
pub use host::{HostObject, HostTypeId, HostValue, Ownership, Wrapper};
pub use identity::{IdentityTable, WrapperMap};
pub use native::{NativeAddress, NativeHeap};
pub use record::{ConversionRecord, ToHost};
pub use registry::ConversionTable;
pub use upcast::{CastTable, NoCasts, Upcaster};
