//! Per-type conversion records.
//!
//! One [`ConversionRecord`] exists for every native type registered with
//! the binding surface. It holds the functions that move values across the
//! boundary in each direction:
//!
//! | Direction | Field | Used by |
//! |---|---|---|
//! | native → host, aliasing | `pointer_to_host` | object and value types |
//! | native → host, copying | `copy_to_host` | value types only |
//! | host → native pointer | `pointer_conversion` | wrapped types |
//! | host → native copy | `value_conversions` | value types and implicit conversions |
//!
//! Records are created by [`ConversionTable`](crate::registry::ConversionTable)
//! and mutated only while the binding surface registers its types.

use std::fmt;
use std::rc::Rc;

use crate::chain::{Conversion, ConversionChain};
use crate::host::{HostTypeId, HostValue};
use crate::native::NativeAddress;

/// A native → host conversion function.
///
/// Each call must return a value carrying one unit of ownership for the caller.
#[derive(Clone)]
pub struct ToHost(Rc<dyn Fn(NativeAddress) -> HostValue>);

impl ToHost {
    pub fn new(f: impl Fn(NativeAddress) -> HostValue + 'static) -> Self {
        ToHost(Rc::new(f))
    }

    pub fn convert(&self, address: NativeAddress) -> HostValue {
        (self.0)(address)
    }
}

impl fmt::Debug for ToHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToHost({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// Conversion functions for one registered native type.
#[derive(Debug, Clone)]
pub struct ConversionRecord {
    host_type: HostTypeId,
    pointer_to_host: Option<ToHost>,
    copy_to_host: Option<ToHost>,
    pointer_conversion: Option<Conversion>,
    value_conversions: ConversionChain,
}

impl ConversionRecord {
    /// Record for a type with reference semantics (a wrapped native object).
    ///
    /// `copy_to_host` is `None` for object types that are never copied across
    /// the boundary, and set for value types that also have wrappers.
    pub(crate) fn object(
        host_type: HostTypeId,
        pointer_to_host: ToHost,
        pointer_conversion: Option<Conversion>,
        copy_to_host: Option<ToHost>,
    ) -> Self {
        ConversionRecord {
            host_type,
            pointer_to_host: Some(pointer_to_host),
            copy_to_host,
            pointer_conversion,
            value_conversions: ConversionChain::new(),
        }
    }

    /// Record for a type only ever passed by value (no pointer identity).
    pub(crate) fn value(host_type: HostTypeId, to_host: ToHost) -> Self {
        ConversionRecord {
            host_type,
            pointer_to_host: None,
            copy_to_host: Some(to_host),
            pointer_conversion: None,
            value_conversions: ConversionChain::new(),
        }
    }

    /// The host type this record is registered under (diagnostics only).
    pub fn host_type(&self) -> HostTypeId {
        self.host_type
    }

    pub fn pointer_to_host_fn(&self) -> Option<&ToHost> {
        self.pointer_to_host.as_ref()
    }

    pub fn copy_to_host_fn(&self) -> Option<&ToHost> {
        self.copy_to_host.as_ref()
    }

    pub fn pointer_conversion(&self) -> Option<&Conversion> {
        self.pointer_conversion.as_ref()
    }

    pub fn value_conversions(&self) -> &ConversionChain {
        &self.value_conversions
    }

    /// Whether native values of this type are copied into independent host wrappers.
    pub fn is_copyable(&self) -> bool {
        self.copy_to_host.is_some()
    }

    /// Append a host → native value conversion.
    ///
    /// The first conversion added is the type's self-conversion; any later
    /// one is an implicit conversion from another host type.
    pub fn add_value_conversion(&mut self, conversion: Conversion) {
        self.value_conversions.push(conversion);
    }
}
