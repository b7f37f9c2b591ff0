//! Pointer/value dispatch across the host/native boundary.
//!
//! Every operation exists in two forms:
//!
//! - on a [`ConversionRecord`], for glue code that already holds the record;
//! - on a [`Dispatcher`], which resolves the record from a [`HostTypeId`]
//!   and fails with [`ConvertError::UnregisteredType`] if there is none.
//!
//! Pointer handoff and value copy are separate operations chosen by the
//! call site; no call mixes the two.
//!
//! "Not convertible" is reported as `None`, never as an error: callers
//! decide whether a miss is a host-visible type error or a legitimate
//! no-op (see [`ConversionRecord::to_native_copy`]).

use std::any::Any;

use crate::chain::ToNative;
use crate::error::{ConvertError, Result};
use crate::host::{HostTypeId, HostValue};
use crate::identity::IdentityTable;
use crate::native::NativeAddress;
use crate::record::ConversionRecord;
use crate::registry::ConversionTable;
use crate::upcast::Upcaster;

impl ConversionRecord {
    /// Wrap native memory without copying; a null address becomes the "no value" singleton.
    ///
    /// # Panics
    ///
    /// Panics if the record was registered without a pointer → host function
    /// (value-only types have no pointer identity).
    pub fn pointer_to_host(&self, address: Option<NativeAddress>) -> HostValue {
        let Some(address) = address else {
            return HostValue::none();
        };
        match self.pointer_to_host_fn() {
            Some(to_host) => to_host.convert(address),
            None => panic!(
                "{} is a value-only type and cannot be wrapped by pointer",
                self.host_type()
            ),
        }
    }

    /// Convert a native reference to a host value.
    ///
    /// Object types are wrapped by pointer. For copyable types an existing
    /// wrapper for `address` is returned (one more reference to it), so the
    /// same native value keeps the same host identity; otherwise a fresh
    /// independent copy is made.
    pub fn reference_to_host(
        &self,
        address: NativeAddress,
        identity: &dyn IdentityTable,
    ) -> HostValue {
        if !self.is_copyable() {
            return self.pointer_to_host(Some(address));
        }
        match identity.retrieve_wrapper(address) {
            Some(existing) => existing,
            None => self.copy_to_host(address),
        }
    }

    /// Copy the native value at `address` into a new host value.
    ///
    /// # Panics
    ///
    /// Panics if the record has no copy function (object types are never copied).
    pub fn copy_to_host(&self, address: NativeAddress) -> HostValue {
        match self.copy_to_host_fn() {
            Some(to_host) => to_host.convert(address),
            None => panic!("{} is an object type and cannot be copied", self.host_type()),
        }
    }

    /// The pointer converter, if `value` passes the pointer check.
    pub fn is_pointer_convertible(&self, value: &HostValue) -> Option<&ToNative> {
        self.pointer_conversion()
            .filter(|conversion| conversion.accepts(value))
            .map(|conversion| conversion.converter())
    }

    /// The first value converter whose predicate accepts `value`.
    pub fn is_value_convertible(&self, value: &HostValue) -> Option<&ToNative> {
        self.value_conversions().find(value)
    }

    /// Accept either an existing wrapped object or a value constructible in place.
    ///
    /// The pointer path is skipped for the "no value" singleton.
    pub fn is_reference_convertible(&self, value: &HostValue) -> Option<&ToNative> {
        if !value.is_none() {
            if let Some(converter) = self.is_pointer_convertible(value) {
                return Some(converter);
            }
        }
        self.is_value_convertible(value)
    }

    /// Construct a native value by copy into `out`.
    ///
    /// If no conversion accepts `value`, `out` is left untouched: callers may
    /// pass pre-initialized optional output slots.
    pub fn to_native_copy(&self, value: &HostValue, out: &mut dyn Any) {
        if let Some(converter) = self.is_value_convertible(value) {
            converter.convert(value, out);
        }
    }

    /// Whether `converter` is an implicit conversion from another host type.
    ///
    /// Pointer retrieval and the type's own self-conversion are not implicit.
    pub fn is_implicit_conversion(&self, converter: &ToNative) -> bool {
        if self
            .pointer_conversion()
            .is_some_and(|conversion| conversion.converter().ptr_eq(converter))
        {
            return false;
        }
        self.value_conversions().is_implicit(converter)
    }
}

/// Resolve the native pointer a host value stands for, as seen from `expected`.
///
/// The "no value" singleton resolves to a null pointer. A wrapper whose
/// runtime type has a declared cast path is adjusted by `upcaster`;
/// otherwise the wrapper's own address is used.
pub fn native_pointer(
    expected: HostTypeId,
    value: &HostValue,
    upcaster: &dyn Upcaster,
) -> Result<Option<NativeAddress>> {
    if value.is_none() {
        return Ok(None);
    }
    let wrapper = value
        .as_wrapper()
        .ok_or_else(|| ConvertError::NotAWrapper {
            expected,
            found: value.object().kind_name(),
        })?;
    let runtime = wrapper.host_type();
    if upcaster.has_cast_path(runtime) {
        return upcaster
            .cast(runtime, value, expected)
            .map(Some)
            .ok_or(ConvertError::CastFailed {
                from: runtime,
                to: expected,
            });
    }
    Ok(Some(wrapper.address()))
}

/// Type-directed dispatch over a [`ConversionTable`] and its collaborators.
#[derive(Clone, Copy)]
pub struct Dispatcher<'a> {
    table: &'a ConversionTable,
    identity: &'a dyn IdentityTable,
    upcaster: &'a dyn Upcaster,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        table: &'a ConversionTable,
        identity: &'a dyn IdentityTable,
        upcaster: &'a dyn Upcaster,
    ) -> Self {
        Dispatcher {
            table,
            identity,
            upcaster,
        }
    }

    pub fn table(&self) -> &'a ConversionTable {
        self.table
    }

    /// See [`ConversionRecord::pointer_to_host`].
    pub fn pointer_to_host(
        &self,
        ty: HostTypeId,
        address: Option<NativeAddress>,
    ) -> Result<HostValue> {
        Ok(self.table.record(ty)?.pointer_to_host(address))
    }

    /// See [`ConversionRecord::reference_to_host`].
    pub fn reference_to_host(&self, ty: HostTypeId, address: NativeAddress) -> Result<HostValue> {
        Ok(self
            .table
            .record(ty)?
            .reference_to_host(address, self.identity))
    }

    /// See [`ConversionRecord::copy_to_host`].
    pub fn copy_to_host(&self, ty: HostTypeId, address: NativeAddress) -> Result<HostValue> {
        Ok(self.table.record(ty)?.copy_to_host(address))
    }

    pub fn is_pointer_convertible(
        &self,
        ty: HostTypeId,
        value: &HostValue,
    ) -> Result<Option<&'a ToNative>> {
        Ok(self.table.record(ty)?.is_pointer_convertible(value))
    }

    pub fn is_value_convertible(
        &self,
        ty: HostTypeId,
        value: &HostValue,
    ) -> Result<Option<&'a ToNative>> {
        Ok(self.table.record(ty)?.is_value_convertible(value))
    }

    pub fn is_reference_convertible(
        &self,
        ty: HostTypeId,
        value: &HostValue,
    ) -> Result<Option<&'a ToNative>> {
        Ok(self.table.record(ty)?.is_reference_convertible(value))
    }

    /// Write the native pointer `value` stands for into `out` (null for "no value").
    pub fn to_native_pointer(
        &self,
        ty: HostTypeId,
        value: &HostValue,
        out: &mut Option<NativeAddress>,
    ) -> Result<()> {
        self.table.record(ty)?;
        *out = native_pointer(ty, value, self.upcaster)?;
        Ok(())
    }

    /// See [`ConversionRecord::to_native_copy`]; a miss leaves `out` untouched.
    pub fn to_native_copy(&self, ty: HostTypeId, value: &HostValue, out: &mut dyn Any) -> Result<()> {
        self.table.record(ty)?.to_native_copy(value, out);
        Ok(())
    }

    pub fn is_implicit_conversion(&self, ty: HostTypeId, converter: &ToNative) -> Result<bool> {
        Ok(self.table.record(ty)?.is_implicit_conversion(converter))
    }
}
