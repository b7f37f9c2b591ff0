//! The binding surface's global type table.
//!
//! [`ConversionTable`] owns exactly one [`ConversionRecord`] per registered
//! host type. Records are created during the registration phase at
//! binding-surface startup, may gain value conversions until first use, and
//! are destroyed individually with [`ConversionTable::destroy_record`] or
//! all at once on teardown.

use std::collections::HashMap;

use crate::chain::Conversion;
use crate::error::{ConvertError, Result};
use crate::host::HostTypeId;
use crate::record::{ConversionRecord, ToHost};

/// Owning map from host type to its conversion record.
#[derive(Debug, Default)]
pub struct ConversionTable {
    records: HashMap<HostTypeId, ConversionRecord>,
}

impl ConversionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a native type with reference semantics.
    ///
    /// `pointer_conversion` recovers the native pointer from a host wrapper;
    /// `None` means pointer-based construction is not supported.
    /// `copy_to_host` is set for value types that also have wrappers and is
    /// `None` for object types that are never copied.
    pub fn register_object_type(
        &mut self,
        ty: HostTypeId,
        pointer_to_host: ToHost,
        pointer_conversion: Option<Conversion>,
        copy_to_host: Option<ToHost>,
    ) -> Result<&mut ConversionRecord> {
        self.insert(ConversionRecord::object(
            ty,
            pointer_to_host,
            pointer_conversion,
            copy_to_host,
        ))
    }

    /// Register a native type that is only ever passed by value.
    pub fn register_value_type(
        &mut self,
        ty: HostTypeId,
        to_host: ToHost,
    ) -> Result<&mut ConversionRecord> {
        self.insert(ConversionRecord::value(ty, to_host))
    }

    /// Append a host → native value conversion to `ty`'s chain.
    pub fn add_value_conversion(&mut self, ty: HostTypeId, conversion: Conversion) -> Result<()> {
        self.record_mut(ty)?.add_value_conversion(conversion);
        Ok(())
    }

    /// The record for `ty`.
    pub fn record(&self, ty: HostTypeId) -> Result<&ConversionRecord> {
        self.records
            .get(&ty)
            .ok_or(ConvertError::UnregisteredType { ty })
    }

    /// Mutable access to the record for `ty` (registration phase only).
    pub fn record_mut(&mut self, ty: HostTypeId) -> Result<&mut ConversionRecord> {
        self.records
            .get_mut(&ty)
            .ok_or(ConvertError::UnregisteredType { ty })
    }

    pub fn get(&self, ty: HostTypeId) -> Option<&ConversionRecord> {
        self.records.get(&ty)
    }

    pub fn contains(&self, ty: HostTypeId) -> bool {
        self.records.contains_key(&ty)
    }

    /// Registered host types in ascending order.
    pub fn types(&self) -> Vec<HostTypeId> {
        let mut types: Vec<_> = self.records.keys().copied().collect();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Destroy the record for `ty`, releasing its conversion chain.
    ///
    /// A no-op for types without a record. Returns whether a record was destroyed.
    pub fn destroy_record(&mut self, ty: HostTypeId) -> bool {
        self.records.remove(&ty).is_some()
    }

    /// Destroy every record (binding-surface shutdown).
    pub fn teardown(&mut self) {
        self.records.clear();
    }

    fn insert(&mut self, record: ConversionRecord) -> Result<&mut ConversionRecord> {
        use std::collections::hash_map::Entry;

        let ty = record.host_type();
        match self.records.entry(ty) {
            Entry::Occupied(_) => Err(ConvertError::AlreadyRegistered { ty }),
            Entry::Vacant(slot) => Ok(slot.insert(record)),
        }
    }
}
