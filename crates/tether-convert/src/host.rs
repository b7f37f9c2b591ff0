//! Host-language value model.
//!
//! A [`HostValue`] is a reference-counted boxed value of the dynamic
//! language the bindings are exposed to. The layer never inspects host
//! values beyond what conversion needs: whether a value is the "no value"
//! singleton, its primitive payload, or the native memory a wrapper refers
//! to. Reference counts are `Rc` strong counts, so returning an existing
//! wrapper to a caller is a `clone()` and is observable through
//! [`HostValue::ref_count`].
//!
//! Host values are single-threaded (`!Send`), matching an interpreter that
//! serializes every entry into the binding surface.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::native::NativeAddress;

/// Handle to a host-language type object that a conversion record is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostTypeId(u32);

impl HostTypeId {
    /// Create a type handle from its raw index in the binding surface.
    pub const fn new(raw: u32) -> Self {
        HostTypeId(raw)
    }

    /// The raw index of this handle.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for HostTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host type #{}", self.0)
    }
}

/// Which side of the boundary owns the native memory behind a wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The wrapper aliases native memory owned by whoever created it.
    Native,
    /// The wrapper owns an independent copy of the native value.
    Host,
}

/// A host object that refers to native memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper {
    ty: HostTypeId,
    address: NativeAddress,
    ownership: Ownership,
}

impl Wrapper {
    /// Runtime host type of the wrapper (may be a subtype of the type a call site expects).
    pub fn host_type(&self) -> HostTypeId {
        self.ty
    }

    /// Native address the wrapper refers to, as seen from its runtime type.
    pub fn address(&self) -> NativeAddress {
        self.address
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }
}

/// Payload of a host value.
#[derive(Debug)]
pub enum HostObject {
    /// The host language's "no value" singleton.
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Wrapper(Wrapper),
}

impl HostObject {
    /// Short name of the payload kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            HostObject::None => "none",
            HostObject::Bool(_) => "bool",
            HostObject::Int(_) => "int",
            HostObject::Float(_) => "float",
            HostObject::Str(_) => "str",
            HostObject::Wrapper(_) => "wrapper",
        }
    }
}

thread_local! {
    static NONE: HostValue = HostValue(Rc::new(HostObject::None));
}

/// A reference-counted host value.
#[derive(Clone)]
pub struct HostValue(Rc<HostObject>);

impl HostValue {
    /// The "no value" singleton. Every call returns the same object.
    pub fn none() -> Self {
        NONE.with(HostValue::clone)
    }

    /// Box a payload. `HostObject::None` is folded into the singleton.
    pub fn new(object: HostObject) -> Self {
        match object {
            HostObject::None => Self::none(),
            other => HostValue(Rc::new(other)),
        }
    }

    pub fn bool(value: bool) -> Self {
        Self::new(HostObject::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        Self::new(HostObject::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::new(HostObject::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(HostObject::Str(value.into()))
    }

    /// Create a wrapper of runtime type `ty` referring to `address`.
    pub fn wrap(ty: HostTypeId, address: NativeAddress, ownership: Ownership) -> Self {
        Self::new(HostObject::Wrapper(Wrapper {
            ty,
            address,
            ownership,
        }))
    }

    pub fn object(&self) -> &HostObject {
        &self.0
    }

    pub fn is_none(&self) -> bool {
        matches!(*self.0, HostObject::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self.0 {
            HostObject::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self.0 {
            HostObject::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match *self.0 {
            HostObject::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &*self.0 {
            HostObject::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_wrapper(&self) -> Option<&Wrapper> {
        match &*self.0 {
            HostObject::Wrapper(w) => Some(w),
            _ => None,
        }
    }

    /// Whether this is a wrapper whose runtime type is exactly `ty`.
    pub fn is_wrapper_of(&self, ty: HostTypeId) -> bool {
        self.as_wrapper().is_some_and(|w| w.host_type() == ty)
    }

    /// Identity comparison: both handles refer to the same host object.
    pub fn ptr_eq(&self, other: &HostValue) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live strong references to the underlying host object.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// A non-owning reference to this value.
    pub fn downgrade(&self) -> WeakHostValue {
        WeakHostValue(Rc::downgrade(&self.0))
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A non-owning reference to a host value, used by identity tables.
#[derive(Debug, Clone)]
pub struct WeakHostValue(Weak<HostObject>);

impl WeakHostValue {
    /// Recover an owning handle if the host object is still alive.
    pub fn upgrade(&self) -> Option<HostValue> {
        self.0.upgrade().map(HostValue)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
