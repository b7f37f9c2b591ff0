//! Host → native converters and the ordered implicit conversion chain.
//!
//! A [`ToNative`] writes a native value (or a native pointer) into a
//! caller-provided output slot. Slots are type-erased (`&mut dyn Any`) so
//! that records for unrelated native types share one dispatch surface; the
//! converter knows the concrete slot type it writes.
//!
//! A [`ConversionChain`] is the ordered list of (predicate, converter) pairs
//! tried when constructing a native value by copy. The first entry is the
//! type's own "unwrap my wrapper" conversion; later entries are implicit
//! conversions from other host types. Evaluation order is part of the
//! contract: the first accepting predicate wins.

use std::any::{type_name, Any};
use std::fmt;
use std::rc::Rc;

use crate::host::HostValue;
use crate::native::NativeAddress;

/// A converter from a host value into a native output slot.
///
/// Converters are compared by identity: two handles are equal when they
/// share the same underlying closure.
#[derive(Clone)]
pub struct ToNative(Rc<dyn Fn(&HostValue, &mut dyn Any)>);

impl ToNative {
    /// Wrap an untyped converter.
    pub fn new(f: impl Fn(&HostValue, &mut dyn Any) + 'static) -> Self {
        ToNative(Rc::new(f))
    }

    /// Wrap a converter that writes into a slot of type `T`.
    ///
    /// # Panics
    ///
    /// The returned converter panics if it is invoked with a slot that is not a `T`.
    pub fn into_slot<T: Any>(f: impl Fn(&HostValue, &mut T) + 'static) -> Self {
        Self::new(move |value, out| match out.downcast_mut::<T>() {
            Some(slot) => f(value, slot),
            None => panic!(
                "converter for {} invoked with an output slot of another type",
                type_name::<T>()
            ),
        })
    }

    /// A pointer converter that writes a null pointer, for the "no value" singleton.
    pub fn null_pointer() -> Self {
        Self::into_slot(|_, out: &mut Option<NativeAddress>| *out = None)
    }

    /// Run the conversion, writing into `out`.
    pub fn convert(&self, value: &HostValue, out: &mut dyn Any) {
        (self.0)(value, out)
    }

    pub fn ptr_eq(&self, other: &ToNative) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ToNative {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ToNative {}

impl fmt::Debug for ToNative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToNative({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// A convertibility predicate paired with the converter it guards.
#[derive(Clone)]
pub struct Conversion {
    check: Rc<dyn Fn(&HostValue) -> bool>,
    convert: ToNative,
}

impl Conversion {
    pub fn new(check: impl Fn(&HostValue) -> bool + 'static, convert: ToNative) -> Self {
        Conversion {
            check: Rc::new(check),
            convert,
        }
    }

    /// Whether the predicate accepts `value`.
    pub fn accepts(&self, value: &HostValue) -> bool {
        (self.check)(value)
    }

    pub fn converter(&self) -> &ToNative {
        &self.convert
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("convert", &self.convert)
            .finish_non_exhaustive()
    }
}

/// Ordered host → native value conversions for one native type.
#[derive(Debug, Clone, Default)]
pub struct ConversionChain {
    entries: Vec<Conversion>,
}

impl ConversionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a conversion. The first one pushed is the self-conversion.
    pub fn push(&mut self, conversion: Conversion) {
        self.entries.push(conversion);
    }

    /// The canonical self-conversion, if any conversion is registered.
    pub fn self_conversion(&self) -> Option<&Conversion> {
        self.entries.first()
    }

    /// Conversions registered after the self-conversion.
    pub fn implicit_conversions(&self) -> &[Conversion] {
        self.entries.get(1..).unwrap_or(&[])
    }

    /// The converter of the first entry whose predicate accepts `value`.
    pub fn find(&self, value: &HostValue) -> Option<&ToNative> {
        self.entries
            .iter()
            .find(|conversion| conversion.accepts(value))
            .map(Conversion::converter)
    }

    /// Whether `converter` is something other than the self-conversion.
    ///
    /// An empty chain has no implicit conversions. Membership of
    /// `converter` in the chain is not checked.
    pub fn is_implicit(&self, converter: &ToNative) -> bool {
        match self.self_conversion() {
            Some(first) => !first.converter().ptr_eq(converter),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conversion> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
