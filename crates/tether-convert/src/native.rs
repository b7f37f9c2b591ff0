//! Native-side memory model.
//!
//! [`NativeAddress`] is a non-null address of a native object. Optional
//! addresses (pointer parameters that may be null) are
//! `Option<NativeAddress>`, so a reference or copy conversion can never be
//! handed a null address.
//!
//! [`NativeHeap`] is a typed arena that hands out stable addresses for boxed
//! native values. Registered conversion functions use it to read and write
//! native data by address without raw pointer casts.

use std::any::{Any, TypeId};
use std::fmt;
use std::num::NonZeroUsize;

/// Address of a native object. Never null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeAddress(NonZeroUsize);

impl NativeAddress {
    /// Wrap a raw address; `None` for null.
    pub fn new(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(NativeAddress)
    }

    pub fn raw(self) -> usize {
        self.0.get()
    }

    /// Adjust the address by `delta` bytes (sub-object access for upcasts).
    ///
    /// Returns `None` if the result would be null or overflow.
    pub fn offset(self, delta: isize) -> Option<Self> {
        self.raw().checked_add_signed(delta).and_then(Self::new)
    }
}

impl fmt::Display for NativeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.raw())
    }
}

const HEAP_BASE: NonZeroUsize = match NonZeroUsize::new(0x1000) {
    Some(base) => base,
    None => panic!("heap base must be non-zero"),
};

/// Distance between consecutive heap addresses, leaving room for sub-object offsets.
const SLOT_STRIDE: usize = 0x100;

struct Slot {
    type_id: TypeId,
    value: Box<dyn Any>,
}

/// Arena of native values addressed by [`NativeAddress`].
///
/// Addresses are never reused after [`NativeHeap::free`], so a stale
/// address cannot alias a newer object.
#[derive(Default)]
pub struct NativeHeap {
    slots: Vec<Option<Slot>>,
    live: usize,
}

impl NativeHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a value into the heap and return its address.
    pub fn allocate<T: Any>(&mut self, value: T) -> NativeAddress {
        let index = self.slots.len();
        self.slots.push(Some(Slot {
            type_id: TypeId::of::<T>(),
            value: Box::new(value),
        }));
        self.live += 1;
        NativeAddress(HEAP_BASE.saturating_add(index * SLOT_STRIDE))
    }

    /// Borrow the value at `address` if it is live and of type `T`.
    pub fn get<T: Any>(&self, address: NativeAddress) -> Option<&T> {
        let slot = self.slot(address)?;
        slot.value.downcast_ref::<T>()
    }

    /// Mutably borrow the value at `address` if it is live and of type `T`.
    pub fn get_mut<T: Any>(&mut self, address: NativeAddress) -> Option<&mut T> {
        let index = Self::index_of(address)?;
        let slot = self.slots.get_mut(index)?.as_mut()?;
        slot.value.downcast_mut::<T>()
    }

    /// Whether `address` refers to a live value of type `T`.
    pub fn holds<T: Any>(&self, address: NativeAddress) -> bool {
        self.slot(address)
            .is_some_and(|slot| slot.type_id == TypeId::of::<T>())
    }

    pub fn contains(&self, address: NativeAddress) -> bool {
        self.slot(address).is_some()
    }

    /// Drop the value at `address`. Returns `false` if nothing was live there.
    pub fn free(&mut self, address: NativeAddress) -> bool {
        let Some(index) = Self::index_of(address) else {
            return false;
        };
        match self.slots.get_mut(index).and_then(Option::take) {
            Some(_) => {
                self.live -= 1;
                true
            }
            None => false,
        }
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn slot(&self, address: NativeAddress) -> Option<&Slot> {
        let index = Self::index_of(address)?;
        self.slots.get(index)?.as_ref()
    }

    fn index_of(address: NativeAddress) -> Option<usize> {
        let rel = address.raw().checked_sub(HEAP_BASE.get())?;
        if rel % SLOT_STRIDE != 0 {
            return None;
        }
        Some(rel / SLOT_STRIDE)
    }
}

impl fmt::Debug for NativeHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHeap")
            .field("live", &self.live)
            .field("allocated", &self.slots.len())
            .finish()
    }
}
