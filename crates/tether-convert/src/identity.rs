//! Identity table: native address → existing host wrapper.
//!
//! Reference conversions of value types consult an [`IdentityTable`] so
//! that the same native value round-trips to the same host object while a
//! wrapper for it is alive. The table is owned elsewhere (usually by the
//! code that constructs wrappers); conversions only look entries up.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::host::{HostValue, WeakHostValue};
use crate::native::NativeAddress;

/// Lookup of live host wrappers by the native address they refer to.
pub trait IdentityTable {
    /// The live wrapper for `address`, if any.
    ///
    /// The returned handle is a new strong reference owned by the caller.
    fn retrieve_wrapper(&self, address: NativeAddress) -> Option<HostValue>;
}

/// An identity table holding weak references to wrappers.
///
/// Entries are evicted when their wrapper is dropped: a lookup that finds
/// a dead entry removes it and reports no wrapper. Registration happens as
/// a side effect of wrapper construction (typically inside a registered
/// `copy_to_host` or `pointer_to_host` function), hence the interior
/// mutability.
///
/// Copies get fresh addresses, so dead entries are rarely looked up again.
/// `register` purges them whenever the map has doubled since the last
/// purge, keeping its size proportional to the number of live wrappers.
#[derive(Debug)]
pub struct WrapperMap {
    wrappers: RefCell<HashMap<NativeAddress, WeakHostValue>>,
    purge_at: Cell<usize>,
}

const MIN_PURGE_AT: usize = 64;

impl Default for WrapperMap {
    fn default() -> Self {
        Self {
            wrappers: RefCell::default(),
            purge_at: Cell::new(MIN_PURGE_AT),
        }
    }
}

impl WrapperMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `wrapper` as the host object for the native address it refers to.
    ///
    /// Returns `false` (and records nothing) if `wrapper` is not a wrapper.
    pub fn register(&self, wrapper: &HostValue) -> bool {
        let Some(w) = wrapper.as_wrapper() else {
            return false;
        };
        let len = {
            let mut wrappers = self.wrappers.borrow_mut();
            wrappers.insert(w.address(), wrapper.downgrade());
            wrappers.len()
        };
        if len >= self.purge_at.get() {
            self.purge();
            self.purge_at.set((self.len() * 2).max(MIN_PURGE_AT));
        }
        true
    }

    /// Forget the wrapper registered for `address`.
    pub fn release(&self, address: NativeAddress) -> bool {
        self.wrappers.borrow_mut().remove(&address).is_some()
    }

    /// Drop entries whose wrapper no longer exists. Returns how many were removed.
    pub fn purge(&self) -> usize {
        let mut wrappers = self.wrappers.borrow_mut();
        let before = wrappers.len();
        wrappers.retain(|_, weak| weak.is_alive());
        before - wrappers.len()
    }

    /// Number of entries, including ones not yet found dead.
    pub fn len(&self) -> usize {
        self.wrappers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.borrow().is_empty()
    }
}

impl IdentityTable for WrapperMap {
    fn retrieve_wrapper(&self, address: NativeAddress) -> Option<HostValue> {
        let mut wrappers = self.wrappers.borrow_mut();
        let found = wrappers.get(&address)?.upgrade();
        if found.is_none() {
            wrappers.remove(&address);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostTypeId, Ownership};

    fn addr(raw: usize) -> NativeAddress {
        NativeAddress::new(raw).unwrap()
    }

    #[test]
    fn retrieve_returns_same_object() {
        let map = WrapperMap::new();
        let wrapper = HostValue::wrap(HostTypeId::new(1), addr(0x100), Ownership::Host);
        assert!(map.register(&wrapper));

        let found = map.retrieve_wrapper(addr(0x100)).unwrap();
        assert!(found.ptr_eq(&wrapper));
        assert_eq!(wrapper.ref_count(), 2);
    }

    #[test]
    fn non_wrappers_are_not_registered() {
        let map = WrapperMap::new();
        assert!(!map.register(&HostValue::int(1)));
        assert!(map.is_empty());
    }

    #[test]
    fn dropped_wrapper_is_evicted_on_lookup() {
        let map = WrapperMap::new();
        let wrapper = HostValue::wrap(HostTypeId::new(1), addr(0x100), Ownership::Host);
        map.register(&wrapper);
        drop(wrapper);

        assert_eq!(map.len(), 1);
        assert!(map.retrieve_wrapper(addr(0x100)).is_none());
        assert!(map.is_empty());
    }

    #[test]
    fn dead_entries_do_not_accumulate() {
        let map = WrapperMap::new();
        let live = HostValue::wrap(HostTypeId::new(1), addr(0x10), Ownership::Host);
        map.register(&live);
        for i in 1..=10_000 {
            let copy = HostValue::wrap(HostTypeId::new(1), addr(0x10 + i * 0x10), Ownership::Host);
            map.register(&copy);
        }
        assert!(map.len() <= MIN_PURGE_AT, "map grew to {}", map.len());
        assert!(map.retrieve_wrapper(addr(0x10)).unwrap().ptr_eq(&live));
    }

    #[test]
    fn purge_and_release() {
        let map = WrapperMap::new();
        let kept = HostValue::wrap(HostTypeId::new(1), addr(0x100), Ownership::Host);
        let dropped = HostValue::wrap(HostTypeId::new(1), addr(0x200), Ownership::Host);
        map.register(&kept);
        map.register(&dropped);
        drop(dropped);

        assert_eq!(map.purge(), 1);
        assert!(map.release(addr(0x100)));
        assert!(!map.release(addr(0x100)));
        assert!(map.retrieve_wrapper(addr(0x100)).is_none());
    }
}
