//! Upcast collaborator: native address adjustment between related types.
//!
//! When a wrapper's runtime type differs from the type a call site
//! expects, the native address may need adjusting to reach the base
//! sub-object (multiple inheritance). An [`Upcaster`] answers whether a
//! type has such a cast path and performs the adjustment.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::host::{HostTypeId, HostValue};
use crate::native::NativeAddress;

/// Address adjustment between a wrapper's runtime type and an expected type.
pub trait Upcaster {
    /// Whether wrappers of `ty` need a cast to reach other types' sub-objects.
    fn has_cast_path(&self, ty: HostTypeId) -> bool;

    /// The native address of the `target` sub-object of `value`, whose runtime type is `ty`.
    fn cast(&self, ty: HostTypeId, value: &HostValue, target: HostTypeId) -> Option<NativeAddress>;
}

/// An upcaster for binding surfaces without address-adjusting casts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCasts;

impl Upcaster for NoCasts {
    fn has_cast_path(&self, _ty: HostTypeId) -> bool {
        false
    }

    fn cast(&self, _ty: HostTypeId, _value: &HostValue, _target: HostTypeId) -> Option<NativeAddress> {
        None
    }
}

/// Declared derived → base casts with their byte offsets.
///
/// Casts compose: if `A → B` and `B → C` are declared, a wrapper of `A`
/// reaches `C` by the sum of both offsets. The shortest declared path is used.
#[derive(Debug, Clone, Default)]
pub struct CastTable {
    edges: HashMap<HostTypeId, Vec<(HostTypeId, isize)>>,
}

impl CastTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that a `derived` object contains its `base` sub-object at `offset` bytes.
    pub fn declare(&mut self, derived: HostTypeId, base: HostTypeId, offset: isize) {
        let bases = self.edges.entry(derived).or_default();
        match bases.iter_mut().find(|(b, _)| *b == base) {
            Some(existing) => existing.1 = offset,
            None => bases.push((base, offset)),
        }
    }

    /// Total offset from `from` to `to`, following declared casts breadth-first.
    ///
    /// Paths whose summed offset overflows `isize` are not followed.
    pub fn offset(&self, from: HostTypeId, to: HostTypeId) -> Option<isize> {
        if from == to {
            return Some(0);
        }
        let mut queue = VecDeque::from([(from, 0_isize)]);
        let mut seen = HashSet::from([from]);
        while let Some((ty, acc)) = queue.pop_front() {
            for &(base, offset) in self.edges.get(&ty).into_iter().flatten() {
                let Some(total) = acc.checked_add(offset) else {
                    continue;
                };
                if base == to {
                    return Some(total);
                }
                if seen.insert(base) {
                    queue.push_back((base, total));
                }
            }
        }
        None
    }
}

impl Upcaster for CastTable {
    fn has_cast_path(&self, ty: HostTypeId) -> bool {
        self.edges.get(&ty).is_some_and(|bases| !bases.is_empty())
    }

    fn cast(&self, ty: HostTypeId, value: &HostValue, target: HostTypeId) -> Option<NativeAddress> {
        let address = value.as_wrapper()?.address();
        address.offset(self.offset(ty, target)?)
    }
}
