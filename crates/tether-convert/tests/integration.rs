//! End-to-end conversion tests over a small binding surface.
//!
//! The surface registers:
//! - `Widget`, an object type (wrapped by pointer, never copied);
//! - `Button`, an object type derived from `Widget` at a non-zero offset;
//! - `Size`, a value type with wrappers, a self-conversion and implicit
//!   conversions from `int` (square size) and `Widget` (its size);
//! - `long`, a value-only primitive.

use std::cell::RefCell;
use std::rc::Rc;

use tether_convert::{
    CastTable, Conversion, ConversionTable, Dispatcher, HostTypeId, HostValue, NativeAddress,
    NativeHeap, Ownership, ToHost, ToNative, WrapperMap,
};

const WIDGET: HostTypeId = HostTypeId::new(1);
const BUTTON: HostTypeId = HostTypeId::new(2);
const SIZE: HostTypeId = HostTypeId::new(3);
const LONG: HostTypeId = HostTypeId::new(4);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Size {
    width: i32,
    height: i32,
}

#[derive(Debug)]
struct Widget {
    size: Size,
}

struct Surface {
    heap: Rc<RefCell<NativeHeap>>,
    wrappers: Rc<WrapperMap>,
    casts: CastTable,
    table: ConversionTable,
}

impl Surface {
    fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(&self.table, &*self.wrappers, &self.casts)
    }

    fn size_converters(&self) -> Vec<ToNative> {
        self.table
            .record(SIZE)
            .unwrap()
            .value_conversions()
            .iter()
            .map(|c| c.converter().clone())
            .collect()
    }
}

fn pointer_conversion(ty: HostTypeId) -> Conversion {
    Conversion::new(
        move |v| v.is_wrapper_of(ty),
        ToNative::into_slot(|v, out: &mut Option<NativeAddress>| {
            *out = v.as_wrapper().map(|w| w.address());
        }),
    )
}

fn wrap_by_pointer(ty: HostTypeId) -> ToHost {
    ToHost::new(move |a| HostValue::wrap(ty, a, Ownership::Native))
}

fn surface() -> Surface {
    let heap = Rc::new(RefCell::new(NativeHeap::new()));
    let wrappers = Rc::new(WrapperMap::new());
    let mut casts = CastTable::new();
    casts.declare(BUTTON, WIDGET, 0x10);
    let mut table = ConversionTable::new();

    for ty in [WIDGET, BUTTON] {
        table
            .register_object_type(ty, wrap_by_pointer(ty), Some(pointer_conversion(ty)), None)
            .unwrap();
    }

    let copy_size = {
        let heap = Rc::clone(&heap);
        let wrappers = Rc::clone(&wrappers);
        ToHost::new(move |a| {
            let size = *heap.borrow().get::<Size>(a).unwrap();
            let copy = heap.borrow_mut().allocate(size);
            let value = HostValue::wrap(SIZE, copy, Ownership::Host);
            wrappers.register(&value);
            value
        })
    };
    table
        .register_object_type(
            SIZE,
            wrap_by_pointer(SIZE),
            Some(pointer_conversion(SIZE)),
            Some(copy_size),
        )
        .unwrap();

    let own = {
        let heap = Rc::clone(&heap);
        ToNative::into_slot(move |v, out: &mut Size| {
            let a = v.as_wrapper().unwrap().address();
            *out = *heap.borrow().get::<Size>(a).unwrap();
        })
    };
    let from_int = ToNative::into_slot(|v, out: &mut Size| {
        let side = v.as_int().unwrap() as i32;
        *out = Size {
            width: side,
            height: side,
        };
    });
    let from_widget = {
        let heap = Rc::clone(&heap);
        ToNative::into_slot(move |v, out: &mut Size| {
            let a = v.as_wrapper().unwrap().address();
            *out = heap.borrow().get::<Widget>(a).unwrap().size;
        })
    };
    table
        .add_value_conversion(SIZE, Conversion::new(|v| v.is_wrapper_of(SIZE), own))
        .unwrap();
    table
        .add_value_conversion(SIZE, Conversion::new(|v| v.as_int().is_some(), from_int))
        .unwrap();
    table
        .add_value_conversion(SIZE, Conversion::new(|v| v.is_wrapper_of(WIDGET), from_widget))
        .unwrap();

    let long_to_host = {
        let heap = Rc::clone(&heap);
        ToHost::new(move |a| HostValue::int(*heap.borrow().get::<i64>(a).unwrap()))
    };
    table.register_value_type(LONG, long_to_host).unwrap();
    table
        .add_value_conversion(
            LONG,
            Conversion::new(
                |v| v.as_int().is_some(),
                ToNative::into_slot(|v, out: &mut i64| *out = v.as_int().unwrap()),
            ),
        )
        .unwrap();

    Surface {
        heap,
        wrappers,
        casts,
        table,
    }
}

/// Copy a host value into a native `Size` buffer, then copy the buffer back to the host.
fn round_trip_size(s: &Surface, value: &HostValue) -> HostValue {
    let d = s.dispatcher();
    let mut buffer = Size::default();
    d.to_native_copy(SIZE, value, &mut buffer).unwrap();
    let address = s.heap.borrow_mut().allocate(buffer);
    d.copy_to_host(SIZE, address).unwrap()
}

fn native_size(s: &Surface, value: &HostValue) -> Size {
    let address = value.as_wrapper().unwrap().address();
    *s.heap.borrow().get::<Size>(address).unwrap()
}

#[test]
fn value_copy_round_trips() {
    let s = surface();
    for size in [
        Size { width: 0, height: 0 },
        Size { width: 3, height: 4 },
        Size { width: -1, height: 100 },
    ] {
        let native = s.heap.borrow_mut().allocate(size);
        let original = s.dispatcher().copy_to_host(SIZE, native).unwrap();
        let back = round_trip_size(&s, &original);
        assert!(!back.ptr_eq(&original));
        assert_eq!(native_size(&s, &back), native_size(&s, &original));
    }
}

#[test]
fn primitive_value_round_trips() {
    let s = surface();
    let d = s.dispatcher();
    let mut buffer = 0_i64;
    d.to_native_copy(LONG, &HostValue::int(42), &mut buffer).unwrap();
    let address = s.heap.borrow_mut().allocate(buffer);
    assert_eq!(d.copy_to_host(LONG, address).unwrap().as_int(), Some(42));
}

#[test]
fn implicit_conversions_construct_values() {
    let s = surface();
    let widget = s.heap.borrow_mut().allocate(Widget {
        size: Size { width: 640, height: 480 },
    });
    let widget_value = s.dispatcher().pointer_to_host(WIDGET, Some(widget)).unwrap();

    let from_int = round_trip_size(&s, &HostValue::int(5));
    assert_eq!(native_size(&s, &from_int), Size { width: 5, height: 5 });

    let from_widget = round_trip_size(&s, &widget_value);
    assert_eq!(native_size(&s, &from_widget), Size { width: 640, height: 480 });
}

#[test]
fn implicit_classification_over_whole_chain() {
    let s = surface();
    let d = s.dispatcher();
    let chain = s.size_converters();
    assert_eq!(chain.len(), 3);

    let pointer = s
        .table
        .record(SIZE)
        .unwrap()
        .pointer_conversion()
        .unwrap()
        .converter()
        .clone();
    assert!(!d.is_implicit_conversion(SIZE, &pointer).unwrap());
    assert!(!d.is_implicit_conversion(SIZE, &chain[0]).unwrap());
    for converter in &chain[1..] {
        assert!(d.is_implicit_conversion(SIZE, converter).unwrap());
    }
}

#[test]
fn first_matching_conversion_wins() {
    let mut s = surface();
    let shadow = ToNative::into_slot(|_, out: &mut Size| *out = Size { width: -7, height: -7 });
    s.table
        .add_value_conversion(SIZE, Conversion::new(|v| v.as_int().is_some(), shadow.clone()))
        .unwrap();

    let chain = s.size_converters();
    let found = s
        .dispatcher()
        .is_value_convertible(SIZE, &HostValue::int(2))
        .unwrap()
        .unwrap();
    assert_eq!(found, &chain[1]);
    assert_ne!(found, &shadow);
}

#[test]
fn reference_conversion_preserves_identity() {
    let s = surface();
    let d = s.dispatcher();
    let native = s.heap.borrow_mut().allocate(Size { width: 1, height: 2 });
    let first = d.copy_to_host(SIZE, native).unwrap();
    let copy = first.as_wrapper().unwrap().address();

    let a = d.reference_to_host(SIZE, copy).unwrap();
    let b = d.reference_to_host(SIZE, copy).unwrap();
    assert!(a.ptr_eq(&first));
    assert!(b.ptr_eq(&first));
    assert_eq!(first.ref_count(), 3);
}

#[test]
fn reference_conversion_after_eviction_copies_again() {
    let s = surface();
    let d = s.dispatcher();
    let native = s.heap.borrow_mut().allocate(Size { width: 1, height: 2 });
    let first = d.copy_to_host(SIZE, native).unwrap();
    let copy = first.as_wrapper().unwrap().address();
    drop(first);

    let again = d.reference_to_host(SIZE, copy).unwrap();
    assert_ne!(again.as_wrapper().unwrap().address(), copy);
    assert_eq!(native_size(&s, &again), Size { width: 1, height: 2 });
}

#[test]
fn pointer_round_trip_and_null() {
    let s = surface();
    let d = s.dispatcher();
    assert!(d.pointer_to_host(WIDGET, None).unwrap().is_none());

    let widget = s.heap.borrow_mut().allocate(Widget { size: Size::default() });
    let value = d.pointer_to_host(WIDGET, Some(widget)).unwrap();
    let mut out = None;
    d.to_native_pointer(WIDGET, &value, &mut out).unwrap();
    assert_eq!(out, Some(widget));
}

#[test]
fn derived_wrapper_is_upcast() {
    let s = surface();
    let d = s.dispatcher();
    let button = NativeAddress::new(0x9000).unwrap();
    let value = d.pointer_to_host(BUTTON, Some(button)).unwrap();

    let mut out = None;
    d.to_native_pointer(WIDGET, &value, &mut out).unwrap();
    assert_eq!(out, Some(button.offset(0x10).unwrap()));
}

#[test]
fn reference_convertibility_accepts_wrappers_and_values() {
    let s = surface();
    let d = s.dispatcher();
    let wrapped = HostValue::wrap(SIZE, NativeAddress::new(0x5000).unwrap(), Ownership::Native);
    let pointer = s.table.record(SIZE).unwrap().pointer_conversion().unwrap().converter();

    assert_eq!(d.is_reference_convertible(SIZE, &wrapped).unwrap(), Some(pointer));
    assert!(d
        .is_reference_convertible(SIZE, &HostValue::int(3))
        .unwrap()
        .is_some());
    assert!(d
        .is_reference_convertible(SIZE, &HostValue::string("x"))
        .unwrap()
        .is_none());
}

#[test]
fn failed_copy_keeps_preinitialized_buffer() {
    let s = surface();
    let mut buffer = Size { width: 9, height: 9 };
    s.dispatcher()
        .to_native_copy(SIZE, &HostValue::float(1.0), &mut buffer)
        .unwrap();
    assert_eq!(buffer, Size { width: 9, height: 9 });
}

#[test]
fn teardown_destroys_all_records() {
    let mut s = surface();
    assert_eq!(s.table.len(), 4);
    assert!(s.table.destroy_record(LONG));
    s.table.teardown();
    assert!(s.table.is_empty());
    assert!(s.wrappers.is_empty());
}
