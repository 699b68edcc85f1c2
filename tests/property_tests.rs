//! Properties that hold for every value a variant can store.

use proptest::prelude::*;
use sovran_variant::{TypeTraits, Variant, VariantError};
use std::ffi::c_void;
use std::mem;

fn mismatches<T>(result: Result<T, VariantError>) -> bool {
    matches!(result, Err(VariantError::TypeMismatch { .. }))
}

fn round_trips<T>(value: T) -> bool
where
    T: TypeTraits + Clone + PartialEq,
{
    let v = Variant::new(value.clone());
    let copy = v.clone();
    let from_original = v.get_cloned::<T>();
    let from_copy = copy.get_cloned::<T>();
    from_original.as_ref() == Ok(&value) && from_copy == from_original
}

proptest! {
    #[test]
    fn prop_i64_round_trip(x in any::<i64>()) {
        prop_assert!(round_trips(x));
        let v = Variant::new(x);
        prop_assert!(mismatches(v.get::<u64>()));
        prop_assert!(mismatches(v.get::<i32>()));
        prop_assert_eq!(v.size_of().unwrap(), mem::size_of::<i64>());
    }

    #[test]
    fn prop_f64_round_trip(x in any::<f64>().prop_filter("NaN never equals itself", |x| !x.is_nan())) {
        prop_assert!(round_trips(x));
        prop_assert!(mismatches(Variant::new(x).get::<f32>()));
    }

    #[test]
    fn prop_string_round_trip(s in ".*") {
        prop_assert!(round_trips(s.clone()));
        let v = Variant::new(s.clone());
        prop_assert!(mismatches(v.get::<*mut String>()));
        prop_assert_eq!(v.to_string(), s);
    }

    #[test]
    fn prop_vec_round_trip(items in prop::collection::vec(any::<u16>(), 0..32)) {
        prop_assert!(round_trips(items.clone()));
        prop_assert!(mismatches(Variant::new(items).get::<Vec<i16>>()));
    }

    #[test]
    fn prop_pointer_reads_as_any_pointer(addr in 1usize..usize::MAX) {
        let ptr = addr as *mut String;
        let v = Variant::new(ptr);
        prop_assert_eq!(*v.get::<*mut c_void>().unwrap() as usize, addr);
        prop_assert_eq!(*v.get::<*const u8>().unwrap() as usize, addr);
        prop_assert_eq!(*v.get::<*mut String>().unwrap(), ptr);
        prop_assert!(mismatches(v.get::<usize>()));
        prop_assert!(mismatches(v.get::<String>()));
    }

    #[test]
    fn prop_dropping_original_keeps_copy(x in any::<u32>()) {
        let original = Variant::new(x);
        let copy = original.clone();
        drop(original);
        prop_assert!(copy.is_valid());
        prop_assert_eq!(*copy.get::<u32>().unwrap(), x);
    }
}

#[cfg(feature = "demangle")]
proptest! {
    #[test]
    fn prop_pretty_name_strips_paths(segments in prop::collection::vec("[a-z_][a-z0-9_]{0,8}", 1..5)) {
        let raw = segments.join("::");
        let pretty = sovran_variant::pretty_type_name(&raw);
        prop_assert_eq!(pretty.as_deref(), segments.last().map(String::as_str));
    }
}
