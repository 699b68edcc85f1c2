use sovran_variant::{TypeTraits, Variant, VariantError};
use static_assertions::{assert_impl_all, assert_not_impl_any, const_assert};
use std::fmt::{Debug, Display};

type Callback = fn(i32) -> i32;

// Shared single-threaded ownership
assert_impl_all!(Variant: Clone, Default, Debug, Display);
assert_not_impl_any!(Variant: Send, Sync);

assert_impl_all!(VariantError: std::error::Error, Clone, PartialEq, Send, Sync);

const_assert!(<i32 as TypeTraits>::IS_SIGNED);
const_assert!(<u8 as TypeTraits>::IS_UNSIGNED);
const_assert!(<f32 as TypeTraits>::IS_FLOATING);
const_assert!(!<String as TypeTraits>::IS_POD);
const_assert!(!<*mut String as TypeTraits>::IS_MEMBER_DATA_POINTER);
const_assert!(!<Callback as TypeTraits>::IS_MEMBER_FUNCTION_POINTER);

#[test]
fn test_error_messages() {
    assert_eq!(VariantError::Invalid.to_string(), "variant is not valid");
    assert_eq!(
        VariantError::TypeMismatch {
            stored: "f64",
            requested: "f32",
        }
        .to_string(),
        "type mismatch: stored f64, requested f32"
    );
}
