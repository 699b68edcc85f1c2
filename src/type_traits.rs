// src/type_traits.rs
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::Arc;

mod sealed {
    /// Pointer classification of a payload type.
    ///
    /// Lives in a private module so that only this crate can answer it: the
    /// pointer-relaxed cast reinterprets memory, which is only sound for real
    /// pointer types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PointerKind {
        NotPointer,
        Data,
        /// A data pointer that is never null.
        NonNullData,
        Function,
    }
}

pub(crate) use sealed::PointerKind;

/// Compile-time type traits of a value that can be stored in a [`Variant`].
///
/// Every classification is an associated constant resolved when the variant
/// is built, so a variant never has to inspect its payload to answer a
/// query. All constants default to `false`; implementors only spell out the
/// ones that hold.
///
/// The pointer classifications (`is_pointer`, `is_function_pointer`) are
/// reserved to the raw-pointer, `NonNull` and function-pointer
/// implementations that ship with this crate.
///
/// Rust has neither member pointers nor class inheritance. The crate's own
/// implementations therefore never report `IS_MEMBER_DATA_POINTER`,
/// `IS_MEMBER_FUNCTION_POINTER` or `IS_POLYMORPHIC`; user types may still
/// declare them.
///
/// # Examples
///
/// ```
/// use sovran_variant::{TypeTraits, Variant};
/// use std::fmt;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl TypeTraits for Point {
///     const IS_POD: bool = true;
///     const IS_CLASS: bool = true;
///
///     fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "({}, {})", self.x, self.y)
///     }
/// }
///
/// let v = Variant::new(Point { x: 1, y: 2 });
/// assert!(v.is_class().unwrap());
/// assert_eq!(v.to_string(), "(1, 2)");
/// ```
///
/// [`Variant`]: crate::Variant
pub trait TypeTraits: 'static {
    const IS_INTEGRAL: bool = false;
    const IS_SIGNED: bool = false;
    const IS_UNSIGNED: bool = false;
    const IS_FLOATING: bool = false;
    const IS_MEMBER_DATA_POINTER: bool = false;
    const IS_MEMBER_FUNCTION_POINTER: bool = false;
    /// Trivially copyable, no drop glue.
    const IS_POD: bool = false;
    const IS_CLASS: bool = false;
    const IS_UNION: bool = false;
    const IS_POLYMORPHIC: bool = false;

    #[doc(hidden)]
    const POINTER_KIND: sealed::PointerKind = sealed::PointerKind::NotPointer;

    /// Writes the textual representation of the value.
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Adapter that formats any [`TypeTraits`] value through `fmt_value`.
pub(crate) struct Shown<'a, T: ?Sized>(pub(crate) &'a T);

impl<T: TypeTraits> fmt::Display for Shown<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_value(f)
    }
}

impl<T: TypeTraits> fmt::Debug for Shown<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_value(f)
    }
}

macro_rules! signed_integers {
    ($($t:ty),*) => {$(
        impl TypeTraits for $t {
            const IS_INTEGRAL: bool = true;
            const IS_SIGNED: bool = true;
            const IS_POD: bool = true;

            fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }
    )*};
}

// `char` and `bool` count as unsigned integral types, the same as the
// character and boolean types of C-family languages.
macro_rules! unsigned_integers {
    ($($t:ty),*) => {$(
        impl TypeTraits for $t {
            const IS_INTEGRAL: bool = true;
            const IS_UNSIGNED: bool = true;
            const IS_POD: bool = true;

            fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }
    )*};
}

macro_rules! floats {
    ($($t:ty),*) => {$(
        impl TypeTraits for $t {
            const IS_FLOATING: bool = true;
            const IS_SIGNED: bool = true;
            const IS_POD: bool = true;

            fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }
    )*};
}

signed_integers!(i8, i16, i32, i64, i128, isize);
unsigned_integers!(u8, u16, u32, u64, u128, usize, char, bool);
floats!(f32, f64);

impl<T: 'static> TypeTraits for *const T {
    const IS_POD: bool = true;
    const POINTER_KIND: sealed::PointerKind = sealed::PointerKind::Data;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(self, f)
    }
}

impl<T: 'static> TypeTraits for *mut T {
    const IS_POD: bool = true;
    const POINTER_KIND: sealed::PointerKind = sealed::PointerKind::Data;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(self, f)
    }
}

impl<T: 'static> TypeTraits for NonNull<T> {
    const IS_POD: bool = true;
    const POINTER_KIND: sealed::PointerKind = sealed::PointerKind::NonNullData;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(self, f)
    }
}

macro_rules! fn_pointers {
    ($(($($arg:ident),*)),*) => {$(
        impl<R: 'static, $($arg: 'static),*> TypeTraits for fn($($arg),*) -> R {
            const IS_POD: bool = true;
            const POINTER_KIND: sealed::PointerKind = sealed::PointerKind::Function;

            fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(self, f)
            }
        }
    )*};
}

fn_pointers!((), (A), (A, B), (A, B, C), (A, B, C, D));

impl TypeTraits for String {
    const IS_CLASS: bool = true;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl TypeTraits for &'static str {
    const IS_POD: bool = true;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl<T: TypeTraits> TypeTraits for Vec<T> {
    const IS_CLASS: bool = true;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(Shown)).finish()
    }
}

impl<T: TypeTraits> TypeTraits for Box<T> {
    const IS_CLASS: bool = true;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt_value(f)
    }
}

impl TypeTraits for () {
    const IS_POD: bool = true;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("()")
    }
}

impl<T: TypeTraits> TypeTraits for Rc<T> {
    const IS_CLASS: bool = true;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt_value(f)
    }
}

impl<T: TypeTraits> TypeTraits for Arc<T> {
    const IS_CLASS: bool = true;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt_value(f)
    }
}

impl<T: TypeTraits> TypeTraits for Option<T> {
    const IS_CLASS: bool = true;

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Some(value) => write!(f, "Some({})", Shown(value)),
            None => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown<T: TypeTraits>(value: &T) -> String {
        Shown(value).to_string()
    }

    #[test]
    fn test_primitive_classification() {
        assert!(i32::IS_INTEGRAL && i32::IS_SIGNED && !i32::IS_UNSIGNED);
        assert!(u32::IS_INTEGRAL && u32::IS_UNSIGNED && !u32::IS_SIGNED);
        assert!(char::IS_INTEGRAL && char::IS_UNSIGNED);
        assert!(f64::IS_FLOATING && f64::IS_SIGNED && !f64::IS_INTEGRAL);
        assert!(!String::IS_POD && String::IS_CLASS);
    }

    #[test]
    fn test_pointer_kinds() {
        assert_eq!(<*mut String>::POINTER_KIND, PointerKind::Data);
        assert_eq!(<*const u8>::POINTER_KIND, PointerKind::Data);
        assert_eq!(<fn(i32) -> i32>::POINTER_KIND, PointerKind::Function);
        assert_eq!(<usize>::POINTER_KIND, PointerKind::NotPointer);
        assert_eq!(<Box<i32>>::POINTER_KIND, PointerKind::NotPointer);
        assert_eq!(<NonNull<u8>>::POINTER_KIND, PointerKind::NonNullData);
        assert_eq!(<Rc<i32>>::POINTER_KIND, PointerKind::NotPointer);
        assert_eq!(<Arc<i32>>::POINTER_KIND, PointerKind::NotPointer);
        assert!(<NonNull<u8>>::IS_POD && !<NonNull<u8>>::IS_CLASS);
    }

    #[test]
    fn test_unit_and_shared_pointers() {
        assert!(<()>::IS_POD && !<()>::IS_CLASS && !<()>::IS_INTEGRAL);
        assert!(<Rc<String>>::IS_CLASS && !<Rc<String>>::IS_POD);
        assert!(<Arc<String>>::IS_CLASS && !<Arc<String>>::IS_POD);
        assert_eq!(shown(&()), "()");
        assert_eq!(shown(&Rc::new(3u8)), "3");
        assert_eq!(shown(&Arc::new(String::from("shared"))), "shared");
    }

    #[test]
    fn test_container_formatting() {
        assert_eq!(shown(&vec![1, 2, 3]), "[1, 2, 3]");
        assert_eq!(shown(&Some("x".to_string())), "Some(x)");
        assert_eq!(shown(&None::<i32>), "None");
        assert_eq!(shown(&Box::new(2.5f64)), "2.5");
        assert_eq!(shown(&vec!["a", "b"]), "[a, b]");
    }
}
