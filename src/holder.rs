use crate::type_traits::{PointerKind, TypeTraits};
use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::mem;

/// Type-erased view of a stored value.
///
/// One implementation exists per payload type; every answer is fixed when
/// the holder is created.
pub(crate) trait TypeHolder {
    fn is_integral(&self) -> bool;
    fn is_signed(&self) -> bool;
    fn is_unsigned(&self) -> bool;
    fn is_floating(&self) -> bool;
    fn pointer_kind(&self) -> PointerKind;
    fn is_member_data_pointer(&self) -> bool;
    fn is_member_function_pointer(&self) -> bool;
    fn is_pod(&self) -> bool;
    fn is_class(&self) -> bool;
    fn is_union(&self) -> bool;
    fn is_polymorphic(&self) -> bool;

    fn size_of(&self) -> usize;
    fn alignment_of(&self) -> usize;

    fn type_identity(&self) -> TypeId;
    fn raw_type_name(&self) -> &'static str;
    fn type_name(&self) -> String;

    /// Writes the payload through its own formatting.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// The payload cell, with the concrete type erased.
    fn cell(&self) -> &RefCell<dyn Any>;
}

/// The holder for one concrete payload type
pub(crate) struct TypedHolder<T: TypeTraits> {
    data: RefCell<T>,
}

impl<T: TypeTraits> TypedHolder<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            data: RefCell::new(value),
        }
    }
}

impl<T: TypeTraits> TypeHolder for TypedHolder<T> {
    fn is_integral(&self) -> bool {
        T::IS_INTEGRAL
    }
    fn is_signed(&self) -> bool {
        T::IS_SIGNED
    }
    fn is_unsigned(&self) -> bool {
        T::IS_UNSIGNED
    }
    fn is_floating(&self) -> bool {
        T::IS_FLOATING
    }
    fn pointer_kind(&self) -> PointerKind {
        T::POINTER_KIND
    }
    fn is_member_data_pointer(&self) -> bool {
        T::IS_MEMBER_DATA_POINTER
    }
    fn is_member_function_pointer(&self) -> bool {
        T::IS_MEMBER_FUNCTION_POINTER
    }
    fn is_pod(&self) -> bool {
        T::IS_POD
    }
    fn is_class(&self) -> bool {
        T::IS_CLASS
    }
    fn is_union(&self) -> bool {
        T::IS_UNION
    }
    fn is_polymorphic(&self) -> bool {
        T::IS_POLYMORPHIC
    }

    fn size_of(&self) -> usize {
        mem::size_of::<T>()
    }
    fn alignment_of(&self) -> usize {
        mem::align_of::<T>()
    }

    fn type_identity(&self) -> TypeId {
        TypeId::of::<T>()
    }
    fn raw_type_name(&self) -> &'static str {
        type_name::<T>()
    }
    fn type_name(&self) -> String {
        readable_name(type_name::<T>())
    }

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Mutably borrowed elsewhere; same placeholder `RefCell`'s Debug uses.
        match self.data.try_borrow() {
            Ok(data) => data.fmt_value(f),
            Err(_) => f.write_str("<borrowed>"),
        }
    }

    fn cell(&self) -> &RefCell<dyn Any> {
        &self.data
    }
}

#[cfg(feature = "demangle")]
fn readable_name(raw: &'static str) -> String {
    crate::demangle::pretty_type_name(raw).unwrap_or_default()
}

#[cfg(not(feature = "demangle"))]
fn readable_name(raw: &'static str) -> String {
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holder_answers_from_type() {
        let holder: Box<dyn TypeHolder> = Box::new(TypedHolder::new(7u16));
        assert!(holder.is_integral());
        assert!(holder.is_unsigned());
        assert!(!holder.is_signed());
        assert_eq!(holder.pointer_kind(), PointerKind::NotPointer);
        assert_eq!(holder.size_of(), 2);
        assert_eq!(holder.alignment_of(), mem::align_of::<u16>());
        assert_eq!(holder.type_identity(), TypeId::of::<u16>());
        assert_eq!(holder.raw_type_name(), "u16");
    }

    #[test]
    fn test_holder_cell_downcasts_to_stored_type() {
        let holder = TypedHolder::new(String::from("held"));
        let cell = holder.cell();
        assert_eq!(
            cell.borrow().downcast_ref::<String>().map(String::as_str),
            Some("held")
        );
        assert!(cell.borrow().downcast_ref::<&'static str>().is_none());
    }

    #[test]
    fn test_holder_formats_busy_payload_as_placeholder() {
        struct Shown<'a>(&'a dyn TypeHolder);
        impl fmt::Display for Shown<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        let holder = TypedHolder::new(5i32);
        assert_eq!(Shown(&holder).to_string(), "5");
        let _guard = holder.cell().borrow_mut();
        assert_eq!(Shown(&holder).to_string(), "<borrowed>");
    }

    #[cfg(feature = "demangle")]
    #[test]
    fn test_readable_name_of_malformed_name_is_empty() {
        assert_eq!(readable_name("Vec<i32"), "");
        assert_eq!(readable_name("alloc::vec::Vec<i32>"), "Vec<i32>");
    }

    #[cfg(not(feature = "demangle"))]
    #[test]
    fn test_readable_name_is_raw_without_demangle() {
        assert_eq!(readable_name("Vec<i32"), "Vec<i32");
        assert_eq!(readable_name("alloc::vec::Vec<i32>"), "alloc::vec::Vec<i32>");
    }
}
