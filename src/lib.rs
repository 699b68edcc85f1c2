//! # sovran-variant
//!
//! A type-erasing container that remembers what it holds.
//!
//! `sovran-variant` stores a value of any supported type behind a single
//! [`Variant`] type. The concrete type is captured when the variant is
//! created; afterwards the variant can describe the value (is it integral?
//! a pointer? a class? how large is it?) and gives the value back only when
//! the caller asks for a compatible type.
//!
//! ## Key Features
//!
//! - **Type-checked access**: values come back only as their own type
//! - **Pointer-relaxed casts**: a stored pointer can be read as any raw pointer type
//! - **Introspection**: integral, signed, floating, pointer, pod, class and more
//! - **Shared copies**: cloning a variant shares the value instead of copying it
//! - **Readable names**: type names with module paths stripped
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_variant::{Variant, VariantError};
//!
//! fn main() -> Result<(), VariantError> {
//!     let values = vec![
//!         Variant::new('0'),
//!         Variant::new(31i32),
//!         Variant::new(33.48f64),
//!         Variant::new(String::from("hello")),
//!     ];
//!
//!     for value in &values {
//!         println!("{} holds {}", value.type_name()?, value);
//!     }
//!
//!     assert_eq!(*values[1].get::<i32>()?, 31);
//!     assert_eq!(values[3].get::<String>()?.as_str(), "hello");
//!
//!     // Asking for the wrong type fails instead of reinterpreting the value
//!     match values[2].get::<f32>() {
//!         Ok(value) => println!("Value: {}", *value),
//!         Err(VariantError::TypeMismatch { stored, requested }) => {
//!             println!("{} is not a {}", stored, requested)
//!         }
//!         Err(e) => println!("Other error: {}", e),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Pointer Payloads
//!
//! ```rust
//! use sovran_variant::{Variant, VariantError};
//! use std::ffi::c_void;
//!
//! fn main() -> Result<(), VariantError> {
//!     let raw = Box::into_raw(Box::new(String::from("on the heap")));
//!     let v = Variant::new(raw);
//!
//!     // Any raw pointer type can be requested from a pointer payload
//!     let untyped = *v.get::<*mut c_void>()?;
//!     assert_eq!(untyped as usize, raw as usize);
//!     assert_eq!(*v.get::<*mut String>()?, raw);
//!
//!     // but never a non-pointer type
//!     assert!(v.get::<String>().is_err());
//!
//!     // The variant does not own the pointee
//!     drop(v);
//!     unsafe { drop(Box::from_raw(raw)) };
//!     Ok(())
//! }
//! ```
//!
//! ### Custom Types
//!
//! Types opt in by implementing [`TypeTraits`]:
//!
//! ```rust
//! use sovran_variant::{TypeTraits, Variant, VariantError};
//! use std::fmt;
//!
//! #[derive(Clone)]
//! struct Label {
//!     text: String,
//! }
//!
//! impl TypeTraits for Label {
//!     const IS_CLASS: bool = true;
//!
//!     fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         f.write_str(&self.text)
//!     }
//! }
//!
//! fn main() -> Result<(), VariantError> {
//!     let v = Variant::new(Label { text: "string".into() });
//!     assert!(v.is_class()?);
//!     assert!(!v.is_polymorphic()?);
//!     assert_eq!(v.get::<Label>()?.text, "string");
//!     assert!(v.get::<*mut Label>().is_err());
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use sovran_variant::{Variant, VariantError};
//!
//! let empty = Variant::default();
//! assert!(!empty.is_valid());
//! assert_eq!(empty.is_integral(), Err(VariantError::Invalid));
//! assert!(matches!(empty.get::<i32>(), Err(VariantError::Invalid)));
//!
//! // Display never fails; write_to reports the empty variant instead
//! assert_eq!(empty.to_string(), "<invalid>");
//! let mut out = String::new();
//! assert_eq!(empty.write_to(&mut out), Err(VariantError::Invalid));
//! ```
//!
//! ### Borrowing
//!
//! Typed access follows `RefCell` rules across every variant sharing a
//! value. `with` and `with_mut` must not be nested on one value unless both
//! closures only read it: a `with_mut` inside a `with` (or any access inside
//! a `with_mut`) panics, as does `get_mut` while a `get` guard is alive.
//!
//! ## Features
//!
//! - `demangle` (default): [`Variant::type_name`] strips module paths.
//!   Without it the raw [`std::any::type_name`] is reported.
//! - `demo`: builds the `variant-demo` binary.

#[cfg(feature = "demangle")]
mod demangle;
mod error;
mod holder;
mod type_traits;
mod variant;

#[cfg(feature = "demangle")]
pub use demangle::pretty_type_name;
pub use error::VariantError;
pub use type_traits::TypeTraits;
pub use variant::Variant;
