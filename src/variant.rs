use crate::error::VariantError;
use crate::holder::{TypeHolder, TypedHolder};
use crate::type_traits::{PointerKind, TypeTraits};
use std::any::{type_name, Any, TypeId};
use std::cell::{Ref, RefMut};
use std::fmt;
use std::io;
use std::mem;
use std::rc::Rc;
use tracing::trace;

const LABEL_WIDTH: usize = 26;

/// A container that holds one value of any [`TypeTraits`] type.
///
/// The concrete type is captured when the variant is created and erased
/// afterwards. The variant can still report what it holds (integral,
/// floating, pointer, class, size, alignment, name) and hands the value back
/// only when the requested type matches.
///
/// Cloning a `Variant` does not clone the value: both variants share the
/// same holder, and the value is dropped with the last variant referring to
/// it. A variant is *valid* while it holds a value; [`Variant::empty`],
/// [`Default`] and [`Variant::reset`] produce invalid variants, on which
/// every query fails with [`VariantError::Invalid`].
///
/// # Pointer payloads
///
/// A variant holding a raw, `NonNull` or function pointer may be read back
/// as any raw data pointer type of the same size: the stored address is
/// reinterpreted. A `NonNull` target needs a stored `NonNull`. A pointer
/// payload can never be read back as a non-pointer type. The variant never
/// frees what a stored raw pointer points to.
///
/// # Borrowing
///
/// Typed access follows `RefCell` rules. Calls to [`with`](Variant::with)
/// and [`with_mut`](Variant::with_mut) must not be nested on one value
/// unless both only read it; a conflicting nested access panics.
///
/// # Threading
///
/// `Variant` is built on `Rc` and `RefCell` and is neither `Send` nor
/// `Sync`. Borrows handed out by [`get`](Variant::get) and
/// [`get_mut`](Variant::get_mut) follow `RefCell` rules across all variants
/// that share a holder.
///
/// # Examples
///
/// ```
/// use sovran_variant::{Variant, VariantError};
///
/// let v = Variant::new(31i32);
/// assert!(v.is_integral()?);
/// assert!(v.is_signed()?);
/// assert_eq!(*v.get::<i32>()?, 31);
///
/// // Exact type match is required for non-pointer payloads
/// assert!(matches!(
///     v.get::<u32>(),
///     Err(VariantError::TypeMismatch { .. })
/// ));
///
/// // Copies share the same value
/// let copy = v.clone();
/// *copy.get_mut::<i32>()? += 1;
/// assert_eq!(*v.get::<i32>()?, 32);
/// # Ok::<(), VariantError>(())
/// ```
#[derive(Clone, Default)]
pub struct Variant {
    holder: Option<Rc<dyn TypeHolder>>,
}

/// How a typed access reaches the payload.
enum Route {
    /// The requested type is the stored type.
    Exact,
    /// The stored pointer is reinterpreted as another raw pointer type.
    Reinterpret,
}

impl Variant {
    /// Captures `value` in a new variant.
    pub fn new<T: TypeTraits>(value: T) -> Self {
        trace!(type_name = type_name::<T>(), "capturing value");
        Self {
            holder: Some(Rc::new(TypedHolder::new(value))),
        }
    }

    /// Creates a variant that holds nothing.
    pub fn empty() -> Self {
        Self { holder: None }
    }

    /// Returns true if the variant holds a value
    pub fn is_valid(&self) -> bool {
        self.holder.is_some()
    }

    /// Releases this variant's share of the value, leaving it invalid.
    ///
    /// Other variants sharing the value are unaffected.
    pub fn reset(&mut self) {
        self.holder = None;
    }

    /// Number of variants sharing this variant's value, 0 when invalid.
    pub fn use_count(&self) -> usize {
        self.holder.as_ref().map_or(0, Rc::strong_count)
    }

    /// Returns true if both variants share the same value.
    ///
    /// Two invalid variants are not considered equal.
    pub fn ptr_eq(&self, other: &Variant) -> bool {
        match (&self.holder, &other.holder) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn holder(&self) -> Result<&dyn TypeHolder, VariantError> {
        self.holder.as_deref().ok_or(VariantError::Invalid)
    }

    /// Returns true for integer, `char` and `bool` payloads
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_integral(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.is_integral())
    }

    /// Returns true for signed integers and floats
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_signed(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.is_signed())
    }

    /// Returns true for unsigned integers, `char` and `bool`
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_unsigned(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.is_unsigned())
    }

    /// Returns true for `f32` and `f64`
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_floating(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.is_floating())
    }

    /// Returns true for raw pointers, `NonNull` and function pointers
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_pointer(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.pointer_kind() != PointerKind::NotPointer)
    }

    /// Returns true for `fn` pointers
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_function_pointer(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.pointer_kind() == PointerKind::Function)
    }

    /// Returns the payload's `IS_MEMBER_DATA_POINTER` declaration
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_member_data_pointer(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.is_member_data_pointer())
    }

    /// Returns the payload's `IS_MEMBER_FUNCTION_POINTER` declaration
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_member_function_pointer(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.is_member_function_pointer())
    }

    /// Returns true for plain-old-data payloads
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_pod(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.is_pod())
    }

    /// Returns true for struct-like payloads
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_class(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.is_class())
    }

    /// Returns true for `union` payloads
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_union(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.is_union())
    }

    /// Returns true for payloads that dispatch through trait objects
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_polymorphic(&self) -> Result<bool, VariantError> {
        Ok(self.holder()?.is_polymorphic())
    }

    /// Size of the stored type in bytes
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn size_of(&self) -> Result<usize, VariantError> {
        Ok(self.holder()?.size_of())
    }

    /// Alignment of the stored type in bytes
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn alignment_of(&self) -> Result<usize, VariantError> {
        Ok(self.holder()?.alignment_of())
    }

    /// The [`TypeId`] of the stored type
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn type_id(&self) -> Result<TypeId, VariantError> {
        Ok(self.holder()?.type_identity())
    }

    /// Human-readable name of the stored type.
    ///
    /// With the `demangle` feature (on by default) module paths are
    /// stripped, so `alloc::vec::Vec<i32>` reads `Vec<i32>`; if the raw name
    /// cannot be shortened the result is an empty string. Without the
    /// feature this is the raw name.
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn type_name(&self) -> Result<String, VariantError> {
        Ok(self.holder()?.type_name())
    }

    /// The raw name of the stored type, as given by [`std::any::type_name`].
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn raw_type_name(&self) -> Result<&'static str, VariantError> {
        Ok(self.holder()?.raw_type_name())
    }

    /// Returns true if `U` has the same name as the stored type.
    ///
    /// The comparison is made on the raw type names, not on [`TypeId`].
    /// Distinct types whose names collide are reported as the same type:
    /// two items named `Marker` declared in different blocks of one function
    /// share the path `crate::function::Marker`, and so do two versions of
    /// one crate linked into the same program. Use [`Variant::type_id`] when
    /// exact identity matters.
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    pub fn is_same<U: ?Sized>(&self) -> Result<bool, VariantError> {
        Ok(type_name::<U>() == self.holder()?.raw_type_name())
    }

    /// Borrows the stored value as `U`.
    ///
    /// Non-pointer payloads require `U` to be the stored type. Pointer
    /// payloads accept any raw pointer `U` of the same size and hand out the
    /// stored address reinterpreted as `U`. A function pointer `U` still has
    /// to be the stored type, and a `NonNull` `U` needs a stored `NonNull`.
    ///
    /// # Errors
    ///
    /// - `VariantError::Invalid` if the variant holds nothing
    /// - `VariantError::TypeMismatch` if `U` is not compatible with the
    ///   stored type
    ///
    /// # Panics
    ///
    /// Panics if the value is currently borrowed through
    /// [`get_mut`](Variant::get_mut) on this or a sharing variant.
    pub fn get<U: TypeTraits>(&self) -> Result<Ref<'_, U>, VariantError> {
        let holder = self.holder()?;
        let cell = holder.cell();
        match route::<U>(holder, false)? {
            Route::Exact => Ref::filter_map(cell.borrow(), |value| value.downcast_ref::<U>())
                .map_err(|_| mismatch::<U>(holder)),
            // SAFETY: `route` only picks this branch when the stored type is a
            // pointer and `U` is a raw pointer with the same size and
            // alignment. Every pointer bit pattern is a valid `*T`, and a
            // `NonNull` `U` is only picked for a stored `NonNull`.
            Route::Reinterpret => Ok(Ref::map(cell.borrow(), |value| unsafe {
                &*(value as *const dyn Any).cast::<U>()
            })),
        }
    }

    /// Mutably borrows the stored value as `U`.
    ///
    /// Follows the rules of [`get`](Variant::get), except that a stored
    /// function pointer can only be borrowed as its own type, and only a
    /// stored nullable raw pointer can be borrowed as another raw pointer.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Variant::get).
    ///
    /// # Panics
    ///
    /// Panics if the value is currently borrowed on this or a sharing
    /// variant.
    pub fn get_mut<U: TypeTraits>(&self) -> Result<RefMut<'_, U>, VariantError> {
        let holder = self.holder()?;
        let cell = holder.cell();
        match route::<U>(holder, true)? {
            Route::Exact => {
                RefMut::filter_map(cell.borrow_mut(), |value| value.downcast_mut::<U>())
                    .map_err(|_| mismatch::<U>(holder))
            }
            // SAFETY: as in `get`, and `route` additionally requires the
            // stored type to accept every address `U` can hold: a nullable
            // raw pointer for a nullable `U`, or a `NonNull` for a `NonNull`.
            Route::Reinterpret => Ok(RefMut::map(cell.borrow_mut(), |value| unsafe {
                &mut *(value as *mut dyn Any).cast::<U>()
            })),
        }
    }

    /// Returns a clone of the stored value as `U`.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Variant::get).
    pub fn get_cloned<U>(&self) -> Result<U, VariantError>
    where
        U: TypeTraits + Clone,
    {
        Ok(self.get::<U>()?.clone())
    }

    /// Runs `f` with read access to the stored value as `U`.
    ///
    /// # Errors
    ///
    /// Same as [`get`](Variant::get).
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`get`](Variant::get). Calling
    /// [`with_mut`](Variant::with_mut) on this or a sharing variant from
    /// inside `f` panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_variant::{Variant, VariantError};
    ///
    /// let v = Variant::new(vec![1, 2, 3]);
    /// let len = v.with(|numbers: &Vec<i32>| numbers.len())?;
    /// assert_eq!(len, 3);
    /// # Ok::<(), VariantError>(())
    /// ```
    pub fn with<U, F, R>(&self, f: F) -> Result<R, VariantError>
    where
        U: TypeTraits,
        F: FnOnce(&U) -> R,
    {
        let value = self.get::<U>()?;
        Ok(f(&value))
    }

    /// Runs `f` with write access to the stored value as `U`.
    ///
    /// # Errors
    ///
    /// Same as [`get_mut`](Variant::get_mut).
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`get_mut`](Variant::get_mut).
    /// Any typed access to this or a sharing variant from inside `f` panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_variant::{Variant, VariantError};
    ///
    /// let v = Variant::new(String::from("hello"));
    /// v.with_mut(|s: &mut String| s.push_str(", world"))?;
    /// assert_eq!(v.to_string(), "hello, world");
    /// # Ok::<(), VariantError>(())
    /// ```
    pub fn with_mut<U, F, R>(&self, f: F) -> Result<R, VariantError>
    where
        U: TypeTraits,
        F: FnOnce(&mut U) -> R,
    {
        let mut value = self.get_mut::<U>()?;
        Ok(f(&mut value))
    }

    /// Writes the stored value to `sink` through its own formatting.
    ///
    /// Unlike [`Display`](fmt::Display), which writes `<invalid>` for an
    /// empty variant, this reports the empty variant to the caller. The inner
    /// result carries the error of `sink` itself, if any.
    ///
    /// # Errors
    ///
    /// Returns `VariantError::Invalid` if the variant holds nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_variant::{Variant, VariantError};
    ///
    /// let mut out = String::new();
    /// Variant::new(2.5f64).write_to(&mut out)?.unwrap();
    /// assert_eq!(out, "2.5");
    ///
    /// assert_eq!(Variant::empty().write_to(&mut out), Err(VariantError::Invalid));
    /// # Ok::<(), VariantError>(())
    /// ```
    pub fn write_to<W>(&self, sink: &mut W) -> Result<fmt::Result, VariantError>
    where
        W: fmt::Write + ?Sized,
    {
        let holder = self.holder()?;
        Ok(write!(sink, "{}", Payload(holder)))
    }

    /// Writes every introspection result to `sink`, one `label: value` per
    /// line. An invalid variant writes `not valid` and nothing else.
    pub fn dump<W: io::Write>(&self, sink: &mut W) -> io::Result<()> {
        let Ok(holder) = self.holder() else {
            return writeln!(sink, "not valid");
        };

        let kind = holder.pointer_kind();
        writeln!(sink, "{:<width$}: {}", "is_valid", true, width = LABEL_WIDTH)?;
        writeln!(sink, "{:<width$}: {:?}", "type_id", holder.type_identity(), width = LABEL_WIDTH)?;
        writeln!(sink, "{:<width$}: {}", "type_name", holder.type_name(), width = LABEL_WIDTH)?;
        writeln!(sink, "{:<width$}: {}", "size_of", holder.size_of(), width = LABEL_WIDTH)?;
        writeln!(sink, "{:<width$}: {}", "alignment_of", holder.alignment_of(), width = LABEL_WIDTH)?;

        let flags = [
            ("is_integral", holder.is_integral()),
            ("is_signed", holder.is_signed()),
            ("is_unsigned", holder.is_unsigned()),
            ("is_floating", holder.is_floating()),
            ("is_pointer", kind != PointerKind::NotPointer),
            ("is_function_pointer", kind == PointerKind::Function),
            ("is_member_data_pointer", holder.is_member_data_pointer()),
            ("is_member_function_pointer", holder.is_member_function_pointer()),
            ("is_pod", holder.is_pod()),
            ("is_class", holder.is_class()),
            ("is_union", holder.is_union()),
            ("is_polymorphic", holder.is_polymorphic()),
        ];
        for (label, value) in flags {
            writeln!(sink, "{:<width$}: {}", label, value, width = LABEL_WIDTH)?;
        }
        Ok(())
    }
}

/// Decides whether `U` may be handed out for the stored type, and how.
fn route<U: TypeTraits>(holder: &dyn TypeHolder, writable: bool) -> Result<Route, VariantError> {
    let stored = holder.pointer_kind();
    let exact = holder.type_identity() == TypeId::of::<U>();

    if stored != PointerKind::NotPointer {
        let same_layout = holder.size_of() == mem::size_of::<U>()
            && holder.alignment_of() == mem::align_of::<U>();
        let relaxed = match U::POINTER_KIND {
            PointerKind::NotPointer => return Err(mismatch::<U>(holder)),
            PointerKind::Data => same_layout && (!writable || stored == PointerKind::Data),
            // A nullable address must never surface as `NonNull`.
            PointerKind::NonNullData => same_layout && stored == PointerKind::NonNullData,
            PointerKind::Function => false,
        };
        return match (exact, relaxed) {
            (true, _) => Ok(Route::Exact),
            (false, true) => Ok(Route::Reinterpret),
            (false, false) => Err(mismatch::<U>(holder)),
        };
    }

    // Names decide first; a name collision between distinct types is
    // still refused here rather than reinterpreting the payload.
    if type_name::<U>() != holder.raw_type_name() || !exact {
        return Err(mismatch::<U>(holder));
    }
    Ok(Route::Exact)
}

fn mismatch<U>(holder: &dyn TypeHolder) -> VariantError {
    let stored = holder.raw_type_name();
    let requested = type_name::<U>();
    trace!(stored = stored, requested = requested, "rejected typed access");
    VariantError::TypeMismatch { stored, requested }
}

/// Displays a holder's payload.
struct Payload<'a>(&'a dyn TypeHolder);

impl fmt::Display for Payload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for Variant {
    /// Writes the stored value through its own formatting.
    ///
    /// An invalid variant writes `<invalid>` and a value that is mutably
    /// borrowed writes `<borrowed>`, so only errors of the underlying writer
    /// are passed on. Use [`Variant::write_to`] to detect an invalid variant.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.holder() {
            Ok(holder) => TypeHolder::fmt(holder, f),
            Err(_) => f.write_str("<invalid>"),
        }
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.holder() {
            Ok(holder) => write!(f, "Variant({})", holder.raw_type_name()),
            Err(_) => f.write_str("Variant(<invalid>)"),
        }
    }
}
