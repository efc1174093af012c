//! Per-type capability registry.
//!
//! Every value type stored in a Vessel container carries a [`TraitRecord`]
//! through the [`TypeTraits`] trait. Bulk operations consult the record at
//! compile time to pick a fast path: a plain byte copy for POD types, a
//! skipped destructor loop for trivially destructible types.
//!
//! Scalars, raw pointers and shared references are registered as POD.
//! Tuples (up to twelve fields) and fixed-size arrays derive their record
//! from their components. Other types opt in either with
//! [`conservative_traits!`](crate::conservative_traits), which needs no
//! `unsafe` at the call site and selects only the slow, per-element
//! paths, or with an `unsafe impl` that claims facts.
//!
//! ```
//! use vessel_core::{TraitRecord, TypeTraits};
//!
//! #[derive(Clone, Copy)]
//! struct Rgb(u8, u8, u8);
//!
//! // SAFETY: `Rgb` is `Copy` and has no drop glue.
//! unsafe impl TypeTraits for Rgb {
//!     const TRAITS: TraitRecord = TraitRecord::POD;
//! }
//!
//! struct Label(String);
//!
//! // SAFETY: claims nothing; every fact stays conservative.
//! unsafe impl TypeTraits for Label {}
//!
//! assert!(vessel_core::type_traits::traits_of::<Rgb>().is_pod);
//! assert!(!vessel_core::type_traits::traits_of::<Label>().trivial_destructor);
//! ```

#![allow(unsafe_code)]

use std::marker::PhantomData;

/// Five independent capability facts about a value type, plus a marker
/// for raw character types.
///
/// `is_pod` implies the four `trivial_*` facts, and `char_like` implies
/// `is_pod`. [`traits_of`] rejects inconsistent records at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraitRecord {
    /// A default value is all-zero bytes with no side effects.
    pub trivial_default_constructor: bool,
    /// A bitwise copy is equivalent to `Clone::clone`.
    pub trivial_copy_constructor: bool,
    /// A bitwise overwrite is equivalent to `Clone::clone_from`.
    pub trivial_assignment: bool,
    /// Skipping the destructor has no observable effect.
    pub trivial_destructor: bool,
    /// Plain old data: all of the above hold.
    pub is_pod: bool,
    /// A raw character type (`u8`, `i8`, `char`). Destruction of these is
    /// always a no-op and copies always take the byte-move path.
    pub char_like: bool,
}

impl TraitRecord {
    /// Every fact false. The default for unregistered types.
    pub const CONSERVATIVE: TraitRecord = TraitRecord::new(false, false, false, false, false);

    /// Every fact true. Built-in scalars and raw pointers.
    pub const POD: TraitRecord = TraitRecord::new(true, true, true, true, true);

    /// POD plus the character marker.
    pub const CHAR: TraitRecord = TraitRecord {
        char_like: true,
        ..TraitRecord::POD
    };

    /// Build a record from the five facts. `char_like` is always false;
    /// use [`TraitRecord::CHAR`] for character types.
    pub const fn new(
        trivial_default_constructor: bool,
        trivial_copy_constructor: bool,
        trivial_assignment: bool,
        trivial_destructor: bool,
        is_pod: bool,
    ) -> Self {
        Self {
            trivial_default_constructor,
            trivial_copy_constructor,
            trivial_assignment,
            trivial_destructor,
            is_pod,
            char_like: false,
        }
    }

    /// The facts that hold for both records. A compound value is only as
    /// trivial as its least trivial component; `char_like` never carries
    /// over.
    pub const fn meet(self, other: TraitRecord) -> TraitRecord {
        TraitRecord::new(
            self.trivial_default_constructor && other.trivial_default_constructor,
            self.trivial_copy_constructor && other.trivial_copy_constructor,
            self.trivial_assignment && other.trivial_assignment,
            self.trivial_destructor && other.trivial_destructor,
            self.is_pod && other.is_pod,
        )
    }

    /// Whether the implications between facts hold.
    pub const fn is_consistent(&self) -> bool {
        let pod_ok = !self.is_pod
            || (self.trivial_default_constructor
                && self.trivial_copy_constructor
                && self.trivial_assignment
                && self.trivial_destructor);
        let char_ok = !self.char_like || self.is_pod;
        pod_ok && char_ok
    }
}

impl Default for TraitRecord {
    fn default() -> Self {
        Self::CONSERVATIVE
    }
}

/// Registry entry for a value type.
///
/// The default record is [`TraitRecord::CONSERVATIVE`], so an empty impl
/// opts a type into the containers with only slow paths enabled.
///
/// # Safety
///
/// Bulk operations trust the record without further checks:
///
/// - `trivial_copy_constructor` or `is_pod`: a bitwise copy of a value must
///   be a valid, independent value, exactly as if the type were `Copy`.
/// - `trivial_assignment`: overwriting a live value with a bitwise copy of
///   another must be equivalent to `clone_from`, and the overwritten value
///   must not need dropping.
/// - `trivial_destructor`: the type must have no drop glue worth running.
///
/// Claiming a fact that does not hold leads to double drops or aliasing
/// of owned resources.
pub unsafe trait TypeTraits {
    /// The capability record for this type.
    const TRAITS: TraitRecord = TraitRecord::CONSERVATIVE;
}

struct Checked<T: ?Sized>(PhantomData<T>);

impl<T: TypeTraits + ?Sized> Checked<T> {
    const RECORD: TraitRecord = {
        assert!(
            T::TRAITS.is_consistent(),
            "inconsistent TraitRecord: is_pod requires every trivial fact, char_like requires is_pod"
        );
        T::TRAITS
    };
}

/// The record for `T`, validated at compile time.
///
/// Fast paths read facts through this function rather than `T::TRAITS`
/// so that an inconsistent record fails the build at the first use.
pub const fn traits_of<T: TypeTraits + ?Sized>() -> TraitRecord {
    Checked::<T>::RECORD
}

/// Register types with a conservative (all-false) record.
///
/// The generated impl claims nothing, so it is sound for any type and the
/// calling crate writes no `unsafe` of its own.
///
/// ```
/// #![deny(unsafe_code)]
///
/// struct Token(String);
/// struct Span(usize, usize);
/// vessel_core::conservative_traits!(Token, Span);
/// assert!(!vessel_core::type_traits::traits_of::<Span>().is_pod);
/// ```
#[macro_export]
macro_rules! conservative_traits {
    ($($ty:ty),* $(,)?) => {
        $(
            // SAFETY: a conservative record claims nothing.
            unsafe impl $crate::type_traits::TypeTraits for $ty {}
        )*
    };
}

macro_rules! registered {
    ($record:expr => $($ty:ty),* $(,)?) => {
        $(
            // SAFETY: built-in scalars are `Copy` with no drop glue.
            unsafe impl TypeTraits for $ty {
                const TRAITS: TraitRecord = $record;
            }
        )*
    };
}

registered!(TraitRecord::CHAR => u8, i8, char);
registered!(
    TraitRecord::POD =>
    u16, u32, u64, u128, usize,
    i16, i32, i64, i128, isize,
    f32, f64, bool, (),
);

// SAFETY: raw pointers are `Copy` and never own their pointee.
unsafe impl<T: ?Sized> TypeTraits for *const T {
    const TRAITS: TraitRecord = TraitRecord::POD;
}

// SAFETY: as above.
unsafe impl<T: ?Sized> TypeTraits for *mut T {
    const TRAITS: TraitRecord = TraitRecord::POD;
}

// SAFETY: shared references are `Copy` and never own their referent.
unsafe impl<T: ?Sized> TypeTraits for &T {
    const TRAITS: TraitRecord = TraitRecord::POD;
}

// SAFETY: a unique reference has no drop glue, but a bitwise copy would
// alias it, so only the destructor fact is claimed.
unsafe impl<T: ?Sized> TypeTraits for &mut T {
    const TRAITS: TraitRecord = TraitRecord::new(false, false, false, true, false);
}

// SAFETY: an array is bitwise copyable, assignable and droppable exactly
// when its element is. An all-zero array is all-zero elements.
unsafe impl<T: TypeTraits, const N: usize> TypeTraits for [T; N] {
    const TRAITS: TraitRecord = T::TRAITS.meet(TraitRecord::POD);
}

macro_rules! tuple_traits {
    ($first:ident $(, $rest:ident)*) => {
        // SAFETY: tuple clone, assignment and drop are field by field, so
        // each fact holds when it holds for every field.
        unsafe impl<$first: TypeTraits $(, $rest: TypeTraits)*> TypeTraits for ($first, $($rest,)*) {
            const TRAITS: TraitRecord = $first::TRAITS $(.meet($rest::TRAITS))*.meet(TraitRecord::POD);
        }
    };
}

tuple_traits!(A);
tuple_traits!(A, B);
tuple_traits!(A, B, C);
tuple_traits!(A, B, C, D);
tuple_traits!(A, B, C, D, E);
tuple_traits!(A, B, C, D, E, F);
tuple_traits!(A, B, C, D, E, F, G);
tuple_traits!(A, B, C, D, E, F, G, H);
tuple_traits!(A, B, C, D, E, F, G, H, I);
tuple_traits!(A, B, C, D, E, F, G, H, I, J);
tuple_traits!(A, B, C, D, E, F, G, H, I, J, K);
tuple_traits!(A, B, C, D, E, F, G, H, I, J, K, L);

// Owning standard types: registered so they can be stored, but every fact
// stays false.
conservative_traits!(String, std::ffi::CString, std::path::PathBuf, std::ffi::OsString);
unsafe impl<T> TypeTraits for Vec<T> {}
unsafe impl<T: ?Sized> TypeTraits for Box<T> {}
unsafe impl<T> TypeTraits for Option<T> {}
unsafe impl<T: ?Sized> TypeTraits for std::rc::Rc<T> {}
unsafe impl<T: ?Sized> TypeTraits for std::sync::Arc<T> {}
