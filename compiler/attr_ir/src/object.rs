//! Reflection capability for user-defined attribute kinds.
//!
//! Operator attribute structs (layouts, strides, padding, ...) live outside
//! the built-in variant set. They enter an attribute tree as
//! `AttrKind::Object` and expose their declared fields through
//! [`AttrObject::fields`], which is all the generic equality and hashing
//! paths need. Kinds whose equality is looser than field-by-field (say, a
//! case-insensitive layout) override [`AttrObject::structural_eq`] and
//! [`AttrObject::structural_hash`] together.
//!
//! # Example
//!
//! ```text
//! #[derive(Debug)]
//! struct PoolAttrs {
//!     layout: String,
//!     pool_size: Attr,
//! }
//!
//! impl AttrObject for PoolAttrs {
//!     fn type_index(&self) -> TypeIndex {
//!         static INDEX: OnceLock<TypeIndex> = OnceLock::new();
//!         *INDEX.get_or_init(|| TypeIndex::register("relay.attrs.PoolAttrs"))
//!     }
//!
//!     fn fields(&self) -> FieldList<'_> {
//!         smallvec![
//!             Field::new("layout", FieldValue::Str(&self.layout)),
//!             Field::new("pool_size", FieldValue::Attr(Some(&self.pool_size))),
//!         ]
//!     }
//!
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;

use smallvec::SmallVec;

use crate::{Attr, DataType, TypeIndex};

/// Declared fields of an object, in declaration order.
pub type FieldList<'a> = SmallVec<[Field<'a>; 4]>;

/// A user-defined attribute kind.
///
/// Implementors must be immutable once wrapped in an `Attr`, and must
/// report fields in the same order on every call.
pub trait AttrObject: Any + Send + Sync + fmt::Debug {
    /// Runtime type index, obtained from `TypeIndex::register`.
    ///
    /// Built-in indices belong to the `AttrKind` variants; reporting one
    /// here is a misuse and trips a debug assertion in `Attr::object`.
    fn type_index(&self) -> TypeIndex;

    /// Declared fields as name/value pairs.
    fn fields(&self) -> FieldList<'_>;

    /// Precise comparison with `other`, which has the same type index.
    ///
    /// `None` (the default) falls back to comparing [`fields`](Self::fields)
    /// pairwise. An override compares node-valued data through `equal`, must
    /// be symmetric, and must come with a matching
    /// [`structural_hash`](Self::structural_hash): objects it calls equal
    /// have to hash equal.
    fn structural_eq(
        &self,
        _other: &dyn AttrObject,
        _equal: &mut dyn FnMut(Option<&Attr>, Option<&Attr>) -> bool,
    ) -> Option<bool> {
        None
    }

    /// Precise hash, consistent with [`structural_eq`](Self::structural_eq).
    ///
    /// Node-valued data is hashed through `hash`. The type salt is folded in
    /// by the caller. `None` (the default) hashes declared fields.
    fn structural_hash(&self, _hash: &mut dyn FnMut(Option<&Attr>) -> u64) -> Option<u64> {
        None
    }

    /// Upcast for `Attr::downcast_object`.
    fn as_any(&self) -> &dyn Any;
}

/// One declared field of an [`AttrObject`].
#[derive(Copy, Clone, Debug)]
pub struct Field<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    #[inline]
    pub fn new(name: &'static str, value: FieldValue<'a>) -> Self {
        Field { name, value }
    }
}

/// Runtime value of a declared field.
#[derive(Copy, Clone, Debug)]
pub enum FieldValue<'a> {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Str(&'a str),
    DataType(DataType),
    /// Node-valued field; `None` when the field is unset.
    Attr(Option<&'a Attr>),
}
