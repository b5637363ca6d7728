//! Attribute IR - immutable metadata nodes attached to IR objects.
//!
//! This crate contains the node model consumed by attribute dispatch,
//! structural equality and structural hashing:
//! - `TypeIndex` runtime type tags (fixed for built-ins, registered for custom kinds)
//! - `DataType` numeric kind/width/lanes
//! - `Attr`, a reference-counted immutable node, and its `AttrKind` variants
//! - `AttrObject`, the reflection capability for user-defined node kinds
//!
//! # Design Philosophy
//!
//! - **Immutable**: nodes are built once and shared through `Arc`
//! - **Identity is cheap**: `Attr::same_as` is a pointer comparison
//! - **Undefined is `None`**: APIs that accept a missing node take `Option<&Attr>`
//!
//! Floats inside nodes are compared and hashed through their bit patterns
//! by downstream algorithms, never through IEEE equality.

mod dtype;
mod node;
mod object;
mod type_index;

pub use dtype::{DataType, TypeCode};
pub use node::{
    Attr, AttrKind, BinaryExpr, CallExpr, CallType, CastExpr, FloatImm, IntImm, NotExpr,
    SelectExpr, StrMap, StringImm, Var,
};
pub use object::{AttrObject, Field, FieldList, FieldValue};
pub use type_index::{TypeIndex, TypeRegistryError};
