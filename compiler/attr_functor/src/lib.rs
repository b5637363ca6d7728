//! Attribute functors.
//!
//! Single dispatch over attribute nodes keyed by their runtime `TypeIndex`,
//! and the two algorithms built on it:
//! - [`AttrsEqual`]: deep structural equality
//! - [`AttrsHash`]: structural hashing, consistent with `AttrsEqual`
//!
//! # Dispatch
//!
//! A visitor implements [`AttrFunctor`]. Its only required method is
//! `visit_default`; every per-variant method falls back to it. The first
//! `visit` on a visitor type builds that type's [`DispatchTable`] once; once
//! a thread has resolved the table, its later visits take no lock.
//!
//! # Policies
//!
//! - Arrays, operator operands and call arguments compare and hash in order.
//!   `Add(x, 1)` and `Add(1, x)` are different attributes.
//! - String maps compare by key set and hash with an order-insensitive sum.
//! - `SizeVar` is compared and hashed as `Var`.
//! - Undefined (`None`) equals only undefined and hashes to `0`.

mod dispatch;
mod equal;
mod functor;
mod hash;
mod key;

pub use dispatch::{DispatchError, DispatchTable, DispatchTableBuilder, Handler};
pub use equal::{attrs_equal, AttrsEqual};
pub use functor::AttrFunctor;
pub use hash::{attrs_hash, combine, type_salt, AttrsHash};
pub use key::AttrKey;
