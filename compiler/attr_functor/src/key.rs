//! Structural map keys.
//!
//! `Attr` has no `Eq`/`Hash` of its own; identity and structure are both
//! reasonable notions and callers pick one. [`AttrKey`] picks structure, so
//! two separately built but equal trees land in the same map slot.

use std::hash::{Hash, Hasher};

use attr_ir::Attr;

use crate::{attrs_equal, attrs_hash};

/// An `Attr` wrapper that hashes with [`attrs_hash`] and compares with
/// [`attrs_equal`].
///
/// The structural hash is computed once, on construction.
#[derive(Clone)]
pub struct AttrKey {
    attr: Attr,
    hash: u64,
}

impl AttrKey {
    pub fn new(attr: Attr) -> Self {
        let hash = attrs_hash(&attr);
        AttrKey { attr, hash }
    }

    #[inline]
    pub fn attr(&self) -> &Attr {
        &self.attr
    }

    pub fn into_inner(self) -> Attr {
        self.attr
    }

    /// Cached [`attrs_hash`] of the wrapped node.
    #[inline]
    pub fn structural_hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for AttrKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && attrs_equal(&self.attr, &other.attr)
    }
}

impl Eq for AttrKey {}

impl Hash for AttrKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl From<Attr> for AttrKey {
    fn from(attr: Attr) -> Self {
        AttrKey::new(attr)
    }
}

impl std::fmt::Debug for AttrKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttrKey")
            .field("attr", &self.attr)
            .field("hash", &format_args!("{:#018x}", self.hash))
            .finish()
    }
}

#[cfg(test)]
mod tests;
