//! Runtime type indices for attribute nodes.
//!
//! Every node carries a `TypeIndex` that dispatch tables are keyed by.
//! Built-in variants have fixed indices (and therefore never touch the
//! registry on the hot path). User-defined node kinds call
//! [`TypeIndex::register`] with a stable key and receive the next free index.
//!
//! # Thread Safety
//! The registry is a process-wide `RwLock`. Lookups of an already registered
//! key take the read lock only; the write lock is taken once per new key.

use std::fmt;
use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Runtime type tag of an attribute node.
///
/// Only obtainable through the built-in constants or [`TypeIndex::register`],
/// so every `TypeIndex` value has a key.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TypeIndex(u32);

/// Keys of the built-in variants, indexed by their `TypeIndex`.
const BUILTIN_KEYS: [&str; TypeIndex::FIRST_DYNAMIC as usize] = [
    "IntImm",
    "FloatImm",
    "StringImm",
    "Array",
    "StrMap",
    "Var",
    "SizeVar",
    "Add",
    "Sub",
    "Mul",
    "Div",
    "Mod",
    "FloorDiv",
    "FloorMod",
    "Min",
    "Max",
    "GE",
    "GT",
    "LT",
    "LE",
    "EQ",
    "NE",
    "And",
    "Or",
    "Not",
    "Cast",
    "Call",
    "Select",
];

impl TypeIndex {
    // Leaves
    pub const INT_IMM: TypeIndex = TypeIndex(0);
    pub const FLOAT_IMM: TypeIndex = TypeIndex(1);
    pub const STRING_IMM: TypeIndex = TypeIndex(2);

    // Containers
    pub const ARRAY: TypeIndex = TypeIndex(3);
    pub const STR_MAP: TypeIndex = TypeIndex(4);

    // Symbols
    pub const VAR: TypeIndex = TypeIndex(5);
    pub const SIZE_VAR: TypeIndex = TypeIndex(6);

    // Arithmetic
    pub const ADD: TypeIndex = TypeIndex(7);
    pub const SUB: TypeIndex = TypeIndex(8);
    pub const MUL: TypeIndex = TypeIndex(9);
    pub const DIV: TypeIndex = TypeIndex(10);
    pub const MOD: TypeIndex = TypeIndex(11);
    pub const FLOOR_DIV: TypeIndex = TypeIndex(12);
    pub const FLOOR_MOD: TypeIndex = TypeIndex(13);
    pub const MIN: TypeIndex = TypeIndex(14);
    pub const MAX: TypeIndex = TypeIndex(15);

    // Comparison and logic
    pub const GE: TypeIndex = TypeIndex(16);
    pub const GT: TypeIndex = TypeIndex(17);
    pub const LT: TypeIndex = TypeIndex(18);
    pub const LE: TypeIndex = TypeIndex(19);
    pub const EQ: TypeIndex = TypeIndex(20);
    pub const NE: TypeIndex = TypeIndex(21);
    pub const AND: TypeIndex = TypeIndex(22);
    pub const OR: TypeIndex = TypeIndex(23);
    pub const NOT: TypeIndex = TypeIndex(24);

    // Other expressions
    pub const CAST: TypeIndex = TypeIndex(25);
    pub const CALL: TypeIndex = TypeIndex(26);
    pub const SELECT: TypeIndex = TypeIndex(27);

    /// First index handed out to registered (non built-in) kinds.
    pub const FIRST_DYNAMIC: u32 = 28;

    /// Largest index the registry will hand out.
    ///
    /// Dispatch tables are dense vectors indexed by `TypeIndex`, so the
    /// index space is kept small.
    pub const MAX_INDEX: u32 = 0xFFFF;

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position of this type in a dense dispatch table.
    #[inline]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-registered built-in variants.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    /// The key this index was registered under (e.g. `"Add"`).
    pub fn key(self) -> &'static str {
        if let Some(key) = BUILTIN_KEYS.get(self.slot()) {
            return key;
        }
        registry()
            .read()
            .keys
            .get(self.slot())
            .copied()
            .unwrap_or("<unregistered>")
    }

    /// Look up the index of an already registered key.
    pub fn lookup(key: &str) -> Option<TypeIndex> {
        registry().read().by_key.get(key).copied()
    }

    /// Register a node kind under `key`, or return its existing index.
    ///
    /// Idempotent: the same key always maps to the same index. Built-in keys
    /// are reserved for the `AttrKind` variants and are rejected.
    pub fn try_register(key: &'static str) -> Result<TypeIndex, TypeRegistryError> {
        let registry = registry();

        // Fast path: already registered
        {
            let guard = registry.read();
            if let Some(&index) = guard.by_key.get(key) {
                return Self::existing(key, index);
            }
        }

        let mut guard = registry.write();

        // Double-check after acquiring write lock
        if let Some(&index) = guard.by_key.get(key) {
            return Self::existing(key, index);
        }

        let count = guard.keys.len();
        let raw = u32::try_from(count)
            .ok()
            .filter(|&raw| raw <= Self::MAX_INDEX)
            .ok_or(TypeRegistryError::Overflow {
                key,
                count,
                max: Self::MAX_INDEX,
            })?;

        let index = TypeIndex(raw);
        guard.keys.push(key);
        guard.by_key.insert(key, index);
        tracing::debug!(key, index = raw, "registered attribute type");
        Ok(index)
    }

    fn existing(key: &'static str, index: TypeIndex) -> Result<TypeIndex, TypeRegistryError> {
        if index.is_builtin() {
            return Err(TypeRegistryError::Builtin { key });
        }
        Ok(index)
    }

    /// Register a node kind under `key`, or return its existing index.
    ///
    /// # Panics
    /// Panics if `key` is a built-in key or the registry index space is
    /// exhausted.
    /// Use `try_register` for fallible registration.
    pub fn register(key: &'static str) -> TypeIndex {
        Self::try_register(key).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl fmt::Debug for TypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeIndex({}: {})", self.0, self.key())
    }
}

impl fmt::Display for TypeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error when registering a node kind fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeRegistryError {
    /// No index left for a new key.
    #[error("type registry exceeded capacity registering `{key}`: {count} types, max index is {max}")]
    Overflow {
        key: &'static str,
        count: usize,
        max: u32,
    },
    /// The key names a built-in variant.
    #[error("`{key}` is a built-in attribute type and cannot be registered")]
    Builtin { key: &'static str },
}

/// Key ↔ index mapping for every known node kind.
struct TypeRegistry {
    by_key: FxHashMap<&'static str, TypeIndex>,
    /// Keys by index; built-ins occupy `0..FIRST_DYNAMIC`.
    keys: Vec<&'static str>,
}

impl TypeRegistry {
    fn with_builtins() -> Self {
        let mut by_key = FxHashMap::default();
        for (raw, key) in (0u32..).zip(BUILTIN_KEYS) {
            by_key.insert(key, TypeIndex(raw));
        }
        TypeRegistry {
            by_key,
            keys: BUILTIN_KEYS.to_vec(),
        }
    }
}

static REGISTRY: OnceLock<RwLock<TypeRegistry>> = OnceLock::new();

fn registry() -> &'static RwLock<TypeRegistry> {
    REGISTRY.get_or_init(|| RwLock::new(TypeRegistry::with_builtins()))
}

#[cfg(test)]
mod tests;
