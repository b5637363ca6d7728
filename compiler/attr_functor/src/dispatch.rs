//! Per-visitor dispatch tables.
//!
//! A [`DispatchTable`] maps a node's `TypeIndex` to a handler that downcasts
//! the node to its variant payload and calls the matching `visit_*` method.
//! Types without a handler go to `visit_default`.
//!
//! # Lifecycle
//!
//! There is exactly one table per visitor type. It is built the first time
//! any instance of that type visits a node: all built-in variants are
//! registered, then [`AttrFunctor::register_extensions`] adds handlers for
//! user-defined kinds. The finished table is leaked to `'static` and never
//! changes again.
//!
//! # Thread Safety
//!
//! Each visitor type owns a leaked `OnceLock` slot, published through a
//! registry keyed by the visitor's `std::any::TypeId` and guarded by a
//! `parking_lot::RwLock`. The registry lock is held only to find or insert
//! the slot; the table itself is built inside the slot's `OnceLock`, so
//! concurrent first visits build it once and a slow build of one visitor
//! type never holds up lookups of another.
//!
//! Every thread caches resolved tables in a thread-local map, so after the
//! first visit of a type on a thread, dispatch takes no lock at all.

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::sync::OnceLock;

use attr_ir::{Attr, AttrKind, TypeIndex};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::AttrFunctor;

/// A dispatch handler: receives the visitor, the node and the extra argument.
pub type Handler<V> = for<'a> fn(
    &mut V,
    &'a Attr,
    <V as AttrFunctor>::Arg<'a>,
) -> <V as AttrFunctor>::Output;

/// Error when registering a handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// A handler for this type index already exists in the table.
    #[error("dispatch for `{type_key}` is already registered in `{visitor}`")]
    AlreadyRegistered {
        type_key: &'static str,
        visitor: &'static str,
    },
}

/// Immutable type-index → handler table of one visitor type.
pub struct DispatchTable<V: AttrFunctor> {
    /// Dense by `TypeIndex::slot`; `None` means "use `visit_default`".
    handlers: Vec<Option<Handler<V>>>,
}

impl<V: AttrFunctor> DispatchTable<V> {
    /// The table of visitor type `V`, built on first call.
    pub fn global() -> &'static Self {
        let key = TypeId::of::<V>();

        // Fast path: resolved earlier on this thread
        let cached = LOCAL_TABLES.with_borrow(|tables| tables.get(&key).copied());
        if let Some(table) = cached.and_then(|t| t.downcast_ref::<Self>()) {
            return table;
        }

        let table = Self::slot(key).get_or_init(Self::build);
        LOCAL_TABLES.with_borrow_mut(|tables| {
            tables.insert(key, table);
        });
        table
    }

    /// The process-wide slot of `V`'s table, inserted on first call.
    fn slot(key: TypeId) -> &'static OnceLock<Self> {
        let slots = SLOTS.get_or_init(RwLock::default);

        if let Some(slot) = slots
            .read()
            .get(&key)
            .copied()
            .and_then(|s| s.downcast_ref::<OnceLock<Self>>())
        {
            return slot;
        }

        let mut guard = slots.write();

        // Double-check after acquiring write lock
        if let Some(slot) = guard
            .get(&key)
            .copied()
            .and_then(|s| s.downcast_ref::<OnceLock<Self>>())
        {
            return slot;
        }

        let slot: &'static OnceLock<Self> = Box::leak(Box::new(OnceLock::new()));
        guard.insert(key, slot);
        slot
    }

    fn build() -> Self {
        let mut builder = DispatchTableBuilder::with_builtins();
        V::register_extensions(&mut builder);
        let table = builder.finish();
        tracing::debug!(
            visitor = type_name::<V>(),
            handlers = table.len(),
            "built attribute dispatch table"
        );
        table
    }

    /// Call the handler registered for `node`'s type, or `visit_default`.
    #[inline]
    pub fn dispatch<'a>(
        &self,
        visitor: &mut V,
        node: &'a Attr,
        arg: V::Arg<'a>,
    ) -> V::Output {
        match self.handler(node.type_index()) {
            Some(handler) => handler(visitor, node, arg),
            None => visitor.visit_default(node, arg),
        }
    }

    /// Check if a handler is registered for `index`.
    #[inline]
    pub fn can_dispatch(&self, index: TypeIndex) -> bool {
        self.handler(index).is_some()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.iter().filter(|h| h.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn handler(&self, index: TypeIndex) -> Option<Handler<V>> {
        self.handlers.get(index.slot()).copied().flatten()
    }
}

/// Table under construction, handed to [`AttrFunctor::register_extensions`].
pub struct DispatchTableBuilder<V: AttrFunctor> {
    handlers: Vec<Option<Handler<V>>>,
}

/// Registers one built-in variant: downcast to the payload and forward to
/// the visitor method, falling back to `visit_default` on a mismatch.
macro_rules! set_builtin_dispatch {
    ($builder:ident; $($index:ident => $variant:ident => $method:ident),* $(,)?) => {
        $(
            {
                fn handler<'a, V: AttrFunctor>(
                    visitor: &mut V,
                    node: &'a Attr,
                    arg: V::Arg<'a>,
                ) -> V::Output {
                    match node.kind() {
                        AttrKind::$variant(op) => visitor.$method(node, op, arg),
                        _ => visitor.visit_default(node, arg),
                    }
                }
                $builder.set_dispatch(TypeIndex::$index, handler::<V>);
            }
        )*
    };
}

impl<V: AttrFunctor> DispatchTableBuilder<V> {
    fn with_builtins() -> Self {
        let mut builder = DispatchTableBuilder {
            handlers: Vec::with_capacity(TypeIndex::FIRST_DYNAMIC as usize),
        };
        set_builtin_dispatch! {
            builder;
            STR_MAP => StrMap => visit_str_map,
            ARRAY => Array => visit_array,
            INT_IMM => IntImm => visit_int_imm,
            FLOAT_IMM => FloatImm => visit_float_imm,
            STRING_IMM => StringImm => visit_string_imm,
            VAR => Var => visit_var,
            SIZE_VAR => SizeVar => visit_size_var,
            ADD => Add => visit_add,
            SUB => Sub => visit_sub,
            MUL => Mul => visit_mul,
            DIV => Div => visit_div,
            MOD => Mod => visit_mod,
            FLOOR_DIV => FloorDiv => visit_floor_div,
            FLOOR_MOD => FloorMod => visit_floor_mod,
            MIN => Min => visit_min,
            MAX => Max => visit_max,
            GE => Ge => visit_ge,
            GT => Gt => visit_gt,
            LE => Le => visit_le,
            LT => Lt => visit_lt,
            EQ => Eq => visit_eq,
            NE => Ne => visit_ne,
            AND => And => visit_and,
            OR => Or => visit_or,
            NOT => Not => visit_not,
            CAST => Cast => visit_cast,
            CALL => Call => visit_call,
            SELECT => Select => visit_select,
        }
        builder
    }

    /// Register `handler` for nodes of type `index`.
    ///
    /// Fails if `index` already has a handler; a table never silently
    /// replaces one.
    pub fn try_set_dispatch(
        &mut self,
        index: TypeIndex,
        handler: Handler<V>,
    ) -> Result<(), DispatchError> {
        let slot = index.slot();
        if self.handlers.len() <= slot {
            self.handlers.resize(slot + 1, None);
        }
        let entry = &mut self.handlers[slot];
        if entry.is_some() {
            return Err(DispatchError::AlreadyRegistered {
                type_key: index.key(),
                visitor: type_name::<V>(),
            });
        }
        *entry = Some(handler);
        Ok(())
    }

    /// Register `handler` for nodes of type `index`.
    ///
    /// # Panics
    /// Panics if `index` already has a handler. Duplicate registration is a
    /// programming error in the visitor's `register_extensions`.
    pub fn set_dispatch(&mut self, index: TypeIndex, handler: Handler<V>) {
        if let Err(e) = self.try_set_dispatch(index, handler) {
            panic!("{e}");
        }
    }

    /// Check if a handler is already registered for `index`.
    pub fn is_registered(&self, index: TypeIndex) -> bool {
        matches!(self.handlers.get(index.slot()), Some(Some(_)))
    }

    fn finish(self) -> DispatchTable<V> {
        DispatchTable {
            handlers: self.handlers,
        }
    }
}

/// Type-erased `&'static` reference, downcast back by visitor type.
type Erased = &'static (dyn Any + Send + Sync);

/// One leaked `OnceLock<DispatchTable<V>>` per visitor type.
static SLOTS: OnceLock<RwLock<FxHashMap<TypeId, Erased>>> = OnceLock::new();

thread_local! {
    /// Tables this thread has already resolved.
    static LOCAL_TABLES: RefCell<FxHashMap<TypeId, Erased>> =
        RefCell::new(FxHashMap::default());
}
