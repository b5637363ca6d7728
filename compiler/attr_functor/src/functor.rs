//! The attribute visitor trait.
//!
//! # Design
//!
//! `AttrFunctor` is generic over its result (`Output`) and one extra
//! argument (`Arg<'a>`), so the same dispatch serves `(node, other) -> bool`
//! for equality and `(node, ()) -> u64` for hashing.
//!
//! Every `visit_*` method defaults to [`AttrFunctor::visit_default`], the
//! only required method. A visitor overrides just the variants it cares
//! about. Adding a new built-in variant means adding one defaulting method
//! here and one registration line in the dispatch table; existing visitors
//! keep compiling and route the new variant to their default.
//!
//! # Example
//!
//! ```text
//! struct CountVars(usize);
//!
//! impl AttrFunctor for CountVars {
//!     type Output = ();
//!     type Arg<'a> = ();
//!
//!     fn visit_default<'a>(&mut self, _node: &'a Attr, (): ()) {}
//!
//!     fn visit_var<'a>(&mut self, _node: &'a Attr, _op: &'a Var, (): ()) {
//!         self.0 += 1;
//!     }
//! }
//! ```

use attr_ir::{
    Attr, BinaryExpr, CallExpr, CastExpr, FloatImm, IntImm, NotExpr, SelectExpr, StrMap,
    StringImm, Var,
};

use crate::{DispatchTable, DispatchTableBuilder};

/// Visitor over attribute nodes with per-variant dispatch.
///
/// `node` is always the visited node itself; `op` is its variant payload.
pub trait AttrFunctor: Sized + 'static {
    /// Result of visiting a node.
    type Output;

    /// Extra argument threaded through every visit.
    type Arg<'a>;

    /// Dispatch on `node`'s runtime type.
    ///
    /// Looks up this visitor type's table (built on first use) and calls the
    /// registered handler, or `visit_default` for unregistered types.
    fn visit<'a>(&mut self, node: &'a Attr, arg: Self::Arg<'a>) -> Self::Output {
        DispatchTable::<Self>::global().dispatch(self, node, arg)
    }

    /// Fallback for every node without a more specific override.
    fn visit_default<'a>(&mut self, node: &'a Attr, arg: Self::Arg<'a>) -> Self::Output;

    /// Register handlers for user-defined node kinds.
    ///
    /// Called once, while this visitor type's table is being built. Must not
    /// visit attributes with a visitor of this same type, whose table does
    /// not exist yet.
    fn register_extensions(table: &mut DispatchTableBuilder<Self>) {
        let _ = table;
    }

    // Leaves

    fn visit_int_imm<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a IntImm,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_float_imm<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a FloatImm,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_string_imm<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a StringImm,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    // Containers

    fn visit_array<'a>(
        &mut self,
        node: &'a Attr,
        _items: &'a [Attr],
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_str_map<'a>(
        &mut self,
        node: &'a Attr,
        _map: &'a StrMap,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    // Symbols

    fn visit_var<'a>(&mut self, node: &'a Attr, _op: &'a Var, arg: Self::Arg<'a>) -> Self::Output {
        self.visit_default(node, arg)
    }

    /// Size variables are visited as plain variables unless overridden.
    fn visit_size_var<'a>(
        &mut self,
        node: &'a Attr,
        op: &'a Var,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_var(node, op, arg)
    }

    // Arithmetic

    fn visit_add<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_sub<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_mul<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_div<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_mod<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_floor_div<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_floor_mod<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_min<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_max<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    // Comparison and logic

    fn visit_ge<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_gt<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_lt<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_le<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_eq<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_ne<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_and<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_or<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a BinaryExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_not<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a NotExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    // Other expressions

    fn visit_cast<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a CastExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_call<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a CallExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }

    fn visit_select<'a>(
        &mut self,
        node: &'a Attr,
        _op: &'a SelectExpr,
        arg: Self::Arg<'a>,
    ) -> Self::Output {
        self.visit_default(node, arg)
    }
}
