//! Structural hashing of attribute trees.
//!
//! Produces a `u64` that agrees with [`AttrsEqual`](crate::AttrsEqual):
//! structurally equal trees always hash equal.
//!
//! # Strategy
//!
//! For each node:
//! 1. Start from the variant's type salt (hash of its type key), so
//!    `Add(a, b)` and `Sub(a, b)` differ even with identical operands
//! 2. Fold in non-child data (data type, literal bits, names)
//! 3. Fold in child hashes with [`combine`]
//!
//! `combine` is order-dependent, which matches the positional equality of
//! arrays, operands and call arguments. String map entries are summed
//! instead, because map equality ignores iteration order.
//!
//! Salts come from `FxHasher`, which is unseeded, so hashes are stable
//! across runs of the same build.

use std::hash::{Hash, Hasher};

use attr_ir::{
    Attr, AttrObject, BinaryExpr, CallExpr, CastExpr, FieldValue, FloatImm, IntImm, NotExpr,
    SelectExpr, StrMap, StringImm, TypeIndex, Var,
};
use attr_stack::ensure_sufficient_stack;
use rustc_hash::FxHasher;

use crate::AttrFunctor;

/// Mix `rhs` into `lhs` (boost `hash_combine`, 64-bit constant).
///
/// Not commutative: `combine(a, b) != combine(b, a)` in general.
#[inline]
pub const fn combine(lhs: u64, rhs: u64) -> u64 {
    lhs ^ rhs
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(lhs << 6)
        .wrapping_add(lhs >> 2)
}

/// Stable per-type constant folded into every node hash of that type.
pub fn type_salt(index: TypeIndex) -> u64 {
    hash_str(index.key())
}

fn hash_str(s: &str) -> u64 {
    let mut hasher = FxHasher::default();
    s.hash(&mut hasher);
    hasher.finish()
}

/// Reinterpret a signed value's bits.
#[inline]
fn int_bits(value: i64) -> u64 {
    u64::from_ne_bytes(value.to_ne_bytes())
}

/// Lengths are folded in so that nested empty containers stay distinct.
#[inline]
fn len_bits(len: usize) -> u64 {
    len as u64
}

/// Structural hash.
///
/// Stateless; one value can be reused for any number of trees.
#[derive(Copy, Clone, Debug, Default)]
pub struct AttrsHash;

impl AttrsHash {
    pub fn new() -> Self {
        AttrsHash
    }

    /// Hash `node`; undefined hashes to `0`.
    pub fn hash(&mut self, node: Option<&Attr>) -> u64 {
        node.map_or(0, |node| self.hash_node(node))
    }

    fn hash_node(&mut self, node: &Attr) -> u64 {
        ensure_sufficient_stack(|| self.visit(node, ()))
    }

    /// Left-to-right fold of `items` onto `seed`.
    fn hash_seq(&mut self, seed: u64, items: &[Attr]) -> u64 {
        items.iter().fold(combine(seed, len_bits(items.len())), |acc, item| {
            combine(acc, self.hash_node(item))
        })
    }

    fn hash_binary(&mut self, index: TypeIndex, op: &BinaryExpr) -> u64 {
        let a = self.hash_node(&op.a);
        let b = self.hash_node(&op.b);
        combine(type_salt(index), combine(a, b))
    }

    /// Entries are summed, so the result does not depend on map order.
    fn hash_map(&mut self, map: &StrMap) -> u64 {
        let entries = map.iter().fold(0u64, |acc, (key, value)| {
            acc.wrapping_add(combine(hash_str(key), self.hash_node(value)))
        });
        combine(combine(type_salt(TypeIndex::STR_MAP), len_bits(map.len())), entries)
    }

    /// The object's own hash if it has one, else fields in declaration
    /// order: name, then value.
    fn hash_object(&mut self, object: &dyn AttrObject) -> u64 {
        let salt = type_salt(object.type_index());
        if let Some(hash) = object.structural_hash(&mut |node| self.hash(node)) {
            return combine(salt, hash);
        }
        let fields = object.fields();
        let seed = combine(salt, len_bits(fields.len()));
        fields.iter().fold(seed, |acc, field| {
            let acc = combine(acc, hash_str(field.name));
            combine(acc, self.hash_field(field.value))
        })
    }

    /// Each field kind is tagged, matching equality's same-kind requirement.
    fn hash_field(&mut self, value: FieldValue<'_>) -> u64 {
        match value {
            FieldValue::Int(v) => combine(1, int_bits(v)),
            FieldValue::UInt(v) => combine(2, v),
            FieldValue::Float(v) => combine(3, v.to_bits()),
            FieldValue::Bool(v) => combine(4, u64::from(v)),
            FieldValue::Str(v) => combine(5, hash_str(v)),
            FieldValue::DataType(v) => combine(6, v.packed()),
            FieldValue::Attr(v) => combine(7, self.hash(v)),
        }
    }
}

/// Generates the hash of each binary operator from its own type salt.
macro_rules! hash_binary_ops {
    ($($method:ident => $index:ident),* $(,)?) => {
        $(
            fn $method<'a>(&mut self, _node: &'a Attr, op: &'a BinaryExpr, (): ()) -> u64 {
                self.hash_binary(TypeIndex::$index, op)
            }
        )*
    };
}

impl AttrFunctor for AttrsHash {
    type Output = u64;
    type Arg<'a> = ();

    /// Only objects reach here; every built-in variant has its own hash.
    /// Anything else gets its bare type salt, which is coarse but stable.
    fn visit_default<'a>(&mut self, node: &'a Attr, (): ()) -> u64 {
        match node.as_object() {
            Some(object) => self.hash_object(object),
            None => type_salt(node.type_index()),
        }
    }

    fn visit_int_imm<'a>(&mut self, _node: &'a Attr, op: &'a IntImm, (): ()) -> u64 {
        let seed = combine(type_salt(TypeIndex::INT_IMM), op.dtype.packed());
        combine(seed, int_bits(op.value))
    }

    fn visit_float_imm<'a>(&mut self, _node: &'a Attr, op: &'a FloatImm, (): ()) -> u64 {
        let seed = combine(type_salt(TypeIndex::FLOAT_IMM), op.dtype.packed());
        combine(seed, op.value.to_bits())
    }

    fn visit_string_imm<'a>(&mut self, _node: &'a Attr, op: &'a StringImm, (): ()) -> u64 {
        combine(type_salt(TypeIndex::STRING_IMM), hash_str(&op.value))
    }

    fn visit_array<'a>(&mut self, _node: &'a Attr, items: &'a [Attr], (): ()) -> u64 {
        self.hash_seq(type_salt(TypeIndex::ARRAY), items)
    }

    fn visit_str_map<'a>(&mut self, _node: &'a Attr, map: &'a StrMap, (): ()) -> u64 {
        self.hash_map(map)
    }

    /// Shared by `SizeVar`, which compares equal to a same-named `Var`.
    fn visit_var<'a>(&mut self, _node: &'a Attr, op: &'a Var, (): ()) -> u64 {
        let seed = combine(type_salt(TypeIndex::VAR), hash_str(&op.name));
        combine(seed, op.dtype.packed())
    }

    hash_binary_ops! {
        visit_add => ADD,
        visit_sub => SUB,
        visit_mul => MUL,
        visit_div => DIV,
        visit_mod => MOD,
        visit_floor_div => FLOOR_DIV,
        visit_floor_mod => FLOOR_MOD,
        visit_min => MIN,
        visit_max => MAX,
        visit_ge => GE,
        visit_gt => GT,
        visit_lt => LT,
        visit_le => LE,
        visit_eq => EQ,
        visit_ne => NE,
        visit_and => AND,
        visit_or => OR,
    }

    fn visit_not<'a>(&mut self, _node: &'a Attr, op: &'a NotExpr, (): ()) -> u64 {
        combine(type_salt(TypeIndex::NOT), self.hash_node(&op.a))
    }

    fn visit_cast<'a>(&mut self, _node: &'a Attr, op: &'a CastExpr, (): ()) -> u64 {
        let seed = combine(type_salt(TypeIndex::CAST), op.dtype.packed());
        combine(seed, self.hash_node(&op.value))
    }

    fn visit_call<'a>(&mut self, _node: &'a Attr, op: &'a CallExpr, (): ()) -> u64 {
        let mut seed = combine(type_salt(TypeIndex::CALL), hash_str(&op.name));
        seed = combine(seed, op.dtype.packed());
        seed = combine(seed, u64::from(op.call_type as u8));
        self.hash_seq(seed, &op.args)
    }

    fn visit_select<'a>(&mut self, _node: &'a Attr, op: &'a SelectExpr, (): ()) -> u64 {
        let mut hash = combine(type_salt(TypeIndex::SELECT), self.hash_node(&op.condition));
        hash = combine(hash, self.hash_node(&op.true_value));
        combine(hash, self.hash_node(&op.false_value))
    }
}

/// Structural hash of a defined node.
pub fn attrs_hash(node: &Attr) -> u64 {
    AttrsHash::new().hash(Some(node))
}

#[cfg(test)]
mod tests;
