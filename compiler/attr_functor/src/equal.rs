//! Structural equality of attribute trees.
//!
//! Dispatch happens on the left-hand node; the right-hand node travels as
//! the visitor argument and each comparator checks its variant first, so a
//! mismatch is `false` and the result is the same whichever side dispatches.
//!
//! User-defined kinds (`AttrKind::Object`) reach `visit_default`, which
//! defers to [`AttrObject::structural_eq`] when the kind provides one and
//! otherwise compares declared fields pairwise through
//! [`AttrObject::fields`].

use attr_ir::{
    Attr, AttrKind, AttrObject, BinaryExpr, CallExpr, CastExpr, FieldValue, FloatImm, IntImm,
    NotExpr, SelectExpr, StrMap, StringImm, Var,
};
use attr_stack::ensure_sufficient_stack;

use crate::AttrFunctor;

/// Deep structural equality.
///
/// An equivalence relation over attribute trees, including undefined
/// (`None`) nodes. Stateless; one value can be reused for any number of
/// comparisons.
#[derive(Copy, Clone, Debug, Default)]
pub struct AttrsEqual;

impl AttrsEqual {
    pub fn new() -> Self {
        AttrsEqual
    }

    /// Check if `lhs` equals `rhs`.
    ///
    /// An undefined `lhs` equals only an undefined `rhs`.
    pub fn equal(&mut self, lhs: Option<&Attr>, rhs: Option<&Attr>) -> bool {
        match (lhs, rhs) {
            (None, rhs) => rhs.is_none(),
            (Some(_), None) => false,
            (Some(lhs), Some(rhs)) => self.equal_nodes(lhs, rhs),
        }
    }

    fn equal_nodes(&mut self, lhs: &Attr, rhs: &Attr) -> bool {
        if lhs.same_as(rhs) {
            return true;
        }
        ensure_sufficient_stack(|| self.visit(lhs, rhs))
    }

    /// Equal length and pairwise equal in order.
    fn equal_seq(&mut self, lhs: &[Attr], rhs: &[Attr]) -> bool {
        lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(l, r)| self.equal_nodes(l, r))
    }

    /// Operands compared position by position, never swapped.
    fn equal_binary(&mut self, lhs: &BinaryExpr, rhs: &BinaryExpr) -> bool {
        self.equal_nodes(&lhs.a, &rhs.a) && self.equal_nodes(&lhs.b, &rhs.b)
    }

    /// Same key set and equal value under every key.
    fn equal_map(&mut self, lhs: &StrMap, rhs: &StrMap) -> bool {
        lhs.len() == rhs.len()
            && lhs
                .iter()
                .all(|(key, l)| rhs.get(key).is_some_and(|r| self.equal_nodes(l, r)))
    }

    fn equal_objects(&mut self, lhs: &dyn AttrObject, rhs: &dyn AttrObject) -> bool {
        if lhs.type_index() != rhs.type_index() {
            return false;
        }
        if let Some(equal) = lhs.structural_eq(rhs, &mut |l, r| self.equal(l, r)) {
            return equal;
        }
        let lhs_fields = lhs.fields();
        let rhs_fields = rhs.fields();
        lhs_fields.len() == rhs_fields.len()
            && lhs_fields
                .iter()
                .zip(rhs_fields.iter())
                .all(|(l, r)| l.name == r.name && self.equal_field(l.value, r.value))
    }

    fn equal_field(&mut self, lhs: FieldValue<'_>, rhs: FieldValue<'_>) -> bool {
        match (lhs, rhs) {
            (FieldValue::Int(l), FieldValue::Int(r)) => l == r,
            (FieldValue::UInt(l), FieldValue::UInt(r)) => l == r,
            (FieldValue::Float(l), FieldValue::Float(r)) => l.to_bits() == r.to_bits(),
            (FieldValue::Bool(l), FieldValue::Bool(r)) => l == r,
            (FieldValue::Str(l), FieldValue::Str(r)) => l == r,
            (FieldValue::DataType(l), FieldValue::DataType(r)) => l == r,
            (FieldValue::Attr(l), FieldValue::Attr(r)) => self.equal(l, r),
            _ => false,
        }
    }
}

/// Generates the comparator of each binary operator: same variant on the
/// right, then positional operand equality.
macro_rules! equal_binary_ops {
    ($($method:ident => $variant:ident),* $(,)?) => {
        $(
            fn $method<'a>(
                &mut self,
                _node: &'a Attr,
                op: &'a BinaryExpr,
                other: &'a Attr,
            ) -> bool {
                match other.kind() {
                    AttrKind::$variant(rhs) => self.equal_binary(op, rhs),
                    _ => false,
                }
            }
        )*
    };
}

impl AttrFunctor for AttrsEqual {
    type Output = bool;
    type Arg<'a> = &'a Attr;

    /// Every built-in variant has its own comparator and identity was
    /// checked before dispatch, so anything but a pair of objects is unequal.
    fn visit_default<'a>(&mut self, node: &'a Attr, other: &'a Attr) -> bool {
        match (node.as_object(), other.as_object()) {
            (Some(lhs), Some(rhs)) => self.equal_objects(lhs, rhs),
            _ => false,
        }
    }

    fn visit_int_imm<'a>(&mut self, _node: &'a Attr, op: &'a IntImm, other: &'a Attr) -> bool {
        match other.kind() {
            AttrKind::IntImm(rhs) => op.dtype == rhs.dtype && op.value == rhs.value,
            _ => false,
        }
    }

    fn visit_float_imm<'a>(&mut self, _node: &'a Attr, op: &'a FloatImm, other: &'a Attr) -> bool {
        match other.kind() {
            AttrKind::FloatImm(rhs) => {
                op.dtype == rhs.dtype && op.value.to_bits() == rhs.value.to_bits()
            }
            _ => false,
        }
    }

    fn visit_string_imm<'a>(
        &mut self,
        _node: &'a Attr,
        op: &'a StringImm,
        other: &'a Attr,
    ) -> bool {
        match other.kind() {
            AttrKind::StringImm(rhs) => op.value == rhs.value,
            _ => false,
        }
    }

    fn visit_array<'a>(&mut self, _node: &'a Attr, items: &'a [Attr], other: &'a Attr) -> bool {
        match other.kind() {
            AttrKind::Array(rhs) => self.equal_seq(items, rhs),
            _ => false,
        }
    }

    fn visit_str_map<'a>(&mut self, _node: &'a Attr, map: &'a StrMap, other: &'a Attr) -> bool {
        match other.kind() {
            AttrKind::StrMap(rhs) => self.equal_map(map, rhs),
            _ => false,
        }
    }

    fn visit_var<'a>(&mut self, _node: &'a Attr, op: &'a Var, other: &'a Attr) -> bool {
        match other.kind() {
            AttrKind::Var(rhs) | AttrKind::SizeVar(rhs) => {
                op.name == rhs.name && op.dtype == rhs.dtype
            }
            _ => false,
        }
    }

    equal_binary_ops! {
        visit_add => Add,
        visit_sub => Sub,
        visit_mul => Mul,
        visit_div => Div,
        visit_mod => Mod,
        visit_floor_div => FloorDiv,
        visit_floor_mod => FloorMod,
        visit_min => Min,
        visit_max => Max,
        visit_ge => Ge,
        visit_gt => Gt,
        visit_lt => Lt,
        visit_le => Le,
        visit_eq => Eq,
        visit_ne => Ne,
        visit_and => And,
        visit_or => Or,
    }

    fn visit_not<'a>(&mut self, _node: &'a Attr, op: &'a NotExpr, other: &'a Attr) -> bool {
        match other.kind() {
            AttrKind::Not(rhs) => self.equal_nodes(&op.a, &rhs.a),
            _ => false,
        }
    }

    fn visit_cast<'a>(&mut self, _node: &'a Attr, op: &'a CastExpr, other: &'a Attr) -> bool {
        match other.kind() {
            AttrKind::Cast(rhs) => {
                op.dtype == rhs.dtype && self.equal_nodes(&op.value, &rhs.value)
            }
            _ => false,
        }
    }

    fn visit_call<'a>(&mut self, _node: &'a Attr, op: &'a CallExpr, other: &'a Attr) -> bool {
        match other.kind() {
            AttrKind::Call(rhs) => {
                op.name == rhs.name
                    && op.dtype == rhs.dtype
                    && op.call_type == rhs.call_type
                    && self.equal_seq(&op.args, &rhs.args)
            }
            _ => false,
        }
    }

    fn visit_select<'a>(&mut self, _node: &'a Attr, op: &'a SelectExpr, other: &'a Attr) -> bool {
        match other.kind() {
            AttrKind::Select(rhs) => {
                self.equal_nodes(&op.condition, &rhs.condition)
                    && self.equal_nodes(&op.true_value, &rhs.true_value)
                    && self.equal_nodes(&op.false_value, &rhs.false_value)
            }
            _ => false,
        }
    }
}

/// Structural equality of two defined nodes.
pub fn attrs_equal(lhs: &Attr, rhs: &Attr) -> bool {
    AttrsEqual::new().equal(Some(lhs), Some(rhs))
}
