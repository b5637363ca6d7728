//! Tests for structural hashing.

#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use std::any::Any;
use std::sync::OnceLock;

use attr_ir::{DataType, Field, FieldList};
use pretty_assertions::{assert_eq, assert_ne};
use smallvec::smallvec;

use super::*;
use crate::attrs_equal;

#[derive(Debug)]
struct StridesAttrs {
    strides: Attr,
    dilate: i64,
}

impl AttrObject for StridesAttrs {
    fn type_index(&self) -> TypeIndex {
        static INDEX: OnceLock<TypeIndex> = OnceLock::new();
        *INDEX.get_or_init(|| TypeIndex::register("test.hash.StridesAttrs"))
    }

    fn fields(&self) -> FieldList<'_> {
        smallvec![
            Field::new("strides", FieldValue::Attr(Some(&self.strides))),
            Field::new("dilate", FieldValue::Int(self.dilate)),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn strides(values: &[i64], dilate: i64) -> Attr {
    Attr::object(StridesAttrs {
        strides: Attr::array(values.iter().copied().map(Attr::int)),
        dilate,
    })
}

fn h(node: &Attr) -> u64 {
    attrs_hash(node)
}

/// `Call("f", [Var("x"), IntImm(2)])`
fn call_f() -> Attr {
    Attr::call("f", [Attr::var("x"), Attr::int(2)])
}

#[test]
fn combine_is_order_dependent() {
    assert_ne!(combine(1, 2), combine(2, 1));
    assert_eq!(combine(1, 2), combine(1, 2));
}

#[test]
fn type_salts_are_distinct_for_builtins() {
    let salts: Vec<u64> = BUILTIN_KEYS
        .iter()
        .map(|key| type_salt(TypeIndex::lookup(key).unwrap()))
        .collect();
    assert_eq!(salts.len(), TypeIndex::FIRST_DYNAMIC as usize);
    for (i, a) in salts.iter().enumerate() {
        for b in &salts[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

const BUILTIN_KEYS: [&str; 28] = [
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

#[test]
fn undefined_hashes_to_zero() {
    assert_eq!(AttrsHash::new().hash(None), 0);
}

#[test]
fn call_scenario_is_consistent_and_idempotent() {
    let a = call_f();
    let b = call_f();
    assert!(attrs_equal(&a, &b));
    assert_eq!(h(&a), h(&b));
    assert_eq!(h(&a), h(&a));

    let mut hasher = AttrsHash::new();
    let first = hasher.hash(Some(&a));
    let second = hasher.hash(Some(&a));
    assert_eq!(first, second);
}

#[test]
fn equal_trees_hash_equal() {
    let build = || {
        Attr::select(
            Attr::ge(Attr::var("i"), Attr::int(0)),
            Attr::str_map([("pad", Attr::array([Attr::int(1), Attr::int(1)]))]),
            Attr::cast(DataType::FLOAT32, Attr::float(0.5)),
        )
    };
    assert_eq!(h(&build()), h(&build()));
}

#[test]
fn leaves_hash_value_and_dtype() {
    assert_ne!(h(&Attr::int(1)), h(&Attr::int(2)));
    assert_ne!(
        h(&Attr::int_imm(DataType::INT32, 1)),
        h(&Attr::int_imm(DataType::INT64, 1))
    );
    assert_ne!(h(&Attr::int(1)), h(&Attr::float(1.0)));
    assert_ne!(h(&Attr::float(0.0)), h(&Attr::float(-0.0)));
    assert_eq!(h(&Attr::float(f64::NAN)), h(&Attr::float(f64::NAN)));
    assert_ne!(h(&Attr::string("a")), h(&Attr::string("b")));
}

#[test]
fn array_hash_is_order_sensitive() {
    let forward = Attr::array([Attr::int(1), Attr::int(2)]);
    let backward = Attr::array([Attr::int(2), Attr::int(1)]);
    assert_ne!(h(&forward), h(&backward));
}

#[test]
fn nested_empty_arrays_hash_differently() {
    let empty = Attr::array(Vec::new());
    let nested = Attr::array([Attr::array(Vec::new())]);
    assert_ne!(h(&empty), h(&nested));
}

#[test]
fn str_map_hash_ignores_insertion_order() {
    let ab = Attr::str_map([("a", Attr::int(1)), ("b", Attr::int(2))]);
    let ba = Attr::str_map([("b", Attr::int(2)), ("a", Attr::int(1))]);
    assert_eq!(h(&ab), h(&ba));
}

#[test]
fn str_map_hash_binds_values_to_keys() {
    let ab = Attr::str_map([("a", Attr::int(1)), ("b", Attr::int(2))]);
    let swapped = Attr::str_map([("a", Attr::int(2)), ("b", Attr::int(1))]);
    assert_ne!(h(&ab), h(&swapped));
}

#[test]
fn binary_hash_is_positional_and_typed() {
    let x = Attr::var("x");
    let one = Attr::int(1);
    let add = Attr::add(x.clone(), one.clone());
    assert_ne!(h(&add), h(&Attr::add(one.clone(), x.clone())));
    assert_ne!(h(&add), h(&Attr::sub(x.clone(), one.clone())));
    assert_ne!(h(&Attr::lt(x.clone(), one.clone())), h(&Attr::gt(one, x)));
}

#[test]
fn size_var_hashes_as_var() {
    assert_eq!(h(&Attr::size_var("n")), h(&Attr::var("n")));
    assert_ne!(h(&Attr::var("n")), h(&Attr::var("m")));
    assert_ne!(
        h(&Attr::var("n")),
        h(&Attr::var_typed("n", DataType::INT64))
    );
}

#[test]
fn call_hash_covers_name_and_args() {
    assert_ne!(h(&call_f()), h(&Attr::call("g", [Attr::var("x"), Attr::int(2)])));
    assert_ne!(h(&call_f()), h(&Attr::call("f", [Attr::int(2), Attr::var("x")])));
}

#[test]
fn object_hash_follows_fields() {
    assert_eq!(h(&strides(&[1, 2], 1)), h(&strides(&[1, 2], 1)));
    assert_ne!(h(&strides(&[1, 2], 1)), h(&strides(&[2, 1], 1)));
    assert_ne!(h(&strides(&[1, 2], 1)), h(&strides(&[1, 2], 2)));
}

#[test]
fn object_hash_differs_from_its_field_hash() {
    let array = Attr::array([Attr::int(1), Attr::int(2)]);
    assert_ne!(h(&strides(&[1, 2], 1)), h(&array));
}

#[test]
fn default_path_hashes_builtins_by_salt_only() {
    let mut hasher = AttrsHash::new();
    let a = Attr::int(1);
    let b = Attr::int(2);
    assert_eq!(hasher.visit_default(&a, ()), type_salt(TypeIndex::INT_IMM));
    assert_eq!(hasher.visit_default(&a, ()), hasher.visit_default(&b, ()));
    assert_eq!(
        hasher.visit_default(&strides(&[2, 2], 1), ()),
        h(&strides(&[2, 2], 1))
    );
}

#[test]
fn deep_nesting_does_not_overflow() {
    let build = || {
        let mut node = Attr::int(0);
        for i in 0..100_000 {
            node = Attr::add(node, Attr::int(i));
        }
        node
    };
    let a = build();
    let b = build();
    assert_eq!(h(&a), h(&b));

    // Teardown recurses once per level.
    std::thread::Builder::new()
        .stack_size(512 * 1024 * 1024)
        .spawn(move || drop((a, b)))
        .unwrap()
        .join()
        .unwrap();
}
