use pretty_assertions::assert_eq;

use super::*;

#[test]
fn builtin_keys_line_up_with_constants() {
    assert_eq!(TypeIndex::INT_IMM.key(), "IntImm");
    assert_eq!(TypeIndex::STR_MAP.key(), "StrMap");
    assert_eq!(TypeIndex::SIZE_VAR.key(), "SizeVar");
    assert_eq!(TypeIndex::FLOOR_MOD.key(), "FloorMod");
    assert_eq!(TypeIndex::NE.key(), "NE");
    assert_eq!(TypeIndex::SELECT.key(), "Select");
    assert_eq!(TypeIndex::SELECT.raw() + 1, TypeIndex::FIRST_DYNAMIC);
}

#[test]
fn builtins_are_preregistered() {
    assert_eq!(TypeIndex::lookup("Add"), Some(TypeIndex::ADD));
    assert_eq!(TypeIndex::lookup("Call"), Some(TypeIndex::CALL));
    assert!(TypeIndex::CALL.is_builtin());
}

#[test]
fn builtin_keys_cannot_be_registered() {
    let err = TypeRegistryError::Builtin { key: "Add" };
    assert_eq!(TypeIndex::try_register("Add"), Err(err.clone()));
    assert!(err.to_string().contains("`Add` is a built-in"));
    assert_eq!(TypeIndex::lookup("Add"), Some(TypeIndex::ADD));
}

#[test]
#[should_panic(expected = "built-in attribute type")]
fn register_panics_on_builtin_key() {
    TypeIndex::register("Call");
}

#[test]
fn register_is_idempotent() {
    let first = TypeIndex::register("test.type_index.Conv2DAttrs");
    let second = TypeIndex::register("test.type_index.Conv2DAttrs");
    assert_eq!(first, second);
    assert!(!first.is_builtin());
    assert_eq!(first.key(), "test.type_index.Conv2DAttrs");
    assert_eq!(
        TypeIndex::lookup("test.type_index.Conv2DAttrs"),
        Some(first)
    );
}

#[test]
fn distinct_keys_get_distinct_indices() {
    let a = TypeIndex::register("test.type_index.PoolAttrs");
    let b = TypeIndex::register("test.type_index.ResizeAttrs");
    assert_ne!(a, b);
    assert!(a.raw() >= TypeIndex::FIRST_DYNAMIC);
    assert!(b.raw() >= TypeIndex::FIRST_DYNAMIC);
}

#[test]
fn concurrent_registration_agrees() {
    let handles: Vec<_> = (0..8)
        .map(|_| std::thread::spawn(|| TypeIndex::register("test.type_index.Shared")))
        .collect();
    let indices: Vec<TypeIndex> = handles
        .into_iter()
        .map(|h| h.join().unwrap_or_else(|_| panic!("registration thread panicked")))
        .collect();
    assert!(indices.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn unknown_key_lookup() {
    assert_eq!(TypeIndex::lookup("test.type_index.NeverRegistered"), None);
}

#[test]
fn debug_and_display() {
    assert_eq!(format!("{}", TypeIndex::ARRAY), "Array");
    assert_eq!(format!("{:?}", TypeIndex::ARRAY), "TypeIndex(3: Array)");
}
