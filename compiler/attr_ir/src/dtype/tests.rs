use pretty_assertions::assert_eq;

use super::*;

#[test]
fn display_scalars() {
    assert_eq!(DataType::INT32.to_string(), "int32");
    assert_eq!(DataType::UINT8.to_string(), "uint8");
    assert_eq!(DataType::FLOAT16.to_string(), "float16");
    assert_eq!(DataType::BOOL.to_string(), "bool");
    assert_eq!(DataType::HANDLE.to_string(), "handle");
}

#[test]
fn display_vectors() {
    assert_eq!(DataType::FLOAT32.with_lanes(4).to_string(), "float32x4");
    assert!(!DataType::FLOAT32.with_lanes(4).is_scalar());
}

#[test]
fn width_distinguishes_types() {
    assert_ne!(DataType::INT32, DataType::INT64);
    assert_ne!(DataType::INT32.packed(), DataType::INT64.packed());
    assert_ne!(DataType::INT32.packed(), DataType::uint(32).packed());
    assert_ne!(DataType::INT32.packed(), DataType::INT32.with_lanes(2).packed());
}

#[test]
fn accessors() {
    let ty = DataType::float(64).with_lanes(8);
    assert_eq!(ty.code(), TypeCode::Float);
    assert_eq!(ty.bits(), 64);
    assert_eq!(ty.lanes(), 8);
    assert!(ty.is_float());
}
