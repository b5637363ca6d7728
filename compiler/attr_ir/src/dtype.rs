//! Numeric kind, width and lanes of attribute values.
//!
//! Immediates, variables, casts and calls all carry a `DataType`. Two
//! immediates with the same value but different types are different
//! attributes (`1i32` is not `1i64`).

use std::fmt;

/// Kind of a `DataType`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TypeCode {
    Int = 0,
    UInt = 1,
    Float = 2,
    Handle = 3,
    Bool = 4,
}

impl TypeCode {
    fn prefix(self) -> &'static str {
        match self {
            TypeCode::Int => "int",
            TypeCode::UInt => "uint",
            TypeCode::Float => "float",
            TypeCode::Handle => "handle",
            TypeCode::Bool => "bool",
        }
    }
}

/// Scalar or vector data type: kind, bit width and lane count.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct DataType {
    code: TypeCode,
    bits: u8,
    lanes: u16,
}

impl DataType {
    pub const INT8: DataType = DataType::int(8);
    pub const INT32: DataType = DataType::int(32);
    pub const INT64: DataType = DataType::int(64);
    pub const UINT8: DataType = DataType::uint(8);
    pub const FLOAT16: DataType = DataType::float(16);
    pub const FLOAT32: DataType = DataType::float(32);
    pub const FLOAT64: DataType = DataType::float(64);
    pub const BOOL: DataType = DataType::new(TypeCode::Bool, 1, 1);
    pub const HANDLE: DataType = DataType::new(TypeCode::Handle, 64, 1);

    #[inline]
    pub const fn new(code: TypeCode, bits: u8, lanes: u16) -> Self {
        DataType { code, bits, lanes }
    }

    /// Signed integer scalar of `bits` width.
    #[inline]
    pub const fn int(bits: u8) -> Self {
        DataType::new(TypeCode::Int, bits, 1)
    }

    /// Unsigned integer scalar of `bits` width.
    #[inline]
    pub const fn uint(bits: u8) -> Self {
        DataType::new(TypeCode::UInt, bits, 1)
    }

    /// Floating point scalar of `bits` width.
    #[inline]
    pub const fn float(bits: u8) -> Self {
        DataType::new(TypeCode::Float, bits, 1)
    }

    /// Same kind and width with `lanes` vector lanes.
    #[inline]
    #[must_use]
    pub const fn with_lanes(self, lanes: u16) -> Self {
        DataType::new(self.code, self.bits, lanes)
    }

    #[inline]
    pub const fn code(self) -> TypeCode {
        self.code
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    #[inline]
    pub const fn lanes(self) -> u16 {
        self.lanes
    }

    #[inline]
    pub const fn is_scalar(self) -> bool {
        self.lanes == 1
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self.code, TypeCode::Float)
    }

    /// Pack kind, width and lanes into one integer.
    ///
    /// Distinct data types always pack to distinct values.
    #[inline]
    pub const fn packed(self) -> u64 {
        ((self.code as u64) << 24) | ((self.bits as u64) << 16) | self.lanes as u64
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            TypeCode::Bool | TypeCode::Handle => f.write_str(self.code.prefix())?,
            _ => write!(f, "{}{}", self.code.prefix(), self.bits)?,
        }
        if self.lanes != 1 {
            write!(f, "x{}", self.lanes)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataType({self})")
    }
}

#[cfg(test)]
mod tests;
