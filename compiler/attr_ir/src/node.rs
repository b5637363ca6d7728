//! Attribute nodes.
//!
//! An [`Attr`] is an immutable, reference-counted node. Cloning an `Attr`
//! shares the node; [`Attr::same_as`] tests identity. There is no interior
//! mutability anywhere in the tree, so a constructed tree is finite and
//! acyclic and can be read from any number of threads.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{AttrObject, DataType, TypeIndex};

/// A shared, immutable attribute node.
#[derive(Clone)]
pub struct Attr(Arc<AttrKind>);

/// Every node variant.
///
/// The built-in variants are a closed set with fixed `TypeIndex` values.
/// `Object` carries user-defined kinds that describe themselves through
/// [`AttrObject`].
#[derive(Debug)]
pub enum AttrKind {
    // Leaves
    IntImm(IntImm),
    FloatImm(FloatImm),
    StringImm(StringImm),

    // Containers
    Array(Vec<Attr>),
    StrMap(StrMap),

    // Symbols
    Var(Var),
    /// A variable known to be non-negative; compares as `Var`.
    SizeVar(Var),

    // Arithmetic
    Add(BinaryExpr),
    Sub(BinaryExpr),
    Mul(BinaryExpr),
    Div(BinaryExpr),
    Mod(BinaryExpr),
    FloorDiv(BinaryExpr),
    FloorMod(BinaryExpr),
    Min(BinaryExpr),
    Max(BinaryExpr),

    // Comparison and logic
    Ge(BinaryExpr),
    Gt(BinaryExpr),
    Lt(BinaryExpr),
    Le(BinaryExpr),
    Eq(BinaryExpr),
    Ne(BinaryExpr),
    And(BinaryExpr),
    Or(BinaryExpr),
    Not(NotExpr),

    // Other expressions
    Cast(CastExpr),
    Call(CallExpr),
    Select(SelectExpr),

    /// User-defined kind.
    Object(Box<dyn AttrObject>),
}

/// Integer (or boolean) immediate.
#[derive(Copy, Clone, Debug)]
pub struct IntImm {
    pub dtype: DataType,
    pub value: i64,
}

/// Floating point immediate.
#[derive(Copy, Clone, Debug)]
pub struct FloatImm {
    pub dtype: DataType,
    pub value: f64,
}

#[derive(Clone, Debug)]
pub struct StringImm {
    pub value: String,
}

/// Symbolic variable, identified by name and data type.
#[derive(Clone, Debug)]
pub struct Var {
    pub name: String,
    pub dtype: DataType,
}

/// Operands of a binary operator, in source order.
#[derive(Clone, Debug)]
pub struct BinaryExpr {
    pub a: Attr,
    pub b: Attr,
}

#[derive(Clone, Debug)]
pub struct NotExpr {
    pub a: Attr,
}

#[derive(Clone, Debug)]
pub struct CastExpr {
    /// Target type.
    pub dtype: DataType,
    pub value: Attr,
}

/// How a `Call` is resolved.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CallType {
    /// Extern function with possible side effects.
    Extern = 0,
    /// Extern function without side effects.
    PureExtern = 1,
    /// Compiler intrinsic with possible side effects.
    Intrinsic = 2,
    /// Compiler intrinsic without side effects.
    PureIntrinsic = 3,
}

/// Call of a named function. `dtype` and `call_type` are the call metadata.
#[derive(Clone, Debug)]
pub struct CallExpr {
    pub dtype: DataType,
    pub name: String,
    pub args: Vec<Attr>,
    pub call_type: CallType,
}

#[derive(Clone, Debug)]
pub struct SelectExpr {
    pub condition: Attr,
    pub true_value: Attr,
    pub false_value: Attr,
}

/// String-keyed map of attributes.
///
/// Keys are unique. Iteration order is unspecified and must not be relied on.
#[derive(Clone, Debug, Default)]
pub struct StrMap {
    entries: FxHashMap<String, Attr>,
}

impl StrMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: Attr) -> Option<Attr> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Attr> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attr)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Attr)> for StrMap {
    fn from_iter<I: IntoIterator<Item = (K, Attr)>>(iter: I) -> Self {
        let mut map = StrMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Attr {
    /// Wrap a variant into a shared node.
    #[inline]
    pub fn new(kind: AttrKind) -> Self {
        Attr(Arc::new(kind))
    }

    #[inline]
    pub fn kind(&self) -> &AttrKind {
        &self.0
    }

    /// Identity comparison: do both handles point at the same node?
    #[inline]
    pub fn same_as(&self, other: &Attr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared node, stable for the node's lifetime.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Runtime type index of this node.
    pub fn type_index(&self) -> TypeIndex {
        match self.kind() {
            AttrKind::IntImm(_) => TypeIndex::INT_IMM,
            AttrKind::FloatImm(_) => TypeIndex::FLOAT_IMM,
            AttrKind::StringImm(_) => TypeIndex::STRING_IMM,
            AttrKind::Array(_) => TypeIndex::ARRAY,
            AttrKind::StrMap(_) => TypeIndex::STR_MAP,
            AttrKind::Var(_) => TypeIndex::VAR,
            AttrKind::SizeVar(_) => TypeIndex::SIZE_VAR,
            AttrKind::Add(_) => TypeIndex::ADD,
            AttrKind::Sub(_) => TypeIndex::SUB,
            AttrKind::Mul(_) => TypeIndex::MUL,
            AttrKind::Div(_) => TypeIndex::DIV,
            AttrKind::Mod(_) => TypeIndex::MOD,
            AttrKind::FloorDiv(_) => TypeIndex::FLOOR_DIV,
            AttrKind::FloorMod(_) => TypeIndex::FLOOR_MOD,
            AttrKind::Min(_) => TypeIndex::MIN,
            AttrKind::Max(_) => TypeIndex::MAX,
            AttrKind::Ge(_) => TypeIndex::GE,
            AttrKind::Gt(_) => TypeIndex::GT,
            AttrKind::Lt(_) => TypeIndex::LT,
            AttrKind::Le(_) => TypeIndex::LE,
            AttrKind::Eq(_) => TypeIndex::EQ,
            AttrKind::Ne(_) => TypeIndex::NE,
            AttrKind::And(_) => TypeIndex::AND,
            AttrKind::Or(_) => TypeIndex::OR,
            AttrKind::Not(_) => TypeIndex::NOT,
            AttrKind::Cast(_) => TypeIndex::CAST,
            AttrKind::Call(_) => TypeIndex::CALL,
            AttrKind::Select(_) => TypeIndex::SELECT,
            AttrKind::Object(object) => object.type_index(),
        }
    }

    /// Registered key of this node's type (e.g. `"Add"`).
    pub fn type_key(&self) -> &'static str {
        self.type_index().key()
    }

    /// The user-defined object inside an `Object` node.
    pub fn as_object(&self) -> Option<&dyn AttrObject> {
        match self.kind() {
            AttrKind::Object(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    /// Downcast an `Object` node to its concrete type.
    ///
    /// Returns `None` for built-in variants and for objects of another type.
    pub fn downcast_object<T: AttrObject>(&self) -> Option<&T> {
        self.as_object()?.as_any().downcast_ref::<T>()
    }

    // -- Leaves --

    /// 64-bit integer immediate.
    pub fn int(value: i64) -> Self {
        Self::int_imm(DataType::INT64, value)
    }

    pub fn int_imm(dtype: DataType, value: i64) -> Self {
        Attr::new(AttrKind::IntImm(IntImm { dtype, value }))
    }

    /// Boolean immediate, stored as a 1-bit integer.
    pub fn boolean(value: bool) -> Self {
        Self::int_imm(DataType::BOOL, i64::from(value))
    }

    /// 64-bit float immediate.
    pub fn float(value: f64) -> Self {
        Self::float_imm(DataType::FLOAT64, value)
    }

    pub fn float_imm(dtype: DataType, value: f64) -> Self {
        Attr::new(AttrKind::FloatImm(FloatImm { dtype, value }))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Attr::new(AttrKind::StringImm(StringImm {
            value: value.into(),
        }))
    }

    // -- Containers --

    pub fn array(items: impl IntoIterator<Item = Attr>) -> Self {
        Attr::new(AttrKind::Array(items.into_iter().collect()))
    }

    pub fn str_map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Attr)>) -> Self {
        Attr::new(AttrKind::StrMap(entries.into_iter().collect()))
    }

    // -- Symbols --

    /// 32-bit integer variable.
    pub fn var(name: impl Into<String>) -> Self {
        Self::var_typed(name, DataType::INT32)
    }

    pub fn var_typed(name: impl Into<String>, dtype: DataType) -> Self {
        Attr::new(AttrKind::Var(Var {
            name: name.into(),
            dtype,
        }))
    }

    /// 32-bit non-negative size variable.
    pub fn size_var(name: impl Into<String>) -> Self {
        Attr::new(AttrKind::SizeVar(Var {
            name: name.into(),
            dtype: DataType::INT32,
        }))
    }

    // -- Other expressions --

    pub fn not(a: Attr) -> Self {
        Attr::new(AttrKind::Not(NotExpr { a }))
    }

    pub fn cast(dtype: DataType, value: Attr) -> Self {
        Attr::new(AttrKind::Cast(CastExpr { dtype, value }))
    }

    /// Call of an extern function returning `int32`.
    pub fn call(name: impl Into<String>, args: impl IntoIterator<Item = Attr>) -> Self {
        Self::call_with(DataType::INT32, name, args, CallType::Extern)
    }

    pub fn call_with(
        dtype: DataType,
        name: impl Into<String>,
        args: impl IntoIterator<Item = Attr>,
        call_type: CallType,
    ) -> Self {
        Attr::new(AttrKind::Call(CallExpr {
            dtype,
            name: name.into(),
            args: args.into_iter().collect(),
            call_type,
        }))
    }

    pub fn select(condition: Attr, true_value: Attr, false_value: Attr) -> Self {
        Attr::new(AttrKind::Select(SelectExpr {
            condition,
            true_value,
            false_value,
        }))
    }

    /// Wrap a user-defined kind.
    pub fn object(object: impl AttrObject) -> Self {
        debug_assert!(
            !object.type_index().is_builtin(),
            "object {object:?} reports built-in type index `{}`",
            object.type_index().key()
        );
        Attr::new(AttrKind::Object(Box::new(object)))
    }
}

/// Generates one `Attr` constructor per binary operator variant.
macro_rules! binary_constructors {
    ($($name:ident => $variant:ident),* $(,)?) => {
        impl Attr {
            $(
                #[doc = concat!("`", stringify!($variant), "(a, b)` node.")]
                pub fn $name(a: Attr, b: Attr) -> Self {
                    Attr::new(AttrKind::$variant(BinaryExpr { a, b }))
                }
            )*
        }
    };
}

binary_constructors! {
    add => Add,
    sub => Sub,
    mul => Mul,
    div => Div,
    modulo => Mod,
    floor_div => FloorDiv,
    floor_mod => FloorMod,
    min => Min,
    max => Max,
    ge => Ge,
    gt => Gt,
    lt => Lt,
    le => Le,
    eq => Eq,
    ne => Ne,
    and => And,
    or => Or,
}

impl fmt::Debug for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.kind(), f)
    }
}

impl From<AttrKind> for Attr {
    fn from(kind: AttrKind) -> Self {
        Attr::new(kind)
    }
}
