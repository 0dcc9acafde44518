//! Bound parameters and the values they carry.
//!
//! A [`Param`] is a value plus a driver type tag. It never renders itself:
//! the component that owns it writes the `?` placeholders and pushes the
//! value into a [`ParamList`], one entry per placeholder.

use serde::{Serialize, Serializer};

/// A scalar value, either bound through a [`Param`] or inlined as a literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Whether the value reads as a number (numeric strings included).
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Int(_) => true,
            Value::Float(f) => f.is_finite(),
            Value::Text(s) => is_numeric_str(s),
            Value::Null | Value::Bool(_) => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

macro_rules! impl_value_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )+
    };
}

impl_value_from!(Int: i64, i32, i16, i8, u32, u16, u8);
impl_value_from!(Float: f64, f32);
impl_value_from!(Bool: bool);
impl_value_from!(Text: String, &str, &String);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Driver type tag carried by every bound parameter.
///
/// The numeric codes are fixed and non-contiguous; drivers bind by code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParamType {
    Integer = 1,
    String = 2,
    Lob = 3,
    Bool = 5,
}

impl ParamType {
    /// The numeric code handed to the binding driver.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a type tag by its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Integer),
            2 => Some(Self::String),
            3 => Some(Self::Lob),
            5 => Some(Self::Bool),
            _ => None,
        }
    }
}

impl Serialize for ParamType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// What a [`Param`] wraps: one scalar, or a sequence that binds element-wise.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(Value),
    List(Vec<Value>),
}

impl ParamValue {
    pub fn is_list(&self) -> bool {
        matches!(self, ParamValue::List(_))
    }

    /// Number of placeholders this value expands to.
    pub fn len(&self) -> usize {
        match self {
            ParamValue::Scalar(_) => 1,
            ParamValue::List(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! impl_param_value_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(v: $ty) -> Self {
                    ParamValue::Scalar(v.into())
                }
            }
        )+
    };
}

impl_param_value_from!(i64, i32, i16, i8, u32, u16, u8, f64, f32, bool, String, &str, &String, Value);

impl<T: Into<Value>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        ParamValue::Scalar(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for ParamValue {
    fn from(items: [T; N]) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for ParamValue {
    fn from(items: &[T]) -> Self {
        ParamValue::List(items.iter().cloned().map(Into::into).collect())
    }
}

/// An immutable value + type tag pair, bound later by a driver.
///
/// # Example
/// ```
/// use oraqb::{Param, ParamType};
///
/// let id = Param::new(42, ParamType::Integer);
/// let ids = Param::new(vec![1, 2, 3], ParamType::Integer);
/// assert_eq!(ids.value().len(), 3);
/// # let _ = id;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    value: ParamValue,
    ty: ParamType,
}

impl Param {
    pub fn new(value: impl Into<ParamValue>, ty: ParamType) -> Self {
        Self {
            value: value.into(),
            ty,
        }
    }

    /// Shorthand for `Param::new(value, ParamType::Integer)`.
    pub fn int(value: impl Into<ParamValue>) -> Self {
        Self::new(value, ParamType::Integer)
    }

    /// Shorthand for `Param::new(value, ParamType::String)`.
    pub fn string(value: impl Into<ParamValue>) -> Self {
        Self::new(value, ParamType::String)
    }

    /// Shorthand for `Param::new(value, ParamType::Lob)`.
    pub fn lob(value: impl Into<ParamValue>) -> Self {
        Self::new(value, ParamType::Lob)
    }

    /// Shorthand for `Param::new(value, ParamType::Bool)`.
    pub fn bool(value: impl Into<ParamValue>) -> Self {
        Self::new(value, ParamType::Bool)
    }

    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    pub fn param_type(&self) -> ParamType {
        self.ty
    }
}

/// One positional parameter: binds to exactly one `?` in the rendered SQL.
///
/// Serializes as the pair `[value, type_code]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    pub value: Value,
    pub ty: ParamType,
}

impl BoundParam {
    pub fn new(value: impl Into<Value>, ty: ParamType) -> Self {
        Self {
            value: value.into(),
            ty,
        }
    }
}

impl Serialize for BoundParam {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.value, self.ty).serialize(serializer)
    }
}

/// An ordered collection of bound parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamList {
    params: Vec<BoundParam>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Push a [`Param`], expanding a sequence into one entry per element.
    pub fn push_param(&mut self, param: &Param) {
        match &param.value {
            ParamValue::Scalar(v) => self.params.push(BoundParam {
                value: v.clone(),
                ty: param.ty,
            }),
            ParamValue::List(items) => self.params.extend(items.iter().map(|v| BoundParam {
                value: v.clone(),
                ty: param.ty,
            })),
        }
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn as_slice(&self) -> &[BoundParam] {
        &self.params
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoundParam> {
        self.params.iter()
    }

    /// Extend this list with another list's parameters.
    pub fn extend(&mut self, other: ParamList) {
        self.params.extend(other.params);
    }

    pub fn into_vec(self) -> Vec<BoundParam> {
        self.params
    }
}

impl IntoIterator for ParamList {
    type Item = BoundParam;
    type IntoIter = std::vec::IntoIter<BoundParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

/// Numeric-string check: optional sign, digits with an optional fraction,
/// optional exponent, surrounding ASCII whitespace allowed.
pub(crate) fn is_numeric_str(s: &str) -> bool {
    let t = s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c'));
    let b = t.as_bytes();
    let mut i = 0;

    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == b.len()
}
