//! Tagged runtime values.
//!
//! Every [`Value`] variant carries a payload of exactly the Rust type named by
//! its [`TypeTag`], so the tag can never disagree with the payload.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ══════════════════════════════════════════════════════════════════════════════
// TypeTag
// ══════════════════════════════════════════════════════════════════════════════

/// The closed set of value types.
///
/// Declaration order is the promotion rank: every integer tag ranks below
/// `F32`, which ranks below `F64`. Integer tags compare by declaration order,
/// so all unsigned tags rank above all signed tags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TypeTag {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
}

impl TypeTag {
    /// Every tag, in rank order.
    pub const ALL: [TypeTag; 11] = [
        TypeTag::I8,
        TypeTag::I16,
        TypeTag::I32,
        TypeTag::I64,
        TypeTag::U8,
        TypeTag::U16,
        TypeTag::U32,
        TypeTag::U64,
        TypeTag::F32,
        TypeTag::F64,
        TypeTag::String,
    ];

    /// Mnemonic suffix used by `ld.<suffix>` and `conv.<suffix>`.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "str",
        }
    }

    /// Inverse of [`TypeTag::suffix`]. Matching ignores ASCII case.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.suffix().eq_ignore_ascii_case(suffix))
    }

    pub fn is_number(self) -> bool {
        self != Self::String
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    pub fn is_integer(self) -> bool {
        self < Self::F32
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::I8 => "I8",
            Self::I16 => "I16",
            Self::I32 => "I32",
            Self::I64 => "I64",
            Self::U8 => "U8",
            Self::U16 => "U16",
            Self::U32 => "U32",
            Self::U64 => "U64",
            Self::F32 => "F32",
            Self::F64 => "F64",
            Self::String => "String",
        };
        f.write_str(name)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Value
// ══════════════════════════════════════════════════════════════════════════════

/// Errors raised while building or converting a [`Value`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// A literal does not fit or is malformed for its declared type.
    #[error("cannot parse '{text}' as {tag}")]
    Parse { tag: TypeTag, text: String },

    /// No conversion is defined between the two tags.
    #[error("cannot convert {from} to {to}")]
    UnsupportedConversion { from: TypeTag, to: TypeTag },
}

/// A runtime value: a scalar of one of the numeric widths, or a string.
///
/// Equality compares tag and payload; `I32(5)` and `I64(5)` are unequal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
}

/// Casts any numeric payload to `$ty` with Rust `as` semantics
/// (truncation, sign extension, saturating float-to-int).
macro_rules! numeric_cast {
    ($value:expr, $ty:ty) => {
        match *$value {
            Value::I8(n) => Some(n as $ty),
            Value::I16(n) => Some(n as $ty),
            Value::I32(n) => Some(n as $ty),
            Value::I64(n) => Some(n as $ty),
            Value::U8(n) => Some(n as $ty),
            Value::U16(n) => Some(n as $ty),
            Value::U32(n) => Some(n as $ty),
            Value::U64(n) => Some(n as $ty),
            Value::F32(n) => Some(n as $ty),
            Value::F64(n) => Some(n as $ty),
            Value::String(_) => None,
        }
    };
}

impl Value {
    /// The tag describing this value's payload.
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::I8(_) => TypeTag::I8,
            Self::I16(_) => TypeTag::I16,
            Self::I32(_) => TypeTag::I32,
            Self::I64(_) => TypeTag::I64,
            Self::U8(_) => TypeTag::U8,
            Self::U16(_) => TypeTag::U16,
            Self::U32(_) => TypeTag::U32,
            Self::U64(_) => TypeTag::U64,
            Self::F32(_) => TypeTag::F32,
            Self::F64(_) => TypeTag::F64,
            Self::String(_) => TypeTag::String,
        }
    }

    pub fn is_number(&self) -> bool {
        self.tag().is_number()
    }

    /// Parse a literal as the given type.
    ///
    /// Numeric literals must fit the exact width and signedness of `tag`.
    /// String literals are taken verbatim; de-quoting happens in the tokenizer.
    pub fn parse_literal(tag: TypeTag, text: &str) -> Result<Self, ValueError> {
        let parse_error = || ValueError::Parse {
            tag,
            text: text.to_string(),
        };
        let value = match tag {
            TypeTag::I8 => Self::I8(text.parse().map_err(|_| parse_error())?),
            TypeTag::I16 => Self::I16(text.parse().map_err(|_| parse_error())?),
            TypeTag::I32 => Self::I32(text.parse().map_err(|_| parse_error())?),
            TypeTag::I64 => Self::I64(text.parse().map_err(|_| parse_error())?),
            TypeTag::U8 => Self::U8(text.parse().map_err(|_| parse_error())?),
            TypeTag::U16 => Self::U16(text.parse().map_err(|_| parse_error())?),
            TypeTag::U32 => Self::U32(text.parse().map_err(|_| parse_error())?),
            TypeTag::U64 => Self::U64(text.parse().map_err(|_| parse_error())?),
            TypeTag::F32 => Self::F32(text.parse().map_err(|_| parse_error())?),
            TypeTag::F64 => Self::F64(text.parse().map_err(|_| parse_error())?),
            TypeTag::String => Self::String(text.to_string()),
        };
        Ok(value)
    }

    /// Reinterpret this value under `target`.
    ///
    /// Numeric targets use the natural width conversion. Any value converts
    /// to `String` via its decimal rendering. Strings never convert to
    /// numbers.
    pub fn cast_to(&self, target: TypeTag) -> Result<Self, ValueError> {
        let converted = match target {
            TypeTag::I8 => numeric_cast!(self, i8).map(Self::I8),
            TypeTag::I16 => numeric_cast!(self, i16).map(Self::I16),
            TypeTag::I32 => numeric_cast!(self, i32).map(Self::I32),
            TypeTag::I64 => numeric_cast!(self, i64).map(Self::I64),
            TypeTag::U8 => numeric_cast!(self, u8).map(Self::U8),
            TypeTag::U16 => numeric_cast!(self, u16).map(Self::U16),
            TypeTag::U32 => numeric_cast!(self, u32).map(Self::U32),
            TypeTag::U64 => numeric_cast!(self, u64).map(Self::U64),
            TypeTag::F32 => numeric_cast!(self, f32).map(Self::F32),
            TypeTag::F64 => numeric_cast!(self, f64).map(Self::F64),
            TypeTag::String => Some(Self::String(self.to_string())),
        };
        converted.ok_or(ValueError::UnsupportedConversion {
            from: self.tag(),
            to: target,
        })
    }

    /// The payload of an integer-tagged value, widened losslessly.
    ///
    /// Returns `None` for float and string values.
    pub fn as_integer(&self) -> Option<i128> {
        if !self.tag().is_integer() {
            return None;
        }
        numeric_cast!(self, i128)
    }
}

/// Float payloads compare equal when both are NaN, and `0.0` equals `-0.0`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::F64(a), Self::F64(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8(n) => write!(f, "{n}"),
            Self::I16(n) => write!(f, "{n}"),
            Self::I32(n) => write!(f, "{n}"),
            Self::I64(n) => write!(f, "{n}"),
            Self::U8(n) => write!(f, "{n}"),
            Self::U16(n) => write!(f, "{n}"),
            Self::U32(n) => write!(f, "{n}"),
            Self::U64(n) => write!(f, "{n}"),
            Self::F32(n) => write!(f, "{n}"),
            Self::F64(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}
