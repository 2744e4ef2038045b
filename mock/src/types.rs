use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::decimal::Decimal;
use crate::error::{Error, Result};

/// Wire types a column can be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    BigInt,
    Binary,
    Bit,
    Char,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Decimal,
    Float,
    Image,
    Int,
    Money,
    NChar,
    NText,
    NVarChar,
    Real,
    SmallDateTime,
    SmallInt,
    SmallMoney,
    /// Table-valued parameters only, never valid for a column.
    Structured,
    Text,
    Time,
    Timestamp,
    TinyInt,
    Udt,
    UniqueIdentifier,
    VarBinary,
    VarChar,
    Variant,
    Xml,
}

impl SqlType {
    /// Every type a column may be declared with.
    pub const SUPPORTED: [SqlType; 30] = [
        SqlType::BigInt,
        SqlType::Binary,
        SqlType::Bit,
        SqlType::Char,
        SqlType::Date,
        SqlType::DateTime,
        SqlType::DateTime2,
        SqlType::DateTimeOffset,
        SqlType::Decimal,
        SqlType::Float,
        SqlType::Image,
        SqlType::Int,
        SqlType::Money,
        SqlType::NChar,
        SqlType::NText,
        SqlType::NVarChar,
        SqlType::Real,
        SqlType::SmallDateTime,
        SqlType::SmallInt,
        SqlType::SmallMoney,
        SqlType::Text,
        SqlType::Time,
        SqlType::Timestamp,
        SqlType::TinyInt,
        SqlType::Udt,
        SqlType::UniqueIdentifier,
        SqlType::VarBinary,
        SqlType::VarChar,
        SqlType::Variant,
        SqlType::Xml,
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::BigInt => "bigint",
            Self::Binary => "binary",
            Self::Bit => "bit",
            Self::Char => "char",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::DateTime2 => "datetime2",
            Self::DateTimeOffset => "datetimeoffset",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Image => "image",
            Self::Int => "int",
            Self::Money => "money",
            Self::NChar => "nchar",
            Self::NText => "ntext",
            Self::NVarChar => "nvarchar",
            Self::Real => "real",
            Self::SmallDateTime => "smalldatetime",
            Self::SmallInt => "smallint",
            Self::SmallMoney => "smallmoney",
            Self::Structured => "structured",
            Self::Text => "text",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::TinyInt => "tinyint",
            Self::Udt => "udt",
            Self::UniqueIdentifier => "uniqueidentifier",
            Self::VarBinary => "varbinary",
            Self::VarChar => "varchar",
            Self::Variant => "sql_variant",
            Self::Xml => "xml",
        }
    }

    /// The kind of value a column of this type stores.
    pub fn value_kind(&self) -> Result<ValueKind> {
        let kind = match self {
            Self::BigInt => ValueKind::Int64,
            Self::Binary | Self::Image | Self::Timestamp | Self::VarBinary => ValueKind::Bytes,
            Self::Bit => ValueKind::Boolean,
            Self::Char
            | Self::NChar
            | Self::NText
            | Self::NVarChar
            | Self::Text
            | Self::VarChar
            | Self::Xml => ValueKind::String,
            Self::Date | Self::DateTime | Self::DateTime2 | Self::SmallDateTime => {
                ValueKind::DateTime
            }
            Self::DateTimeOffset => ValueKind::DateTimeOffset,
            Self::Decimal | Self::Money | Self::SmallMoney => ValueKind::Decimal,
            Self::Float => ValueKind::Double,
            Self::Int => ValueKind::Int32,
            Self::Real => ValueKind::Float,
            Self::SmallInt => ValueKind::Int16,
            Self::Time => ValueKind::Time,
            Self::TinyInt => ValueKind::Byte,
            Self::Udt => ValueKind::Udt,
            Self::UniqueIdentifier => ValueKind::Guid,
            Self::Variant => ValueKind::Any,
            Self::Structured => return Err(Error::UnsupportedType(self.type_name().to_string())),
        };
        Ok(kind)
    }

    /// Storage length fixed by the type itself, in bytes.
    pub fn intrinsic_length(&self) -> Option<usize> {
        match self {
            Self::BigInt | Self::DateTime | Self::Float | Self::Money | Self::Timestamp => Some(8),
            Self::Bit => Some(1),
            Self::Decimal => Some(17),
            Self::Int | Self::Real | Self::SmallDateTime | Self::SmallMoney => Some(4),
            Self::UniqueIdentifier => Some(16),
            Self::SmallInt => Some(2),
            Self::Date => Some(3),
            _ => None,
        }
    }

    /// Whether the length of a value is checked against the declared length.
    pub fn is_length_bounded(&self) -> bool {
        matches!(
            self,
            Self::Binary
                | Self::Image
                | Self::Timestamp
                | Self::VarBinary
                | Self::Char
                | Self::VarChar
                | Self::Text
                | Self::NChar
                | Self::NVarChar
                | Self::NText
                | Self::Xml
        )
    }

    /// Two bytes per character: declared lengths count bytes, values count chars.
    pub fn is_unicode(&self) -> bool {
        matches!(self, Self::NChar | Self::NVarChar | Self::NText | Self::Xml)
    }
}

impl Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for SqlType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Self::SUPPORTED
            .iter()
            .chain(std::iter::once(&SqlType::Structured))
            .find(|ty| ty.type_name().eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| Error::UnsupportedType(name.to_string()))
    }
}

/// Runtime kind of a [`Value`]; doubles as the field type a column reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Decimal,
    String,
    Char,
    Bytes,
    Guid,
    DateTime,
    Time,
    DateTimeOffset,
    Udt,
    /// Accepts any non-null value.
    Any,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Char => "char",
            Self::Bytes => "bytes",
            Self::Guid => "guid",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::DateTimeOffset => "datetimeoffset",
            Self::Udt => "udt",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// Payload of a user-defined CLR type column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UdtValue {
    /// Well-known text of a geodetic shape.
    Geography(String),
    /// Well-known text of a planar shape.
    Geometry(String),
    /// Slash separated path, e.g. `/1/3/`.
    HierarchyId(String),
}

impl Display for UdtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geography(wkt) | Self::Geometry(wkt) => f.write_str(wkt),
            Self::HierarchyId(path) => f.write_str(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Char(char),
    Bytes(Vec<u8>),
    Guid(Uuid),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Udt(UdtValue),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Byte(_) => ValueKind::Byte,
            Self::Int16(_) => ValueKind::Int16,
            Self::Int32(_) => ValueKind::Int32,
            Self::Int64(_) => ValueKind::Int64,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::String(_) => ValueKind::String,
            Self::Char(_) => ValueKind::Char,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Guid(_) => ValueKind::Guid,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Time(_) => ValueKind::Time,
            Self::DateTimeOffset(_) => ValueKind::DateTimeOffset,
            Self::Udt(_) => ValueKind::Udt,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    // A helper function that makes building a string Value easier.
    pub fn build_text(text: impl Into<String>) -> Self {
        Self::String(text.into())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => f.write_str(s),
            Self::Char(c) => write!(f, "{c}"),
            Self::Bytes(b) => {
                write!(f, "0x")?;
                for byte in b {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
            Self::Guid(g) => write!(f, "{g}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::DateTimeOffset(dt) => write!(f, "{dt}"),
            Self::Udt(u) => write!(f, "{u}"),
        }
    }
}

macro_rules! impl_value_from {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        }
    };
}

impl_value_from!(bool, Boolean);
impl_value_from!(u8, Byte);
impl_value_from!(i16, Int16);
impl_value_from!(i32, Int32);
impl_value_from!(i64, Int64);
impl_value_from!(f32, Float);
impl_value_from!(f64, Double);
impl_value_from!(Decimal, Decimal);
impl_value_from!(String, String);
impl_value_from!(char, Char);
impl_value_from!(Vec<u8>, Bytes);
impl_value_from!(Uuid, Guid);
impl_value_from!(NaiveDateTime, DateTime);
impl_value_from!(NaiveTime, Time);
impl_value_from!(DateTime<FixedOffset>, DateTimeOffset);
impl_value_from!(UdtValue, Udt);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::DateTime(value.and_time(NaiveTime::MIN))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Convert a `Value` into the implementors type.
pub trait FromValue: Sealed {
    fn from_sql(val: &Value) -> Result<Self>
    where
        Self: Sized;
}

impl FromValue for Value {
    fn from_sql(val: &Value) -> Result<Self> {
        Ok(val.clone())
    }
}
impl Sealed for Value {}

macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl FromValue for $ty {
            fn from_sql(val: &Value) -> Result<Self> {
                match val {
                    Value::Null => Err(Error::NullValue { expected: $name }),
                    Value::$variant(v) => Ok(v.clone()),
                    other => Err(Error::Cast {
                        expected: $name,
                        found: other.kind(),
                    }),
                }
            }
        }

        impl Sealed for $ty {}
    };
}

impl_from_value!(bool, Boolean, "boolean");
impl_from_value!(u8, Byte, "byte");
impl_from_value!(i16, Int16, "int16");
impl_from_value!(i32, Int32, "int32");
impl_from_value!(i64, Int64, "int64");
impl_from_value!(f32, Float, "float");
impl_from_value!(f64, Double, "double");
impl_from_value!(Decimal, Decimal, "decimal");
impl_from_value!(String, String, "string");
impl_from_value!(char, Char, "char");
impl_from_value!(Vec<u8>, Bytes, "bytes");
impl_from_value!(Uuid, Guid, "guid");
impl_from_value!(NaiveDateTime, DateTime, "datetime");
impl_from_value!(NaiveTime, Time, "time");
impl_from_value!(DateTime<FixedOffset>, DateTimeOffset, "datetimeoffset");
impl_from_value!(UdtValue, Udt, "udt");

impl<T> FromValue for Option<T>
where
    T: FromValue,
{
    fn from_sql(val: &Value) -> Result<Self> {
        match val {
            Value::Null => Ok(None),
            _ => T::from_sql(val).map(Some),
        }
    }
}
impl<T> Sealed for Option<T> {}

mod sealed {
    pub trait Sealed {}
}
use sealed::Sealed;
