//! The document value model.
//!
//! [`Value`] is the closed set of variants a [`DocumentWriter`](crate::DocumentWriter)
//! can produce: JSON's scalars split into exact numeric widths, plus the
//! database-oriented types plain JSON cannot carry (decimals, binary, dates,
//! times, timestamps and intervals).
//!
//! ## Creating Values
//!
//! Every scalar Rust type converts into its matching variant, which is what
//! lets `put` and `add` accept plain Rust values:
//!
//! ```rust
//! use typed_doc::{Value, ValueType};
//!
//! assert_eq!(Value::from(16i8).value_type(), ValueType::Byte);
//! assert_eq!(Value::from(32000).value_type(), ValueType::Int);
//! assert_eq!(Value::from(10.5f32).value_type(), ValueType::Float);
//! assert_eq!(Value::from("text").value_type(), ValueType::String);
//! ```
//!
//! ## Type Checking
//!
//! ```rust
//! use typed_doc::Value;
//!
//! let value = Value::from(42i64);
//! assert!(value.is_scalar());
//! assert_eq!(value.as_i64(), Some(42));
//! assert_eq!(value.as_str(), None);
//! ```

use crate::{Decimal, DocMap, Error, Result};
use base64::Engine;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use std::fmt;

/// Number of milliseconds in a day.
pub const MILLISECONDS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S%.f";
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A typed document value.
///
/// Exactly one variant is active. `Array` and `Map` may be partially built
/// while the writer scope that owns them is open; the value itself does not
/// record whether it is complete.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    String(String),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Binary(Binary),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Interval(Interval),
    Array(Vec<Value>),
    Map(DocMap),
}

/// The type tag of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Bool,
    String,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Binary,
    Date,
    Time,
    Timestamp,
    Interval,
    Array,
    Map,
}

impl ValueType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::String => "string",
            ValueType::Byte => "byte",
            ValueType::Short => "short",
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Decimal => "decimal",
            ValueType::Binary => "binary",
            ValueType::Date => "date",
            ValueType::Time => "time",
            ValueType::Timestamp => "timestamp",
            ValueType::Interval => "interval",
            ValueType::Array => "array",
            ValueType::Map => "map",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, ValueType::Array | ValueType::Map)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable byte sequence.
///
/// Construction always copies, so later changes to the caller's buffer are
/// never visible through a `Binary`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Binary(Vec<u8>);

impl Binary {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Binary(bytes.into())
    }

    /// Copies `len` bytes of `buffer` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWindow`] if the window runs past the end of `buffer`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::Binary;
    ///
    /// let buffer: Vec<u8> = (0..20).collect();
    /// let window = Binary::from_window(&buffer, 10, 5).unwrap();
    /// assert_eq!(window.as_bytes(), &[10, 11, 12, 13, 14]);
    /// assert!(Binary::from_window(&buffer, 18, 5).is_err());
    /// ```
    pub fn from_window(buffer: &[u8], offset: usize, len: usize) -> Result<Self> {
        let window_error = || Error::InvalidWindow {
            offset,
            len,
            buffer_len: buffer.len(),
        };
        let end = offset.checked_add(len).ok_or_else(window_error)?;
        let bytes = buffer.get(offset..end).ok_or_else(window_error)?;
        Ok(Binary(bytes.to_vec()))
    }

    /// Decodes standard, padded base64.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumber`] if `encoded` is not valid base64.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map(Binary)
            .map_err(|e| Error::invalid_number(format!("invalid base64: {}", e)))
    }

    /// Encodes the bytes as standard, padded base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.0)
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A signed duration in milliseconds.
///
/// An interval is an amount of time, not a point in time.
///
/// # Examples
///
/// ```rust
/// use typed_doc::Interval;
///
/// let interval = Interval::from_days(2).unwrap();
/// assert_eq!(interval.millis(), 172_800_000);
/// assert_eq!(interval.days(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Interval(i64);

impl Interval {
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Interval(millis)
    }

    /// Returns `None` if the day count overflows the millisecond range.
    #[must_use]
    pub const fn from_days(days: i64) -> Option<Self> {
        match days.checked_mul(MILLISECONDS_PER_DAY) {
            Some(millis) => Some(Interval(millis)),
            None => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn millis(&self) -> i64 {
        self.0
    }

    /// Whole days, truncated toward zero.
    #[inline]
    #[must_use]
    pub const fn days(&self) -> i64 {
        self.0 / MILLISECONDS_PER_DAY
    }
}

impl From<chrono::Duration> for Interval {
    fn from(value: chrono::Duration) -> Self {
        Interval(value.num_milliseconds())
    }
}

impl Value {
    /// Returns the type tag of the active variant.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::String(_) => ValueType::String,
            Value::Byte(_) => ValueType::Byte,
            Value::Short(_) => ValueType::Short,
            Value::Int(_) => ValueType::Int,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::Decimal(_) => ValueType::Decimal,
            Value::Binary(_) => ValueType::Binary,
            Value::Date(_) => ValueType::Date,
            Value::Time(_) => ValueType::Time,
            Value::Timestamp(_) => ValueType::Timestamp,
            Value::Interval(_) => ValueType::Interval,
            Value::Array(_) => ValueType::Array,
            Value::Map(_) => ValueType::Map,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for every variant except `Array` and `Map`.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !self.value_type().is_container()
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns any integer variant widened to `i64`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::Value;
    ///
    /// assert_eq!(Value::Short(1000).as_i64(), Some(1000));
    /// assert_eq!(Value::Double(1.0).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&DocMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a field when this value is a map.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(name))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::String(s) => serializer.serialize_str(s),
            Value::Byte(v) => serializer.serialize_i8(*v),
            Value::Short(v) => serializer.serialize_i16(*v),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Long(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            // Decimals travel as text so no serde format rounds them
            Value::Decimal(d) => serializer.serialize_str(&d.to_canonical_text()),
            Value::Binary(b) => serializer.serialize_bytes(b.as_bytes()),
            Value::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            Value::Time(t) => serializer.collect_str(&t.format(TIME_FORMAT)),
            Value::Timestamp(ts) => serializer.collect_str(&ts.format(TIMESTAMP_FORMAT)),
            Value::Interval(i) => serializer.serialize_i64(i.millis()),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Map(map) => map.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Byte(value)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Short(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<Binary> for Value {
    fn from(value: Binary) -> Self {
        Value::Binary(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(Binary(value))
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Binary(Binary::new(value))
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Interval> for Value {
    fn from(value: Interval) -> Self {
        Value::Interval(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<DocMap> for Value {
    fn from(value: DocMap) -> Self {
        Value::Map(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
