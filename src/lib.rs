//! # typed_doc
//!
//! An incremental writer for typed, JSON-like documents.
//!
//! ## What does it do?
//!
//! A [`DocumentWriter`] builds one document (a map of named fields, with nested
//! maps and arrays) through a sequence of small calls, checking at every call
//! that the operation is legal where the writer currently is. Values keep their
//! exact type: integers of four widths, two float widths, arbitrary-precision
//! decimals, binary blobs, dates, times, timestamps and day-time intervals.
//! Once sealed with [`DocumentWriter::build`], the document renders to a
//! deterministic canonical text that is valid JSON.
//!
//! ## Key Features
//!
//! - **Scope checked**: a single state machine ([`transition`]) decides which
//!   calls are legal in which scope; errors never poison the writer
//! - **Exact types**: narrow numbers and extended types render with type tags,
//!   so [`from_str`] restores an equal [`Value`] tree
//! - **Insertion ordered**: fields render in the order they were first put
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use typed_doc::{DocumentWriter, from_str};
//!
//! let mut writer = DocumentWriter::new();
//! writer
//!     .put("name", "Alice")?
//!     .put("age", 30i64)?
//!     .put_decimal("balance", 123450, 2)?
//!     .put_new_array("tags")?
//!     .add("rust")?
//!     .add("db")?
//!     .end_array()?
//!     .build()?;
//!
//! let text = writer.as_utf8_string()?;
//! assert_eq!(
//!     text,
//!     r#"{"name":"Alice","age":30,"balance":{"$decimal":"1234.50"},"tags":["rust","db"]}"#
//! );
//!
//! // The canonical text reads back into the same tree
//! assert_eq!(&from_str(&text)?, writer.document()?);
//! # Ok::<(), typed_doc::Error>(())
//! ```
//!
//! ### Scope errors
//!
//! ```rust
//! use typed_doc::{DocumentWriter, Error, ScopeKind};
//!
//! let mut writer = DocumentWriter::new();
//! writer.put_new_array("list").unwrap();
//!
//! // Named writes are not allowed inside an array
//! let err = writer.put("x", 1).unwrap_err();
//! assert!(matches!(err, Error::IllegalContext { scope: ScopeKind::Array, .. }));
//!
//! // The writer is still usable
//! writer.add(1).unwrap().end_array().unwrap().build().unwrap();
//! ```
//!
//! ### Dynamic Values with doc! Macro
//!
//! ```rust
//! use typed_doc::{doc, to_string};
//!
//! let value = doc!({ "id": 1i64, "flags": [true, null] });
//! assert_eq!(to_string(&value), r#"{"id":1,"flags":[true,null]}"#);
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Writing**: O(1) amortized per call; re-putting a field is an O(1) hash update
//! - **Rendering**: O(n) in the size of the document, single pass
//! - **Reading**: O(n) with single-pass recursive descent

pub mod context;
pub mod decimal;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod reader;
pub mod ser;
pub mod value;
pub mod writer;

pub use context::{transition, ContainerKind, Operation, ScopeKind, Transition, MAX_NESTING};
pub use decimal::Decimal;
pub use error::{Error, Result};
pub use map::DocMap;
pub use options::WriterOptions;
pub use reader::{from_slice, from_str, Reader};
pub use ser::{tags, Renderer};
pub use value::{Binary, Interval, Value, ValueType, MILLISECONDS_PER_DAY};
pub use writer::DocumentWriter;

use std::io;

/// Renders a value as compact canonical text.
///
/// # Examples
///
/// ```rust
/// use typed_doc::{to_string, Value};
///
/// assert_eq!(to_string(&Value::Short(3)), r#"{"$numberShort":3}"#);
/// ```
#[must_use]
pub fn to_string(value: &Value) -> String {
    to_string_with_options(value, &WriterOptions::default())
}

/// Renders a value as indented canonical text.
#[must_use]
pub fn to_string_pretty(value: &Value) -> String {
    to_string_with_options(value, &WriterOptions::pretty())
}

/// Renders a value with custom options.
///
/// # Examples
///
/// ```rust
/// use typed_doc::{doc, to_string_with_options, WriterOptions};
///
/// let value = doc!({ "a": [1, 2] });
/// let options = WriterOptions::pretty().with_typed_numbers(false);
/// assert_eq!(
///     to_string_with_options(&value, &options),
///     "{\n  \"a\": [\n    1,\n    2\n  ]\n}"
/// );
/// ```
#[must_use]
pub fn to_string_with_options(value: &Value, options: &WriterOptions) -> String {
    let mut renderer = Renderer::new(options.clone());
    renderer.render(value);
    renderer.into_inner()
}

/// Writes a value's compact canonical text to `writer`.
///
/// # Examples
///
/// ```rust
/// use typed_doc::{to_writer, Value};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Value::Long(5)).unwrap();
/// assert_eq!(buffer, b"5");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn to_writer<W>(mut writer: W, value: &Value) -> Result<()>
where
    W: io::Write,
{
    writer
        .write_all(to_string(value).as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Reads canonical text from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use typed_doc::{from_reader, Value};
/// use std::io::Cursor;
///
/// let value = from_reader(Cursor::new(br#"{"$interval":86400000}"#)).unwrap();
/// assert_eq!(value.value_type().as_str(), "interval");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails and [`Error::Syntax`] for malformed input.
pub fn from_reader<R>(mut reader: R) -> Result<Value>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}
