//! The incremental document writer.
//!
//! A [`DocumentWriter`] starts open in an implicit top-level map. Named writes
//! (`put*`, `put_new_map`, `put_new_array`) go to map scopes, positional writes
//! (`add*`, `start_map`, `start_array`) go to array scopes, and every call is
//! checked against the scope state machine in [`crate::context`] before it
//! changes anything. [`DocumentWriter::build`] seals the document; only then
//! can it be serialized.
//!
//! ## Usage
//!
//! ```rust
//! use typed_doc::{DocumentWriter, Value};
//!
//! let mut writer = DocumentWriter::new();
//! writer
//!     .put("boolean", true)?
//!     .put("string", "x")?
//!     .put_new_array("arr")?
//!     .add(1)?
//!     .add(2)?
//!     .end_array()?
//!     .build()?;
//!
//! assert_eq!(
//!     writer.as_utf8_string()?,
//!     r#"{"boolean":true,"string":"x","arr":[{"$numberInt":1},{"$numberInt":2}]}"#
//! );
//! assert_eq!(writer.document()?.get("arr"), Some(&Value::Array(vec![Value::Int(1), Value::Int(2)])));
//! # Ok::<(), typed_doc::Error>(())
//! ```

use crate::context::{ContainerKind, ContextStack, Operation, ScopeKind};
use crate::ser::Renderer;
use crate::{Binary, Decimal, DocMap, Error, Result, Value, WriterOptions};
use num_bigint::BigInt;
use std::io;

/// Builds one typed document through a sequence of scope-checked writes.
///
/// Mutating methods return `&mut Self` so calls chain with `?`. A failed call
/// changes nothing; the writer keeps accepting correct calls afterwards.
#[derive(Debug)]
pub struct DocumentWriter {
    stack: ContextStack,
    options: WriterOptions,
}

impl Default for DocumentWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriter {
    /// Creates an empty writer open in its top-level map.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(WriterOptions::default())
    }

    /// Creates an empty writer that renders with `options`.
    #[must_use]
    pub fn with_options(options: WriterOptions) -> Self {
        DocumentWriter {
            stack: ContextStack::new(),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    fn finish(&mut self, result: Result<()>) -> Result<&mut Self> {
        match result {
            Ok(()) => Ok(self),
            Err(err) => {
                tracing::debug!(error = %err, scope = %self.stack.current(), "rejected writer operation");
                Err(err)
            }
        }
    }

    /// Stores `value` under `name` in the current map scope.
    ///
    /// Putting a name that already exists replaces the value and keeps the
    /// field's original position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalContext`] outside a map scope or after `build()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::DocumentWriter;
    ///
    /// let mut writer = DocumentWriter::new();
    /// writer.put("a", 1i64)?.put("b", 2i64)?.put("a", 3i64)?.build()?;
    /// assert_eq!(writer.as_utf8_string()?, r#"{"a":3,"b":2}"#);
    /// # Ok::<(), typed_doc::Error>(())
    /// ```
    pub fn put<V: Into<Value>>(&mut self, name: impl Into<String>, value: V) -> Result<&mut Self> {
        let result = self.stack.put(name.into(), value.into());
        self.finish(result)
    }

    pub fn put_null(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        self.put(name, Value::Null)
    }

    /// Stores a copy of `len` bytes of `buffer` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWindow`] if the window does not fit in `buffer`,
    /// otherwise the same errors as [`DocumentWriter::put`].
    pub fn put_binary_window(
        &mut self,
        name: impl Into<String>,
        buffer: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<&mut Self> {
        match Binary::from_window(buffer, offset, len) {
            Ok(binary) => self.put(name, binary),
            Err(err) => self.finish(Err(err)),
        }
    }

    /// Stores the decimal `magnitude × 10^(−scale)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScale`] if `scale` is negative, otherwise the
    /// same errors as [`DocumentWriter::put`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::DocumentWriter;
    ///
    /// let mut writer = DocumentWriter::new();
    /// writer.put_decimal("d", 13456, 4)?.build()?;
    /// assert_eq!(writer.as_utf8_string()?, r#"{"d":{"$decimal":"1.3456"}}"#);
    /// # Ok::<(), typed_doc::Error>(())
    /// ```
    pub fn put_decimal<M: Into<BigInt>>(
        &mut self,
        name: impl Into<String>,
        magnitude: M,
        scale: i32,
    ) -> Result<&mut Self> {
        match Decimal::from_unscaled(magnitude, scale) {
            Ok(decimal) => self.put(name, decimal),
            Err(err) => self.finish(Err(err)),
        }
    }

    /// Stores an exact decimal, keeping its scale.
    pub fn put_decimal_exact(&mut self, name: impl Into<String>, value: Decimal) -> Result<&mut Self> {
        self.put(name, value)
    }

    /// Stores an integer as a decimal of scale 0.
    pub fn put_decimal_long(&mut self, name: impl Into<String>, value: i64) -> Result<&mut Self> {
        self.put(name, Decimal::from(value))
    }

    /// Stores a float as the decimal of its shortest round-trip text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumber`] for NaN and infinities.
    pub fn put_decimal_f64(&mut self, name: impl Into<String>, value: f64) -> Result<&mut Self> {
        match Decimal::from_f64(value) {
            Ok(decimal) => self.put(name, decimal),
            Err(err) => self.finish(Err(err)),
        }
    }

    /// Opens a nested map under `name`.
    ///
    /// The field takes its position in the parent now; its value is filled in
    /// when the matching [`DocumentWriter::end_map`] runs.
    pub fn put_new_map(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let result = self.stack.open_named(name.into(), ContainerKind::Map);
        self.finish(result)
    }

    /// Opens a nested array under `name`.
    pub fn put_new_array(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let result = self.stack.open_named(name.into(), ContainerKind::Array);
        self.finish(result)
    }

    /// Appends `value` to the current array scope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalContext`] outside an array scope or after `build()`.
    pub fn add<V: Into<Value>>(&mut self, value: V) -> Result<&mut Self> {
        let result = self.stack.add(value.into());
        self.finish(result)
    }

    pub fn add_null(&mut self) -> Result<&mut Self> {
        self.add(Value::Null)
    }

    pub fn add_binary_window(&mut self, buffer: &[u8], offset: usize, len: usize) -> Result<&mut Self> {
        match Binary::from_window(buffer, offset, len) {
            Ok(binary) => self.add(binary),
            Err(err) => self.finish(Err(err)),
        }
    }

    pub fn add_decimal<M: Into<BigInt>>(&mut self, magnitude: M, scale: i32) -> Result<&mut Self> {
        match Decimal::from_unscaled(magnitude, scale) {
            Ok(decimal) => self.add(decimal),
            Err(err) => self.finish(Err(err)),
        }
    }

    /// Opens a map as the next element of the current array.
    pub fn start_map(&mut self) -> Result<&mut Self> {
        let result = self.stack.open_positional(ContainerKind::Map);
        self.finish(result)
    }

    /// Opens an array as the next element of the current array.
    pub fn start_array(&mut self) -> Result<&mut Self> {
        let result = self.stack.open_positional(ContainerKind::Array);
        self.finish(result)
    }

    /// Closes the innermost scope, which must be a nested map.
    pub fn end_map(&mut self) -> Result<&mut Self> {
        let result = self.stack.close(Operation::EndMap);
        self.finish(result)
    }

    /// Closes the innermost scope, which must be an array.
    pub fn end_array(&mut self) -> Result<&mut Self> {
        let result = self.stack.close(Operation::EndArray);
        self.finish(result)
    }

    /// Seals the document. Calling it again on a sealed writer does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnterminatedScope`] if any nested scope is still open.
    pub fn build(&mut self) -> Result<&mut Self> {
        let was_sealed = self.is_sealed();
        let result = self.stack.seal();
        if result.is_ok() && !was_sealed {
            let fields = self
                .stack
                .sealed()
                .and_then(crate::Value::as_map)
                .map_or(0, DocMap::len);
            tracing::debug!(fields, "document sealed");
        }
        self.finish(result)
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.stack.current() == ScopeKind::Sealed
    }

    /// Number of nested scopes currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Kind of the innermost open scope, or `Sealed` after `build()`.
    #[must_use]
    pub fn current_scope(&self) -> ScopeKind {
        self.stack.current()
    }

    /// The finished document tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSealed`] before `build()`.
    pub fn document(&self) -> Result<&Value> {
        self.stack.sealed().ok_or(Error::NotSealed)
    }

    /// Consumes the writer and returns the finished document tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSealed`] before `build()`.
    pub fn into_document(self) -> Result<Value> {
        self.stack.into_sealed().ok_or(Error::NotSealed)
    }

    /// Renders the sealed document as UTF-8 canonical text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSealed`] before `build()`.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        self.as_utf8_string().map(String::into_bytes)
    }

    /// Renders the sealed document as canonical text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSealed`] before `build()`.
    pub fn as_utf8_string(&self) -> Result<String> {
        let document = self.document()?;
        let mut renderer = Renderer::new(self.options.clone());
        renderer.render(document);
        Ok(renderer.into_inner())
    }

    /// Writes the sealed document's canonical text to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSealed`] before `build()` and [`Error::Io`] if writing fails.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> Result<()> {
        let text = self.as_utf8_string()?;
        writer
            .write_all(text.as_bytes())
            .map_err(|e| Error::io(&e.to_string()))
    }
}
