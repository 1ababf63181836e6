//! Configuration options for rendering documents.
//!
//! [`WriterOptions`] controls layout (compact or indented) and whether narrow
//! numeric types keep their type tags in the output.
//!
//! ## Examples
//!
//! ```rust
//! use typed_doc::{DocumentWriter, WriterOptions};
//!
//! let mut writer = DocumentWriter::with_options(WriterOptions::pretty().with_indent(4));
//! writer.put("id", 1i64).unwrap();
//! writer.build().unwrap();
//! assert_eq!(writer.as_utf8_string().unwrap(), "{\n    \"id\": 1\n}");
//! ```
//!
//! Options are plain serde data, so a host can load them from its own config:
//!
//! ```rust
//! use typed_doc::WriterOptions;
//!
//! let options: WriterOptions = serde_json::from_str(r#"{"pretty": true}"#).unwrap();
//! assert!(options.pretty);
//! assert!(options.typed_numbers);
//! ```

use serde::{Deserialize, Serialize};

/// Configuration options for canonical text rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    /// Spaces per nesting level in pretty output.
    pub indent: usize,
    /// Emit newlines and indentation.
    pub pretty: bool,
    /// Tag `Byte`, `Short`, `Int` and `Float` values so a reader restores
    /// their exact type. When off they render as bare JSON numbers.
    pub typed_numbers: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            indent: 2,
            pretty: false,
            typed_numbers: true,
        }
    }
}

impl WriterOptions {
    /// Creates default options (compact, typed numbers, 2-space indent for pretty mode).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for indented output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::WriterOptions;
    ///
    /// let options = WriterOptions::pretty();
    /// assert!(options.pretty);
    /// assert_eq!(options.indent, 2);
    /// ```
    #[must_use]
    pub fn pretty() -> Self {
        WriterOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the indentation size. Only affects pretty output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Turns type tags for narrow numeric types on or off.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::{to_string_with_options, Value, WriterOptions};
    ///
    /// let options = WriterOptions::new().with_typed_numbers(false);
    /// assert_eq!(to_string_with_options(&Value::Short(7), &options), "7");
    /// ```
    #[must_use]
    pub fn with_typed_numbers(mut self, typed_numbers: bool) -> Self {
        self.typed_numbers = typed_numbers;
        self
    }
}
