//! Canonical text rendering.
//!
//! This module provides the [`Renderer`] that walks a finished [`Value`] tree
//! depth-first and emits the canonical text encoding: JSON, with every type
//! plain JSON cannot express wrapped in a single-member object whose key is a
//! type tag from [`tags`].
//!
//! ## Encoding
//!
//! | Value     | Text |
//! |-----------|------|
//! | Long      | `123456789` |
//! | Double    | `10.0`, `1e300` (always has `.` or `e`) |
//! | Int       | `{"$numberInt":32000}` |
//! | Short     | `{"$numberShort":1000}` |
//! | Byte      | `{"$numberByte":16}` |
//! | Float     | `{"$numberFloat":10.123}` |
//! | Decimal   | `{"$decimal":"1.3456"}` |
//! | Binary    | `{"$binary":"AAECAwQ="}` |
//! | Date      | `{"$dateDay":"2010-01-10"}` |
//! | Time      | `{"$time":"19:15:12"}` |
//! | Timestamp | `{"$date":"2010-10-15T14:20:00"}` |
//! | Interval  | `{"$interval":10234567}` |
//!
//! NaN and infinities cannot be JSON numbers; they render as tagged strings
//! (`{"$numberDouble":"NaN"}`) regardless of options.
//!
//! A user map with exactly one field whose name is a reserved tag renders as
//! `{"$field":[name,value]}`, so it reads back as a map and not as the tagged
//! type its key names.
//!
//! ## Usage
//!
//! ```rust
//! use typed_doc::{to_string, to_string_pretty, doc};
//!
//! let value = doc!({ "a": 1, "b": [true, null] });
//! assert_eq!(to_string(&value), r#"{"a":{"$numberInt":1},"b":[true,null]}"#);
//! assert!(to_string_pretty(&value).contains('\n'));
//! ```

use crate::value::{DATE_FORMAT, TIMESTAMP_FORMAT, TIME_FORMAT};
use crate::{DocMap, Value, WriterOptions};
use std::fmt::Write;

/// Type tags used by the canonical text encoding.
pub mod tags {
    pub const BYTE: &str = "$numberByte";
    pub const SHORT: &str = "$numberShort";
    pub const INT: &str = "$numberInt";
    pub const FLOAT: &str = "$numberFloat";
    pub const DOUBLE: &str = "$numberDouble";
    pub const DECIMAL: &str = "$decimal";
    pub const BINARY: &str = "$binary";
    pub const DATE: &str = "$dateDay";
    pub const TIME: &str = "$time";
    pub const TIMESTAMP: &str = "$date";
    pub const INTERVAL: &str = "$interval";
    /// Wraps a single-member map whose own key is reserved, as `[name, value]`.
    pub const FIELD: &str = "$field";

    /// Keys that turn a single-member map into a tagged value on read.
    pub const RESERVED: [&str; 12] = [
        BYTE, SHORT, INT, FLOAT, DOUBLE, DECIMAL, BINARY, DATE, TIME, TIMESTAMP, INTERVAL, FIELD,
    ];

    #[must_use]
    pub fn is_reserved(key: &str) -> bool {
        RESERVED.contains(&key)
    }
}

/// Renders value trees into canonical text.
pub struct Renderer {
    output: String,
    options: WriterOptions,
    indent_level: usize,
}

impl Renderer {
    pub fn new(options: WriterOptions) -> Self {
        Renderer {
            output: String::with_capacity(256),
            options,
            indent_level: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends the rendering of `value` to the output.
    pub fn render(&mut self, value: &Value) {
        let typed = self.options.typed_numbers;

        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::String(s) => self.write_string(s),
            Value::Byte(v) => self.write_integer(tags::BYTE, i64::from(*v), typed),
            Value::Short(v) => self.write_integer(tags::SHORT, i64::from(*v), typed),
            Value::Int(v) => self.write_integer(tags::INT, i64::from(*v), typed),
            Value::Long(v) => {
                let _ = write!(self.output, "{}", v);
            }
            Value::Float(v) => {
                if v.is_finite() {
                    self.write_float(tags::FLOAT, &format!("{:?}", v), typed);
                } else {
                    self.write_tagged_string(tags::FLOAT, non_finite_name(f64::from(*v)));
                }
            }
            Value::Double(v) => {
                if v.is_finite() {
                    self.write_float(tags::DOUBLE, &format!("{:?}", v), false);
                } else {
                    self.write_tagged_string(tags::DOUBLE, non_finite_name(*v));
                }
            }
            Value::Decimal(d) => self.write_tagged_string(tags::DECIMAL, &d.to_canonical_text()),
            Value::Binary(b) => self.write_tagged_string(tags::BINARY, &b.to_base64()),
            Value::Date(d) => {
                self.write_tagged_string(tags::DATE, &d.format(DATE_FORMAT).to_string())
            }
            Value::Time(t) => {
                self.write_tagged_string(tags::TIME, &t.format(TIME_FORMAT).to_string())
            }
            Value::Timestamp(ts) => self.write_tagged_string(
                tags::TIMESTAMP,
                &ts.format(TIMESTAMP_FORMAT).to_string(),
            ),
            Value::Interval(i) => {
                self.open_tag(tags::INTERVAL);
                let _ = write!(self.output, "{}", i.millis());
                self.output.push('}');
            }
            Value::Array(arr) => self.write_array(arr),
            Value::Map(map) => self.write_map(map),
        }
    }

    fn write_integer(&mut self, tag: &str, v: i64, tagged: bool) {
        if tagged {
            self.open_tag(tag);
        }
        let _ = write!(self.output, "{}", v);
        if tagged {
            self.output.push('}');
        }
    }

    fn write_float(&mut self, tag: &str, literal: &str, tagged: bool) {
        if tagged {
            self.open_tag(tag);
        }
        self.output.push_str(literal);
        if tagged {
            self.output.push('}');
        }
    }

    fn write_tagged_string(&mut self, tag: &str, text: &str) {
        self.open_tag(tag);
        self.write_string(text);
        self.output.push('}');
    }

    /// Writes `{"tag":` and leaves the object open for the payload.
    fn open_tag(&mut self, tag: &str) {
        self.output.push('{');
        self.write_string(tag);
        self.output.push(':');
        if self.options.pretty {
            self.output.push(' ');
        }
    }

    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\u{0008}' => self.output.push_str("\\b"),
                '\u{000C}' => self.output.push_str("\\f"),
                c if (c as u32) < 0x20 => {
                    let _ = write!(self.output, "\\u{:04x}", c as u32);
                }
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
    }

    fn write_newline_indent(&mut self) {
        if self.options.pretty {
            self.output.push('\n');
            let width = self.options.indent * self.indent_level;
            self.output.extend(std::iter::repeat(' ').take(width));
        }
    }

    fn write_array(&mut self, arr: &[Value]) {
        if arr.is_empty() {
            self.output.push_str("[]");
            return;
        }

        self.output.push('[');
        self.indent_level += 1;
        for (i, element) in arr.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.write_newline_indent();
            self.render(element);
        }
        self.indent_level -= 1;
        self.write_newline_indent();
        self.output.push(']');
    }

    fn write_map(&mut self, map: &DocMap) {
        if map.is_empty() {
            self.output.push_str("{}");
            return;
        }
        if map.len() == 1 {
            if let Some((name, value)) = map.iter().next().filter(|(k, _)| tags::is_reserved(k)) {
                self.write_escaped_field(name, value);
                return;
            }
        }

        self.output.push('{');
        self.indent_level += 1;
        for (i, (name, value)) in map.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.write_newline_indent();
            self.write_string(name);
            self.output.push(':');
            if self.options.pretty {
                self.output.push(' ');
            }
            self.render(value);
        }
        self.indent_level -= 1;
        self.write_newline_indent();
        self.output.push('}');
    }

    /// Writes `{"$field":[name,value]}` so the reader cannot mistake the map for a tag.
    fn write_escaped_field(&mut self, name: &str, value: &Value) {
        self.open_tag(tags::FIELD);
        self.output.push('[');
        self.write_string(name);
        self.output.push(',');
        if self.options.pretty {
            self.output.push(' ');
        }
        self.render(value);
        self.output.push_str("]}");
    }
}

fn non_finite_name(v: f64) -> &'static str {
    if v.is_nan() {
        "NaN"
    } else if v.is_sign_negative() {
        "-Infinity"
    } else {
        "Infinity"
    }
}
