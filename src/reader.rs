//! Reading canonical text back into values.
//!
//! The [`Reader`] accepts exactly what the renderer produces and rebuilds an
//! equal [`Value`] tree. A single-member object whose key is one of the
//! [`tags`](crate::tags) and whose member has the expected shape decodes into
//! the tagged type, and `{"$field":[name,value]}` unwraps into the one-field
//! map it escapes. Every other object is an ordinary map.
//!
//! Bare integer literals read as `Long` and all other number literals as
//! `Double`, mirroring how the renderer writes those two types untagged.
//!
//! ## Usage
//!
//! ```rust
//! use typed_doc::{from_str, Value};
//!
//! let value = from_str(r#"{"n":{"$numberShort":7},"d":{"$decimal":"0.50"}}"#).unwrap();
//! assert_eq!(value.get("n"), Some(&Value::Short(7)));
//! assert_eq!(value.get("d").unwrap().as_decimal().unwrap().scale(), 2);
//! ```

use crate::context::MAX_NESTING;
use crate::ser::tags;
use crate::value::{DATE_FORMAT, TIMESTAMP_FORMAT, TIME_FORMAT};
use crate::{Binary, Decimal, DocMap, Error, Interval, Result, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Nesting limit guarding the recursive descent.
///
/// Each writer container can cost two levels in text (an escaped single field
/// adds an object and an array), plus the root and one level for a tagged leaf.
const MAX_DEPTH: usize = 2 * (MAX_NESTING + 1) + 1;

/// Parses canonical text into a [`Value`].
pub struct Reader<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Reader {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
        }
    }

    /// Reads one complete value; trailing non-whitespace input is an error.
    pub fn read_document(&mut self) -> Result<Value> {
        let value = self.parse_value()?;
        self.skip_whitespace();
        if !self.at_end() {
            return Err(self.error("Trailing characters after document"));
        }
        Ok(value)
    }

    fn error(&self, msg: &str) -> Error {
        Error::syntax(self.line, self.column, msg)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if matches!(ch, ' ' | '\t' | '\n' | '\r') {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.next_char() {
            Some(ch) if ch == expected => Ok(()),
            Some(_) => Err(self.error(&format!("Expected '{}'", expected))),
            None => Err(self.error(&format!("Unexpected end of input, expected '{}'", expected))),
        }
    }

    fn parse_literal(&mut self, word: &str, value: Value) -> Result<Value> {
        if self.input[self.position..].starts_with(word) {
            for _ in 0..word.len() {
                self.next_char();
            }
            Ok(value)
        } else {
            Err(self.error("Unexpected token"))
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();

        match self.peek_char() {
            Some('{') => self.nested(Self::parse_map),
            Some('[') => self.nested(Self::parse_array),
            Some('"') => Ok(Value::String(self.parse_string()?)),
            Some('t') => self.parse_literal("true", Value::Bool(true)),
            Some('f') => self.parse_literal("false", Value::Bool(false)),
            Some('n') => self.parse_literal("null", Value::Null),
            Some(ch) if ch.is_ascii_digit() || ch == '-' => self.parse_number(),
            Some(_) => Err(self.error("Unexpected character")),
            None => Err(self.error("Unexpected end of input, expected a value")),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<Value>) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("Document nested too deeply"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_string(&mut self) -> Result<String> {
        self.expect('"')?;
        let mut result = String::new();

        loop {
            match self.next_char() {
                Some('"') => return Ok(result),
                Some('\\') => match self.next_char() {
                    Some('"') => result.push('"'),
                    Some('\\') => result.push('\\'),
                    Some('/') => result.push('/'),
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('b') => result.push('\u{0008}'),
                    Some('f') => result.push('\u{000C}'),
                    Some('u') => {
                        let ch = self.parse_unicode_escape()?;
                        result.push(ch);
                    }
                    Some(_) => return Err(self.error("Invalid escape sequence")),
                    None => return Err(self.error("Unexpected end of input in string")),
                },
                Some(ch) => result.push(ch),
                None => return Err(self.error("Unterminated string")),
            }
        }
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .next_char()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| self.error("Invalid unicode escape (expected 4 hex digits)"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let high = self.parse_hex4()?;
        let code = if (0xD800..0xDC00).contains(&high) {
            // Surrogate pair
            self.expect('\\')?;
            self.expect('u')?;
            let low = self.parse_hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.error("Invalid low surrogate"));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        char::from_u32(code).ok_or_else(|| self.error("Invalid unicode code point"))
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.position;
        let mut is_float = false;

        if self.peek_char() == Some('-') {
            self.next_char();
        }
        while let Some(ch) = self.peek_char() {
            match ch {
                '0'..='9' => {}
                '.' | 'e' | 'E' => is_float = true,
                '+' | '-' if is_float => {}
                _ => break,
            }
            self.next_char();
        }

        let literal = &self.input[start..self.position];
        if is_float {
            literal
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| self.error("Invalid number"))
        } else {
            literal
                .parse::<i64>()
                .map(Value::Long)
                .map_err(|_| self.error("Invalid integer or integer out of range"))
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut elements = Vec::new();

        self.skip_whitespace();
        if self.peek_char() == Some(']') {
            self.next_char();
            return Ok(Value::Array(elements));
        }

        loop {
            elements.push(self.parse_value()?);
            self.skip_whitespace();
            match self.next_char() {
                Some(',') => continue,
                Some(']') => return Ok(Value::Array(elements)),
                _ => return Err(self.error("Expected ',' or ']' in array")),
            }
        }
    }

    fn parse_map(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut map = DocMap::new();

        self.skip_whitespace();
        if self.peek_char() == Some('}') {
            self.next_char();
            return Ok(Value::Map(map));
        }

        loop {
            self.skip_whitespace();
            let name = self.parse_string()?;
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(name, value);

            self.skip_whitespace();
            match self.next_char() {
                Some(',') => continue,
                Some('}') => break,
                _ => return Err(self.error("Expected ',' or '}' in object")),
            }
        }

        Ok(decode_tagged(&map).unwrap_or(Value::Map(map)))
    }
}

/// Parses canonical text into a [`Value`].
///
/// # Errors
///
/// Returns [`Error::Syntax`] with line and column for malformed input.
pub fn from_str(s: &str) -> Result<Value> {
    Reader::new(s).read_document()
}

/// Parses UTF-8 canonical text into a [`Value`].
///
/// # Errors
///
/// Returns [`Error::Syntax`] if the bytes are not UTF-8 or not valid canonical text.
pub fn from_slice(v: &[u8]) -> Result<Value> {
    let s = std::str::from_utf8(v)
        .map_err(|e| Error::syntax(1, e.valid_up_to() + 1, "Input is not valid UTF-8"))?;
    from_str(s)
}

/// Decodes a single-member tagged object, or returns `None` if `map` is not one.
fn decode_tagged(map: &DocMap) -> Option<Value> {
    if map.len() != 1 {
        return None;
    }
    let (tag, payload) = map.iter().next()?;

    match (tag.as_str(), payload) {
        (tags::BYTE, Value::Long(v)) => i8::try_from(*v).ok().map(Value::Byte),
        (tags::SHORT, Value::Long(v)) => i16::try_from(*v).ok().map(Value::Short),
        (tags::INT, Value::Long(v)) => i32::try_from(*v).ok().map(Value::Int),
        (tags::FLOAT, Value::Double(v)) => Some(Value::Float(*v as f32)),
        (tags::FLOAT, Value::Long(v)) => Some(Value::Float(*v as f32)),
        (tags::FLOAT, Value::String(s)) => non_finite(s).map(|v| Value::Float(v as f32)),
        (tags::DOUBLE, Value::String(s)) => non_finite(s).map(Value::Double),
        (tags::DECIMAL, Value::String(s)) => s.parse::<Decimal>().ok().map(Value::Decimal),
        (tags::BINARY, Value::String(s)) => Binary::from_base64(s).ok().map(Value::Binary),
        (tags::DATE, Value::String(s)) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .ok()
            .map(Value::Date),
        (tags::TIME, Value::String(s)) => NaiveTime::parse_from_str(s, TIME_FORMAT)
            .ok()
            .map(Value::Time),
        (tags::TIMESTAMP, Value::String(s)) => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .ok()
            .map(Value::Timestamp),
        (tags::INTERVAL, Value::Long(v)) => Some(Value::Interval(Interval::from_millis(*v))),
        (tags::FIELD, Value::Array(items)) => match items.as_slice() {
            [Value::String(name), value] => {
                let mut escaped = DocMap::with_capacity(1);
                escaped.insert(name.clone(), value.clone());
                Some(Value::Map(escaped))
            }
            _ => None,
        },
        _ => None,
    }
}

fn non_finite(name: &str) -> Option<f64> {
    match name {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}
