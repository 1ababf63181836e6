//! Arbitrary-precision fixed-point decimals.
//!
//! A [`Decimal`] is an unscaled [`BigInt`] magnitude plus a non-negative scale;
//! its numeric value is `magnitude × 10^(−scale)`. Nothing here converts
//! through binary floating point, so every construction and rendering is exact.
//!
//! ## Constructing decimals
//!
//! ```rust
//! use typed_doc::Decimal;
//!
//! // From an unscaled magnitude and explicit scale
//! let d = Decimal::from_unscaled(13456, 4).unwrap();
//! assert_eq!(d.to_canonical_text(), "1.3456");
//!
//! // From exact decimal text, keeping its scale
//! let d: Decimal = "12.500".parse().unwrap();
//! assert_eq!(d.scale(), 3);
//!
//! // From a float, via its shortest decimal text
//! let d = Decimal::from_f64(9876.54321).unwrap();
//! assert_eq!(d.to_string(), "9876.54321");
//! ```

use crate::{Error, Result};
use num_bigint::{BigInt, Sign};
use std::fmt;
use std::str::FromStr;

/// Largest exponent magnitude accepted when parsing decimal text.
const MAX_EXPONENT: i64 = 65_535;

/// An exact fixed-point decimal number.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    magnitude: BigInt,
    scale: u32,
}

impl Decimal {
    /// Creates a decimal with a known non-negative scale.
    #[must_use]
    pub fn new(magnitude: BigInt, scale: u32) -> Self {
        Decimal { magnitude, scale }
    }

    /// Creates a decimal from an unscaled magnitude and a scale.
    ///
    /// Magnitudes of any size are accepted; the value is exactly
    /// `magnitude × 10^(−scale)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScale`] if `scale` is negative.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::Decimal;
    ///
    /// let d = Decimal::from_unscaled(i64::MIN, 25).unwrap();
    /// assert_eq!(d.to_string(), "-0.0000009223372036854775808");
    /// assert!(Decimal::from_unscaled(1, -1).is_err());
    /// ```
    pub fn from_unscaled<M: Into<BigInt>>(magnitude: M, scale: i32) -> Result<Self> {
        let scale = u32::try_from(scale).map_err(|_| Error::InvalidScale(i64::from(scale)))?;
        Ok(Decimal::new(magnitude.into(), scale))
    }

    /// Creates a decimal from the shortest decimal text that round-trips `value`.
    ///
    /// `0.1` becomes exactly `0.1` (scale 1), not the binary fraction the float
    /// actually stores.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumber`] for NaN and infinities.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::invalid_number(format!(
                "{} has no decimal representation",
                value
            )));
        }
        // Display for floats never uses exponent notation
        value.to_string().parse()
    }

    /// Creates a decimal from the shortest decimal text that round-trips `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumber`] for NaN and infinities.
    pub fn from_f32(value: f32) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::invalid_number(format!(
                "{} has no decimal representation",
                value
            )));
        }
        value.to_string().parse()
    }

    /// The unscaled magnitude.
    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> &BigInt {
        &self.magnitude
    }

    /// Number of digits to the right of the decimal point.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    #[inline]
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.magnitude.sign() == Sign::Minus
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.magnitude.sign() == Sign::NoSign
    }

    /// Renders plain fixed-point text with exactly `scale` fraction digits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_doc::Decimal;
    ///
    /// assert_eq!(Decimal::from_unscaled(32700, 5).unwrap().to_canonical_text(), "0.32700");
    /// assert_eq!(Decimal::from_unscaled(-5, 0).unwrap().to_canonical_text(), "-5");
    /// ```
    #[must_use]
    pub fn to_canonical_text(&self) -> String {
        let digits = self.magnitude.magnitude().to_string();
        let scale = self.scale as usize;
        let mut out = String::with_capacity(digits.len() + scale + 3);

        if self.is_negative() {
            out.push('-');
        }

        if scale == 0 {
            out.push_str(&digits);
        } else if digits.len() > scale {
            let split = digits.len() - scale;
            out.push_str(&digits[..split]);
            out.push('.');
            out.push_str(&digits[split..]);
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(scale - digits.len()));
            out.push_str(&digits);
        }

        out
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_text())
    }
}

/// Parses `[+-]digits[.digits][(e|E)[+-]digits]` exactly.
///
/// The scale is the number of fraction digits minus the exponent. A negative
/// result is folded into the magnitude, so `"1.5e3"` parses as `1500`, scale 0.
impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid_number(format!("'{}' is not a decimal number", s));

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (mantissa, exponent) = match body.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => {
                let exponent: i64 = body[pos + 1..].parse().map_err(|_| invalid())?;
                (&body[..pos], exponent)
            }
            None => (body, 0),
        };
        if exponent.abs() > MAX_EXPONENT {
            return Err(invalid());
        }

        let (int_part, frac_part) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(invalid());
        }

        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        let mut magnitude = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;

        let mut scale = frac_part.len() as i64 - exponent;
        if scale < 0 {
            magnitude *= BigInt::from(10u32).pow((-scale) as u32);
            scale = 0;
        }
        let scale = u32::try_from(scale).map_err(|_| invalid())?;

        if negative {
            magnitude = -magnitude;
        }

        Ok(Decimal::new(magnitude, scale))
    }
}

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Decimal::new(value, 0)
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Decimal::new(BigInt::from(value), 0)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(BigInt::from(value), 0)
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Decimal::new(BigInt::from(value), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(magnitude: i64, scale: i32) -> String {
        Decimal::from_unscaled(magnitude, scale)
            .unwrap()
            .to_canonical_text()
    }

    #[test]
    fn test_canonical_text() {
        assert_eq!(text(13456, 4), "1.3456");
        assert_eq!(text(32700, 5), "0.32700");
        assert_eq!(text(123456789, 0), "123456789");
        assert_eq!(text(0, 0), "0");
        assert_eq!(text(0, 3), "0.000");
        assert_eq!(text(-1, 2), "-0.01");
        assert_eq!(text(-100, 2), "-1.00");
    }

    #[test]
    fn test_integer_extremes() {
        assert_eq!(text(i32::MAX as i64, 7), "214.7483647");
        assert_eq!(text(i32::MIN as i64, 7), "-214.7483648");
        assert_eq!(text(i64::MAX, 9), "9223372036.854775807");
        assert_eq!(text(i64::MIN, 9), "-9223372036.854775808");
        assert_eq!(text(i32::MAX as i64, 15), "0.000002147483647");
        assert_eq!(text(i32::MIN as i64, 15), "-0.000002147483648");
        assert_eq!(text(i64::MAX, 25), "0.0000009223372036854775807");
        assert_eq!(text(i64::MIN, 25), "-0.0000009223372036854775808");
    }

    #[test]
    fn test_magnitude_beyond_64_bits() {
        let magnitude: BigInt = "123456789012345678901234567890".parse().unwrap();
        let d = Decimal::from_unscaled(magnitude.clone(), 20).unwrap();
        assert_eq!(d.magnitude(), &magnitude);
        assert_eq!(d.to_string(), "1234567890.12345678901234567890");
    }

    #[test]
    fn test_negative_scale_rejected() {
        assert_eq!(
            Decimal::from_unscaled(10, -2).unwrap_err(),
            Error::InvalidScale(-2)
        );
    }

    #[test]
    fn test_parse_keeps_scale() {
        let d: Decimal = "12345.6789".parse().unwrap();
        assert_eq!(d, Decimal::from_unscaled(123456789, 4).unwrap());

        let d: Decimal = "-0.0100".parse().unwrap();
        assert_eq!(d.scale(), 4);
        assert_eq!(d.to_string(), "-0.0100");

        let d: Decimal = "+.5".parse().unwrap();
        assert_eq!(d.to_string(), "0.5");

        let d: Decimal = "7.".parse().unwrap();
        assert_eq!(d.to_string(), "7");
    }

    #[test]
    fn test_parse_exponent() {
        let d: Decimal = "1.5e3".parse().unwrap();
        assert_eq!(d, Decimal::from_unscaled(1500, 0).unwrap());

        let d: Decimal = "25E-4".parse().unwrap();
        assert_eq!(d.to_string(), "0.0025");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "-", ".", "1.2.3", "abc", "1e", "1e99999999", "--1", "1_000"] {
            assert!(input.parse::<Decimal>().is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_from_float_uses_shortest_text() {
        assert_eq!(Decimal::from_f64(9876.54321).unwrap().to_string(), "9876.54321");
        assert_eq!(Decimal::from_f64(0.1).unwrap().to_string(), "0.1");
        assert_eq!(Decimal::from_f64(-0.0).unwrap().to_string(), "0");
        assert_eq!(Decimal::from_f32(10.123).unwrap().to_string(), "10.123");
        assert!(Decimal::from_f64(f64::NAN).is_err());
        assert!(Decimal::from_f32(f32::INFINITY).is_err());
    }

    #[test]
    fn test_from_integers() {
        assert_eq!(Decimal::from(123456789i64).to_string(), "123456789");
        assert_eq!(Decimal::from(u64::MAX).to_string(), "18446744073709551615");
        assert!(Decimal::from(-3i32).is_negative());
        assert!(Decimal::from(0i32).is_zero());
    }
}
