//! Exact decimal positions on the arrangement timeline.
//!
//! Live stores clip bounds and note times as decimal strings in beats
//! ("16", "16.25", "0.3333333333"). `Ticks` keeps them as a reduced
//! `Ratio<i64>` with a denominator dividing 10^9, so loop arithmetic
//! (floor division, remainder, repeated addition) is exact and adjacent
//! sub-events share identical boundary values.
use std::fmt;
use std::ops::{Add, Mul, Sub};

use num_rational::Ratio;
use serde::{Serialize, Serializer};

/// Fractional digits kept when parsing. Anything beyond is rounded.
const FRACTION_DIGITS: usize = 9;
const SCALE: i64 = 1_000_000_000;
/// Integer digits accepted. Keeps `numer * SCALE` well inside `i64`.
const MAX_INTEGER_DIGITS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticks(Ratio<i64>);

impl Ticks {
    pub const ZERO: Ticks = Ticks(Ratio::new_raw(0, 1));

    pub fn from_integer(value: i64) -> Self {
        Ticks(Ratio::from_integer(value))
    }

    /// Parse a decimal string such as `"-3"`, `"16.25"` or `"1.5e2"`.
    ///
    /// Returns `None` for anything that is not a finite decimal number or
    /// whose integer part exceeds nine digits.
    pub fn parse(text: &str) -> Option<Self> {
        parse_decimal(text.trim()).map(Ticks)
    }

    pub fn is_positive(&self) -> bool {
        *self.0.numer() > 0
    }

    pub fn is_zero(&self) -> bool {
        *self.0.numer() == 0
    }

    /// `floor(self / period)` and `self mod period` for a positive period.
    /// The remainder is always in `[0, period)`.
    pub fn div_rem_floor(self, period: Ticks) -> (i64, Ticks) {
        let quotient = (self.0 / period.0).floor().to_integer();
        let remainder = self.0 - period.0 * Ratio::from_integer(quotient);
        (quotient, Ticks(remainder))
    }

    pub fn to_f64(self) -> f64 {
        *self.0.numer() as f64 / *self.0.denom() as f64
    }
}

impl Add for Ticks {
    type Output = Ticks;

    fn add(self, rhs: Ticks) -> Ticks {
        Ticks(self.0 + rhs.0)
    }
}

impl Sub for Ticks {
    type Output = Ticks;

    fn sub(self, rhs: Ticks) -> Ticks {
        Ticks(self.0 - rhs.0)
    }
}

impl Mul<i64> for Ticks {
    type Output = Ticks;

    fn mul(self, rhs: i64) -> Ticks {
        Ticks(self.0 * Ratio::from_integer(rhs))
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.to_integer())
        } else {
            write!(f, "{}", self.to_f64())
        }
    }
}

/// Whole values serialize as JSON integers, everything else as a float.
impl Serialize for Ticks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_integer() {
            serializer.serialize_i64(self.0.to_integer())
        } else {
            serializer.serialize_f64(self.to_f64())
        }
    }
}

fn parse_decimal(text: &str) -> Option<Ratio<i64>> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(pos) => (&unsigned[..pos], unsigned[pos + 1..].parse::<i32>().ok()?),
        None => (unsigned, 0),
    };

    let (int_part, frac_part) = match mantissa.find('.') {
        Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    // Move the decimal point by the exponent over the combined digit string.
    let digits: String = [int_part, frac_part].concat();
    let point = int_part.len() as i64 + exponent as i64;
    if point > (digits.len() + MAX_INTEGER_DIGITS) as i64 {
        return None;
    }
    let (int_digits, frac_digits) = if point <= 0 {
        let zeros = "0".repeat(point.unsigned_abs().min(64) as usize);
        (String::new(), zeros + &digits)
    } else if point as usize >= digits.len() {
        let zeros = "0".repeat(point as usize - digits.len());
        (digits + &zeros, String::new())
    } else {
        let (i, f) = digits.split_at(point as usize);
        (i.to_string(), f.to_string())
    };

    let int_digits = int_digits.trim_start_matches('0');
    if int_digits.len() > MAX_INTEGER_DIGITS {
        return None;
    }
    let whole: i64 = if int_digits.is_empty() {
        0
    } else {
        int_digits.parse().ok()?
    };

    let mut frac: i64 = 0;
    for (i, b) in frac_digits.bytes().take(FRACTION_DIGITS).enumerate() {
        frac += i64::from(b - b'0') * 10_i64.pow((FRACTION_DIGITS - 1 - i) as u32);
    }
    if frac_digits.len() > FRACTION_DIGITS && frac_digits.as_bytes()[FRACTION_DIGITS] >= b'5' {
        frac += 1;
    }

    let numer = whole * SCALE + frac;
    Some(Ratio::new(if negative { -numer } else { numer }, SCALE))
}
