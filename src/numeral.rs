//! Chapter number parsing.
//!
//! Chapter headers number their chapters either with ASCII digits (`第12章`)
//! or with Chinese numerals (`第十二章`). Chinese numerals are first read as a
//! compound numeral with magnitude words; runs that are not a valid compound
//! (`一二三`) are then read glyph by glyph as decimal digits.

use thiserror::Error;

/// A single Chinese numeral glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numeral {
    /// `零` through `九`.
    Digit(u32),
    /// Magnitude words `十`, `百`, `千`, `万`.
    Unit(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumeralError {
    #[error("empty chapter number")]
    Empty,

    #[error("'{0}' is not a numeral character")]
    NotNumeral(char),

    #[error("'{0}' is a magnitude word, expected a plain digit")]
    NotDigit(char),

    #[error("malformed compound numeral: {0}")]
    Malformed(String),

    #[error("chapter number is too large")]
    Overflow,
}

pub type Result<T> = std::result::Result<T, NumeralError>;

const WAN: u32 = 10_000;

/// Look up the value of a Chinese numeral glyph.
pub fn numeral_char(c: char) -> Option<Numeral> {
    let numeral = match c {
        '零' => Numeral::Digit(0),
        '一' => Numeral::Digit(1),
        '二' => Numeral::Digit(2),
        '三' => Numeral::Digit(3),
        '四' => Numeral::Digit(4),
        '五' => Numeral::Digit(5),
        '六' => Numeral::Digit(6),
        '七' => Numeral::Digit(7),
        '八' => Numeral::Digit(8),
        '九' => Numeral::Digit(9),
        '十' => Numeral::Unit(10),
        '百' => Numeral::Unit(100),
        '千' => Numeral::Unit(1000),
        '万' => Numeral::Unit(WAN),
        _ => return None,
    };
    Some(numeral)
}

/// Whether `c` may appear in the number of a chapter header.
#[inline]
pub fn is_numeral_char(c: char) -> bool {
    c.is_ascii_digit() || numeral_char(c).is_some()
}

/// Parse the digit run of a chapter header into a chapter id.
///
/// A run starting with an ASCII digit must be entirely ASCII. Anything else
/// is a Chinese numeral: compound parsing is tried first and, when it fails,
/// the digit-by-digit reading decides the result.
pub fn parse_chapter_number(digits: &[char]) -> Result<i64> {
    let first = digits.first().ok_or(NumeralError::Empty)?;
    let run: String = digits.iter().collect();

    if first.is_ascii_digit() {
        return parse_arabic(&run);
    }

    parse_chinese_number(&run).or_else(|_| parse_digitwise(&run))
}

fn parse_arabic(run: &str) -> Result<i64> {
    if let Some(c) = run.chars().find(|c| !c.is_ascii_digit()) {
        return Err(NumeralError::NotNumeral(c));
    }
    run.parse().map_err(|_| NumeralError::Overflow)
}

/// Parse a compound Chinese numeral such as `一百二十三` or `三万零五`.
///
/// Within each 万 group magnitudes must strictly decrease, two digits may
/// not follow each other, and `零` marks a skipped place. A bare `十` counts
/// as `一十`. A trailing digit directly after `百`, `千` or `万` fills the
/// next lower place (`一百五` is 150).
pub fn parse_chinese_number(s: &str) -> Result<i64> {
    if s.is_empty() {
        return Err(NumeralError::Empty);
    }
    let malformed = || NumeralError::Malformed(s.to_string());

    let mut total: i64 = 0;
    let mut section: i64 = 0;
    // digit waiting for its magnitude, with the glyph that preceded it
    let mut pending: Option<(i64, Option<Numeral>)> = None;
    let mut smallest_unit: Option<u32> = None;
    let mut after_zero = false;
    let mut seen_wan = false;
    let mut prev: Option<Numeral> = None;

    for c in s.chars() {
        let numeral = numeral_char(c).ok_or(NumeralError::NotNumeral(c))?;
        match numeral {
            Numeral::Digit(0) => {
                if pending.is_some() || after_zero {
                    return Err(malformed());
                }
                after_zero = true;
            }
            Numeral::Digit(d) => {
                if pending.is_some() {
                    return Err(malformed());
                }
                pending = Some((i64::from(d), prev));
            }
            Numeral::Unit(WAN) => {
                if seen_wan {
                    return Err(malformed());
                }
                section += pending.take().map_or(0, |(d, _)| d);
                if section == 0 {
                    return Err(malformed());
                }
                total = section * i64::from(WAN);
                section = 0;
                smallest_unit = None;
                after_zero = false;
                seen_wan = true;
            }
            Numeral::Unit(unit) => {
                if smallest_unit.is_some_and(|smallest| unit >= smallest) {
                    return Err(malformed());
                }
                let multiplier = match pending.take() {
                    Some((d, _)) => d,
                    None if unit == 10 => 1,
                    None => return Err(malformed()),
                };
                section += multiplier * i64::from(unit);
                smallest_unit = Some(unit);
                after_zero = false;
            }
        }
        prev = Some(numeral);
    }

    let tail = match pending {
        Some((d, Some(Numeral::Unit(unit)))) if unit >= 100 => d * i64::from(unit / 10),
        Some((d, _)) => d,
        None => 0,
    };

    Ok(total + section + tail)
}

/// Read every glyph as one decimal digit, leftmost glyph highest (`一二三` is 123).
///
/// Only `零` through `九` are accepted; magnitude words are an error.
pub fn parse_digitwise(s: &str) -> Result<i64> {
    if s.is_empty() {
        return Err(NumeralError::Empty);
    }

    s.chars().try_fold(0i64, |acc, c| match numeral_char(c) {
        Some(Numeral::Digit(d)) => acc
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(d)))
            .ok_or(NumeralError::Overflow),
        Some(Numeral::Unit(_)) => Err(NumeralError::NotDigit(c)),
        None => Err(NumeralError::NotNumeral(c)),
    })
}
