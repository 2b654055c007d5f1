//! Alpha-5 catalog numbers.
//!
//! The five TLE columns reserved for the catalog number overflow at 99999.
//! Numbers 100000..=339999 are written with a leading letter standing for the
//! ten-thousands (A = 10, ..., Z = 33, skipping I and O).

use thiserror::Error;

/// Largest catalog number Alpha-5 can express, written "Z9999".
pub const ALPHA5_MAX: u32 = 339_999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Alpha5Error {
    #[error("satellite number {0} exceeds 339999, whose Alpha 5 encoding is 'Z9999'")]
    TooLarge(u32),
    #[error("catalog number cannot be empty")]
    Empty,
    #[error("invalid catalog number {0:?}")]
    Invalid(String),
}

pub fn to_alpha5(n: u32) -> Result<String, Alpha5Error> {
    if n < 100_000 {
        return Ok(format!("{n:05}"));
    }
    if n > ALPHA5_MAX {
        return Err(Alpha5Error::TooLarge(n));
    }

    let mut letter = (n / 10_000) as u8 - 10 + b'A';
    if letter >= b'I' {
        letter += 1;
    }
    if letter >= b'O' {
        letter += 1;
    }
    Ok(format!("{}{:04}", letter as char, n % 10_000))
}

/// Decode a catalog number field, accepting plain digits or Alpha-5.
pub fn from_alpha5(s: &str) -> Result<u32, Alpha5Error> {
    let s = s.trim();
    let first = s.chars().next().ok_or(Alpha5Error::Empty)?;
    let invalid = || Alpha5Error::Invalid(s.to_string());

    if !first.is_ascii_alphabetic() {
        return s.parse().map_err(|_| invalid());
    }

    let letter = first.to_ascii_uppercase();
    if letter == 'I' || letter == 'O' {
        return Err(invalid());
    }
    let mut tens = u32::from(letter as u8 - b'A') + 10;
    if letter > 'I' {
        tens -= 1;
    }
    if letter > 'O' {
        tens -= 1;
    }

    let rest = &s[1..];
    if rest.len() != 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let low: u32 = rest.parse().map_err(|_| invalid())?;
    Ok(tens * 10_000 + low)
}
