//! ISBN-10 / ISBN-13 checksums and input normalization.
//!
//! All functions operate on raw bytes and fail closed: a wrong length or any
//! unexpected character yields `false` / `None`.

const ISBN10_LEN: usize = 10;
const ISBN13_LEN: usize = 13;

/// Which ISBN form a validated input has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsbnKind {
    Isbn10,
    Isbn13,
}

/// Remove every space and hyphen. No other character is touched.
pub fn normalize(input: &str) -> String {
    input.chars().filter(|ch| *ch != ' ' && *ch != '-').collect()
}

/// Normalize and classify `input`, returning `None` unless it carries a valid checksum.
pub fn classify(input: &str) -> Option<IsbnKind> {
    let normalized = normalize(input);
    match normalized.len() {
        ISBN10_LEN if isbn10_is_valid(&normalized) => Some(IsbnKind::Isbn10),
        ISBN13_LEN if isbn13_is_valid(&normalized) => Some(IsbnKind::Isbn13),
        _ => None,
    }
}

pub fn is_valid(input: &str) -> bool {
    classify(input).is_some()
}

/// Validate an ISBN-10: weights 10..1, upper-case `X` allowed as the last character.
pub fn isbn10_is_valid(isbn: &str) -> bool {
    let bytes = isbn.as_bytes();
    if bytes.len() != ISBN10_LEN {
        return false;
    }

    let mut sum = 0_u32;
    for (index, byte) in bytes.iter().enumerate() {
        let weight = (ISBN10_LEN - index) as u32;
        let value = match byte {
            b'0'..=b'9' => u32::from(byte - b'0'),
            b'X' if index == ISBN10_LEN - 1 => 10,
            _ => return false,
        };
        sum += value * weight;
    }

    sum % 11 == 0
}

/// Validate an ISBN-13: digits only, weights alternate 1, 3, 1, 3, ...
pub fn isbn13_is_valid(isbn: &str) -> bool {
    let bytes = isbn.as_bytes();
    if bytes.len() != ISBN13_LEN {
        return false;
    }

    let mut sum = 0_u32;
    for (index, byte) in bytes.iter().enumerate() {
        if !byte.is_ascii_digit() {
            return false;
        }
        let weight = if index % 2 == 0 { 1 } else { 3 };
        sum += u32::from(byte - b'0') * weight;
    }

    sum % 10 == 0
}

/// Check character completing a 9-digit ISBN-10 body.
pub fn isbn10_check_digit(body: &str) -> Option<char> {
    let bytes = body.as_bytes();
    if bytes.len() != ISBN10_LEN - 1 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let sum: u32 = bytes
        .iter()
        .enumerate()
        .map(|(index, byte)| u32::from(byte - b'0') * (ISBN10_LEN - index) as u32)
        .sum();
    match (11 - sum % 11) % 11 {
        10 => Some('X'),
        digit => char::from_digit(digit, 10),
    }
}

/// Check digit completing a 12-digit ISBN-13 body.
pub fn isbn13_check_digit(body: &str) -> Option<char> {
    let bytes = body.as_bytes();
    if bytes.len() != ISBN13_LEN - 1 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let sum: u32 = bytes
        .iter()
        .enumerate()
        .map(|(index, byte)| u32::from(byte - b'0') * if index % 2 == 0 { 1 } else { 3 })
        .sum();
    char::from_digit((10 - sum % 10) % 10, 10)
}
