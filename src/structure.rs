// Structure Compiler - BBAN layout descriptors
//
// A descriptor such as "F03F07F02" is a run of 3-character blocks:
// one character class code + a 2-digit length. Compiling it yields a
// matcher that tests whole strings and extracts each block in order.

use crate::error::StructureError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CHARACTER CLASS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharClass {
    /// A: digits, upper/lowercase letters
    Alphanumeric,
    /// B: digits, uppercase letters
    UpperAlphanumeric,
    /// C: upper/lowercase letters
    Alphabetic,
    /// F: digits
    Numeric,
    /// L: lowercase letters
    Lowercase,
    /// U: uppercase letters
    Uppercase,
    /// W: digits, lowercase letters
    LowerAlphanumeric,
}

impl CharClass {
    pub fn from_code(code: char) -> Option<CharClass> {
        match code {
            'A' => Some(CharClass::Alphanumeric),
            'B' => Some(CharClass::UpperAlphanumeric),
            'C' => Some(CharClass::Alphabetic),
            'F' => Some(CharClass::Numeric),
            'L' => Some(CharClass::Lowercase),
            'U' => Some(CharClass::Uppercase),
            'W' => Some(CharClass::LowerAlphanumeric),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            CharClass::Alphanumeric => 'A',
            CharClass::UpperAlphanumeric => 'B',
            CharClass::Alphabetic => 'C',
            CharClass::Numeric => 'F',
            CharClass::Lowercase => 'L',
            CharClass::Uppercase => 'U',
            CharClass::LowerAlphanumeric => 'W',
        }
    }

    /// Does this class admit the given byte?
    pub fn allows(&self, b: u8) -> bool {
        match self {
            CharClass::Alphanumeric => b.is_ascii_alphanumeric(),
            CharClass::UpperAlphanumeric => b.is_ascii_digit() || b.is_ascii_uppercase(),
            CharClass::Alphabetic => b.is_ascii_alphabetic(),
            CharClass::Numeric => b.is_ascii_digit(),
            CharClass::Lowercase => b.is_ascii_lowercase(),
            CharClass::Uppercase => b.is_ascii_uppercase(),
            CharClass::LowerAlphanumeric => b.is_ascii_digit() || b.is_ascii_lowercase(),
        }
    }
}

// ============================================================================
// SEGMENT
// ============================================================================

/// One block of a BBAN: exactly `length` characters of `class`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub class: CharClass,
    pub length: usize,
}

impl Segment {
    fn matches(&self, part: &[u8]) -> bool {
        part.len() == self.length && part.iter().all(|&b| self.class.allows(b))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}", self.class.code(), self.length)
    }
}

// ============================================================================
// STRUCTURE MATCHER
// ============================================================================

/// Compiled form of a structure descriptor
///
/// Matching is anchored at both ends: a candidate must be exactly as long
/// as the sum of segment lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureMatcher {
    segments: Vec<Segment>,
    total_length: usize,
}

impl StructureMatcher {
    /// Compile a descriptor such as "U04F10" into a matcher
    pub fn compile(descriptor: &str) -> Result<Self, StructureError> {
        let bytes = descriptor.as_bytes();
        if bytes.len() % 3 != 0 {
            return Err(StructureError::BadLength(bytes.len()));
        }

        let segments = bytes
            .chunks(3)
            .map(|block| {
                let code = block[0] as char;
                let class = CharClass::from_code(code).ok_or(StructureError::UnknownClass(code))?;

                let (tens, ones) = (block[1], block[2]);
                if !tens.is_ascii_digit() || !ones.is_ascii_digit() {
                    let digits = String::from_utf8_lossy(&block[1..]).into_owned();
                    return Err(StructureError::BadBlockLength(digits));
                }
                let length = ((tens - b'0') * 10 + (ones - b'0')) as usize;

                Ok(Segment { class, length })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total_length = segments.iter().map(|s| s.length).sum();

        Ok(StructureMatcher {
            segments,
            total_length,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of characters a matching string has
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Test whether `candidate` has exactly this shape
    pub fn matches(&self, candidate: &str) -> bool {
        self.extract(candidate).is_some()
    }

    /// Split `candidate` into its blocks, in descriptor order
    ///
    /// Returns `None` unless the whole string matches.
    pub fn extract<'a>(&self, candidate: &'a str) -> Option<Vec<&'a str>> {
        if candidate.len() != self.total_length {
            return None;
        }

        let bytes = candidate.as_bytes();
        let mut parts = Vec::with_capacity(self.segments.len());
        let mut offset = 0;

        for segment in &self.segments {
            let end = offset + segment.length;
            if !segment.matches(&bytes[offset..end]) {
                return None;
            }
            // Every matched byte is ASCII, so offsets are char boundaries
            parts.push(&candidate[offset..end]);
            offset = end;
        }

        Some(parts)
    }
}

impl fmt::Display for StructureMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
