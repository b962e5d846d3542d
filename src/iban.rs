// Public surface - normalizing operations over the built-in registry
//
// Predicates (is_valid, is_valid_bban) never fail: unknown countries,
// bad shapes and bad checksums all collapse to `false`.
// Extractive/generative operations (to_bban, from_bban) raise IbanError.

use crate::error::{IbanError, Result};
use crate::format::{electronic_format, print_format, DEFAULT_SEPARATOR};
use crate::registry::registry;
use crate::specification::{CountrySpec, HEADER_LENGTH};
use log::trace;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// TOP-LEVEL OPERATIONS
// ============================================================================

/// Is `iban` a valid IBAN? Input may contain separators and lowercase.
pub fn is_valid(iban: &str) -> bool {
    let iban = electronic_format(iban);
    match registry().for_iban(&iban) {
        Some(spec) => spec.validate(&iban),
        None => {
            trace!("No country specification for {:?}", iban.get(..2));
            false
        }
    }
}

/// Extract the BBAN of `iban`, blocks joined by `separator`
///
/// Example: to_bban("BE68 5390 0754 7034", "-") → "539-0075470-34"
pub fn to_bban(iban: &str, separator: &str) -> Result<String> {
    let iban = electronic_format(iban);
    let code = iban.get(..2).unwrap_or(iban.as_str());
    registry().lookup(code)?.to_bban(&iban, separator)
}

/// Build a full IBAN from a country code and BBAN
///
/// Example: from_bban("BE", "539007547034") → "BE68539007547034"
pub fn from_bban(country_code: &str, bban: &str) -> Result<String> {
    registry().lookup(country_code)?.from_bban(&electronic_format(bban))
}

/// Is `bban` a valid BBAN for `country_code`?
pub fn is_valid_bban(country_code: &str, bban: &str) -> bool {
    registry()
        .get(country_code)
        .map(|spec| spec.is_valid_bban(&electronic_format(bban)))
        .unwrap_or(false)
}

/// All known country specifications, keyed by country code
pub fn available_countries() -> &'static BTreeMap<String, CountrySpec> {
    registry().all()
}

// ============================================================================
// IBAN VALUE
// ============================================================================

/// A validated IBAN, stored in electronic format
///
/// Displays in print format ("BE68 5390 0754 7034") and serializes as the
/// electronic string ("BE68539007547034").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iban {
    electronic: String,
}

impl Iban {
    /// Normalize and validate `input` against the built-in registry
    pub fn parse(input: &str) -> Result<Self> {
        let electronic = electronic_format(input);
        let code = electronic.get(..2).unwrap_or(electronic.as_str());
        let spec = registry().lookup(code)?;

        spec.check(&electronic).map_err(IbanError::InvalidIban)?;

        Ok(Iban { electronic })
    }

    /// Build an IBAN from its country and BBAN, generating check digits
    pub fn from_bban(country_code: &str, bban: &str) -> Result<Self> {
        from_bban(country_code, bban).map(|electronic| Iban { electronic })
    }

    pub fn country_code(&self) -> &str {
        &self.electronic[..2]
    }

    pub fn check_digits(&self) -> &str {
        &self.electronic[2..HEADER_LENGTH]
    }

    pub fn bban(&self) -> &str {
        &self.electronic[HEADER_LENGTH..]
    }

    pub fn electronic(&self) -> &str {
        &self.electronic
    }

    /// Grouped every 4 characters with `separator`
    pub fn print(&self, separator: &str) -> String {
        print_format(&self.electronic, separator)
    }

    /// The country specification this IBAN was validated against
    pub fn spec(&self) -> &'static CountrySpec {
        registry()
            .get(self.country_code())
            .expect("Iban values are only built for registered countries")
    }

    /// BBAN split along the country's structure blocks
    pub fn bban_segments(&self, separator: &str) -> String {
        self.spec()
            .to_bban(&self.electronic, separator)
            .unwrap_or_else(|_| self.bban().to_string())
    }
}

impl FromStr for Iban {
    type Err = IbanError;

    fn from_str(s: &str) -> Result<Self> {
        Iban::parse(s)
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(DEFAULT_SEPARATOR))
    }
}

impl AsRef<str> for Iban {
    fn as_ref(&self) -> &str {
        &self.electronic
    }
}

impl Serialize for Iban {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.electronic)
    }
}

// ============================================================================
// TESTS
// ============================================================================
