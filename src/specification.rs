// Country Specification - binds a country to its IBAN shape
//
// Identity: two-letter uppercase country code.
// Values: total IBAN length, BBAN structure descriptor, example IBAN.
// The compiled matcher is derived state, built on first use and cached.

use crate::checksum::{check_digits, iso13616_prepare, iso7064_mod97_10};
use crate::error::{IbanError, Rejection, Result};
use crate::structure::StructureMatcher;
use log::debug;
use serde::Serialize;
use std::sync::OnceLock;

/// Country code (2) + check digits (2)
pub const HEADER_LENGTH: usize = 4;

// ============================================================================
// COUNTRY SPECIFICATION
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CountrySpec {
    /// ISO 3166-1 alpha-2 code, uppercase
    country_code: String,

    /// Total IBAN length, header included
    length: usize,

    /// BBAN structure descriptor (e.g. "F03F07F02")
    structure: String,

    /// A valid IBAN for this country
    example: String,

    #[serde(skip)]
    matcher: OnceLock<StructureMatcher>,
}

impl CountrySpec {
    /// Create a specification, rejecting malformed descriptors up front
    pub fn new(
        country_code: impl Into<String>,
        length: usize,
        structure: impl Into<String>,
        example: impl Into<String>,
    ) -> Result<Self> {
        let country_code = country_code.into();
        let structure = structure.into();

        if country_code.len() != 2 || !country_code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(IbanError::InvalidSpecification(format!(
                "country code must be two uppercase letters, got {:?}",
                country_code
            )));
        }
        if length < 1 {
            return Err(IbanError::InvalidSpecification(format!(
                "{}: IBAN length must be at least 1",
                country_code
            )));
        }

        StructureMatcher::compile(&structure)?;

        Ok(CountrySpec {
            country_code,
            length,
            structure,
            example: example.into(),
            matcher: OnceLock::new(),
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn structure(&self) -> &str {
        &self.structure
    }

    pub fn example(&self) -> &str {
        &self.example
    }

    /// Length of the BBAN portion
    pub fn bban_length(&self) -> usize {
        self.length.saturating_sub(HEADER_LENGTH)
    }

    /// Compiled matcher, built on first use
    pub fn matcher(&self) -> &StructureMatcher {
        self.matcher.get_or_init(|| {
            debug!("Compiling structure {} for {}", self.structure, self.country_code);
            StructureMatcher::compile(&self.structure)
                .expect("structure descriptor is checked in CountrySpec::new")
        })
    }

    /// Is the matcher already built?
    pub fn is_compiled(&self) -> bool {
        self.matcher.get().is_some()
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Check an electronic-format IBAN against this country
    ///
    /// Reports the first failing condition: length, country code,
    /// BBAN structure, then checksum.
    pub fn check(&self, iban: &str) -> std::result::Result<(), Rejection> {
        if iban.len() != self.length {
            return Err(Rejection::Length {
                expected: self.length,
                actual: iban.len(),
            });
        }

        let actual_code = iban.get(..2).unwrap_or(iban);
        if actual_code != self.country_code {
            return Err(Rejection::CountryMismatch {
                expected: self.country_code.clone(),
                actual: actual_code.to_string(),
            });
        }

        match iban.get(HEADER_LENGTH..) {
            Some(bban) if self.matcher().matches(bban) => {}
            _ => return Err(Rejection::Structure),
        }

        // Header characters are not covered by the matcher
        match iso7064_mod97_10(&iso13616_prepare(iban)) {
            Some(1) => Ok(()),
            Some(remainder) => Err(Rejection::Checksum { remainder }),
            None => Err(Rejection::Structure),
        }
    }

    /// Is `iban` (electronic format) a valid IBAN for this country?
    pub fn validate(&self, iban: &str) -> bool {
        self.check(iban).is_ok()
    }

    /// Does `bban` (electronic format) have this country's BBAN shape?
    pub fn is_valid_bban(&self, bban: &str) -> bool {
        self.bban_length() == bban.len() && self.matcher().matches(bban)
    }

    // ========================================================================
    // CONVERSION
    // ========================================================================

    /// Extract the BBAN of `iban`, blocks joined by `separator`
    ///
    /// Example: "BE68539007547034" with "-" → "539-0075470-34"
    pub fn to_bban(&self, iban: &str, separator: &str) -> Result<String> {
        let parts = iban
            .get(HEADER_LENGTH..)
            .and_then(|bban| self.matcher().extract(bban))
            .ok_or(IbanError::InvalidIban(Rejection::Structure))?;

        Ok(parts.join(separator))
    }

    /// Build the full IBAN for `bban`, generating its check digits
    pub fn from_bban(&self, bban: &str) -> Result<String> {
        if !self.is_valid_bban(bban) {
            return Err(IbanError::InvalidBban(bban.to_string()));
        }

        let digits = check_digits(&self.country_code, bban)
            .ok_or_else(|| IbanError::InvalidBban(bban.to_string()))?;

        Ok(format!("{}{}{}", self.country_code, digits, bban))
    }
}

impl PartialEq for CountrySpec {
    fn eq(&self, other: &Self) -> bool {
        self.country_code == other.country_code
            && self.length == other.length
            && self.structure == other.structure
            && self.example == other.example
    }
}

impl Eq for CountrySpec {}

// ============================================================================
// TESTS
// ============================================================================
