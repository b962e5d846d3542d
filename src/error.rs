// Error types for IBAN operations
//
// Predicates (is_valid, is_valid_bban) never surface these: every failure
// collapses to `false`. Extractive/generative operations raise them.

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// STRUCTURE ERRORS
// ============================================================================

/// A structure descriptor that cannot be compiled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("descriptor length {0} is not a multiple of 3")]
    BadLength(usize),

    #[error("unknown character class code '{0}'")]
    UnknownClass(char),

    #[error("block length '{0}' is not a 2-digit number")]
    BadBlockLength(String),
}

// ============================================================================
// REJECTION (why a candidate IBAN is not valid)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    #[error("expected {expected} characters, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("country code {actual} does not match {expected}")]
    CountryMismatch { expected: String, actual: String },

    #[error("BBAN does not match the country structure")]
    Structure,

    #[error("checksum remainder is {remainder}, expected 1")]
    Checksum { remainder: u32 },
}

// ============================================================================
// IBAN ERRORS
// ============================================================================

/// Errors raised by extractive and generative IBAN operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IbanError {
    /// Country code lookup miss
    #[error("No country with code {0}")]
    UnknownCountry(String),

    /// Candidate IBAN does not have its country's shape
    #[error("Invalid IBAN: {0}")]
    InvalidIban(Rejection),

    /// Candidate BBAN does not have its country's shape
    #[error("Invalid BBAN: {0}")]
    InvalidBban(String),

    /// Country specification rejected at construction
    #[error("Invalid country specification: {0}")]
    InvalidSpecification(String),

    #[error("Invalid structure descriptor: {0}")]
    Structure(#[from] StructureError),
}

/// Result type for IBAN operations
pub type Result<T> = std::result::Result<T, IbanError>;
