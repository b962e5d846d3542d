// IBAN Check - Core Library
// Country specifications, ISO 7064 MOD 97-10 checksums, BBAN structures.
// Exposes all modules for use in the CLI, the API server, and tests.

pub mod checksum;       // ISO 13616 prepare + ISO 7064 MOD 97-10
pub mod structure;      // BBAN structure descriptors → matchers
pub mod specification;  // Per-country IBAN shape
pub mod registry;       // Built-in country table
pub mod format;         // Electronic / print format
pub mod iban;           // Top-level operations + Iban value type
pub mod batch;          // CSV batch validation
pub mod error;

// Re-export commonly used types
pub use checksum::{check_digits, iso13616_prepare, iso7064_mod97_10};
pub use structure::{CharClass, Segment, StructureMatcher};
pub use specification::{CountrySpec, HEADER_LENGTH};
pub use registry::{registry, CountryEntry, CountryRegistry, COUNTRY_TABLE};
pub use format::{electronic_format, print_format, DEFAULT_SEPARATOR};
pub use iban::{
    available_countries, from_bban, is_valid, is_valid_bban, to_bban,
    Iban,
};
pub use batch::{
    load_csv, load_from_reader, validate_batch,
    BatchReport, FailureReason, IbanCheck, IbanRecord,
};
pub use error::{IbanError, Rejection, Result, StructureError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
