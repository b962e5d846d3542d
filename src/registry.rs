// Country Registry - country code → CountrySpec
//
// The built-in table is compiled into the binary and turned into a
// registry once, on first lookup. It is read-only afterwards.

use crate::error::{IbanError, Result};
use crate::specification::CountrySpec;
use log::debug;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// (country code, IBAN length, structure descriptor, example IBAN)
pub type CountryEntry = (&'static str, usize, &'static str, &'static str);

// ============================================================================
// BUILT-IN COUNTRY TABLE
// ============================================================================

pub const COUNTRY_TABLE: &[CountryEntry] = &[
    ("AD", 24, "F04F04A12", "AD1200012030200359100100"),
    ("AE", 23, "F03F16", "AE070331234567890123456"),
    ("AL", 28, "F08A16", "AL47212110090000000235698741"),
    ("AT", 20, "F05F11", "AT611904300234573201"),
    ("AZ", 28, "U04A20", "AZ21NABZ00000000137010001944"),
    ("BA", 20, "F03F03F08F02", "BA391290079401028494"),
    ("BE", 16, "F03F07F02", "BE68539007547034"),
    ("BG", 22, "U04F04F02A08", "BG80BNBG96611020345678"),
    ("BH", 22, "U04A14", "BH67BMAG00001299123456"),
    ("BR", 29, "F08F05F10U01A01", "BR9700360305000010009795493P1"),
    ("BY", 28, "A04F04A16", "BY13NBRB3600900000002Z00AB00"),
    ("CH", 21, "F05A12", "CH9300762011623852957"),
    ("CR", 22, "F04F14", "CR72012300000171549015"),
    ("CY", 28, "F03F05A16", "CY17002001280000001200527600"),
    ("CZ", 24, "F04F06F10", "CZ6508000000192000145399"),
    ("DE", 22, "F08F10", "DE89370400440532013000"),
    ("DK", 18, "F04F09F01", "DK5000400440116243"),
    ("DO", 28, "U04F20", "DO28BAGR00000001212453611324"),
    ("EE", 20, "F02F02F11F01", "EE382200221020145685"),
    ("EG", 29, "F04F04F17", "EG800002000156789012345180002"),
    ("ES", 24, "F04F04F01F01F10", "ES9121000418450200051332"),
    ("FI", 18, "F06F07F01", "FI2112345600000785"),
    ("FO", 18, "F04F09F01", "FO6264600001631634"),
    ("FR", 27, "F05F05A11F02", "FR1420041010050500013M02606"),
    ("GB", 22, "U04F06F08", "GB29NWBK60161331926819"),
    ("GE", 22, "U02F16", "GE29NB0000000101904917"),
    ("GI", 23, "U04A15", "GI75NWBK000000007099453"),
    ("GL", 18, "F04F09F01", "GL8964710001000206"),
    ("GR", 27, "F03F04A16", "GR1601101250000000012300695"),
    ("GT", 28, "A04A20", "GT82TRAJ01020000001210029690"),
    ("HR", 21, "F07F10", "HR1210010051863000160"),
    ("HU", 28, "F03F04F01F15F01", "HU42117730161111101800000000"),
    ("IE", 22, "U04F06F08", "IE29AIBK93115212345678"),
    ("IL", 23, "F03F03F13", "IL620108000000099999999"),
    ("IS", 26, "F04F02F06F10", "IS140159260076545510730339"),
    ("IT", 27, "U01F05F05A12", "IT60X0542811101000000123456"),
    ("IQ", 23, "U04F03A12", "IQ98NBIQ850123456789012"),
    ("JO", 30, "A04F22", "JO15AAAA1234567890123456789012"),
    ("KW", 30, "U04A22", "KW81CBKU0000000000001234560101"),
    ("KZ", 20, "F03A13", "KZ86125KZT5004100100"),
    ("LB", 28, "F04A20", "LB62099900000001001901229114"),
    ("LC", 32, "U04F24", "LC07HEMM000100010012001200013015"),
    ("LI", 21, "F05A12", "LI21088100002324013AA"),
    ("LT", 20, "F05F11", "LT121000011101001000"),
    ("LU", 20, "F03A13", "LU280019400644750000"),
    ("LV", 21, "U04A13", "LV80BANK0000435195001"),
    ("MC", 27, "F05F05A11F02", "MC5811222000010123456789030"),
    ("MD", 24, "U02A18", "MD24AG000225100013104168"),
    ("ME", 22, "F03F13F02", "ME25505000012345678951"),
    ("MK", 19, "F03A10F02", "MK07250120000058984"),
    ("MR", 27, "F05F05F11F02", "MR1300020001010000123456753"),
    ("MT", 31, "U04F05A18", "MT84MALT011000012345MTLCAST001S"),
    ("MU", 30, "U04F02F02F12F03U03", "MU17BOMM0101101030300200000MUR"),
    ("NL", 18, "U04F10", "NL91ABNA0417164300"),
    ("NO", 15, "F04F06F01", "NO9386011117947"),
    ("PK", 24, "U04A16", "PK36SCBL0000001123456702"),
    ("PL", 28, "F08F16", "PL61109010140000071219812874"),
    ("PS", 29, "U04A21", "PS92PALS000000000400123456702"),
    ("PT", 25, "F04F04F11F02", "PT50000201231234567890154"),
    ("QA", 29, "U04A21", "QA30AAAA123456789012345678901"),
    ("RO", 24, "U04A16", "RO49AAAA1B31007593840000"),
    ("RS", 22, "F03F13F02", "RS35260005601001611379"),
    ("SA", 24, "F02A18", "SA0380000000608010167519"),
    ("SC", 31, "U04F04F16U03", "SC18SSCB11010000000000001497USD"),
    ("SE", 24, "F03F16F01", "SE4550000000058398257466"),
    ("SI", 19, "F05F08F02", "SI56263300012039086"),
    ("SK", 24, "F04F06F10", "SK3112000000198742637541"),
    ("SM", 27, "U01F05F05A12", "SM86U0322509800000000270100"),
    ("ST", 25, "F08F11F02", "ST68000100010051845310112"),
    ("SV", 28, "U04F20", "SV62CENR00000000000000700025"),
    ("TL", 23, "F03F14F02", "TL380080012345678910157"),
    ("TN", 24, "F02F03F13F02", "TN5910006035183598478831"),
    ("TR", 26, "F05F01A16", "TR330006100519786457841326"),
    ("UA", 29, "F25", "UA511234567890123456789012345"),
    ("VA", 22, "F18", "VA59001123000012345678"),
    ("VG", 24, "U04F16", "VG96VPVG0000012345678901"),
    ("XK", 20, "F04F10F02", "XK051212012345678906"),
    // Countries outside the official registry that use the IBAN format
    ("AO", 25, "F21", "AO69123456789012345678901"),
    ("BF", 27, "F23", "BF2312345678901234567890123"),
    ("BI", 16, "F12", "BI41123456789012"),
    ("BJ", 28, "F24", "BJ39123456789012345678901234"),
    ("CI", 28, "U02F22", "CI70CI1234567890123456789012"),
    ("CM", 27, "F23", "CM9012345678901234567890123"),
    ("CV", 25, "F21", "CV30123456789012345678901"),
    ("DZ", 24, "F20", "DZ8612345678901234567890"),
    ("IR", 26, "F22", "IR861234568790123456789012"),
    ("MG", 27, "F23", "MG1812345678901234567890123"),
    ("ML", 28, "U01F23", "ML15A12345678901234567890123"),
    ("MZ", 25, "F21", "MZ25123456789012345678901"),
    ("SN", 28, "U01F23", "SN52A12345678901234567890123"),
    // French overseas subdivisions, same structure as FR
    ("GF", 27, "F05F05A11F02", "GF121234512345123456789AB13"),
    ("GP", 27, "F05F05A11F02", "GP791234512345123456789AB13"),
    ("MQ", 27, "F05F05A11F02", "MQ221234512345123456789AB13"),
    ("RE", 27, "F05F05A11F02", "RE131234512345123456789AB13"),
    ("PF", 27, "F05F05A11F02", "PF281234512345123456789AB13"),
    ("TF", 27, "F05F05A11F02", "TF891234512345123456789AB13"),
    ("YT", 27, "F05F05A11F02", "YT021234512345123456789AB13"),
    ("NC", 27, "F05F05A11F02", "NC551234512345123456789AB13"),
    ("BL", 27, "F05F05A11F02", "BL391234512345123456789AB13"),
    ("MF", 27, "F05F05A11F02", "MF551234512345123456789AB13"),
    ("PM", 27, "F05F05A11F02", "PM071234512345123456789AB13"),
    ("WF", 27, "F05F05A11F02", "WF621234512345123456789AB13"),
];

static DEFAULT_REGISTRY: OnceLock<CountryRegistry> = OnceLock::new();

/// The built-in registry, built on first use
pub fn registry() -> &'static CountryRegistry {
    DEFAULT_REGISTRY.get_or_init(|| {
        CountryRegistry::from_entries(COUNTRY_TABLE).expect("built-in country table is well-formed")
    })
}

// ============================================================================
// COUNTRY REGISTRY
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CountryRegistry {
    specs: BTreeMap<String, CountrySpec>,
}

impl CountryRegistry {
    /// Registry with no countries
    pub fn empty() -> Self {
        CountryRegistry {
            specs: BTreeMap::new(),
        }
    }

    /// Build a registry from table rows, rejecting malformed or duplicate rows
    pub fn from_entries(entries: &[CountryEntry]) -> Result<Self> {
        let mut registry = CountryRegistry::empty();

        for &(code, length, structure, example) in entries {
            let spec = CountrySpec::new(code, length, structure, example)?;
            registry.register(spec)?;
        }

        debug!("Country registry built with {} specifications", registry.count());
        Ok(registry)
    }

    /// Add a specification; a country can only be registered once
    pub fn register(&mut self, spec: CountrySpec) -> Result<()> {
        if self.specs.contains_key(spec.country_code()) {
            return Err(IbanError::InvalidSpecification(format!(
                "{} is already registered",
                spec.country_code()
            )));
        }

        self.specs.insert(spec.country_code().to_string(), spec);
        Ok(())
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, country_code: &str) -> Option<&CountrySpec> {
        self.specs.get(country_code)
    }

    /// Lookup that fails with `UnknownCountry`
    pub fn lookup(&self, country_code: &str) -> Result<&CountrySpec> {
        self.get(country_code)
            .ok_or_else(|| IbanError::UnknownCountry(country_code.to_string()))
    }

    /// Specification for the country an electronic-format IBAN starts with
    pub fn for_iban(&self, iban: &str) -> Option<&CountrySpec> {
        iban.get(..2).and_then(|code| self.get(code))
    }

    pub fn contains(&self, country_code: &str) -> bool {
        self.specs.contains_key(country_code)
    }

    /// All specifications, keyed by country code
    pub fn all(&self) -> &BTreeMap<String, CountrySpec> {
        &self.specs
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn count(&self) -> usize {
        self.specs.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_loads() {
        let registry = registry();

        assert_eq!(registry.count(), COUNTRY_TABLE.len());
        assert!(registry.contains("BE"));
        assert!(registry.contains("NL"));
        assert!(registry.contains("GB"));
        assert!(!registry.contains("ZZ"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = registry();

        assert!(registry.get("BE").is_some());
        assert!(registry.get("be").is_none());
        assert_eq!(
            registry.lookup("be"),
            Err(IbanError::UnknownCountry("be".to_string()))
        );
    }

    #[test]
    fn test_every_example_is_valid() {
        for spec in registry().all().values() {
            assert!(
                spec.validate(spec.example()),
                "example for {} is not valid: {:?}",
                spec.country_code(),
                spec.check(spec.example())
            );
        }
    }

    #[test]
    fn test_every_structure_matches_declared_length() {
        for spec in registry().all().values() {
            assert_eq!(
                spec.matcher().total_length(),
                spec.bban_length(),
                "structure {} of {} does not add up to {}",
                spec.structure(),
                spec.country_code(),
                spec.bban_length()
            );
        }
    }

    #[test]
    fn test_every_example_rejects_changed_last_digit() {
        for spec in registry().all().values() {
            let mut changed = spec.example().to_string();
            let last = changed.pop().unwrap();
            let replacement = if last == '0' { '1' } else { '0' };
            changed.push(replacement);

            assert!(
                !spec.validate(&changed),
                "{} accepted a mutated example {}",
                spec.country_code(),
                changed
            );
        }
    }

    #[test]
    fn test_every_example_round_trips_through_bban() {
        for spec in registry().all().values() {
            let bban = spec.to_bban(spec.example(), "").unwrap();
            assert_eq!(spec.from_bban(&bban).unwrap(), spec.example());
        }
    }

    #[test]
    fn test_for_iban() {
        let registry = registry();

        assert_eq!(
            registry.for_iban("BE68539007547034").map(|s| s.length()),
            Some(16)
        );
        assert!(registry.for_iban("ZZ68539007547034").is_none());
        assert!(registry.for_iban("B").is_none());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = CountryRegistry::empty();
        let spec = CountrySpec::new("BE", 16, "F03F07F02", "BE68539007547034").unwrap();

        assert!(registry.register(spec.clone()).is_ok());
        assert!(matches!(
            registry.register(spec),
            Err(IbanError::InvalidSpecification(_))
        ));
    }

    #[test]
    fn test_from_entries_rejects_bad_row() {
        let entries: &[CountryEntry] = &[
            ("BE", 16, "F03F07F02", "BE68539007547034"),
            ("XX", 10, "F0", "XX00000000"),
        ];

        assert!(CountryRegistry::from_entries(entries).is_err());
    }

    #[test]
    fn test_codes_are_sorted() {
        let codes: Vec<&str> = registry().codes().collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }
}
