// Checksum Algorithms - ISO 13616 rearrangement + ISO 7064 MOD 97-10
//
// A prepared IBAN is up to ~70 digits long once letters are expanded, far
// beyond u64, so the modulo is computed by streaming 9-digit blocks.

/// Digits consumed per reduction step. 9 digits always fit in u64.
const BLOCK_SIZE: usize = 9;

const MODULUS: u64 = 97;

// ============================================================================
// ISO 13616
// ============================================================================

/// Prepare an IBAN for MOD 97-10
///
/// Moves the country code and check digits (first 4 characters) to the end,
/// then replaces every letter with its numeric value (A=10 ... Z=35).
///
/// Example: "BE68539007547034" → "539007547034111468"
pub fn iso13616_prepare(iban: &str) -> String {
    let upper = iban.to_ascii_uppercase();
    let split = upper
        .char_indices()
        .nth(4)
        .map(|(idx, _)| idx)
        .unwrap_or(upper.len());
    let (head, tail) = upper.split_at(split);

    let mut prepared = String::with_capacity(upper.len() * 2);
    for c in tail.chars().chain(head.chars()) {
        if c.is_ascii_uppercase() {
            let value = c as u32 - 'A' as u32 + 10;
            prepared.push_str(&value.to_string());
        } else {
            prepared.push(c);
        }
    }
    prepared
}

// ============================================================================
// ISO 7064 MOD 97-10
// ============================================================================

/// Compute `digits mod 97` for a decimal string of any length
///
/// Takes a prefix of up to 9 digits, reduces it modulo 97 and splices the
/// remainder back in front of the untouched suffix, until at most 2 digits
/// are left. Returns `None` for empty or non-digit input.
pub fn iso7064_mod97_10(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut remainder = digits.to_string();
    while remainder.len() > 2 {
        let block_len = remainder.len().min(BLOCK_SIZE);
        let block: u64 = remainder[..block_len].parse().ok()?;
        remainder = format!("{}{}", block % MODULUS, &remainder[block_len..]);
    }

    let value: u64 = remainder.parse().ok()?;
    Some((value % MODULUS) as u32)
}

/// Generate the 2-digit check code for a country code and BBAN
///
/// `98 - MOD9710(prepare(country_code + "00" + bban))`, zero-padded.
/// Returns `None` when the BBAN contains non-alphanumeric characters.
pub fn check_digits(country_code: &str, bban: &str) -> Option<String> {
    let candidate = format!("{}00{}", country_code, bban);
    let remainder = iso7064_mod97_10(&iso13616_prepare(&candidate))?;
    Some(format!("{:02}", 98 - remainder))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_moves_header_and_expands_letters() {
        assert_eq!(iso13616_prepare("BE68539007547034"), "539007547034111468");
        assert_eq!(
            iso13616_prepare("GB29NWBK60161331926819"),
            "2332112060161331926819161129"
        );
    }

    #[test]
    fn test_prepare_uppercases_input() {
        assert_eq!(
            iso13616_prepare("gb29nwbk60161331926819"),
            iso13616_prepare("GB29NWBK60161331926819")
        );
    }

    #[test]
    fn test_prepare_short_input() {
        assert_eq!(iso13616_prepare("BE"), "1114");
        assert_eq!(iso13616_prepare(""), "");
    }

    #[test]
    fn test_mod97_small_values() {
        assert_eq!(iso7064_mod97_10("0"), Some(0));
        assert_eq!(iso7064_mod97_10("96"), Some(96));
        assert_eq!(iso7064_mod97_10("97"), Some(0));
        assert_eq!(iso7064_mod97_10("98"), Some(1));
        assert_eq!(iso7064_mod97_10("194"), Some(0));
    }

    #[test]
    fn test_mod97_matches_native_arithmetic() {
        // Fits in u128, so we can compare against direct computation
        let samples = [
            "123456789",
            "1234567890",
            "987654321987654321",
            "539007547034111468",
            "100000000000000000000000000000000000",
        ];

        for sample in samples {
            let expected = (sample.parse::<u128>().unwrap() % 97) as u32;
            assert_eq!(iso7064_mod97_10(sample), Some(expected), "sample {}", sample);
        }
    }

    #[test]
    fn test_mod97_valid_iban_reduces_to_one() {
        let prepared = iso13616_prepare("MT84MALT011000012345MTLCAST001S");
        assert!(prepared.len() > 38);
        assert_eq!(iso7064_mod97_10(&prepared), Some(1));
    }

    #[test]
    fn test_mod97_rejects_non_digits() {
        assert_eq!(iso7064_mod97_10(""), None);
        assert_eq!(iso7064_mod97_10("12a4"), None);
        assert_eq!(iso7064_mod97_10("12 34"), None);
    }

    #[test]
    fn test_check_digits() {
        assert_eq!(check_digits("BE", "539007547034").as_deref(), Some("68"));
        assert_eq!(check_digits("NL", "ABNA0417164300").as_deref(), Some("91"));
        assert_eq!(check_digits("GB", "NWBK60161331926819").as_deref(), Some("29"));
    }

    #[test]
    fn test_check_digits_zero_padded() {
        assert_eq!(check_digits("SA", "80000000608010167519").as_deref(), Some("03"));
        assert_eq!(check_digits("XK", "1212012345678906").as_deref(), Some("05"));
    }

    #[test]
    fn test_check_digits_round_trip() {
        let bban = "0532013000";
        let code = check_digits("DE", &format!("37040044{}", bban)).unwrap();
        let iban = format!("DE{}37040044{}", code, bban);
        assert_eq!(iso7064_mod97_10(&iso13616_prepare(&iban)), Some(1));
    }

    #[test]
    fn test_check_digits_rejects_punctuation() {
        assert_eq!(check_digits("BE", "539-0075470-34"), None);
    }
}
