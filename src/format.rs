// Normalization and display grouping
//
// Checksums are computed over the electronic format, so normalization must
// be exact: keep [0-9A-Za-z], drop everything else, uppercase.

/// Separator used when callers have no preference
pub const DEFAULT_SEPARATOR: &str = " ";

/// Characters per group in print format
pub const GROUP_SIZE: usize = 4;

/// Strip every non-alphanumeric character and uppercase the rest
///
/// Example: "be68 5390-0754.7034" → "BE68539007547034"
pub fn electronic_format(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Electronic format, regrouped with `separator` every 4 characters
///
/// Example: "BE68539007547034" → "BE68 5390 0754 7034"
pub fn print_format(input: &str, separator: &str) -> String {
    let electronic = electronic_format(input);
    let groups = electronic.len() / GROUP_SIZE;
    let mut printed = String::with_capacity(electronic.len() + groups * separator.len());

    for (idx, c) in electronic.chars().enumerate() {
        if idx > 0 && idx % GROUP_SIZE == 0 {
            printed.push_str(separator);
        }
        printed.push(c);
    }

    printed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_electronic_format_strips_and_uppercases() {
        assert_eq!(electronic_format("BE68 5390 0754 7034"), "BE68539007547034");
        assert_eq!(electronic_format("be68-5390.0754/7034"), "BE68539007547034");
        assert_eq!(electronic_format("  \tgb29 nwbk\n"), "GB29NWBK");
        assert_eq!(electronic_format(""), "");
    }

    #[test]
    fn test_electronic_format_drops_non_ascii() {
        assert_eq!(electronic_format("BÉ68"), "B68");
        assert_eq!(electronic_format("٣BE68"), "BE68");
    }

    #[test]
    fn test_electronic_format_is_idempotent() {
        let inputs = ["BE68 5390 0754 7034", "nl91-abna-0417-1643-00", "??", "aé1"];

        for input in inputs {
            let once = electronic_format(input);
            assert_eq!(electronic_format(&once), once);
        }
    }

    #[test]
    fn test_print_format() {
        assert_eq!(print_format("BE68539007547034", DEFAULT_SEPARATOR), "BE68 5390 0754 7034");
        assert_eq!(print_format("be68-5390-0754-7034", "."), "BE68.5390.0754.7034");
        assert_eq!(print_format("NL91ABNA0417164300", " "), "NL91 ABNA 0417 1643 00");
        assert_eq!(print_format("", " "), "");
        assert_eq!(print_format("BE68", " "), "BE68");
    }

    #[test]
    fn test_print_format_reverses_to_electronic() {
        let inputs = ["BE68539007547034", "mt84 malt 0110 0001 2345 mtlc ast0 01s", "x"];

        for input in inputs {
            assert_eq!(
                electronic_format(&print_format(input, " ")),
                electronic_format(input)
            );
        }
    }
}
