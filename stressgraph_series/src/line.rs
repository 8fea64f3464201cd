//! Log line recognition and tokenization
//!
//! An hstress log interleaves human-oriented output with data rows. A row is
//! significant iff it begins with a ten-digit decimal prefix, the shape of a
//! Unix timestamp. This is a syntactic filter only; arity and field types
//! are checked downstream by the series builder.

/// Whether a raw line is a data row.
///
/// True iff the first ten bytes are ASCII decimal digits. An eleventh digit
/// is permitted; the whole first field is later parsed as the timestamp.
#[must_use]
pub fn is_data_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 10 && bytes[..10].iter().all(u8::is_ascii_digit)
}

/// Split a data row into its ordered field vector.
///
/// Fields are tab-separated. Order is preserved and empty fields are kept;
/// an empty field will fail integer parsing downstream rather than silently
/// shortening the row.
#[must_use]
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split('\t').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_prefix_accepted() {
        assert!(is_data_line("1234567890\t3\t1\t0\t2"));
        assert!(is_data_line("1234567890"));
    }

    #[test]
    fn eleven_digit_prefix_accepted() {
        // Matches the original /^\d{10}/ filter: at least ten digits.
        assert!(is_data_line("12345678901\t3"));
    }

    #[test]
    fn short_or_non_numeric_prefix_rejected() {
        assert!(!is_data_line("not_a_timestamp\tfoo"));
        assert!(!is_data_line("123456789\t1"));
        assert!(!is_data_line(""));
        assert!(!is_data_line("# comment"));
        assert!(!is_data_line("123456789x\t1"));
    }

    #[test]
    fn multibyte_prefix_rejected_without_panic() {
        assert!(!is_data_line("μμμμμμμμμμ\t1"));
    }

    #[test]
    fn tokenize_preserves_order_and_empties() {
        assert_eq!(tokenize("a\tb\tc"), ["a", "b", "c"]);
        assert_eq!(tokenize("a\t\tc\t"), ["a", "", "c", ""]);
        assert_eq!(tokenize("lone"), ["lone"]);
    }
}
