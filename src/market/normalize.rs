use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static DIGIT_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9])([A-Za-z])").unwrap());
static LETTER_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Za-z])([0-9])").unwrap());
// Decimal points count as part of a token so `1.5/Q` keeps its literal intact.
static BARE_DIVISION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9.]+)\s*/\s*([A-Za-z0-9.]+)").unwrap());

/// Rewrite shorthand formula text into something the parser accepts.
///
/// Applied in order:
/// 1. `2Q` becomes `2*Q` (digit followed by a letter).
/// 2. `Q2` becomes `Q*2` (letter followed by a digit).
/// 3. `A/B` becomes `(A)/(B)` when both operands are bare alphanumeric tokens.
///
/// Never fails and is idempotent. Whatever it produces is checked later by validation.
pub fn normalize(text: &str) -> String {
    let step = DIGIT_LETTER.replace_all(text, "$1*$2");
    let step = LETTER_DIGIT.replace_all(&step, "$1*$2");
    let normalized = BARE_DIVISION.replace_all(&step, "($1)/($2)").into_owned();
    if normalized != text {
        debug!(input = text, normalized = %normalized, "normalized expression text");
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_multiplication() {
        assert_eq!(normalize("2Q"), "2*Q");
        assert_eq!(normalize("Q2"), "Q*2");
        assert_eq!(normalize("10 + 2Q^2"), "10 + 2*Q^2");
    }

    #[test]
    fn wraps_division_operands() {
        assert_eq!(normalize("A/B"), "(A)/(B)");
        assert_eq!(normalize("100 / Q"), "(100)/(Q)");
        assert_eq!(normalize("1.5/Q"), "(1.5)/(Q)");
    }

    #[test]
    fn leaves_canonical_text_alone() {
        for text in ["100 - Q", "(Q)/(2)", "", "Q^2 - 3*Q"] {
            assert_eq!(normalize(text), text);
        }
    }
}
