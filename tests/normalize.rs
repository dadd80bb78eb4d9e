use monopolist::{normalize, parse_expr};
use proptest::prelude::*;

#[test]
fn implicit_multiplication() {
    assert_eq!(normalize("2Q"), "2*Q");
    assert_eq!(normalize("Q2"), "Q*2");
    assert_eq!(normalize("100 - 0.5Q"), "100 - 0.5*Q");
    assert_eq!(normalize("3Q2"), "3*Q*2");
}

#[test]
fn division_operands_are_parenthesized() {
    assert!(normalize("A/B").contains("(A)/(B)"));
    assert_eq!(normalize("500/Q + 20"), "(500)/(Q) + 20");
    assert_eq!(normalize("Q/2Q"), "(Q)/(2)*Q");
}

#[test]
fn normalized_shorthand_parses() {
    for raw in ["100 - 2Q", "10 + 2Q + 0.5Q^2", "1000/Q", "50exp(-Q/10)", "Q^3/3 - 10Q^2"] {
        let text = normalize(raw);
        assert!(parse_expr(&text).is_ok(), "{raw} -> {text}");
    }
}

#[test]
fn never_fails_on_garbage() {
    for raw in ["", "///", "((", "Q+", "ünïcödé 2x", "1e5"] {
        let _ = normalize(raw);
    }
}

fn formula_text() -> impl Strategy<Value = String> {
    "[0-9A-Za-z+*/^(). -]{0,24}"
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in formula_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_on_any_text(text in any::<String>()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }
}
