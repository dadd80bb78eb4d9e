use monopolist::market::Rejection;
use monopolist::{ExactEngine, normalize, validate, validate_expression};

#[test]
fn constants_need_permission() {
    assert!(!validate("5", false));
    assert!(validate("5", true));
    assert!(validate("10 + 0.5", true));
}

#[test]
fn unparsable_text_is_rejected() {
    assert!(!validate("Q+", false));
    assert!(!validate("Q+", true));
    assert!(!validate("(Q", false));
    assert!(!validate("", true));
}

#[test]
fn variable_must_be_a_whole_token() {
    assert!(validate("100 - Q", false));
    assert!(!validate("100 - Qty", false));
    assert!(!validate("100 - q", false));
}

#[test]
fn only_the_quantity_symbol_is_recognized() {
    assert!(!validate("a - Q", false));
    assert!(!validate("x", true));
}

#[test]
fn shorthand_passes_after_normalization() {
    assert!(!validate("100 - 2Q", false));
    assert!(validate(&normalize("100 - 2Q"), false));
    assert!(validate(&normalize("1000/Q"), false));
}

#[test]
fn rejection_reports_the_reason() {
    let missing = validate_expression(&ExactEngine, "50", "Q", false).unwrap_err();
    assert_eq!(missing, Rejection::MissingVariable("Q".to_string()));

    let parsed = validate_expression(&ExactEngine, "2*Q + 1", "Q", false).unwrap();
    assert_eq!(parsed.text(), "2*Q + 1");
    assert_eq!(parsed.expr().to_string(), "2*Q+1");
}

#[test]
fn custom_variable_names() {
    assert!(validate_expression(&ExactEngine, "20 - x", "x", false).is_ok());
    assert!(validate_expression(&ExactEngine, "20 - Q", "x", false).is_err());
}
