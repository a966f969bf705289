//! Property-based tests for the account classifier.

use proptest::prelude::*;

use super::classifier::{AccountClass, Classification, classify};

/// Strategy for account numbers inside the statutory classes 1-7.
fn statutory_number() -> impl Strategy<Value = String> {
    ("[1-7]", proptest::collection::vec(0u8..=9, 0..8)).prop_map(|(head, tail)| {
        let mut number = head;
        for digit in tail {
            number.push(char::from(b'0' + digit));
        }
        number
    })
}

/// Strategy for strings that must never classify.
fn non_statutory_input() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[089][0-9]{0,7}",
        "[a-zA-Z][a-zA-Z0-9]{0,7}",
        "[1-7][0-9]{0,4}[ a-z][0-9]{0,3}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* numeric string starting with a digit 1-7, the classified
    /// class equals the leading digit.
    #[test]
    fn prop_class_is_leading_digit(number in statutory_number()) {
        let leading = number.as_bytes()[0] - b'0';
        let classification = classify(&number);

        prop_assert_eq!(
            classification.class(),
            AccountClass::from_digit(leading),
            "number {} should classify to class {}",
            number,
            leading
        );
    }

    /// Classification is pure: repeated calls agree.
    #[test]
    fn prop_classification_deterministic(number in statutory_number()) {
        prop_assert_eq!(classify(&number), classify(&number));
    }

    /// *For any* empty, non-numeric, or class 8/9 input, the classifier
    /// yields `Unclassified` instead of an error.
    #[test]
    fn prop_invalid_input_is_unclassified(input in non_statutory_input()) {
        prop_assert_eq!(classify(&input), Classification::Unclassified);
    }

    /// Every classified number carries a budget bucket; bulk import callers
    /// rely on never needing a second lookup.
    #[test]
    fn prop_classified_numbers_have_bucket(number in statutory_number()) {
        match classify(&number) {
            Classification::Classified { .. } => {}
            Classification::Unclassified => {
                prop_assert!(false, "statutory number {} must classify", number);
            }
        }
    }
}
