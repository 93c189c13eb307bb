//! Custom Test Assertions
//!
//! Provides assertion helpers for calculation results, validation results
//! and recommendations that give more meaningful failure messages than
//! standard assertions.

use domain_calculator::{Results, ValidationResult};
use domain_recommendation::Recommendation;
use rust_decimal::Decimal;
use serde_json::Value;

/// Asserts that the total price is the base price plus every additional cost
///
/// A total that overflows must be left at zero.
///
/// # Panics
///
/// Panics if the total is inconsistent with its parts
pub fn assert_total_price_invariant(results: &Results) {
    let pricing = &results.pricing;
    let expected = pricing.checked_total().unwrap_or(Decimal::ZERO);
    assert_eq!(
        pricing.total_price, expected,
        "Total price {} does not match base {} plus costs {:?}",
        pricing.total_price, pricing.base_price, pricing.additional_costs
    );
}

/// Asserts that the derived summary fields match the collections
pub fn assert_summary_consistent(results: &Results) {
    assert_eq!(
        results.summary.total_features,
        results.features.len(),
        "totalFeatures disagrees with features {:?}",
        results.features
    );
    assert_eq!(
        results.summary.requires_commissioned_work,
        !results.commission_items.is_empty(),
        "requiresCommissionedWork disagrees with commission items {:?}",
        results.commission_items
    );
}

/// Asserts that the features are exactly the given strings, in order
pub fn assert_features(results: &Results, expected: &[&str]) {
    let expected: Vec<Value> = expected.iter().map(|feature| Value::from(*feature)).collect();
    assert_eq!(results.features, expected, "Unexpected features");
}

/// Asserts that a calculation completed without error
pub fn assert_complete(results: &Results) {
    assert!(
        results.error.is_none(),
        "Expected a complete calculation, got error: {:?}",
        results.error
    );
}

/// Asserts that a validation passed
pub fn assert_valid(result: &ValidationResult) {
    assert!(
        result.valid && result.errors.is_empty(),
        "Expected valid answers, got errors: {:?}",
        result.errors
    );
}

/// Asserts that a validation failed with at least one error for the question
pub fn assert_invalid_for(result: &ValidationResult, question_id: &str) {
    assert!(!result.valid, "Expected invalid answers");
    assert!(
        result.errors.iter().any(|error| error.question_id == question_id),
        "Expected an error for '{}', got: {:?}",
        question_id,
        result.errors
    );
}

/// Asserts that recommendations are in non-increasing priority order
pub fn assert_sorted_by_priority(recommendations: &[Recommendation]) {
    for pair in recommendations.windows(2) {
        assert!(
            pair[0].sort_priority() >= pair[1].sort_priority(),
            "'{}' (priority {}) ranked before '{}' (priority {})",
            pair[0].id,
            pair[0].sort_priority(),
            pair[1].id,
            pair[1].sort_priority()
        );
    }
}

/// Asserts the ids of the recommendations, in order
pub fn assert_recommendation_ids(recommendations: &[Recommendation], expected: &[&str]) {
    let ids: Vec<&str> = recommendations.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, expected, "Unexpected recommendations");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_price_invariant_holds_after_finalize() {
        let mut results = Results::new("test");
        results.pricing.base_price = dec!(100);
        results.pricing.additional_costs.insert("rush".into(), dec!(25.50));
        results.finalize().unwrap();

        assert_total_price_invariant(&results);
        assert_summary_consistent(&results);
    }

    #[test]
    #[should_panic(expected = "Total price")]
    fn test_total_price_invariant_detects_mismatch() {
        let mut results = Results::new("test");
        results.pricing.base_price = dec!(100);
        results.pricing.total_price = dec!(90);

        assert_total_price_invariant(&results);
    }
}
