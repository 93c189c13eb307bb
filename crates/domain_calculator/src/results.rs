//! Calculation results
//!
//! `Results` is rebuilt from scratch on every calculation. Derived fields
//! (`totalPrice`, `totalFeatures`, `requiresCommissionedWork`) are only ever
//! set by [`Results::finalize`], which keeps them consistent with the
//! collections they summarise.

use std::collections::BTreeMap;

use domain_recommendation::Recommendation;
use domain_rules::Diagnostic;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CalculatorError;

/// Aggregate output of one calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    pub features: Vec<Value>,
    pub commission_items: Vec<Value>,
    pub pricing: Pricing,
    pub summary: Summary,
    pub recommendations: Vec<RecommendationEntry>,
    /// Rule failures that were skipped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    /// Set when the calculation stopped early; the other fields hold what was
    /// computed before the failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One value produced by the `recommendations` rules
///
/// Values shaped like a rendered template (an object with an `id`) are kept
/// as [`Recommendation`]s; anything else is kept as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationEntry {
    Template(Recommendation),
    Literal(Value),
}

impl RecommendationEntry {
    /// The rendered template, if this entry is one
    pub fn template(&self) -> Option<&Recommendation> {
        match self {
            RecommendationEntry::Template(recommendation) => Some(recommendation),
            RecommendationEntry::Literal(_) => None,
        }
    }
}

impl From<Value> for RecommendationEntry {
    fn from(value: Value) -> Self {
        match Recommendation::deserialize(&value) {
            Ok(recommendation) => RecommendationEntry::Template(recommendation),
            Err(_) => RecommendationEntry::Literal(value),
        }
    }
}

/// Price breakdown
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub base_price: Decimal,
    pub additional_costs: BTreeMap<String, Decimal>,
    pub total_price: Decimal,
}

impl Pricing {
    /// Sum of every additional cost, or `None` if it overflows
    pub fn additional_total(&self) -> Option<Decimal> {
        self.additional_costs
            .values()
            .try_fold(Decimal::ZERO, |total, cost| total.checked_add(*cost))
    }

    /// Base price plus every additional cost, or `None` if it overflows
    pub fn checked_total(&self) -> Option<Decimal> {
        self.additional_total()
            .and_then(|costs| self.base_price.checked_add(costs))
    }
}

/// Headline figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub tier: u32,
    #[serde(rename = "type")]
    pub schema_type: String,
    pub total_features: usize,
    pub requires_commissioned_work: bool,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            tier: 1,
            schema_type: String::new(),
            total_features: 0,
            requires_commissioned_work: false,
        }
    }
}

impl Results {
    /// Empty results for a schema of the given type
    pub fn new(schema_type: impl Into<String>) -> Self {
        Self {
            summary: Summary {
                schema_type: schema_type.into(),
                ..Summary::default()
            },
            ..Self::default()
        }
    }

    /// Recomputes the derived totals
    ///
    /// When the total price overflows it is left at zero and an error is
    /// returned; the summary fields are still updated.
    pub fn finalize(&mut self) -> Result<(), CalculatorError> {
        self.summary.total_features = self.features.len();
        self.summary.requires_commissioned_work = !self.commission_items.is_empty();
        self.pricing.total_price = Decimal::ZERO;

        let total = self.pricing.checked_total().ok_or(CalculatorError::Overflow)?;
        self.pricing.total_price = total;
        Ok(())
    }

    /// Recommendations rendered from templates, skipping literal values
    pub fn rendered_recommendations(&self) -> impl Iterator<Item = &Recommendation> {
        self.recommendations.iter().filter_map(RecommendationEntry::template)
    }

    /// Whether the calculation ran to completion
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_default_tier_is_one() {
        let results = Results::new("merchandise");
        assert_eq!(results.summary.tier, 1);
        assert_eq!(results.summary.schema_type, "merchandise");
        assert_eq!(results.pricing.total_price, Decimal::ZERO);
    }

    #[test]
    fn test_finalize_derives_totals() {
        let mut results = Results::new("productions");
        results.features = vec![json!("a"), json!("a")];
        results.commission_items = vec![json!("mural")];
        results.pricing.base_price = dec!(1000);
        results.pricing.additional_costs.insert("rush".to_string(), dec!(250.50));
        results.pricing.additional_costs.insert("travel".to_string(), dec!(80));

        results.finalize().unwrap();

        assert_eq!(results.summary.total_features, 2);
        assert!(results.summary.requires_commissioned_work);
        assert_eq!(results.pricing.total_price, dec!(1330.50));
    }

    #[test]
    fn test_finalize_reports_overflowing_total() {
        let mut results = Results::new("merchandise");
        results.features = vec![json!("Rush production")];
        results.pricing.base_price = dec!(50000000000000000000000000000);
        results.pricing.additional_costs.insert("rush".to_string(), dec!(50000000000000000000000000000));

        assert_eq!(results.finalize(), Err(CalculatorError::Overflow));
        assert_eq!(results.pricing.total_price, Decimal::ZERO);
        assert_eq!(results.summary.total_features, 1);
        assert_eq!(results.pricing.additional_total(), Some(dec!(50000000000000000000000000000)));
    }

    #[test]
    fn test_entries_keep_literal_values() {
        let template = RecommendationEntry::from(json!({ "id": "vr-lounge", "title": "VR lounge" }));
        let literal = RecommendationEntry::from(json!("Consider a VR lounge"));

        assert_eq!(template.template().map(|r| r.title.as_str()), Some("VR lounge"));
        assert_eq!(literal, RecommendationEntry::Literal(json!("Consider a VR lounge")));
        assert_eq!(serde_json::to_value(&literal).unwrap(), json!("Consider a VR lounge"));
    }

    #[test]
    fn test_serializes_in_camel_case() {
        let mut results = Results::new("scope");
        results.finalize().unwrap();
        let value = serde_json::to_value(&results).unwrap();

        assert_eq!(value["summary"]["type"], json!("scope"));
        assert_eq!(value["summary"]["requiresCommissionedWork"], json!(false));
        assert!(value["pricing"].get("totalPrice").is_some());
        assert!(value.get("error").is_none());
        assert!(value.get("diagnostics").is_none());
    }
}
