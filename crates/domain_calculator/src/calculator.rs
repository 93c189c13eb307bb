//! Results Calculator
//!
//! Drives the effect processor across every calculation category of a
//! schema and assembles the [`Results`].
//!
//! # Evaluation order
//!
//! 1. `basePrice` and `tier`, when declared
//! 2. `features`, `commissionItems`, `additionalCosts`
//! 3. `recommendations`, whose `lookup` rules draw on the schema's templates
//! 4. Derived totals
//!
//! # Failure policy
//!
//! Individual rule failures are skipped and listed in `Results::diagnostics`.
//! A failure that concerns a whole category (an unresolvable base price or
//! tier, a failing delegated function) stops evaluation; the results computed
//! so far are returned with `Results::error` set. Derived totals are computed
//! in both cases; a total that overflows leaves `totalPrice` at zero and
//! sets `Results::error`.

use std::sync::Arc;

use core_kernel::{Answers, Options};
use domain_recommendation::RecommendationEngine;
use domain_rules::{Category, EffectProcessor, FunctionRegistry, TemplateLookup, ValueSource};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::CalculatorError;
use crate::results::{RecommendationEntry, Results};
use crate::schema::Schema;

/// Calculates results for any schema using one function registry
#[derive(Debug, Clone)]
pub struct CalculatorEngine {
    registry: Arc<FunctionRegistry>,
    recommendations: RecommendationEngine,
}

impl CalculatorEngine {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self {
            recommendations: RecommendationEngine::new(Arc::clone(&registry)),
            registry,
        }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// The engine used to render recommendation templates
    pub fn recommendation_engine(&self) -> &RecommendationEngine {
        &self.recommendations
    }

    /// Calculates pricing, features and recommendations for the answers
    ///
    /// # Arguments
    ///
    /// * `schema` - The calculator definition
    /// * `answers` - The answers collected so far
    /// * `options` - Context passed to computed functions
    ///
    /// # Returns
    ///
    /// The results; check `error` for a calculation that stopped early
    pub fn calculate_results(&self, schema: &Schema, answers: &Answers, options: &Options) -> Results {
        let mut results = Results::new(schema.schema_type.clone());
        let mut processor = EffectProcessor::new(&self.registry, answers, options);

        let outcome = self.evaluate(schema, &mut processor, &mut results);
        results.diagnostics = processor.into_diagnostics();
        let totals = results.finalize();

        match outcome.and(totals) {
            Ok(()) => {
                tracing::debug!(
                    schema_id = %schema.id,
                    total_price = %results.pricing.total_price,
                    tier = results.summary.tier,
                    skipped_rules = results.diagnostics.len(),
                    "Results calculated"
                );
            }
            Err(error) => {
                tracing::error!(
                    schema_id = %schema.id,
                    %error,
                    "Calculation failed; returning partial results"
                );
                results.error = Some(error.to_string());
            }
        }

        results
    }

    fn evaluate(
        &self,
        schema: &Schema,
        processor: &mut EffectProcessor<'_>,
        results: &mut Results,
    ) -> Result<(), CalculatorError> {
        let calculations = &schema.calculations;

        if let Some(source) = &calculations.base_price {
            results.pricing.base_price = processor
                .resolve_decimal(source, "basePrice")
                .map_err(|error| CalculatorError::category(Category::BasePrice, error))?;
        }

        if let Some(source) = &calculations.tier {
            results.summary.tier = resolve_tier(processor, source)?;
        }

        results.features = processor
            .collect(Category::Features, &calculations.features, None)
            .map_err(|error| CalculatorError::category(Category::Features, error))?;

        results.commission_items = processor
            .collect(Category::CommissionItems, &calculations.commission_items, None)
            .map_err(|error| CalculatorError::category(Category::CommissionItems, error))?;

        results.pricing.additional_costs = processor
            .collect_costs(&calculations.additional_costs)
            .map_err(|error| CalculatorError::category(Category::AdditionalCosts, error))?;

        let pool = self.recommendations.pool(&schema.recommendations);
        let lookup: &dyn TemplateLookup = &pool;
        let recommended = processor
            .collect(Category::Recommendations, &calculations.recommendations, Some(lookup))
            .map_err(|error| CalculatorError::category(Category::Recommendations, error))?;
        results.recommendations = recommended.into_iter().map(RecommendationEntry::from).collect();

        Ok(())
    }
}

/// Answers pre-filled with every question's default value
///
/// Questions without a `defaultValue` are left unset.
pub fn initialize_answers(schema: &Schema) -> Answers {
    schema
        .all_questions()
        .filter_map(|question| {
            question
                .default_value
                .clone()
                .map(|value| (question.id.to_string(), value))
        })
        .collect()
}

fn resolve_tier(processor: &EffectProcessor<'_>, source: &ValueSource) -> Result<u32, CalculatorError> {
    let tier = processor
        .resolve_decimal(source, "tier")
        .map_err(|error| CalculatorError::category(Category::Tier, error))?;

    whole_number(tier).ok_or_else(|| CalculatorError::InvalidTier(tier.to_string()))
}

fn whole_number(value: Decimal) -> Option<u32> {
    if value.fract().is_zero() {
        value.to_u32()
    } else {
        None
    }
}
