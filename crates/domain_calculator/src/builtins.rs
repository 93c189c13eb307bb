//! Built-in functions for the bundled schemas
//!
//! The bundled merchandise, productions and scope-builder schemas reference
//! these by name. Host applications register them with
//! [`register_builtins`] and may add or override functions afterwards.
//!
//! Amounts are computed in `Decimal` and rounded to whole currency units
//! before they are handed back to the engine as JSON numbers.

use core_kernel::{Answers, Options};
use domain_rules::{FunctionRegistry, RuleError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};

/// Registers every built-in function and validator
pub fn register_builtins(registry: &mut FunctionRegistry) -> &mut FunctionRegistry {
    registry
        .register_function("merchandise.basePrice", |answers: &Answers, _: &Options| {
            merchandise_subtotal(answers).and_then(money)
        })
        .register_function("merchandise.tier", |answers: &Answers, _: &Options| {
            Ok(json!(merchandise_tier(answers)))
        })
        .register_function("merchandise.productFeatures", |answers: &Answers, _: &Options| {
            Ok(merchandise_product_features(answers))
        })
        .register_function("merchandise.rushFee", |answers: &Answers, _: &Options| {
            let fee = times(merchandise_subtotal(answers)?, Decimal::new(25, 2))?;
            money(fee.max(Decimal::from(250)))
        })
        .register_function("productions.basePrice", |answers: &Answers, _: &Options| {
            productions_base_price(answers).and_then(money)
        })
        .register_function("productions.tier", |answers: &Answers, _: &Options| {
            Ok(json!(productions_tier(answers)))
        })
        .register_function("productions.crewFeatures", |answers: &Answers, _: &Options| {
            Ok(json!(productions_crew_features(answers)))
        })
        .register_function("productions.commissionItems", |answers: &Answers, _: &Options| {
            Ok(json!(productions_commission_items(answers)))
        })
        .register_function("productions.touringCost", |answers: &Answers, _: &Options| {
            let cities = number(answers, "cities").unwrap_or(Decimal::ONE);
            times(cities, Decimal::from(3500)).and_then(money)
        })
        .register_function("scope.discoveryFee", |answers: &Answers, _: &Options| {
            let fee = match text(answers, "budgetRange") {
                Some("25k-100k") => 3000,
                Some("100k-plus") => 5000,
                _ => 1500,
            };
            Ok(json!(fee))
        })
        .register_function("scope.tier", |answers: &Answers, _: &Options| {
            let goals = list(answers, "goals").len();
            Ok(json!(match goals {
                0..=1 => 1,
                2..=3 => 2,
                _ => 3,
            }))
        })
        .register_validator("merchandise.minimumQuantity", |value: Option<&Value>, _: &Answers| {
            match value.and_then(Value::as_f64) {
                Some(quantity) if quantity < 25.0 => Err("Minimum order is 25 units".to_string()),
                _ => Ok(()),
            }
        })
        .register_validator("scope.businessEmail", |value: Option<&Value>, _: &Answers| {
            let Some(address) = value.and_then(Value::as_str) else {
                return Ok(());
            };
            let domain = address.rsplit('@').next().unwrap_or_default().to_ascii_lowercase();
            if FREE_MAIL_DOMAINS.contains(&domain.as_str()) {
                Err("Please use your business email address".to_string())
            } else {
                Ok(())
            }
        })
}

/// A registry holding only the built-ins
pub fn builtin_registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    register_builtins(&mut registry);
    registry
}

const FREE_MAIL_DOMAINS: &[&str] = &["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];

// ============================================================================
// Merchandise
// ============================================================================

fn merchandise_subtotal(answers: &Answers) -> Result<Decimal, RuleError> {
    let Some(product) = text(answers, "productType") else {
        return Ok(Decimal::ZERO);
    };
    let unit_price = match product {
        "apparel" => Decimal::from(18),
        "prints" => Decimal::from(6),
        "collectibles" => Decimal::from(24),
        "packaging" => Decimal::from(4),
        other => {
            return Err(RuleError::evaluation(format!("unknown product type '{other}'")));
        }
    };
    let multiplier = match text(answers, "designComplexity") {
        Some("moderate") => Decimal::new(125, 2),
        Some("complex") => Decimal::new(150, 2),
        _ => Decimal::ONE,
    };
    let quantity = number(answers, "quantity").unwrap_or(Decimal::ZERO);

    let mut subtotal = times(times(unit_price, quantity)?, multiplier)?;
    if quantity >= Decimal::from(1000) {
        subtotal *= Decimal::new(90, 2);
    }
    Ok(subtotal)
}

fn merchandise_tier(answers: &Answers) -> u32 {
    let quantity = number(answers, "quantity").unwrap_or(Decimal::ZERO);
    if quantity < Decimal::from(250) {
        1
    } else if quantity < Decimal::from(1000) {
        2
    } else {
        3
    }
}

fn merchandise_product_features(answers: &Answers) -> Value {
    match text(answers, "productType") {
        Some("apparel") => json!(["Size run breakdown", "Fabric swatch approval"]),
        Some("prints") => json!(["Color-calibrated proofs"]),
        Some("collectibles") => json!(["Prototype sample"]),
        Some("packaging") => json!(["Dieline template"]),
        _ => Value::Null,
    }
}

// ============================================================================
// Productions
// ============================================================================

fn productions_base_price(answers: &Answers) -> Result<Decimal, RuleError> {
    let Some(experience) = text(answers, "experienceType") else {
        return Ok(Decimal::ZERO);
    };
    let base = match experience {
        "popup" => 8_000,
        "installation" => 15_000,
        "touring" => 25_000,
        "permanent" => 40_000,
        other => {
            return Err(RuleError::evaluation(format!("unknown experience type '{other}'")));
        }
    };

    let elements: i64 = list(answers, "elements")
        .iter()
        .map(|element| match *element {
            "projection" => 6_000,
            "vr" => 9_000,
            "ar" => 7_000,
            "soundscape" => 3_000,
            "interactive" => 5_000,
            _ => 0,
        })
        .sum();

    let days = number(answers, "durationDays").unwrap_or(Decimal::ONE);
    let extra_days = days
        .checked_sub(Decimal::ONE)
        .ok_or_else(out_of_range)?
        .max(Decimal::ZERO);

    Decimal::from(base + elements)
        .checked_add(times(extra_days, Decimal::from(1_200))?)
        .ok_or_else(out_of_range)
}

fn productions_tier(answers: &Answers) -> u32 {
    let audience = number(answers, "audience").unwrap_or(Decimal::ZERO);
    let mut score = list(answers, "elements").len();
    if audience >= Decimal::from(500) {
        score += 1;
    }
    if audience >= Decimal::from(2000) {
        score += 1;
    }
    match score {
        0..=1 => 1,
        2..=3 => 2,
        _ => 3,
    }
}

fn productions_crew_features(answers: &Answers) -> Vec<String> {
    let days = number(answers, "durationDays")
        .and_then(|days| days.to_u32())
        .unwrap_or(1);
    let mut features = vec![if days == 1 {
        "On-site crew for 1 day".to_string()
    } else {
        format!("On-site crew for {days} days")
    }];

    let audience = number(answers, "audience").unwrap_or(Decimal::ZERO);
    if audience >= Decimal::from(1000) {
        features.push("Dedicated front-of-house team".to_string());
    }
    features
}

fn productions_commission_items(answers: &Answers) -> Vec<&'static str> {
    let elements = list(answers, "elements");
    let mut items = Vec::new();
    if elements.contains(&"interactive") {
        items.push("Custom interactive software build");
    }
    if elements.contains(&"ar") {
        items.push("AR content commission");
    }
    if elements.contains(&"projection") && text(answers, "experienceType") == Some("permanent") {
        items.push("Permanent projection hardware install");
    }
    items
}

// ============================================================================
// Answer helpers
// ============================================================================

fn text<'a>(answers: &'a Answers, id: &str) -> Option<&'a str> {
    answers.get(id).and_then(Value::as_str).filter(|value| !value.is_empty())
}

fn number(answers: &Answers, id: &str) -> Option<Decimal> {
    answers.get(id).and_then(core_kernel::value::as_decimal)
}

fn list<'a>(answers: &'a Answers, id: &str) -> Vec<&'a str> {
    match answers.get(id) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn times(amount: Decimal, factor: Decimal) -> Result<Decimal, RuleError> {
    amount.checked_mul(factor).ok_or_else(out_of_range)
}

fn out_of_range() -> RuleError {
    RuleError::evaluation("amount out of range")
}

fn money(amount: Decimal) -> Result<Value, RuleError> {
    amount
        .round()
        .to_i64()
        .map(|amount| json!(amount))
        .ok_or_else(|| RuleError::evaluation(format!("amount {amount} is out of range")))
}
