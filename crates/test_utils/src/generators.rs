//! Property-Based Test Generators
//!
//! Provides proptest strategies for answers, conditions, cost rules and
//! recommendation templates. Answer keys are drawn from a small fixed pool
//! so that generated conditions actually reference generated answers.

use core_kernel::Answers;
use domain_recommendation::RecommendationTemplate;
use domain_rules::{Condition, CostRule, CostRules, Operator};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Question ids shared by answer and condition strategies
pub const ANSWER_KEYS: [&str; 5] = ["quantity", "rush", "productType", "elements", "company"];

/// Strategy for generating scalar answer values
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1000i64..100_000i64).prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

/// Strategy for generating answer values, including string lists
pub fn answer_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => scalar_value_strategy(),
        1 => proptest::collection::vec("[a-z]{1,6}", 0..4).prop_map(|items| json!(items)),
    ]
}

/// Strategy for generating answer sets over [`ANSWER_KEYS`]
pub fn answers_strategy() -> impl Strategy<Value = Answers> {
    proptest::collection::vec(
        (proptest::sample::select(ANSWER_KEYS.to_vec()), answer_value_strategy()),
        0..ANSWER_KEYS.len(),
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<Answers>()
    })
}

/// Strategy for generating comparison operators
pub fn operator_strategy() -> impl Strategy<Value = Operator> {
    proptest::sample::select(Operator::ALL.to_vec())
}

/// Strategy for generating leaf conditions over [`ANSWER_KEYS`]
pub fn leaf_condition_strategy() -> impl Strategy<Value = Condition> {
    (
        proptest::sample::select(ANSWER_KEYS.to_vec()),
        operator_strategy(),
        scalar_value_strategy(),
    )
        .prop_map(|(path, operator, value)| Condition::compare(path, operator, value))
}

/// Strategy for generating nested `AND` / `OR` conditions
pub fn condition_strategy() -> impl Strategy<Value = Condition> {
    leaf_condition_strategy().prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Condition::all),
            proptest::collection::vec(inner, 0..4).prop_map(Condition::any),
        ]
    })
}

/// Strategy for generating whole-number amounts
pub fn amount_strategy() -> impl Strategy<Value = i64> {
    0i64..1_000_000i64
}

/// Strategy for generating fixed and conditional cost rules
pub fn cost_rules_strategy() -> impl Strategy<Value = CostRules> {
    let rule = prop_oneof![
        amount_strategy().prop_map(CostRule::fixed),
        (condition_strategy(), amount_strategy())
            .prop_map(|(condition, amount)| CostRule::when(condition, amount)),
    ];
    proptest::collection::btree_map("[a-z]{3,10}", rule, 0..6).prop_map(CostRules::Entries)
}

/// Strategy for generating templates with optional priorities and conditions
pub fn template_strategy() -> impl Strategy<Value = RecommendationTemplate> {
    (
        "[a-z]{3,8}",
        proptest::option::of(-10i32..10i32),
        proptest::option::of(condition_strategy()),
    )
        .prop_map(|(id, priority, condition)| {
            let title = format!("{id} for {{{{company}}}}");
            let mut template = RecommendationTemplate::new(id.as_str(), title);
            if let Some(priority) = priority {
                template = template.with_priority(f64::from(priority));
            }
            if let Some(condition) = condition {
                template = template.with_conditions(condition);
            }
            template
        })
}

/// Strategy for generating template lists
pub fn templates_strategy() -> impl Strategy<Value = Vec<RecommendationTemplate>> {
    proptest::collection::vec(template_strategy(), 0..8)
}
