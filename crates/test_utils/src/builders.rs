//! Test Data Builders
//!
//! Provides builder patterns for constructing schemas with sensible
//! defaults. Tests specify only the calculations or questions they exercise.

use domain_calculator::{Question, QuestionType, Schema, Section, ValidatorRule};
use domain_recommendation::RecommendationTemplate;
use domain_rules::{Condition, CostRule, CostRules, FunctionRef, Rule, RuleSet, ValueSource};
use serde_json::Value;

/// Builder for constructing test schemas
pub struct SchemaBuilder {
    schema: Schema,
    features: Vec<Rule>,
    commission_items: Vec<Rule>,
    recommendation_rules: Vec<Rule>,
    costs: Vec<(String, CostRule)>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new("test-schema")
    }
}

impl SchemaBuilder {
    /// Creates a builder for a schema of type `test`
    pub fn new(id: &str) -> Self {
        Self {
            schema: Schema::new(id, "test"),
            features: Vec::new(),
            commission_items: Vec::new(),
            recommendation_rules: Vec::new(),
            costs: Vec::new(),
        }
    }

    /// Sets the schema type
    pub fn with_type(mut self, schema_type: impl Into<String>) -> Self {
        self.schema.schema_type = schema_type.into();
        self
    }

    /// Sets a literal base price
    pub fn with_base_price(mut self, amount: impl Into<Value>) -> Self {
        self.schema.calculations.base_price = Some(ValueSource::literal(amount));
        self
    }

    /// Computes the base price with a registered function
    pub fn with_computed_base_price(mut self, function: &str) -> Self {
        self.schema.calculations.base_price = Some(ValueSource::computed(function));
        self
    }

    /// Sets a literal tier
    pub fn with_tier(mut self, tier: impl Into<Value>) -> Self {
        self.schema.calculations.tier = Some(ValueSource::literal(tier));
        self
    }

    /// Appends a feature rule
    pub fn with_feature(mut self, rule: Rule) -> Self {
        self.features.push(rule);
        self
    }

    /// Appends a commission item rule
    pub fn with_commission_item(mut self, rule: Rule) -> Self {
        self.commission_items.push(rule);
        self
    }

    /// Adds an additional cost
    pub fn with_cost(mut self, name: impl Into<String>, rule: CostRule) -> Self {
        self.costs.push((name.into(), rule));
        self
    }

    /// Appends a recommendation rule
    pub fn with_recommendation_rule(mut self, rule: Rule) -> Self {
        self.recommendation_rules.push(rule);
        self
    }

    /// Adds a template to the schema's recommendation pool
    pub fn with_template(mut self, template: RecommendationTemplate) -> Self {
        self.schema.recommendations.push(template);
        self
    }

    /// Adds a question to the flat question list
    pub fn with_question(mut self, question: Question) -> Self {
        self.schema.questions.get_or_insert_with(Vec::new).push(question);
        self
    }

    /// Adds a section holding the given questions
    pub fn with_section(mut self, id: &str, questions: Vec<Question>) -> Self {
        self.schema.sections.push(Section {
            id: id.into(),
            title: id.to_string(),
            description: None,
            questions,
        });
        self
    }

    /// Builds the schema
    pub fn build(self) -> Schema {
        let mut schema = self.schema;
        schema.calculations.features = RuleSet::from(self.features);
        schema.calculations.commission_items = RuleSet::from(self.commission_items);
        schema.calculations.recommendations = RuleSet::from(self.recommendation_rules);
        schema.calculations.additional_costs = self.costs.into_iter().collect::<CostRules>();
        schema
    }
}

/// Builder for constructing test questions
pub struct QuestionBuilder {
    question: Question,
}

impl QuestionBuilder {
    /// Creates a required text question
    pub fn new(id: &str) -> Self {
        Self {
            question: Question::new(id, QuestionType::Text),
        }
    }

    /// Sets the question type
    pub fn with_type(mut self, question_type: QuestionType) -> Self {
        self.question.question_type = question_type;
        self
    }

    /// Sets the label used in error messages
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.question.label = Some(label.into());
        self
    }

    /// Marks the question as optional
    pub fn optional(mut self) -> Self {
        self.question = self.question.optional();
        self
    }

    /// Sets the default answer
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.question.default_value = Some(value.into());
        self
    }

    /// Requires an answer when `condition` holds
    pub fn required_when(mut self, condition: Condition) -> Self {
        self.question.conditional_required = Some(condition);
        self
    }

    /// Fails with `message` when `condition` holds
    pub fn reject_when(mut self, condition: Condition, message: impl Into<String>) -> Self {
        self.question.validators.push(ValidatorRule::Conditional {
            condition,
            message: message.into(),
        });
        self
    }

    /// Runs a registered validator
    pub fn with_validator(mut self, function: &str) -> Self {
        self.question.validators.push(ValidatorRule::Computed(FunctionRef::new(function)));
        self
    }

    /// Builds the question
    pub fn build(self) -> Question {
        self.question
    }
}
