use crate::{date::format_w3c, error::ValidationError, range::DateRange};
use chrono::NaiveDate;
use core::fmt::{self, Display};
use tracing::{debug, trace};

/// Identifies a control within a form by its name. Conditions use it to say which control they
/// look at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlId(String);

impl ControlId {
    /// Creates an id from a control name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the control name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a rule checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// The user entered anything at all, valid or not.
    Filled,
    /// What the user entered (if anything) is a real date.
    Valid,
    /// The value lies in the given range.
    Range(DateRange),
}

impl Operation {
    /// Returns a short name for the operation, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Filled => "filled",
            Operation::Valid => "valid",
            Operation::Range(_) => "range",
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            Operation::Filled => "This field is required.",
            Operation::Valid => "Please enter a valid date.",
            Operation::Range(range) => match (range.min(), range.max()) {
                (Some(_), Some(_)) => "Please enter a date between %min and %max.",
                (Some(_), None) => "Please enter a date on or after %min.",
                (None, Some(_)) => "Please enter a date on or before %max.",
                (None, None) => "Please enter a date.",
            },
        }
    }
}

/// A single entry in a [`Rules`] set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Checks the owning control. Fails validation if the check (inverted when `negative`) fails.
    Validator {
        /// The check.
        operation: Operation,
        /// Whether the check's result is inverted.
        negative: bool,
        /// Shown when the rule fails. Falls back to the operation's default message.
        message: Option<String>,
    },
    /// Checks `control` and, if the check (inverted when `negative`) holds, validates `rules`.
    Condition {
        /// The check.
        operation: Operation,
        /// Whether the check's result is inverted.
        negative: bool,
        /// The control the check is made against.
        control: ControlId,
        /// Rules that apply only while the condition holds.
        rules: Rules,
    },
}

impl Rule {
    /// Returns a validator rule with the operation's default message.
    pub fn validator(operation: Operation) -> Self {
        Rule::Validator {
            operation,
            negative: false,
            message: None,
        }
    }

    /// Returns a condition on `control` guarding `rules`.
    pub fn condition(operation: Operation, control: ControlId, rules: Rules) -> Self {
        Rule::Condition {
            operation,
            negative: false,
            control,
            rules,
        }
    }

    /// Returns this rule with its check inverted.
    pub fn negate(mut self) -> Self {
        match &mut self {
            Rule::Validator { negative, .. } | Rule::Condition { negative, .. } => {
                *negative = !*negative
            }
        }
        self
    }

    /// Returns this rule with `message` shown on failure. Conditions have no message of their own,
    /// so they are returned unchanged.
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        if let Rule::Validator { message, .. } = &mut self {
            *message = Some(text.into());
        }
        self
    }
}

/// A control that [`Rules`] can be evaluated against.
pub trait RuleTarget {
    /// The id conditions use to refer to this control.
    fn id(&self) -> &ControlId;

    /// The label substituted for `%label` in messages.
    fn label(&self) -> &str;

    /// Whether the user entered anything.
    fn is_filled(&self) -> bool;

    /// Runs `operation` against this control.
    fn evaluate(&self, operation: &Operation) -> bool;
}

/// An ordered set of rules attached to a control.
///
/// ```
/// use chrono::NaiveDate;
/// use datepicker::{ControlId, DateRange, Operation, Rules};
///
/// let id = ControlId::new("birthday");
/// let mut rules = Rules::new();
/// rules
///     .add_rule(Operation::Valid, None)
///     .add_condition(Operation::Filled, &id, |rules| {
///         let min = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
///         rules.add_rule(Operation::Range(DateRange::since(min)), None);
///     });
///
/// assert_eq!(NaiveDate::from_ymd_opt(1900, 1, 1), rules.extract_range(&id).min());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rules {
    rules: Vec<Rule>,
}

impl Rules {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `rule`.
    pub fn push(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Appends a validator for `operation`, with `message` shown on failure.
    pub fn add_rule(&mut self, operation: Operation, message: Option<&str>) -> &mut Self {
        let rule = Rule::validator(operation);
        self.push(match message {
            Some(message) => rule.with_message(message),
            None => rule,
        })
    }

    /// Appends a condition on `control`, whose guarded rules are filled in by `build`.
    pub fn add_condition<F>(
        &mut self,
        operation: Operation,
        control: &ControlId,
        build: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut Rules),
    {
        let mut rules = Rules::new();
        build(&mut rules);
        self.push(Rule::condition(operation, control.clone(), rules))
    }

    /// Makes the control required: puts a [`Operation::Filled`] validator first, replacing any
    /// existing top-level one. With `None`, removes the requirement.
    pub fn set_required(&mut self, message: Option<&str>) -> &mut Self {
        self.rules.retain(|rule| !is_required_rule(rule));
        if let Some(message) = message {
            self.rules
                .insert(0, Rule::validator(Operation::Filled).with_message(message));
        }
        self
    }

    /// Returns true if a top-level, non-negated [`Operation::Filled`] validator is present.
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(is_required_rule)
    }

    /// Returns the rules in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Returns the number of top-level rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Finds the tightest range of dates the rules allow for the control `this`.
    ///
    /// Non-negated [`Operation::Range`] validators contribute their range. Non-negated
    /// [`Operation::Filled`] conditions on `this` contribute the range extracted from the rules
    /// they guard: once the user types anything, those ranges apply too, so the rendered input
    /// should already show them. Everything else is ignored.
    ///
    /// The minimum only moves later and the maximum only moves earlier; either may stay open. The
    /// result is not checked: conflicting rules give an inverted range.
    pub fn extract_range(&self, this: &ControlId) -> DateRange {
        self.rules.iter().fold(DateRange::unbounded(), |range, rule| {
            let rule_range = match rule {
                Rule::Validator {
                    operation: Operation::Range(rule_range),
                    negative: false,
                    ..
                } => *rule_range,
                Rule::Condition {
                    operation: Operation::Filled,
                    negative: false,
                    control,
                    rules,
                } if control == this => rules.extract_range(this),
                _ => return range,
            };
            trace!(control = %this, range = %rule_range, "range rule found");
            range.intersect(&rule_range)
        })
    }

    /// Validates `control` against these rules and returns the first failure.
    ///
    /// If the control isn't required and the user left it empty, only [`Operation::Filled`]
    /// validators are checked. Conditions on other controls can't be evaluated from here and are
    /// skipped.
    pub fn validate<C: RuleTarget>(&self, control: &C) -> Result<(), ValidationError> {
        let empty_optional = !self.is_required() && !control.is_filled();
        self.validate_rec(control, empty_optional)
    }

    fn validate_rec<C: RuleTarget>(
        &self,
        control: &C,
        empty_optional: bool,
    ) -> Result<(), ValidationError> {
        for rule in &self.rules {
            match rule {
                Rule::Validator {
                    operation,
                    negative,
                    message,
                } => {
                    if empty_optional && *operation != Operation::Filled {
                        continue;
                    }
                    if control.evaluate(operation) == *negative {
                        let template = message
                            .as_deref()
                            .unwrap_or_else(|| operation.default_message());
                        return Err(ValidationError {
                            message: fill_message(template, control.label(), operation),
                        });
                    }
                }
                Rule::Condition {
                    operation,
                    negative,
                    control: target,
                    rules,
                } => {
                    if target != control.id() {
                        debug!(
                            control = %control.id(),
                            target = %target,
                            operation = operation.name(),
                            "skipping condition on another control"
                        );
                        continue;
                    }
                    if control.evaluate(operation) != *negative {
                        rules.validate_rec(control, empty_optional)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Rules {
    type Item = &'a Rule;
    type IntoIter = core::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn is_required_rule(rule: &Rule) -> bool {
    matches!(
        rule,
        Rule::Validator {
            operation: Operation::Filled,
            negative: false,
            ..
        }
    )
}

fn fill_message(template: &str, label: &str, operation: &Operation) -> String {
    let bound = |date: Option<NaiveDate>| date.as_ref().map_or(String::new(), format_w3c);
    let (min, max) = match operation {
        Operation::Range(range) => (bound(range.min()), bound(range.max())),
        _ => (String::new(), String::new()),
    };
    template
        .replace("%label", label)
        .replace("%min", &min)
        .replace("%max", &max)
}
