//! Rule specs and the reference payload validator.
//!
//! Rule specs use the familiar pipe syntax, e.g. `"required|string|max:255"`.
//! Every rule of every field runs, and all failures are accumulated with
//! Stillwater's `Validation` instead of stopping at the first one.

use crate::core::Payload;
use crate::validation::violations::{FieldError, ValidationErrors};
use crate::validation::{PayloadValidator, RuleMap};
use serde_json::Value;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for the outcome of a single rule check
type Check = Validation<(), NonEmptyVec<FieldError>>;

/// One parsed rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    Nullable,
    String,
    Numeric,
    Integer,
    Boolean,
    Array,
    Min(f64),
    Max(f64),
    In(Vec<String>),
}

impl Rule {
    /// Parse a single token such as `max:255`.
    pub fn parse(token: &str) -> Result<Self, String> {
        let (name, argument) = match token.split_once(':') {
            Some((name, argument)) => (name.trim(), Some(argument.trim())),
            None => (token.trim(), None),
        };

        let bound = |argument: Option<&str>| {
            argument
                .and_then(|a| a.parse::<f64>().ok())
                .ok_or_else(|| format!("rule '{name}' needs a numeric argument"))
        };

        match name {
            "required" => Ok(Self::Required),
            "nullable" => Ok(Self::Nullable),
            "string" => Ok(Self::String),
            "numeric" => Ok(Self::Numeric),
            "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            "array" => Ok(Self::Array),
            "min" => bound(argument).map(Self::Min),
            "max" => bound(argument).map(Self::Max),
            "in" => Ok(Self::In(
                argument
                    .unwrap_or_default()
                    .split(',')
                    .map(|option| option.trim().to_string())
                    .filter(|option| !option.is_empty())
                    .collect(),
            )),
            other => Err(format!("unknown rule '{other}'")),
        }
    }

    /// Parse a whole pipe-separated spec.
    pub fn parse_spec(spec: &str) -> Vec<Result<Self, String>> {
        spec.split('|')
            .filter(|token| !token.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    fn check(&self, field: &str, value: &Value) -> Check {
        let failed = |message: String| Validation::fail(FieldError::new(field, message));

        match self {
            Self::Required => {
                if is_blank(value) {
                    failed("is required".to_string())
                } else {
                    Validation::success(())
                }
            }
            Self::Nullable => Validation::success(()),
            Self::String if !value.is_string() => failed("must be a string".to_string()),
            Self::Numeric if !value.is_number() => failed("must be numeric".to_string()),
            Self::Integer if !(value.is_i64() || value.is_u64()) => {
                failed("must be an integer".to_string())
            }
            Self::Boolean if !value.is_boolean() => failed("must be true or false".to_string()),
            Self::Array if !value.is_array() => failed("must be a list".to_string()),
            Self::Min(min) => match measure(value) {
                Some(size) if size < *min => failed(format!("must be at least {min}")),
                Some(_) => Validation::success(()),
                None => failed("cannot be measured".to_string()),
            },
            Self::Max(max) => match measure(value) {
                Some(size) if size > *max => failed(format!("may not be greater than {max}")),
                Some(_) => Validation::success(()),
                None => failed("cannot be measured".to_string()),
            },
            Self::In(options) => {
                let candidate = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                if options.contains(&candidate) {
                    Validation::success(())
                } else {
                    failed(format!("must be one of: {}", options.join(", ")))
                }
            }
            _ => Validation::success(()),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Length of strings and lists, magnitude of numbers.
fn measure(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Reference [`PayloadValidator`] understanding the rules in [`Rule`].
///
/// # Example
///
/// ```rust
/// use waymark::core::payload;
/// use waymark::validation::{PayloadValidator, RuleMap, RuleValidator};
/// use serde_json::json;
///
/// let rules = RuleMap::from([("comment".to_string(), "required|string".to_string())]);
///
/// let errors = RuleValidator
///     .validate(&rules, &payload(json!({})))
///     .unwrap_err();
/// assert!(errors.has("comment"));
///
/// assert!(RuleValidator
///     .validate(&rules, &payload(json!({"comment": "x"})))
///     .is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleValidator;

impl RuleValidator {
    fn check_field(field: &str, spec: &str, value: Option<&Value>) -> Vec<Check> {
        let mut rules = Vec::new();
        let mut checks = Vec::new();

        for parsed in Rule::parse_spec(spec) {
            match parsed {
                Ok(rule) => rules.push(rule),
                Err(message) => checks.push(Validation::fail(FieldError::new(field, message))),
            }
        }

        let required = rules.contains(&Rule::Required);
        let nullable = rules.contains(&Rule::Nullable);

        match value {
            None | Some(Value::Null) if required => {
                checks.push(Rule::Required.check(field, &Value::Null));
            }
            None => {}
            Some(Value::Null) if nullable => {}
            Some(value) => {
                checks.extend(rules.iter().map(|rule| rule.check(field, value)));
            }
        }

        checks
    }
}

impl PayloadValidator for RuleValidator {
    fn validate(&self, rules: &RuleMap, payload: &Payload) -> Result<(), ValidationErrors> {
        let checks: Vec<Check> = rules
            .iter()
            .flat_map(|(field, spec)| Self::check_field(field, spec, payload.get(field)))
            .collect();

        match Validation::all_vec(checks).map(|_| ()) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
        }
    }
}
