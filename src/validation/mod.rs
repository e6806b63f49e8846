//! Payload validation for transitions.
//!
//! A transition may declare a rule map (field name to rule spec). At transit
//! time the engine forwards that map and the submitted payload to a
//! [`PayloadValidator`]. Failures come back keyed by field so callers can
//! show them next to the offending input.
//!
//! [`RuleValidator`] is the bundled implementation. Applications with their
//! own validation layer implement the trait instead.
//!
//! # Example
//!
//! ```rust
//! use waymark::core::payload;
//! use waymark::validation::{required_fields, PayloadValidator, RuleMap, RuleValidator};
//! use serde_json::json;
//!
//! let mut rules = RuleMap::new();
//! rules.insert("comment".into(), "required|string|max:500".into());
//! rules.insert("severity".into(), "in:low,high".into());
//!
//! assert_eq!(required_fields(&rules), vec!["comment".to_string()]);
//!
//! let result = RuleValidator.validate(&rules, &payload(json!({"severity": "medium"})));
//! let errors = result.unwrap_err();
//! assert!(errors.has("comment"));
//! assert!(errors.has("severity"));
//! ```

pub mod rules;
pub mod violations;

use crate::core::Payload;
use std::collections::BTreeMap;

pub use rules::{Rule, RuleValidator};
pub use violations::{FieldError, ValidationErrors};

/// Field name to rule spec, e.g. `"comment" => "required|string"`.
pub type RuleMap = BTreeMap<String, String>;

/// Validates transition payloads against a rule map.
pub trait PayloadValidator: Send + Sync {
    fn validate(&self, rules: &RuleMap, payload: &Payload) -> Result<(), ValidationErrors>;
}

/// Fields whose spec contains the `required` rule.
pub fn required_fields(rules: &RuleMap) -> Vec<String> {
    rules
        .iter()
        .filter(|(_, spec)| spec.split('|').any(|rule| rule.trim() == "required"))
        .map(|(field, _)| field.clone())
        .collect()
}
