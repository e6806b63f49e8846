//! Snapshot of a single transition: where from, where to, who, with what.

use super::actor::Actor;
use super::state::State;
use serde::{Deserialize, Serialize};

/// Arbitrary data submitted alongside a transition.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Convert a JSON value into a payload. Anything but an object yields an
/// empty payload.
///
/// ```rust
/// use waymark::core::payload;
/// use serde_json::json;
///
/// assert_eq!(payload(json!({"comment": "ok"})).len(), 1);
/// assert!(payload(json!("not an object")).is_empty());
/// ```
pub fn payload(value: serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Payload::new(),
    }
}

/// Immutable description of a transition.
///
/// The same type describes a transition that is about to happen (handed to
/// guards and charges) and one that already happened (rebuilt from audit
/// records). A missing source means the entity was just initialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Context {
    source: Option<State>,
    target: State,
    actor: Option<Actor>,
    #[serde(default)]
    data: Payload,
}

impl Context {
    pub fn new(source: Option<State>, target: State, actor: Option<Actor>, data: Payload) -> Self {
        Self {
            source,
            target,
            actor,
            data,
        }
    }

    /// Context for entering the initial state.
    pub fn initial(target: State, actor: Option<Actor>, data: Payload) -> Self {
        Self::new(None, target, actor, data)
    }

    pub fn source(&self) -> Option<&State> {
        self.source.as_ref()
    }

    pub fn target(&self) -> &State {
        &self.target
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn data(&self) -> &Payload {
        &self.data
    }

    /// Look up a single payload field.
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    pub fn is_initialization(&self) -> bool {
        self.source.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initial_context_has_no_source() {
        let ctx = Context::initial(State::new("new"), None, Payload::new());
        assert!(ctx.is_initialization());
        assert!(ctx.source().is_none());
        assert_eq!(ctx.target(), &State::new("new"));
    }

    #[test]
    fn context_exposes_payload_fields() {
        let ctx = Context::new(
            Some(State::new("review")),
            State::new("correction"),
            Some(Actor::new("ed")),
            payload(json!({"comment": "typo in title"})),
        );

        assert_eq!(ctx.get("comment"), Some(&json!("typo in title")));
        assert_eq!(ctx.actor().map(Actor::id), Some("ed"));
        assert!(!ctx.is_initialization());
    }

    #[test]
    fn context_round_trips_through_json() {
        let ctx = Context::new(
            Some(State::new(1)),
            State::new(2),
            None,
            payload(json!({"n": 1})),
        );

        let json = serde_json::to_string(&ctx).unwrap();
        let restored: Context = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ctx);
    }
}
