//! Waymark: a blueprint-driven workflow engine
//!
//! Waymark attaches a finite-state workflow to one attribute of a persistent
//! entity. A blueprint declares the legal states and transitions; an engine
//! binds that blueprint to an entity and answers "where am I", "where can I
//! go" and "take me there". The engine never persists anything itself.
//!
//! # Core Concepts
//!
//! - **State**: scalar-backed states with value-based equality
//! - **Guards**: checks returning `Open`, `Recoverable` or `Fatal`
//! - **Transitions**: guarded, authorized, validated moves with post-commit callbacks
//! - **Charges**: progressive transitions that commit after enough contributions
//! - **Engine**: the driver binding blueprint, entity and attribute
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use waymark::builder::{BlueprintBuilder, TransitionBuilder};
//! use waymark::core::{Guard, Payload, StateValue};
//! use waymark::engine::EngineBuilder;
//! use waymark::entity::{Attributes, Entity};
//!
//! struct Article {
//!     attrs: Attributes,
//!     body: String,
//! }
//!
//! impl Entity for Article {
//!     fn entity_id(&self) -> String {
//!         "1".into()
//!     }
//!     fn attribute(&self, name: &str) -> Option<StateValue> {
//!         self.attrs.get(name)
//!     }
//!     fn set_attribute(&mut self, name: &str, value: StateValue) {
//!         self.attrs.set(name, value);
//!     }
//!     fn original_attribute(&self, name: &str) -> Option<StateValue> {
//!         self.attrs.original(name)
//!     }
//! }
//!
//! let blueprint = BlueprintBuilder::<Article>::new("article")
//!     .states(["new", "review"])
//!     .transition(
//!         TransitionBuilder::new()
//!             .from("new")
//!             .to("review")
//!             .guard(Guard::recoverable_unless(
//!                 |a: &Article, _| !a.body.is_empty(),
//!                 "needs content",
//!             )),
//!     )
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let article = Article { attrs: Attributes::new(), body: String::new() };
//! let mut engine = EngineBuilder::new(Arc::new(blueprint), article).build().unwrap();
//! engine.init(Payload::new()).unwrap();
//!
//! let available = engine.transitions();
//! let route = available.first().unwrap();
//! assert_eq!(available.problem(route).as_deref(), Some("needs content"));
//!
//! engine.entity_mut().body = "Hello".into();
//! engine.transit("review", Payload::new()).unwrap();
//! assert!(engine.is("review"));
//! ```

pub mod audit;
pub mod blueprint;
pub mod builder;
pub mod charge;
pub mod checkpoint;
pub mod core;
pub mod engine;
pub mod entity;
pub mod error;
pub mod transition;
pub mod validation;

// Re-export commonly used types
pub use crate::blueprint::{Blueprint, BlueprintRegistry, BlueprintValidator};
pub use crate::core::{Context, Guard, GuardOutcome, Payload, State, StateValue};
pub use crate::engine::{Engine, EngineBuilder, EngineConfig, TransitOutcome};
pub use crate::entity::Entity;
pub use crate::error::{ErrorKind, Result, WorkflowError};
pub use crate::transition::{Transition, TransitionCollection};
