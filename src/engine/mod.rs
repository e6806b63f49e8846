//! The workflow engine and its configuration.

pub mod builder;
pub mod config;
pub mod machine;
pub mod view;

pub use builder::EngineBuilder;
pub use config::{ChargeDeniedPolicy, ConfigError, EngineConfig, DEFAULT_ATTRIBUTE};
pub use machine::{Engine, TransitOutcome};
pub use view::{StateView, TransitionView};
