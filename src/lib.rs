//! # directive-agent
//!
//! Directive lifecycle core for device-side capability agents.
//!
//! Directives arrive asynchronously from a remote service, possibly on many
//! threads at once. Each capability agent keeps the directives it has accepted
//! in a [`DirectiveRegistry`], keyed by message id, from pre-handle until it
//! removes them. Duplicate message ids are rejected and reported through an
//! [`ExceptionEncounteredSender`].
//!
//! Concrete agents embed a [`CapabilityAgentCore`] and implement the lifecycle
//! hooks of the [`CapabilityAgent`] trait.

pub mod capability_agent;
pub mod config;
pub mod directive;
pub mod error;
pub mod event_builder;
pub mod exception;
pub mod logger;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use capability_agent::{CapabilityAgent, CapabilityAgentCore, ContextRequestError, FocusState};
pub use config::AgentConfig;
pub use directive::{Directive, DirectiveHandlerResult};
pub use error::{AgentError, Result};
pub use exception::{ExceptionEncounteredSender, ExceptionErrorType};
pub use registry::{DirectiveRecord, DirectiveRegistry};
