//! Use case orchestration.
//!
//! Each use case is a small struct over the ports it needs, so callers wire
//! adapters once and tests substitute doubles.

mod resolve_request;
mod switch_environment;

pub use resolve_request::{ResolveRequest, ResolveRequestError, ResolvedRequest};
pub use switch_environment::{
    SwitchEnvironment, SwitchEnvironmentError, SwitchEnvironmentOutput,
};
