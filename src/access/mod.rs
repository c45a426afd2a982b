//! Access control for classes, users and quizzes.
//!
//! A route declares a [`GuardChain`]: resolution guards turn path identifiers
//! into entities attached to the [`RequestContext`], then policy guards make
//! an admit/deny decision from the caller's identity and those entities.

pub mod chain;
pub mod context;
pub mod identifier;
pub mod policy;
pub mod resolve;

pub use chain::GuardChain;
pub use context::{ContextKey, RequestContext, Resolved};
pub use identifier::{is_valid_identifier, parse_identifier};
pub use policy::{decide, enforce, Decision, Denial, Policy};
pub use resolve::{resolve, Resolution};
