//! Middleware for the Rolegate gateway.

pub mod guard;
pub mod path;

pub use guard::{GuardLayer, GuardMiddleware};
pub use path::canonical_path;
