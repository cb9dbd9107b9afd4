//! Token issuance service and its HTTP surface.

pub mod handlers;
pub mod service;

pub use handlers::{StandardResponse, routes};
pub use service::{IssueError, TokenPair, TokenService};
