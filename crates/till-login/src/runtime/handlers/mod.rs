//! Effect handlers for the login runtime.
//!
//! Handlers are pure async functions that return a `LoginEvent`. The runtime
//! spawns them and sends the result to its inbox; they never touch state.

pub mod auth;

pub use auth::run_auth_call;
