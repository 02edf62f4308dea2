//! Core till library (config, logging, auth client, validation, routing).

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod routing;
pub mod validation;

pub use till_types as types;
