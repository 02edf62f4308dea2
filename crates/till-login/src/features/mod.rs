//! Login screen features.
//!
//! Each feature owns its state types and the reducer functions for the
//! events it handles. `update.rs` routes events here.

pub mod credentials;
pub mod phase;
pub mod reveal;
