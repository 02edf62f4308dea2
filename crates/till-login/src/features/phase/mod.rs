//! Role selection and the phase transition sequence.

mod state;
mod update;

pub use state::Phase;
pub use update::{advance_phase, return_to_role_selection, select_role};
