//! Login screen sequencing for the till.
//!
//! Role selection, the timed transition into each login panel, credential
//! submission and the password reset overlays. State changes only in
//! [`update::update`]; [`LoginRuntime`] executes the timers and auth calls
//! the reducer asks for.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod runtime;
pub mod state;
pub mod update;

pub use effects::{AuthCall, LoginEffect};
pub use events::LoginEvent;
pub use features::phase::Phase;
pub use runtime::LoginRuntime;
pub use state::{LoginSettings, LoginState, LoginView};
