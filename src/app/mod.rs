//! App layer - central state management and command processing
//!
//! The App actor receives UI events, session events and view snapshots,
//! updates state, and emits session commands and render state.

pub mod state;
pub mod actor;
pub mod commands;

pub use state::AppState;
pub use actor::AppActor;
