//! Session layer - wallet/ledger synchronization
//!
//! The Session actor owns the synchronizer, runs one command at a time and
//! reports back to the App layer.

pub mod sync;
pub mod actor;

pub use sync::{CounterAction, Phase, Synchronizer, ViewState};
pub use actor::SessionActor;
