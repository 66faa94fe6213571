//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and Session layers.

pub mod ui_events;
pub mod session;
pub mod render;

pub use ui_events::UiEvent;
pub use session::{SessionCommand, SessionEvent};
pub use render::RenderState;
