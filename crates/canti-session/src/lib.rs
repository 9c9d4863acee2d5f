//! Per-session conversation state for the Canti chat relay.

pub mod context;
pub mod manager;
pub mod session;

pub use context::*;
pub use manager::{SessionHandle, SessionManager};
pub use session::*;

#[cfg(test)]
mod tests;
