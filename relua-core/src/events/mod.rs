//! Event system for discovery and restoration lifecycle reporting.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::ReluaEventHandler;
pub use types::*;
