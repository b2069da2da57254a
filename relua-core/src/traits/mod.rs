//! Trait seams for external collaborators and cross-cutting concerns.

pub mod cancellation;
pub mod content_source;

pub use cancellation::{Cancellable, CancellationToken};
pub use content_source::{ContentSource, ReadFailure};
