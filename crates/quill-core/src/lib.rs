//! Quill core: the learner-state and structural-analysis engine.
//!
//! - [`analysis`]: keyword classifier and analysis policy
//! - [`mastery`]: bounded, monotonic mastery model
//! - [`session`]: chat messages, conversation coordinator, learner session
//! - [`responder`]: port to the external coaching responder

pub mod analysis;
pub mod config;
pub mod error;
pub mod mastery;
pub mod responder;
pub mod secret;
pub mod session;
pub mod task;

// Re-export common error type
pub use error::{QuillError, Result};
