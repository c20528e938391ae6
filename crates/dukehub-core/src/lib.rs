//! Identity, follow graph, posts and moderation for the DukeHub front end.
//!
//! The core is single-actor: every operation takes `&mut self` and runs to
//! completion before the next one starts. The rendering layer is expected to
//! serialize user actions; nothing in here locks.

pub mod avatar;
pub mod config;
pub mod content;
pub mod credentials;
pub mod directory;
pub mod error;
pub mod graph;
pub mod likes;
pub mod media;
pub mod moderation;
pub mod session;

pub use config::{AdminProvisioning, CoreConfig, HashCost};
pub use error::CoreError;
pub use session::SessionManager;
