//! Engine async tasks
//!
//! Each task runs independently and communicates via channels/signals.
//! The tasks are plain futures; [`crate::Engine::run`] joins them so the
//! platform only spawns one.

pub mod actuation;
pub mod controller;
pub mod transport;

pub use actuation::actuation_task;
pub use controller::controller_task;
pub use transport::transport_task;
