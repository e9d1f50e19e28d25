//! Frame timing: a cancellable sleep primitive and the global tick scheduler.

pub mod cancel;
pub mod scheduler;
