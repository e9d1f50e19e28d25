//! Entry and exit transitions: configuration, the progress mapping, bitmap application and
//! timed playback.

pub mod apply;
pub mod config;
pub mod playback;
pub mod transitions;
