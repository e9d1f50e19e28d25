//! LED matrix simulation: logical pixels in, physical-look panel bitmap out.

pub mod aging;
pub mod glow;
pub mod matrix;
pub mod renderer;
