//! Sign content: what an item displays and how it is placed on the panel.

pub mod compose;
pub mod item;
