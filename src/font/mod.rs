//! Bitmap-font engine: font sources, glyph tables and text rasterization.

pub mod atlas_json;
pub mod bitmatrix;
pub mod bmfont_xml;
pub mod glyph;
pub mod layout;
pub mod registry;
pub mod source;
