use std::path::Path;

use serde::Deserialize;

use crate::font::glyph::{BitmapFont, Glyph, MISSING_GLYPH_ID};
use crate::font::source::{FontFormat, FontSource, load_atlas};
use crate::foundation::error::{LedSignError, LedSignResult};

/// JSON metrics with an external atlas, same shape as the XML encoding.
#[derive(Clone, Copy, Debug, Default)]
pub struct AtlasJsonSource;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasFontDef {
    line_height: u32,
    #[serde(default, alias = "baseline")]
    base: Option<u32>,
    image_file: String,
    #[serde(default)]
    chars: Vec<CharDef>,
    #[serde(default)]
    kernings: Vec<KerningDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharDef {
    id: i64,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    #[serde(default, alias = "xoffset")]
    x_offset: i32,
    #[serde(default, alias = "yoffset")]
    y_offset: i32,
    #[serde(alias = "xadvance")]
    x_advance: i32,
}

#[derive(Debug, Deserialize)]
struct KerningDef {
    first: u32,
    second: u32,
    amount: i32,
}

impl FontSource for AtlasJsonSource {
    fn format(&self) -> FontFormat {
        FontFormat::AtlasJson
    }

    fn parse(&self, name: &str, bytes: &[u8], base_dir: &Path) -> LedSignResult<BitmapFont> {
        let def: AtlasFontDef = serde_json::from_slice(bytes)
            .map_err(|e| LedSignError::format(format!("atlas font json: {e}")))?;
        let atlas = load_atlas(base_dir, &def.image_file)?;

        let mut glyphs = Vec::with_capacity(def.chars.len());
        for c in def.chars {
            let id = if c.id < 0 {
                MISSING_GLYPH_ID
            } else {
                u32::try_from(c.id)
                    .map_err(|_| LedSignError::format(format!("char id {} out of range", c.id)))?
            };
            glyphs.push(Glyph {
                id,
                x: c.x,
                y: c.y,
                width: c.width,
                height: c.height,
                x_offset: c.x_offset,
                y_offset: c.y_offset,
                x_advance: c.x_advance,
            });
        }

        Ok(BitmapFont::new(
            name,
            def.line_height,
            def.base.unwrap_or(def.line_height),
            atlas,
            glyphs,
            def.kernings
                .into_iter()
                .map(|k| ((k.first, k.second), k.amount)),
        ))
    }
}
