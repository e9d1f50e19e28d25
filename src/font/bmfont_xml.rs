use std::path::Path;

use crate::font::glyph::{BitmapFont, Glyph, MISSING_GLYPH_ID};
use crate::font::source::{FontFormat, FontSource, load_atlas};
use crate::foundation::error::{LedSignError, LedSignResult};

/// BMFont XML: `<common lineHeight base/>`, `<page file/>`, `<char .../>`, `<kerning .../>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BmFontXmlSource;

impl FontSource for BmFontXmlSource {
    fn format(&self) -> FontFormat {
        FontFormat::BmFontXml
    }

    fn parse(&self, name: &str, bytes: &[u8], base_dir: &Path) -> LedSignResult<BitmapFont> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| LedSignError::format(format!("font xml is not UTF-8: {e}")))?;
        let doc = roxmltree::Document::parse(text.trim_start_matches('\u{feff}'))
            .map_err(|e| LedSignError::format(format!("font xml: {e}")))?;

        let common = doc
            .descendants()
            .find(|n| n.has_tag_name("common"))
            .ok_or_else(|| LedSignError::format("font xml has no <common> element"))?;
        let line_height = attr_u32(&common, "lineHeight")?;
        let baseline = attr_u32_or(&common, "base", line_height)?;

        let page_file = doc
            .descendants()
            .filter(|n| n.has_tag_name("page"))
            .find(|n| n.attribute("id").is_none_or(|id| id.trim() == "0"))
            .and_then(|n| n.attribute("file"))
            .ok_or_else(|| LedSignError::format("font xml has no <page id=\"0\" file=...>"))?;
        let atlas = load_atlas(base_dir, page_file)?;

        let mut glyphs = Vec::new();
        for node in doc.descendants().filter(|n| n.has_tag_name("char")) {
            let page = attr_i64_or(&node, "page", 0)?;
            if page != 0 {
                tracing::warn!(font = name, page, "skipping glyph on secondary atlas page");
                continue;
            }
            let raw_id = attr_i64(&node, "id")?;
            let id = if raw_id < 0 {
                MISSING_GLYPH_ID
            } else {
                u32::try_from(raw_id)
                    .map_err(|_| LedSignError::format(format!("char id {raw_id} out of range")))?
            };
            glyphs.push(Glyph {
                id,
                x: attr_u32(&node, "x")?,
                y: attr_u32(&node, "y")?,
                width: attr_u32(&node, "width")?,
                height: attr_u32(&node, "height")?,
                x_offset: attr_i32_or(&node, "xoffset", 0)?,
                y_offset: attr_i32_or(&node, "yoffset", 0)?,
                x_advance: attr_i32(&node, "xadvance")?,
            });
        }

        let mut kernings = Vec::new();
        for node in doc.descendants().filter(|n| n.has_tag_name("kerning")) {
            kernings.push((
                (attr_u32(&node, "first")?, attr_u32(&node, "second")?),
                attr_i32(&node, "amount")?,
            ));
        }

        Ok(BitmapFont::new(
            name, line_height, baseline, atlas, glyphs, kernings,
        ))
    }
}

fn attr_raw<'a>(node: &roxmltree::Node<'a, '_>, key: &str) -> LedSignResult<&'a str> {
    node.attribute(key).ok_or_else(|| {
        LedSignError::format(format!(
            "<{}> is missing attribute '{key}'",
            node.tag_name().name()
        ))
    })
}

fn attr_i64(node: &roxmltree::Node<'_, '_>, key: &str) -> LedSignResult<i64> {
    let raw = attr_raw(node, key)?;
    raw.trim().parse::<i64>().map_err(|_| {
        LedSignError::format(format!(
            "<{}> attribute '{key}' is not an integer: '{raw}'",
            node.tag_name().name()
        ))
    })
}

fn attr_i64_or(node: &roxmltree::Node<'_, '_>, key: &str, default: i64) -> LedSignResult<i64> {
    if node.attribute(key).is_none() {
        return Ok(default);
    }
    attr_i64(node, key)
}

fn attr_u32(node: &roxmltree::Node<'_, '_>, key: &str) -> LedSignResult<u32> {
    narrow(node, key, attr_i64(node, key)?)
}

fn attr_u32_or(node: &roxmltree::Node<'_, '_>, key: &str, default: u32) -> LedSignResult<u32> {
    narrow(node, key, attr_i64_or(node, key, i64::from(default))?)
}

fn attr_i32(node: &roxmltree::Node<'_, '_>, key: &str) -> LedSignResult<i32> {
    narrow(node, key, attr_i64(node, key)?)
}

fn attr_i32_or(node: &roxmltree::Node<'_, '_>, key: &str, default: i32) -> LedSignResult<i32> {
    narrow(node, key, attr_i64_or(node, key, i64::from(default))?)
}

fn narrow<T: TryFrom<i64>>(node: &roxmltree::Node<'_, '_>, key: &str, v: i64) -> LedSignResult<T> {
    T::try_from(v).map_err(|_| {
        LedSignError::format(format!(
            "<{}> attribute '{key}' out of range: {v}",
            node.tag_name().name()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/font/bmfont_xml.rs"]
mod tests;
