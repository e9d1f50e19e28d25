use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbaImage;

use crate::font::atlas_json::AtlasJsonSource;
use crate::font::bitmatrix::BitMatrixSource;
use crate::font::bmfont_xml::BmFontXmlSource;
use crate::font::glyph::BitmapFont;
use crate::foundation::error::{LedSignError, LedSignResult};

/// Largest font file accepted by [`load_font_file`].
pub const MAX_FONT_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// On-disk font encodings understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFormat {
    /// BMFont-style XML metrics with an external atlas image.
    BmFontXml,
    /// JSON metrics with an external atlas image (`imageFile`).
    AtlasJson,
    /// JSON packed bit-matrix; the atlas is synthesized.
    BitMatrix,
}

/// Something that can turn the bytes of a font definition into a [`BitmapFont`].
///
/// `base_dir` is the directory used to resolve atlas references.
pub trait FontSource {
    fn format(&self) -> FontFormat;

    fn parse(&self, name: &str, bytes: &[u8], base_dir: &Path) -> LedSignResult<BitmapFont>;
}

/// Pick the parser for a given format.
pub fn source_for(format: FontFormat) -> Box<dyn FontSource> {
    match format {
        FontFormat::BmFontXml => Box::new(BmFontXmlSource),
        FontFormat::AtlasJson => Box::new(AtlasJsonSource),
        FontFormat::BitMatrix => Box::new(BitMatrixSource),
    }
}

/// Sniff the encoding from the file extension and the leading bytes.
pub fn detect_format(path: &Path, bytes: &[u8]) -> LedSignResult<FontFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);
    let text = std::str::from_utf8(bytes)
        .map_err(|e| LedSignError::format(format!("font file is not UTF-8: {e}")))?;
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();

    if matches!(ext.as_deref(), Some("xml" | "fnt")) || trimmed.starts_with('<') {
        return Ok(FontFormat::BmFontXml);
    }

    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|e| LedSignError::format(format!("font json: {e}")))?;
    let Some(obj) = value.as_object() else {
        return Err(LedSignError::format("font json must be an object"));
    };
    if obj.contains_key("imageFile") {
        return Ok(FontFormat::AtlasJson);
    }
    if obj.get("chars").is_some_and(|c| c.is_object()) {
        return Ok(FontFormat::BitMatrix);
    }
    Err(LedSignError::format(
        "font json has neither 'imageFile' nor a 'chars' bit-matrix map",
    ))
}

/// Read, size-check, detect and parse a font file.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_font_file(name: &str, path: impl AsRef<Path>) -> LedSignResult<BitmapFont> {
    let path = path.as_ref();
    let bytes = read_capped(path)?;
    let format = detect_format(path, &bytes)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let font = source_for(format).parse(name, &bytes, base_dir)?;
    tracing::debug!(
        ?format,
        glyphs = font.glyph_count(),
        line_height = font.line_height(),
        "loaded font"
    );
    Ok(font)
}

fn read_capped(path: &Path) -> LedSignResult<Vec<u8>> {
    let meta = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LedSignError::file_not_found(path));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("stat font '{}'", path.display()))
                .into());
        }
    };
    if !meta.is_file() {
        return Err(LedSignError::file_not_found(path));
    }
    if meta.len() > MAX_FONT_FILE_BYTES {
        return Err(LedSignError::SizeLimitExceeded {
            path: path.to_path_buf(),
            size: meta.len(),
            limit: MAX_FONT_FILE_BYTES,
        });
    }
    std::fs::read(path)
        .with_context(|| format!("read font '{}'", path.display()))
        .map_err(LedSignError::from)
}

/// Load an atlas image referenced by a metrics file.
pub(crate) fn load_atlas(base_dir: &Path, file: &str) -> LedSignResult<RgbaImage> {
    let file = file.trim();
    if file.is_empty() {
        return Err(LedSignError::format("font references an empty atlas file name"));
    }
    let path: PathBuf = base_dir.join(file.replace('\\', "/"));
    if !path.is_file() {
        return Err(LedSignError::file_not_found(path));
    }
    let img = image::open(&path)
        .with_context(|| format!("decode atlas '{}'", path.display()))?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/font/source.rs"]
mod tests;
