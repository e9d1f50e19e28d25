use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::font::glyph::BitmapFont;
use crate::font::source::load_font_file;
use crate::foundation::error::LedSignResult;

/// Explicitly owned name -> font cache.
///
/// Fonts are shared as `Arc` so renders in flight keep their font alive across a replace or evict.
/// A failed [`FontRegistry::load`] leaves the registry untouched.
#[derive(Clone, Debug, Default)]
pub struct FontRegistry {
    fonts: HashMap<String, Arc<BitmapFont>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` and register it as `name`, replacing any previous font of that name.
    #[tracing::instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load(&mut self, name: &str, path: impl AsRef<Path>) -> LedSignResult<Arc<BitmapFont>> {
        let font = Arc::new(load_font_file(name, path)?);
        if self.fonts.insert(name.to_owned(), font.clone()).is_some() {
            tracing::debug!(font = name, "replaced cached font");
        }
        Ok(font)
    }

    /// Register an already built font under its own name. Returns the font it replaced.
    pub fn insert(&mut self, font: BitmapFont) -> Option<Arc<BitmapFont>> {
        self.fonts.insert(font.name().to_owned(), Arc::new(font))
    }

    pub fn get(&self, name: &str) -> Option<Arc<BitmapFont>> {
        self.fonts.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn evict(&mut self, name: &str) -> Option<Arc<BitmapFont>> {
        let out = self.fonts.remove(name);
        if out.is_some() {
            tracing::debug!(font = name, "evicted font");
        }
        out
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.fonts.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/font/registry.rs"]
mod tests;
