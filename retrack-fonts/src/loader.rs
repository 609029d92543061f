//! Font loading seam and its two implementations.
//!
//! - [`SystemFontLoader`] answers from the system font database (`fontdb`).
//! - [`MemoryFontLoader`] succeeds for everything except an explicit deny
//!   list and records every call. The CLI uses it when font verification is
//!   disabled, and tests use it to count loads.

use std::collections::HashSet;

use fontdb::{Database, Family, Query, Style, Weight};
use parking_lot::Mutex;
use thiserror::Error;

use crate::descriptor::FontDescriptor;

/// Errors produced while loading a font.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FontLoadError {
    /// No installed face matches the requested family and style.
    #[error("font not available: {font}")]
    NotFound { font: FontDescriptor },

    /// The host reported a failure of its own.
    #[error("failed to load {font}: {message}")]
    Host {
        font: FontDescriptor,
        message: String,
    },
}

impl FontLoadError {
    pub fn font(&self) -> &FontDescriptor {
        match self {
            FontLoadError::NotFound { font } | FontLoadError::Host { font, .. } => font,
        }
    }
}

/// Loads a font so that it can be applied to text.
///
/// Calling twice for the same font is allowed; each call is awaited
/// independently by its caller.
#[allow(async_fn_in_trait)]
pub trait FontLoader {
    async fn load_font(&self, font: &FontDescriptor) -> Result<(), FontLoadError>;
}

/// Map a style name such as "SemiBold" or "Ultralight Italic" to a CSS weight.
pub fn weight_for_style_name(style: &str) -> u16 {
    let name: String = style
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_lowercase();
    let name = name.trim_end_matches("italic").trim_end_matches("oblique");

    match name {
        "thin" | "hairline" => 100,
        "ultralight" | "extralight" => 200,
        "light" => 300,
        "medium" => 500,
        "semibold" | "demibold" => 600,
        "bold" => 700,
        "extrabold" | "ultrabold" | "heavy" => 800,
        "black" => 900,
        _ => 400,
    }
}

fn is_italic_style_name(style: &str) -> bool {
    let lower = style.to_ascii_lowercase();
    lower.contains("italic") || lower.contains("oblique")
}

/// Loader backed by the system font database.
pub struct SystemFontLoader {
    db: Database,
}

impl std::fmt::Debug for SystemFontLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemFontLoader")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl SystemFontLoader {
    /// Scan the system font directories.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::info!("Loaded {} system fonts", db.len());
        Self { db }
    }

    /// Use an already populated database.
    pub fn with_database(db: Database) -> Self {
        Self { db }
    }

    /// Whether an installed face has the descriptor's family, weight and
    /// italic-ness.
    ///
    /// `Database::query` falls back to the nearest face of the family, so the
    /// match is checked again against the face it picked.
    pub fn contains(&self, font: &FontDescriptor) -> bool {
        let weight = Weight(weight_for_style_name(&font.style));
        let italic = is_italic_style_name(&font.style);
        let query = Query {
            families: &[Family::Name(&font.family)],
            weight,
            style: if italic { Style::Italic } else { Style::Normal },
            ..Query::default()
        };
        let Some(face) = self.db.query(&query).and_then(|id| self.db.face(id)) else {
            return false;
        };
        face.weight == weight && (face.style != Style::Normal) == italic
    }
}

impl Default for SystemFontLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLoader for SystemFontLoader {
    async fn load_font(&self, font: &FontDescriptor) -> Result<(), FontLoadError> {
        if self.contains(font) {
            log::debug!("Font available: {}", font);
            Ok(())
        } else {
            Err(FontLoadError::NotFound { font: font.clone() })
        }
    }
}

/// In-memory loader with a deny list and a call log.
#[derive(Debug, Default)]
pub struct MemoryFontLoader {
    unavailable: HashSet<FontDescriptor>,
    calls: Mutex<Vec<FontDescriptor>>,
}

impl MemoryFontLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads of `font` fail with [`FontLoadError::NotFound`].
    pub fn with_unavailable(mut self, font: FontDescriptor) -> Self {
        self.unavailable.insert(font);
        self
    }

    /// Every font requested so far, in call order.
    pub fn calls(&self) -> Vec<FontDescriptor> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl FontLoader for MemoryFontLoader {
    async fn load_font(&self, font: &FontDescriptor) -> Result<(), FontLoadError> {
        self.calls.lock().push(font.clone());
        // Suspend once, like a host round-trip would.
        tokio::task::yield_now().await;
        if self.unavailable.contains(font) {
            return Err(FontLoadError::NotFound { font: font.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_for_style_name() {
        assert_eq!(weight_for_style_name("Thin"), 100);
        assert_eq!(weight_for_style_name("UltraLight"), 200);
        assert_eq!(weight_for_style_name("Ultralight"), 200);
        assert_eq!(weight_for_style_name("Regular"), 400);
        assert_eq!(weight_for_style_name("SemiBold"), 600);
        assert_eq!(weight_for_style_name("Semi Bold"), 600);
        assert_eq!(weight_for_style_name("Bold Italic"), 700);
        assert_eq!(weight_for_style_name("Heavy"), 800);
        assert_eq!(weight_for_style_name("Black"), 900);
        assert_eq!(weight_for_style_name("Book"), 400);
    }

    #[test]
    fn test_italic_detection() {
        assert!(is_italic_style_name("Bold Italic"));
        assert!(is_italic_style_name("Oblique"));
        assert!(!is_italic_style_name("Regular"));
    }

    #[tokio::test]
    async fn test_empty_database_has_no_fonts() {
        let loader = SystemFontLoader::with_database(Database::new());
        let font = FontDescriptor::new("SF Pro", "Regular");
        assert!(!loader.contains(&font));
        let err = loader.load_font(&font).await.unwrap_err();
        assert_eq!(err, FontLoadError::NotFound { font });
    }

    fn database_with(faces: &[(&str, u16, Style)]) -> Database {
        let mut db = Database::new();
        for &(family, weight, style) in faces {
            db.push_face_info(fontdb::FaceInfo {
                id: fontdb::ID::dummy(),
                source: fontdb::Source::Binary(std::sync::Arc::new(Vec::<u8>::new())),
                index: 0,
                families: vec![(family.to_string(), fontdb::Language::English_UnitedStates)],
                post_script_name: format!("{family}-{weight}"),
                style,
                weight: Weight(weight),
                stretch: fontdb::Stretch::Normal,
                monospaced: false,
            });
        }
        db
    }

    #[tokio::test]
    async fn test_missing_style_of_installed_family() {
        let loader = SystemFontLoader::with_database(database_with(&[(
            "DejaVu Sans",
            700,
            Style::Normal,
        )]));

        assert!(loader.load_font(&FontDescriptor::new("DejaVu Sans", "Bold")).await.is_ok());
        for style in ["Thin", "UltraLight", "Regular", "Black", "Bold Italic"] {
            let font = FontDescriptor::new("DejaVu Sans", style);
            assert_eq!(
                loader.load_font(&font).await,
                Err(FontLoadError::NotFound { font: font.clone() }),
                "{style}"
            );
        }
    }

    #[test]
    fn test_italic_face_matches_italic_style_only() {
        let loader = SystemFontLoader::with_database(database_with(&[
            ("SF Pro", 400, Style::Normal),
            ("SF Pro", 400, Style::Italic),
        ]));
        assert!(loader.contains(&FontDescriptor::new("SF Pro", "Regular")));
        assert!(loader.contains(&FontDescriptor::new("SF Pro", "Italic")));
        assert!(!loader.contains(&FontDescriptor::new("SF Pro", "Medium")));
        assert!(!loader.contains(&FontDescriptor::new("Inter", "Regular")));
    }

    #[tokio::test]
    async fn test_memory_loader_records_calls() {
        let missing = FontDescriptor::new("Missing", "Regular");
        let loader = MemoryFontLoader::new().with_unavailable(missing.clone());

        assert!(loader.load_font(&FontDescriptor::new("SF Pro", "Bold")).await.is_ok());
        let err = loader.load_font(&missing).await.unwrap_err();
        assert_eq!(err.font(), &missing);
        assert_eq!(loader.call_count(), 2);
        assert_eq!(loader.calls()[1], missing);
    }
}
