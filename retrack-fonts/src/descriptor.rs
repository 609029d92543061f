//! Font descriptor value type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a loadable font resource by family and style name.
///
/// Equality is by the (family, style) pair; [`FontDescriptor::cache_key`]
/// derives the string key used by [`crate::FontCache`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family: String,
    pub style: String,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }

    /// String key for cache maps. A NUL separator keeps `("A B", "C")` and
    /// `("A", "B C")` apart.
    pub fn cache_key(&self) -> String {
        format!("{}\u{0}{}", self.family, self.style)
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}
