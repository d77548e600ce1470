//! Source location tracking for diagnostics.
//!
//! Provides [`SourceSite`], the position of a declaration in the host sources
//! as reported by the declaration collector.

use std::fmt;

/// Where a declaration was found.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct SourceSite {
    /// Source file path as reported by the collector.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, byte-based).
    pub column: u32,
}

impl SourceSite {
    /// Create a new site.
    #[inline]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// A site with no file information, used for synthesized declarations.
    #[inline]
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether the collector supplied a location.
    #[inline]
    pub fn is_known(&self) -> bool {
        !self.file.is_empty()
    }
}

impl fmt::Debug for SourceSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for SourceSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        } else {
            write!(f, "<unknown>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_known_site() {
        let site = SourceSite::new("scene.hpp", 12, 8);
        assert_eq!(site.to_string(), "scene.hpp:12:8");
    }

    #[test]
    fn display_unknown_site() {
        assert_eq!(SourceSite::unknown().to_string(), "<unknown>");
        assert!(!SourceSite::unknown().is_known());
    }
}
