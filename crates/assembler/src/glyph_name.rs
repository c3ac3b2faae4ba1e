//! Glyph name types and utilities
//!
//! Output glyph names end up in the `post` table, either as an index into the
//! 258 standard Macintosh glyph names or as a custom Pascal string.

use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{Display, Formatter, Result},
    ops::Deref,
    sync::LazyLock,
};

use read_fonts::tables::post::DEFAULT_GLYPH_NAMES;

use crate::types::{Codepoint, GlyphId};

/// Name of the missing glyph, always output glyph 0
pub const NOTDEF: &str = ".notdef";

/// A glyph name in the output font
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphName(String);

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The conventional name for a glyph known only by its codepoint
    pub fn for_codepoint(cp: Codepoint) -> Self {
        if cp.is_bmp() {
            Self(format!("uni{:04X}", cp.to_u32()))
        } else {
            Self(format!("u{:05X}", cp.to_u32()))
        }
    }

    /// The name given to a glyph that has neither a codepoint nor a source name
    pub fn for_glyph(gid: GlyphId) -> Self {
        Self(format!("glyph{:05}", gid.to_u16()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Index into the standard Macintosh name list, if this is one of them
    pub fn standard_index(&self) -> Option<u16> {
        standard_name_index(&self.0)
    }
}

impl Deref for GlyphName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GlyphName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GlyphName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GlyphName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GlyphName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for GlyphName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GlyphName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GlyphName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

static STANDARD_NAME_INDEX: LazyLock<HashMap<&'static str, u16>> = LazyLock::new(|| {
    DEFAULT_GLYPH_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i as u16))
        .collect()
});

/// Number of names in the standard Macintosh glyph order
pub fn standard_name_count() -> usize {
    DEFAULT_GLYPH_NAMES.len()
}

/// Position of `name` in the standard Macintosh glyph order
pub fn standard_name_index(name: &str) -> Option<u16> {
    STANDARD_NAME_INDEX.get(name).copied()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_glyph_name_display() {
        let name = GlyphName::new("A");
        assert_eq!(format!("{}", name), "A");
        assert_eq!(name, "A");
    }

    #[test]
    fn test_generated_names() {
        assert_eq!(GlyphName::for_codepoint(Codepoint::new(0x41)), "uni0041");
        assert_eq!(GlyphName::for_codepoint(Codepoint::new(0x1F600)), "u1F600");
        assert_eq!(GlyphName::for_glyph(GlyphId::new(7)), "glyph00007");
    }

    #[test]
    fn test_standard_names() {
        assert_eq!(standard_name_count(), 258);
        assert_eq!(standard_name_index(NOTDEF), Some(0));
        assert_eq!(standard_name_index("A"), Some(36));
        assert_eq!(GlyphName::new("dcroat").standard_index(), Some(257));
        assert_eq!(standard_name_index("uni0041"), None);
    }

    #[test]
    fn test_glyph_name_in_hashset() {
        let set: HashSet<GlyphName> = ["A", "B"].into_iter().map(GlyphName::from).collect();
        assert!(set.contains("A"));
        assert!(!set.contains("C"));
    }
}
