//! What the caller asks to be taken from each source font
//!
//! Everything here is keyed by the codepoint as it appears in the *source*
//! font's character map, before any remap is applied.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use crate::types::{Bounds, Codepoint};

/// The codepoints selected from one font
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every codepoint the font maps
    All,
    /// An explicit set; each one must be mapped by the font
    Codepoints(BTreeSet<Codepoint>),
}

impl Default for Selection {
    fn default() -> Self {
        Self::Codepoints(BTreeSet::new())
    }
}

/// Caller-supplied metrics for a glyph that is being replaced, in output units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphMetadata {
    pub advance_width: Option<u16>,
    pub bounds: Option<Bounds>,
}

impl GlyphMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_width(mut self, advance: u16) -> Self {
        self.advance_width = Some(advance);
        self
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Selection descriptor for one source font
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSelection {
    pub codepoints: Selection,
    /// Custom glyph names
    pub renames: BTreeMap<Codepoint, String>,
    /// Codepoint the glyph is published under in the output
    pub remaps: BTreeMap<Codepoint, Codepoint>,
    pub metadata: BTreeMap<Codepoint, GlyphMetadata>,
}

impl FontSelection {
    /// Select every codepoint of the font
    pub fn all() -> Self {
        Self { codepoints: Selection::All, ..Self::default() }
    }

    pub fn codepoints(codepoints: impl IntoIterator<Item = impl Into<Codepoint>>) -> Self {
        Self {
            codepoints: Selection::Codepoints(codepoints.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn rename(mut self, codepoint: impl Into<Codepoint>, name: impl Into<String>) -> Self {
        self.renames.insert(codepoint.into(), name.into());
        self
    }

    pub fn remap(mut self, from: impl Into<Codepoint>, to: impl Into<Codepoint>) -> Self {
        self.remaps.insert(from.into(), to.into());
        self
    }

    pub fn with_metadata(mut self, codepoint: impl Into<Codepoint>, metadata: GlyphMetadata) -> Self {
        self.metadata.insert(codepoint.into(), metadata);
        self
    }

    /// Codepoint the glyph for `source` is published under
    pub fn output_codepoint(&self, source: Codepoint) -> Codepoint {
        self.remaps.get(&source).copied().unwrap_or(source)
    }
}

/// One font of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFont {
    pub path: PathBuf,
    /// Supplies units-per-em, vertical metrics and the copied tables
    pub base: bool,
    pub selection: FontSelection,
}

impl ProjectFont {
    pub fn new(path: impl Into<PathBuf>, selection: FontSelection) -> Self {
        Self { path: path.into(), base: false, selection }
    }

    pub fn base(mut self, base: bool) -> Self {
        self.base = base;
        self
    }
}

/// The fonts and per-font selections of one generation request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub fonts: Vec<ProjectFont>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_font(mut self, font: ProjectFont) -> Self {
        self.fonts.push(font);
        self
    }
}
