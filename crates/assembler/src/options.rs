//! Options for font generation

use crate::{header::HeaderLanguage, types::FontIndex};

/// Which fonts of a project go into which output file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationMode {
    /// Every font's selection merged into one file
    #[default]
    Merged,
    /// Only the selection of one font
    Current(FontIndex),
    /// One output file per font, written into a directory; a failed file
    /// removes the ones written before it
    Batch,
}

/// How `head` and the metadata tables are produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStrategy {
    /// Take the base font's table and patch the fields the output changes
    #[default]
    CopyFromBase,
    /// Build a minimal table from scratch
    RegenerateDefault,
}

/// Options for font generation
#[derive(Debug, Clone)]
pub struct Options {
    pub mode: GenerationMode,

    /// Emit a version 2 `post` table with glyph names
    pub glyph_names: bool,

    /// Copy outlines in source units even when units-per-em differ
    pub disable_rescale: bool,

    pub head_strategy: TableStrategy,

    pub metadata_strategy: TableStrategy,

    /// Let identical component-only glyphs share one output glyph
    pub dedupe_components: bool,

    /// Family name used when the `name` table is regenerated
    pub family_name: Option<String>,

    /// Write a source header next to every font file
    pub header: Option<HeaderLanguage>,

    /// Put the font file into the header as a byte array
    pub embed_font: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            glyph_names: false,
            disable_rescale: false,
            head_strategy: TableStrategy::default(),
            metadata_strategy: TableStrategy::default(),
            dedupe_components: true,
            family_name: None,
            header: None,
            embed_font: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn glyph_names(mut self, glyph_names: bool) -> Self {
        self.glyph_names = glyph_names;
        self
    }

    pub fn disable_rescale(mut self, disable_rescale: bool) -> Self {
        self.disable_rescale = disable_rescale;
        self
    }

    pub fn head_strategy(mut self, strategy: TableStrategy) -> Self {
        self.head_strategy = strategy;
        self
    }

    pub fn metadata_strategy(mut self, strategy: TableStrategy) -> Self {
        self.metadata_strategy = strategy;
        self
    }

    pub fn dedupe_components(mut self, dedupe: bool) -> Self {
        self.dedupe_components = dedupe;
        self
    }

    pub fn family_name(mut self, name: impl Into<String>) -> Self {
        self.family_name = Some(name.into());
        self
    }

    pub fn header(mut self, language: HeaderLanguage) -> Self {
        self.header = Some(language);
        self
    }

    pub fn embed_font(mut self, embed: bool) -> Self {
        self.embed_font = embed;
        self
    }
}
