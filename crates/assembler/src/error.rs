use std::{io, path::PathBuf, result};

use font_types::Tag;
use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error, tables::cmap::CmapConflict};

use crate::types::{Codepoint, FontGlyphId, FontIndex, GlyphId};

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("failed to read font: {0}")]
    Read(#[from] ReadError),

    #[error("failed to write table: {0}")]
    Write(#[from] error::Error),

    #[error("failed to build font: {0}")]
    Builder(#[from] BuilderError),

    #[error("failed to build cmap: {0}")]
    Cmap(#[from] CmapConflict),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no fonts provided")]
    NoFonts,

    #[error("{font} ({name}) has no '{table}' table")]
    MissingSourceTable { font: FontIndex, name: String, table: Tag },

    #[error("{font} has no glyphs selected")]
    EmptySelection { font: FontIndex },

    #[error("{codepoint} is selected in {font} but the font does not map it")]
    CodepointNotInFont { font: FontIndex, codepoint: Codepoint },

    #[error("{codepoint} is supplied by both {first} and {second}")]
    DuplicateCodepoint { codepoint: Codepoint, first: FontGlyphId, second: FontGlyphId },

    #[error("{codepoint} is not a Unicode scalar value")]
    InvalidCodepoint { codepoint: Codepoint },

    #[error("{glyph} is given different metrics through {first} and {second}")]
    ConflictingMetadata { glyph: FontGlyphId, first: Codepoint, second: Codepoint },

    #[error("glyph name '{name}' is used by both {first} and {second}")]
    DuplicateGlyphName { name: String, first: FontGlyphId, second: FontGlyphId },

    #[error("glyph name '{name}' is longer than 255 bytes")]
    GlyphNameTooLong { name: String },

    #[error("output would contain {count} glyphs, the format allows 65535")]
    TooManyGlyphs { count: usize },

    #[error("{font} is out of range ({count} fonts opened)")]
    FontOutOfRange { font: FontIndex, count: usize },

    #[error("{glyph} references component {component}, which has no output id")]
    UnresolvedComponent { glyph: FontGlyphId, component: GlyphId },

    #[error("{glyph} is malformed: {reason}")]
    MalformedGlyph { glyph: FontGlyphId, reason: &'static str },

    #[error("{font} has unitsPerEm {units_per_em}, rescale factor is not finite")]
    NonFiniteScale { font: FontIndex, units_per_em: u16 },

    #[error("required table '{0}' was not assembled")]
    MissingTable(Tag),

    #[error("while building '{table}': {source}")]
    InTable {
        table: Tag,
        #[source]
        source: Box<AssembleError>,
    },
}

impl AssembleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// The innermost error, with any table context peeled away
    pub fn root(&self) -> &AssembleError {
        match self {
            Self::InTable { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = result::Result<T, AssembleError>;

/// Attach the tag of the table being built to an error
pub(crate) trait InTable<T> {
    fn in_table(self, tag: Tag) -> Result<T>;
}

impl<T> InTable<T> for Result<T> {
    fn in_table(self, table: Tag) -> Result<T> {
        self.map_err(|source| AssembleError::InTable { table, source: Box::new(source) })
    }
}
