mod context;
mod error;
mod generator;
mod glyph_name;
mod header;
mod options;
mod remap;
mod scale;
mod selection;
mod serializer;
mod source;
mod strategies;
mod types;

pub mod tables;

pub use context::AssemblyContext;
pub use error::{AssembleError, Result};
pub use generator::{AssembledFont, FontInput, GeneratedFile, GenerationReport, Generator};
pub use glyph_name::GlyphName;
pub use header::{FontHeader, HeaderLanguage, HeaderSymbol, header_symbols};
pub use options::{GenerationMode, Options, TableStrategy};
pub use remap::GlyphMap;
pub use scale::Scale;
pub use selection::{FontSelection, GlyphMetadata, Project, ProjectFont, Selection};
pub use serializer::FontSerializer;
pub use source::{FontInstance, SourceFont};
pub use types::{Bounds, Codepoint, FontGlyphId, FontIndex, GlyphId, NewGlyphId};

/// Assemble fonts held in memory using default options.
///
/// Each entry pairs a font file's bytes with the glyphs to take from it; the
/// first font is the base font.
///
/// # Example
///
/// ```no_run
/// use fontsmith_assembler::{FontSelection, assemble_fonts_bytes};
///
/// let icons = std::fs::read("icons.ttf").unwrap();
/// let text = std::fs::read("text.ttf").unwrap();
/// let font = assemble_fonts_bytes(&[
///     (text.as_slice(), FontSelection::codepoints(0x41..=0x5Au32)),
///     (icons.as_slice(), FontSelection::codepoints([0xE000u32])),
/// ])
/// .unwrap();
/// ```
pub fn assemble_fonts_bytes(fonts: &[(&[u8], FontSelection)]) -> Result<Vec<u8>> {
    let sources: Vec<SourceFont> = fonts
        .iter()
        .enumerate()
        .map(|(i, (data, _))| SourceFont::from_bytes(format!("font{i}.ttf"), data.to_vec()))
        .collect();
    let inputs: Vec<FontInput> = sources
        .iter()
        .zip(fonts)
        .enumerate()
        .map(|(i, (source, (_, selection)))| FontInput::new(source, selection).base(i == 0))
        .collect();
    Generator::default().assemble(&inputs).map(|font| font.data)
}
