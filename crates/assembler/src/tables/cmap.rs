//! cmap assembly
//!
//! BMP codepoints go into a format 4 subtable registered under Unicode BMP
//! (0, 3) and Windows BMP (3, 1). When any codepoint lies above U+FFFF, a
//! format 12 subtable with every codepoint is added under (0, 4) and (3, 10).

use log::debug;
use write_fonts::{tables::cmap::Cmap, types::GlyphId};

use crate::{
    AssembleError, Result,
    context::AssemblyContext,
    types::{Codepoint, NewGlyphId},
};

/// Build the cmap for the selected codepoints of the glyph map
pub fn assemble_cmap(ctx: &AssemblyContext) -> Result<Cmap> {
    build_cmap(ctx.glyph_map().cmap_entries())
}

pub(crate) fn build_cmap(entries: impl Iterator<Item = (Codepoint, NewGlyphId)>) -> Result<Cmap> {
    let mappings = entries
        .map(|(codepoint, id)| {
            let ch = codepoint.to_char().ok_or(AssembleError::InvalidCodepoint { codepoint })?;
            Ok((ch, GlyphId::new(id.to_u32())))
        })
        .collect::<Result<Vec<_>>>()?;

    let supplementary = mappings.iter().filter(|(ch, _)| *ch > '\u{FFFF}').count();
    debug!("cmap: {} codepoints, {supplementary} above the BMP", mappings.len());

    Ok(Cmap::from_mappings(mappings)?)
}
