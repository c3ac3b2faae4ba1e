//! post assembly (version 2.0, glyph names)

use std::collections::HashMap;

use read_fonts::TableProvider;
use write_fonts::tables::post::Post;

use crate::{
    AssembleError, Result,
    context::AssemblyContext,
    glyph_name::{standard_name_count, standard_name_index},
    types::{FontGlyphId, GlyphId, NewGlyphId},
};

/// Build a version 2.0 post table naming every output glyph
///
/// Font-wide fields come from the base font's post table when it has one.
pub fn assemble_post(ctx: &AssemblyContext) -> Result<Post> {
    let map = ctx.glyph_map();
    let names: Vec<&str> = map.names().iter().map(|n| n.as_str()).collect();
    let owner = |i: usize| {
        let id = NewGlyphId::new(i as u16);
        map.primary(id).unwrap_or(FontGlyphId::new(ctx.base(), GlyphId::new(id.to_u16())))
    };
    check_glyph_names(&names, owner)?;

    let mut post = Post::new_v2(names);
    if let Ok(source) = ctx.base_font().font().post() {
        let scale = ctx.scale(ctx.base());
        post.italic_angle = font_types::Fixed::from_bits(source.italic_angle().to_bits());
        post.underline_position = font_types::FWord::new(scale.coord(source.underline_position().to_i16()));
        post.underline_thickness = font_types::FWord::new(scale.coord(source.underline_thickness().to_i16()));
        post.is_fixed_pitch = source.is_fixed_pitch();
    }
    Ok(post)
}

/// Reject names a version 2.0 table cannot hold
///
/// `owner` reports which source glyph a position belongs to, for diagnostics.
pub(crate) fn check_glyph_names(names: &[&str], owner: impl Fn(usize) -> FontGlyphId) -> Result<()> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(names.len());
    let mut custom = 0usize;

    for (i, &name) in names.iter().enumerate() {
        if let Some(&first) = seen.get(name) {
            return Err(AssembleError::DuplicateGlyphName {
                name: name.to_string(),
                first: owner(first),
                second: owner(i),
            });
        }
        seen.insert(name, i);

        if standard_name_index(name).is_none() {
            if name.len() > u8::MAX as usize {
                return Err(AssembleError::GlyphNameTooLong { name: name.to_string() });
            }
            custom += 1;
        }
    }

    // name indices are 16 bits and custom names are numbered after the standard ones
    if standard_name_count() + custom > u16::MAX as usize {
        return Err(AssembleError::TooManyGlyphs { count: names.len() });
    }
    Ok(())
}
