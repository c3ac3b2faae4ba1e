//! hmtx and hhea assembly

use log::debug;
use read_fonts::TableProvider;
use write_fonts::tables::{
    hhea::Hhea,
    hmtx::{Hmtx, LongMetric},
};

use crate::{
    Result,
    context::AssemblyContext,
    strategies::{max_or, min_or, saturate_i16},
    tables::glyf::GlyfOutput,
    types::{Bounds, NewGlyphId},
};

/// One long metric per output glyph
///
/// Metrics come from the caller's overrides when present, otherwise from the
/// source font scaled into output units.
pub fn assemble_hmtx(ctx: &AssemblyContext) -> Result<Hmtx> {
    let map = ctx.glyph_map();
    let mut h_metrics = Vec::with_capacity(map.glyph_count() as usize);

    for (id, source) in map.glyphs() {
        let scale = ctx.scale(source.font);
        let (advance, lsb) = ctx.font_of(source).metrics(source.glyph);
        let overrides = map.metadata(id).copied().unwrap_or_default();

        h_metrics.push(LongMetric {
            advance: overrides.advance_width.unwrap_or_else(|| scale.distance(advance)),
            side_bearing: overrides.bounds.map_or_else(|| scale.coord(lsb), |b| b.x_min),
        });
    }

    Ok(Hmtx { h_metrics, left_side_bearings: Vec::new() })
}

/// hhea with the base font's vertical metrics and extents recomputed over
/// the output glyphs
pub fn assemble_hhea(ctx: &AssemblyContext, hmtx: &Hmtx, glyf: &GlyfOutput) -> Result<Hhea> {
    let base = ctx.base_font().font().hhea()?;
    let scale = ctx.scale(ctx.base());
    let map = ctx.glyph_map();

    // (lsb, bounds, advance) of every glyph with ink
    let inked: Vec<(i32, Bounds, i32)> = hmtx
        .h_metrics
        .iter()
        .enumerate()
        .filter_map(|(i, m)| {
            let bounds = glyf.glyph_bounds(map, NewGlyphId::new(i as u16))?;
            Some((m.side_bearing as i32, bounds, m.advance as i32))
        })
        .collect();

    let advance_width_max = max_or(hmtx.h_metrics.iter().map(|m| m.advance), 0);
    let min_lsb = min_or(inked.iter().map(|&(lsb, _, _)| lsb), 0);
    let min_rsb = min_or(inked.iter().map(|&(lsb, b, adv)| adv - (lsb + b.width())), 0);
    let x_max_extent = max_or(inked.iter().map(|&(lsb, b, _)| lsb + b.width()), 0);

    debug!("hhea: advanceWidthMax {advance_width_max}, xMaxExtent {x_max_extent}");

    Ok(Hhea {
        ascender: font_types::FWord::new(scale.coord(base.ascender().to_i16())),
        descender: font_types::FWord::new(scale.coord(base.descender().to_i16())),
        line_gap: font_types::FWord::new(scale.coord(base.line_gap().to_i16())),
        advance_width_max: font_types::UfWord::new(advance_width_max),
        min_left_side_bearing: font_types::FWord::new(saturate_i16(min_lsb)),
        min_right_side_bearing: font_types::FWord::new(saturate_i16(min_rsb)),
        x_max_extent: font_types::FWord::new(saturate_i16(x_max_extent)),
        caret_slope_rise: base.caret_slope_rise(),
        caret_slope_run: base.caret_slope_run(),
        caret_offset: base.caret_offset(),
        number_of_h_metrics: hmtx.h_metrics.len() as u16,
    })
}
