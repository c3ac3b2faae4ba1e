//! maxp assembly
//!
//! Outline limits are measured on the assembled glyphs; the hinting limits
//! come from the base font.

use read_fonts::TableProvider;
use write_fonts::tables::maxp::Maxp;

use crate::{
    AssembleError, Result,
    context::AssemblyContext,
    tables::glyf::{GlyfOutput, GlyphShape},
    types::{FontGlyphId, GlyphId, NewGlyphId},
};

/// Outline statistics over the output glyph graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutlineStats {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
    pub max_size_of_instructions: u16,
}

/// Flattened size of one glyph: (points, contours, depth)
type Flat = (u32, u32, u16);

#[derive(Clone, Copy)]
enum Visit {
    Pending,
    InProgress,
    Done(Flat),
}

impl OutlineStats {
    /// Walk every composite down to its simple leaves, memoizing each glyph
    pub fn compute(ctx: &AssemblyContext, glyf: &GlyfOutput) -> Result<Self> {
        let mut stats = Self::default();
        let mut memo = vec![Visit::Pending; glyf.glyphs.len()];

        for (i, record) in glyf.glyphs.iter().enumerate() {
            stats.max_size_of_instructions = stats.max_size_of_instructions.max(record.instruction_len);
            match &record.shape {
                GlyphShape::Empty => {}
                GlyphShape::Simple { points, contours } => {
                    stats.max_points = stats.max_points.max(*points);
                    stats.max_contours = stats.max_contours.max(*contours);
                }
                GlyphShape::Composite { components } => {
                    let (points, contours, depth) = flatten(ctx, glyf, &mut memo, i)?;
                    stats.max_composite_points = stats.max_composite_points.max(clamp_u16(points));
                    stats.max_composite_contours = stats.max_composite_contours.max(clamp_u16(contours));
                    stats.max_component_elements =
                        stats.max_component_elements.max(components.len() as u16);
                    stats.max_component_depth = stats.max_component_depth.max(depth);
                }
            }
        }

        Ok(stats)
    }
}

fn clamp_u16(value: u32) -> u16 {
    value.min(u16::MAX as u32) as u16
}

fn flatten(ctx: &AssemblyContext, glyf: &GlyfOutput, memo: &mut [Visit], idx: usize) -> Result<Flat> {
    match memo[idx] {
        Visit::Done(flat) => return Ok(flat),
        Visit::InProgress => {
            let id = NewGlyphId::new(idx as u16);
            let glyph = ctx
                .glyph_map()
                .primary(id)
                .unwrap_or(FontGlyphId::new(ctx.base(), GlyphId::new(id.to_u16())));
            return Err(AssembleError::MalformedGlyph { glyph, reason: "composite references itself" });
        }
        Visit::Pending => {}
    }

    memo[idx] = Visit::InProgress;
    let flat = match &glyf.glyphs[idx].shape {
        GlyphShape::Empty => (0, 0, 0),
        GlyphShape::Simple { points, contours } => (*points as u32, *contours as u32, 0),
        GlyphShape::Composite { components } => {
            let mut total = (0u32, 0u32, 0u16);
            for component in components {
                let (points, contours, depth) = flatten(ctx, glyf, memo, component.as_usize())?;
                total.0 += points;
                total.1 += contours;
                total.2 = total.2.max(depth + 1);
            }
            total
        }
    };
    memo[idx] = Visit::Done(flat);
    Ok(flat)
}

/// Build a version 1.0 maxp
///
/// Hinting limits belong to the base font's `fpgm`, `prep` and `cvt `, the
/// only hinting programs the output carries.
pub fn assemble_maxp(ctx: &AssemblyContext, glyf: &GlyfOutput) -> Result<Maxp> {
    let stats = OutlineStats::compute(ctx, glyf)?;
    let base = ctx.base_font().font().maxp()?;

    Ok(Maxp {
        num_glyphs: ctx.glyph_map().glyph_count(),
        max_points: Some(stats.max_points),
        max_contours: Some(stats.max_contours),
        max_composite_points: Some(stats.max_composite_points),
        max_composite_contours: Some(stats.max_composite_contours),
        max_zones: Some(base.max_zones().unwrap_or(1)),
        max_twilight_points: Some(base.max_twilight_points().unwrap_or(0)),
        max_storage: Some(base.max_storage().unwrap_or(0)),
        max_function_defs: Some(base.max_function_defs().unwrap_or(0)),
        max_instruction_defs: Some(base.max_instruction_defs().unwrap_or(0)),
        max_stack_elements: Some(base.max_stack_elements().unwrap_or(0)),
        max_size_of_instructions: Some(stats.max_size_of_instructions),
        max_component_elements: Some(stats.max_component_elements),
        max_component_depth: Some(stats.max_component_depth),
    })
}
