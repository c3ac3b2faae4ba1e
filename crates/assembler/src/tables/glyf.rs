//! glyf and loca assembly (TrueType outlines)
//!
//! Each output glyph is converted from its read-fonts outline into a
//! write-fonts glyph: coordinates are scaled into output units and composite
//! components are pointed at their new ids. [`GlyfLocaBuilder`] encodes the
//! result and picks the loca format.
//!
//! Per-glyph instructions survive only on simple glyphs of the base font.
//! They may call into `fpgm` or read `cvt `, and those tables are copied from
//! the base font alone. Composite instructions are always dropped.

use font_types::GlyphId16;
use log::{debug, warn};
use read_fonts::tables::glyf::{
    Anchor as ReadAnchor, CompositeGlyph as ReadComposite, CurvePoint, Glyph as ReadGlyph,
    SimpleGlyph as ReadSimple,
};
use write_fonts::tables::{
    glyf::{Anchor, Component, CompositeGlyph, Contour, Glyf, GlyfLocaBuilder, Glyph, SimpleGlyph, Transform},
    loca::{Loca, LocaFormat},
};

use crate::{
    AssembleError, Result,
    context::AssemblyContext,
    remap::GlyphMap,
    scale::Scale,
    strategies::saturate_i16,
    types::{Bounds, FontGlyphId, GlyphId, NewGlyphId},
};

/// What an output glyph is made of, as far as maxp is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphShape {
    Empty,
    Simple { points: u16, contours: u16 },
    Composite { components: Vec<NewGlyphId> },
}

/// Summary of one assembled glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRecord {
    pub shape: GlyphShape,
    pub bounds: Option<Bounds>,
    pub instruction_len: u16,
}

impl GlyphRecord {
    const EMPTY: Self = Self { shape: GlyphShape::Empty, bounds: None, instruction_len: 0 };
}

/// Output of the glyf assembler
pub struct GlyfOutput {
    pub glyf: Glyf,
    pub loca: Loca,
    pub loca_format: LocaFormat,
    /// Indexed by new glyph id
    pub glyphs: Vec<GlyphRecord>,
}

impl GlyfOutput {
    /// Ink bounds of `id`; caller-supplied bounds win over the outline's
    pub fn glyph_bounds(&self, map: &GlyphMap, id: NewGlyphId) -> Option<Bounds> {
        map.metadata(id)
            .and_then(|meta| meta.bounds)
            .or_else(|| self.glyphs.get(id.as_usize())?.bounds)
    }

    /// Union of every glyph's bounds; all zero for a font without ink
    pub fn font_bounds(&self, map: &GlyphMap) -> Bounds {
        (0..self.glyphs.len())
            .filter_map(|i| self.glyph_bounds(map, NewGlyphId::new(i as u16)))
            .reduce(Bounds::union)
            .unwrap_or_default()
    }

    /// The `indexToLocFormat` value head must carry
    pub fn index_to_loc_format(&self) -> i16 {
        match self.loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        }
    }
}

/// Build `glyf` and `loca` for every glyph of the glyph map
pub fn assemble_glyf(ctx: &AssemblyContext) -> Result<GlyfOutput> {
    let map = ctx.glyph_map();
    let mut builder = GlyfLocaBuilder::new();
    let mut glyphs = Vec::with_capacity(map.glyph_count() as usize);
    let mut stripped = 0usize;

    for (_, source) in map.glyphs() {
        let scale = ctx.scale(source.font);
        let keep_instructions = source.font == ctx.base() && scale.is_identity();

        let (glyph, record) = match ctx.font_of(source).glyph(source.glyph)? {
            None => (Glyph::Empty, GlyphRecord::EMPTY),
            Some(ReadGlyph::Simple(simple)) => {
                if !keep_instructions && !simple.instructions().is_empty() {
                    stripped += 1;
                }
                convert_simple(&simple, source, scale, keep_instructions)?
            }
            Some(ReadGlyph::Composite(composite)) => {
                if composite.instructions().is_some_and(|i| !i.is_empty()) {
                    stripped += 1;
                }
                convert_composite(&composite, source, scale, map)?
            }
        };

        builder.add_glyph(&glyph)?;
        glyphs.push(record);
    }

    if stripped > 0 {
        warn!("Dropped per-glyph instructions from {stripped} glyphs");
    }

    let (glyf, loca, loca_format) = builder.build();
    debug!("glyf: {} glyphs, {loca_format:?} loca", glyphs.len());

    Ok(GlyfOutput { glyf, loca, loca_format, glyphs })
}

/// Scale a simple glyph's points and regroup them into contours
fn convert_simple(
    glyph: &ReadSimple,
    source: FontGlyphId,
    scale: Scale,
    keep_instructions: bool,
) -> Result<(Glyph, GlyphRecord)> {
    let malformed = |reason| AssembleError::MalformedGlyph { glyph: source, reason };

    let points: Vec<CurvePoint> = glyph
        .points()
        .map(|p| CurvePoint { x: scale.coord(p.x), y: scale.coord(p.y), on_curve: p.on_curve })
        .collect();
    if points.len() != glyph.num_points() {
        return Err(malformed("point data is truncated"));
    }

    let mut contours: Vec<Contour> = Vec::with_capacity(glyph.end_pts_of_contours().len());
    let mut start = 0usize;
    for end in glyph.end_pts_of_contours() {
        let end = end.get() as usize + 1;
        let contour = points.get(start..end).ok_or_else(|| malformed("contour end points decrease"))?;
        contours.push(contour.to_vec().into());
        start = end;
    }
    if contours.is_empty() {
        return Ok((Glyph::Empty, GlyphRecord::EMPTY));
    }

    let bounds = if scale.is_identity() {
        Bounds::new(glyph.x_min(), glyph.y_min(), glyph.x_max(), glyph.y_max())
    } else {
        Bounds::from_points(points.iter().map(|p| (p.x, p.y))).unwrap_or_default()
    };
    let instructions = if keep_instructions { glyph.instructions().to_vec() } else { Vec::new() };

    let record = GlyphRecord {
        shape: GlyphShape::Simple { points: points.len() as u16, contours: contours.len() as u16 },
        bounds: Some(bounds),
        instruction_len: instructions.len() as u16,
    };
    let glyph = SimpleGlyph { bbox: bounds.into(), contours, instructions };
    Ok((Glyph::Simple(glyph), record))
}

/// Rewrite a composite with new component ids and scaled offsets
fn convert_composite(
    glyph: &ReadComposite,
    source: FontGlyphId,
    scale: Scale,
    map: &GlyphMap,
) -> Result<(Glyph, GlyphRecord)> {
    let bounds = Bounds::new(
        scale.coord(glyph.x_min()),
        scale.coord(glyph.y_min()),
        scale.coord(glyph.x_max()),
        scale.coord(glyph.y_max()),
    );

    let mut ids = Vec::new();
    let mut components = Vec::new();
    for component in glyph.components() {
        let child = FontGlyphId::new(source.font, GlyphId::new(component.glyph.to_u16()));
        let id = map.new_id(child).ok_or(AssembleError::UnresolvedComponent {
            glyph: source,
            component: child.glyph,
        })?;

        let anchor = match component.anchor {
            ReadAnchor::Offset { x, y } => Anchor::Offset {
                x: saturate_i16(scale.wide(x as i32)),
                y: saturate_i16(scale.wide(y as i32)),
            },
            ReadAnchor::Point { base, component } => Anchor::Point { base, component },
        };
        let t = component.transform;
        let transform = Transform { xx: t.xx, yx: t.yx, xy: t.xy, yy: t.yy };

        components.push(Component::new(GlyphId16::new(id.to_u16()), anchor, transform, component.flags));
        ids.push(id);
    }

    let mut components = components.into_iter();
    let first = components
        .next()
        .ok_or(AssembleError::MalformedGlyph { glyph: source, reason: "composite has no components" })?;
    let mut composite = CompositeGlyph::new(first, bounds);
    for component in components {
        composite.add_component(component, bounds);
    }

    let record = GlyphRecord {
        shape: GlyphShape::Composite { components: ids },
        bounds: Some(bounds),
        instruction_len: 0,
    };
    Ok((Glyph::Composite(composite), record))
}
