//! Assembly context
//!
//! Bundles everything the table assemblers read: the opened fonts, which one
//! is the base font, per-font rescale factors and the merged glyph map.

use log::{debug, warn};

use crate::{
    Result,
    options::Options,
    remap::GlyphMap,
    scale::Scale,
    source::FontInstance,
    types::{FontGlyphId, FontIndex},
};

/// Central context for one generation request
pub struct AssemblyContext<'a> {
    fonts: &'a [FontInstance<'a>],
    base: FontIndex,
    scales: Vec<Scale>,
    glyph_map: GlyphMap,
    options: &'a Options,
}

impl<'a> AssemblyContext<'a> {
    /// Pick the base font, work out rescale factors and build the glyph map
    pub fn new(fonts: &'a [FontInstance<'a>], options: &'a Options) -> Result<Self> {
        let base = pick_base(fonts);
        let target = fonts.get(base.as_usize()).map(|f| f.units_per_em()).unwrap_or_default();

        let scales = fonts
            .iter()
            .map(|font| {
                if options.disable_rescale {
                    Ok(Scale::IDENTITY)
                } else {
                    Scale::between(font.index(), target, font.units_per_em())
                }
            })
            .collect::<Result<Vec<_>>>()?;

        for (font, scale) in fonts.iter().zip(&scales) {
            if !scale.is_identity() {
                debug!("{} is rescaled by {:.4}", font.index(), scale.factor());
            }
        }

        let glyph_map = GlyphMap::build(fonts, base, &scales, options)?;

        Ok(Self { fonts, base, scales, glyph_map, options })
    }

    pub fn fonts(&self) -> &'a [FontInstance<'a>] {
        self.fonts
    }

    pub fn font(&self, idx: FontIndex) -> &'a FontInstance<'a> {
        &self.fonts[idx.as_usize()]
    }

    /// The font a source glyph comes from
    pub fn font_of(&self, glyph: FontGlyphId) -> &'a FontInstance<'a> {
        self.font(glyph.font)
    }

    pub fn base(&self) -> FontIndex {
        self.base
    }

    /// The font that supplies units-per-em and font-wide tables
    pub fn base_font(&self) -> &'a FontInstance<'a> {
        self.font(self.base)
    }

    /// Units per em of the output font
    pub fn units_per_em(&self) -> u16 {
        self.base_font().units_per_em()
    }

    pub fn scale(&self, idx: FontIndex) -> Scale {
        self.scales[idx.as_usize()]
    }

    pub fn glyph_map(&self) -> &GlyphMap {
        &self.glyph_map
    }

    pub fn options(&self) -> &Options {
        self.options
    }
}

/// The first font flagged as base, else the first font
pub fn pick_base(fonts: &[FontInstance<'_>]) -> FontIndex {
    let mut flagged = fonts.iter().filter(|f| f.is_base());
    let Some(base) = flagged.next() else {
        return FontIndex::new(0);
    };
    if let Some(other) = flagged.next() {
        warn!("{} and {} are both marked as base, using {}", base.index(), other.index(), base.index());
    }
    base.index()
}
