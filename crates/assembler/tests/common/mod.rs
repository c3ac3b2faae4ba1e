//! Fixture fonts for the integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;

use read_fonts::{
    FontRef, TableProvider,
    tables::glyf::CurvePoint,
    types::{GlyphId, Tag},
};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{
            Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, Contour, GlyfLocaBuilder, Glyph, SimpleGlyph,
            Transform,
        },
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        maxp::Maxp,
        post::Post,
    },
};

/// Outline of one fixture glyph
#[derive(Debug, Clone)]
pub enum Shape {
    Empty,
    /// Axis-aligned square with its lower-left corner at (x, y)
    Square { x: i16, y: i16, size: i16, instructions: Vec<u8> },
    /// (component glyph id, x offset, y offset)
    Composite(Vec<(u16, i16, i16)>),
}

impl Shape {
    pub fn square(x: i16, y: i16, size: i16) -> Self {
        Self::Square { x, y, size, instructions: Vec::new() }
    }
}

#[derive(Debug, Clone)]
pub struct TestGlyph {
    pub name: &'static str,
    pub shape: Shape,
    pub advance: u16,
}

/// A small TrueType font described glyph by glyph
#[derive(Debug, Clone)]
pub struct TestFont {
    pub units_per_em: u16,
    pub glyphs: Vec<TestGlyph>,
    /// codepoint -> glyph id
    pub cmap: Vec<(u32, u16)>,
    /// Write a version 2 post table with the glyph names
    pub names: bool,
    /// Write fpgm, prep, cvt and gasp tables
    pub hinting: Option<Hinting>,
}

/// Hinting programs of a fixture font, distinct per font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hinting {
    pub fpgm: Vec<u8>,
    pub prep: Vec<u8>,
    pub cvt: Vec<u8>,
    pub gasp: Vec<u8>,
    pub max_function_defs: u16,
    pub max_stack_elements: u16,
}

impl Hinting {
    /// Programs filled with `seed`, `functions` function definitions
    pub fn new(seed: u8, functions: u16) -> Self {
        Self {
            fpgm: vec![seed; 8],
            prep: vec![seed; 4],
            cvt: vec![0, seed, 0, seed],
            // version 1, one range up to 0xFFFF with gridfit and antialias
            gasp: vec![0, 1, 0, 1, 0xFF, 0xFF, 0, 3],
            max_function_defs: functions,
            max_stack_elements: 16 * functions,
        }
    }
}

impl TestFont {
    /// A font with an empty .notdef and nothing else
    pub fn new(units_per_em: u16) -> Self {
        Self {
            units_per_em,
            glyphs: vec![TestGlyph { name: ".notdef", shape: Shape::Empty, advance: units_per_em / 2 }],
            cmap: Vec::new(),
            names: true,
            hinting: None,
        }
    }

    /// Add a glyph, mapped to `codepoint` if given
    pub fn glyph(mut self, name: &'static str, shape: Shape, codepoint: Option<u32>) -> Self {
        let gid = self.glyphs.len() as u16;
        let advance = self.units_per_em / 2;
        self.glyphs.push(TestGlyph { name, shape, advance });
        if let Some(cp) = codepoint {
            self.cmap.push((cp, gid));
        }
        self
    }

    pub fn without_names(mut self) -> Self {
        self.names = false;
        self
    }

    pub fn with_hinting(mut self, hinting: Hinting) -> Self {
        self.hinting = Some(hinting);
        self
    }

    fn bbox(&self, gid: u16) -> Option<Bbox> {
        match &self.glyphs.get(gid as usize)?.shape {
            Shape::Empty => None,
            Shape::Square { x, y, size, .. } => {
                Some(Bbox { x_min: *x, y_min: *y, x_max: x + size, y_max: y + size })
            }
            Shape::Composite(parts) => parts
                .iter()
                .filter_map(|&(child, dx, dy)| {
                    let b = self.bbox(child)?;
                    Some(Bbox { x_min: b.x_min + dx, y_min: b.y_min + dy, x_max: b.x_max + dx, y_max: b.y_max + dy })
                })
                .reduce(|a, b| a.union(b)),
        }
    }

    fn max_instructions(&self) -> u16 {
        self.glyphs
            .iter()
            .filter_map(|g| match &g.shape {
                Shape::Square { instructions, .. } => Some(instructions.len() as u16),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut glyf_builder = GlyfLocaBuilder::new();
        let mut font_bbox: Option<Bbox> = None;
        for (gid, glyph) in self.glyphs.iter().enumerate() {
            let bbox = self.bbox(gid as u16).unwrap_or_default();
            let built = match &glyph.shape {
                Shape::Empty => Glyph::Empty,
                Shape::Square { x, y, size, instructions } => {
                    let (x, y, s) = (*x, *y, *size);
                    let contour: Contour = vec![
                        CurvePoint::on_curve(x, y),
                        CurvePoint::on_curve(x, y + s),
                        CurvePoint::on_curve(x + s, y + s),
                        CurvePoint::on_curve(x + s, y),
                    ]
                    .into();
                    Glyph::Simple(SimpleGlyph { bbox, contours: vec![contour], instructions: instructions.clone() })
                }
                Shape::Composite(parts) => {
                    let mut components = parts.iter().map(|&(child, dx, dy)| {
                        let component = Component::new(
                            child.into(),
                            Anchor::Offset { x: dx, y: dy },
                            Transform::default(),
                            ComponentFlags::default(),
                        );
                        (component, bbox)
                    });
                    let (first, first_bbox) = components.next().expect("composite needs a component");
                    let mut composite = CompositeGlyph::new(first, first_bbox);
                    for (component, bbox) in components {
                        composite.add_component(component, bbox);
                    }
                    Glyph::Composite(composite)
                }
            };
            if !matches!(glyph.shape, Shape::Empty) {
                font_bbox = Some(font_bbox.map_or(bbox, |b| b.union(bbox)));
            }
            glyf_builder.add_glyph(&built).expect("glyph");
        }
        let (glyf, loca, loca_format) = glyf_builder.build();
        let font_bbox = font_bbox.unwrap_or_default();

        let mappings = self
            .cmap
            .iter()
            .map(|&(cp, gid)| (char::from_u32(cp).expect("codepoint"), GlyphId::new(gid as u32)));
        let cmap = Cmap::from_mappings(mappings).expect("cmap");

        let head = Head {
            font_revision: font_types::Fixed::from_f64(1.0),
            checksum_adjustment: 0,
            magic_number: 0x5F0F3CF5,
            flags: write_fonts::tables::head::Flags::empty(),
            units_per_em: self.units_per_em,
            created: font_types::LongDateTime::new(0),
            modified: font_types::LongDateTime::new(0),
            x_min: font_bbox.x_min,
            y_min: font_bbox.y_min,
            x_max: font_bbox.x_max,
            y_max: font_bbox.y_max,
            mac_style: write_fonts::tables::head::MacStyle::empty(),
            lowest_rec_ppem: 8,
            font_direction_hint: 2,
            index_to_loc_format: match loca_format {
                write_fonts::tables::loca::LocaFormat::Short => 0,
                write_fonts::tables::loca::LocaFormat::Long => 1,
            },
        };

        let upm = self.units_per_em as i16;
        let hhea = Hhea {
            ascender: font_types::FWord::new(upm * 4 / 5),
            descender: font_types::FWord::new(-upm / 5),
            line_gap: font_types::FWord::new(0),
            advance_width_max: font_types::UfWord::new(self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0)),
            min_left_side_bearing: font_types::FWord::new(0),
            min_right_side_bearing: font_types::FWord::new(0),
            x_max_extent: font_types::FWord::new(font_bbox.x_max),
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            number_of_h_metrics: self.glyphs.len() as u16,
        };

        let hmtx = Hmtx {
            h_metrics: (0..self.glyphs.len())
                .map(|gid| LongMetric {
                    advance: self.glyphs[gid].advance,
                    side_bearing: self.bbox(gid as u16).map_or(0, |b| b.x_min),
                })
                .collect(),
            left_side_bearings: vec![],
        };

        let hinting = self.hinting.as_ref();
        let maxp = Maxp {
            num_glyphs: self.glyphs.len() as u16,
            max_points: Some(4),
            max_contours: Some(1),
            max_composite_points: Some(0),
            max_composite_contours: Some(0),
            max_zones: Some(2),
            max_twilight_points: Some(4),
            max_storage: Some(1),
            max_function_defs: Some(hinting.map_or(1, |h| h.max_function_defs)),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(hinting.map_or(8, |h| h.max_stack_elements)),
            max_size_of_instructions: Some(self.max_instructions()),
            max_component_elements: Some(0),
            max_component_depth: Some(0),
        };

        let mut builder = FontBuilder::new();
        builder.add_table(&head).unwrap();
        builder.add_table(&hhea).unwrap();
        builder.add_table(&hmtx).unwrap();
        builder.add_table(&maxp).unwrap();
        builder.add_table(&cmap).unwrap();
        builder.add_table(&glyf).unwrap();
        builder.add_table(&loca).unwrap();

        if self.names {
            let mut post = Post::new_v2(self.glyphs.iter().map(|g| g.name).collect::<Vec<_>>());
            post.underline_position = font_types::FWord::new(-upm / 10);
            post.underline_thickness = font_types::FWord::new(upm / 20);
            builder.add_table(&post).unwrap();
        }
        if let Some(h) = hinting {
            builder.add_raw(Tag::new(b"fpgm"), h.fpgm.clone());
            builder.add_raw(Tag::new(b"prep"), h.prep.clone());
            builder.add_raw(Tag::new(b"cvt "), h.cvt.clone());
            builder.add_raw(Tag::new(b"gasp"), h.gasp.clone());
        }

        builder.build()
    }
}

/// `.notdef`, A (0x41), B (0x42), C (0x43) as squares, an acute accent
/// (unmapped) and Aacute (0xC1) composed of A and the accent
pub fn latin(units_per_em: u16) -> TestFont {
    let u = units_per_em as i16;
    TestFont::new(units_per_em)
        .glyph("A", Shape::square(u / 20, 0, u / 2), Some(0x41))
        .glyph("B", Shape::square(u / 10, 0, u / 2), Some(0x42))
        .glyph("C", Shape::square(u / 5, 0, u / 4), Some(0x43))
        .glyph("acutecomb", Shape::square(u / 5, u * 3 / 5, u / 10), None)
        .glyph("Aacute", Shape::Composite(vec![(1, 0, 0), (4, 10, 20)]), Some(0xC1))
}

/// Icon glyphs in the private use area
pub fn icons(units_per_em: u16) -> TestFont {
    let u = units_per_em as i16;
    TestFont::new(units_per_em)
        .glyph("home", Shape::square(0, 0, u * 4 / 5), Some(0xE000))
        .glyph("star", Shape::square(u / 10, u / 10, u / 2), Some(0xE001))
        .glyph("smile", Shape::square(u / 4, 0, u / 3), Some(0x1F600))
}

/// A hinted text font: `latin` with instructions on A and its own programs
pub fn hinted_latin(units_per_em: u16, seed: u8) -> TestFont {
    let mut font = latin(units_per_em).with_hinting(Hinting::new(seed, 2 + seed as u16));
    if let Shape::Square { instructions, .. } = &mut font.glyphs[1].shape {
        *instructions = vec![0xB0, seed, 0x2C];
    }
    font
}

/// A hinted icon font whose glyphs all carry instructions
pub fn hinted_icons(units_per_em: u16, seed: u8) -> TestFont {
    let mut font = icons(units_per_em).with_hinting(Hinting::new(seed, 2 + seed as u16));
    for glyph in &mut font.glyphs {
        if let Shape::Square { instructions, .. } = &mut glyph.shape {
            *instructions = vec![0xB0, seed];
        }
    }
    font
}

/// Raw outline bytes of `gid`, as addressed by loca
pub fn glyph_bytes<'a>(font: &FontRef<'a>, gid: u16) -> &'a [u8] {
    let loca = font.loca(None).unwrap();
    let glyf = font.glyf().unwrap();
    let start = loca.get_raw(gid as usize).unwrap() as usize;
    let end = loca.get_raw(gid as usize + 1).unwrap() as usize;
    &glyf.offset_data().as_bytes()[start..end]
}

/// Every loca offset of the font in order
pub fn loca_offsets(font: &FontRef) -> Vec<u32> {
    let count = font.maxp().unwrap().num_glyphs() as usize;
    let loca = font.loca(None).unwrap();
    (0..=count).map(|i| loca.get_raw(i).unwrap()).collect()
}

/// The font's character map over the BMP and plane 1
pub fn char_map(font: &FontRef) -> BTreeMap<u32, u16> {
    let cmap = font.cmap().unwrap();
    (0..0x2_0000u32)
        .filter_map(|cp| Some((cp, cmap.map_codepoint(cp)?.to_u32() as u16)))
        .filter(|&(_, gid)| gid != 0)
        .collect()
}

/// Glyph name of `gid` in the font's post table
pub fn glyph_name(font: &FontRef, gid: u16) -> Option<String> {
    let post = font.post().ok()?;
    post.glyph_name(read_fonts::types::GlyphId16::new(gid)).map(str::to_string)
}
