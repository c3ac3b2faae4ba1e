//! Source font loading
//!
//! A [`SourceFont`] owns the bytes of one font file. A [`FontInstance`] is the
//! parsed view the rest of the pipeline works from: character map, glyph
//! outlines, metrics and names, together with what the caller selected.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use read_fonts::{
    FontRef, TableProvider,
    tables::{
        cmap::{Cmap, CmapSubtable, PlatformId},
        glyf::{Glyf, Glyph},
        loca::Loca,
        post::Post,
    },
    types::{GlyphId16, Tag},
};

use crate::{
    AssembleError, Result,
    selection::FontSelection,
    types::{Codepoint, FontGlyphId, FontIndex, GlyphId},
};

/// Tables a font needs before any glyph can be taken from it
pub const REQUIRED_SOURCE_TABLES: [Tag; 7] = [
    Tag::new(b"cmap"),
    Tag::new(b"glyf"),
    Tag::new(b"loca"),
    Tag::new(b"head"),
    Tag::new(b"maxp"),
    Tag::new(b"hhea"),
    Tag::new(b"hmtx"),
];

/// The raw bytes of a font file
#[derive(Debug, Clone)]
pub struct SourceFont {
    path: PathBuf,
    data: Vec<u8>,
}

impl SourceFont {
    /// Read a font file from disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| AssembleError::io(path, e))?;
        debug!("Read {} ({} bytes)", path.display(), data.len());
        Ok(Self { path: path.to_path_buf(), data })
    }

    /// Wrap bytes that are already in memory; `path` is only used for naming
    pub fn from_bytes(path: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        Self { path: path.into(), data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used in diagnostics
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// One parsed source font and the caller's selection for it
pub struct FontInstance<'a> {
    index: FontIndex,
    name: String,
    base: bool,
    font: FontRef<'a>,
    glyf: Glyf<'a>,
    loca: Loca<'a>,
    post: Option<Post<'a>>,
    units_per_em: u16,
    num_glyphs: u16,
    metrics: Vec<(u16, i16)>,
    char_map: BTreeMap<Codepoint, GlyphId>,
    glyph_codepoints: BTreeMap<GlyphId, Codepoint>,
    selection: &'a FontSelection,
}

impl<'a> FontInstance<'a> {
    /// Parse `data` and check it has everything the assembler reads
    pub fn load(
        index: FontIndex,
        name: impl Into<String>,
        data: &'a [u8],
        selection: &'a FontSelection,
        base: bool,
    ) -> Result<Self> {
        let name = name.into();
        let font = FontRef::new(data)?;

        if let Some(table) = REQUIRED_SOURCE_TABLES
            .into_iter()
            .find(|tag| font.table_data(*tag).is_none())
        {
            return Err(AssembleError::MissingSourceTable { font: index, name, table });
        }

        let units_per_em = font.head()?.units_per_em();
        let num_glyphs = font.maxp()?.num_glyphs();
        let glyf = font.glyf()?;
        let loca = font.loca(None)?;
        let post = font.post().ok();

        let hmtx = font.hmtx()?;
        let metrics = (0..num_glyphs as u32)
            .map(|gid| {
                let gid = read_fonts::types::GlyphId::new(gid);
                (hmtx.advance(gid).unwrap_or(0), hmtx.side_bearing(gid).unwrap_or(0))
            })
            .collect();

        let cmap = font.cmap()?;
        let char_map: BTreeMap<Codepoint, GlyphId> = best_subtable(&cmap)
            .map(|subtable| subtable_mappings(&subtable))
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, gid)| gid.to_u16() < num_glyphs)
            .collect();

        let mut glyph_codepoints = BTreeMap::new();
        for (cp, gid) in &char_map {
            glyph_codepoints.entry(*gid).or_insert(*cp);
        }

        debug!(
            "Loaded {index} ({name}): {num_glyphs} glyphs, {} codepoints, upm {units_per_em}",
            char_map.len()
        );

        Ok(Self {
            index,
            name,
            base,
            font,
            glyf,
            loca,
            post,
            units_per_em,
            num_glyphs,
            metrics,
            char_map,
            glyph_codepoints,
            selection,
        })
    }

    pub fn index(&self) -> FontIndex {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the caller marked this font as the base font
    pub fn is_base(&self) -> bool {
        self.base
    }

    pub fn font(&self) -> &FontRef<'a> {
        &self.font
    }

    pub fn selection(&self) -> &FontSelection {
        self.selection
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    pub fn char_map(&self) -> &BTreeMap<Codepoint, GlyphId> {
        &self.char_map
    }

    pub fn glyph_for(&self, cp: Codepoint) -> Option<GlyphId> {
        self.char_map.get(&cp).copied()
    }

    /// Lowest codepoint mapped to `gid`
    pub fn codepoint_for(&self, gid: GlyphId) -> Option<Codepoint> {
        self.glyph_codepoints.get(&gid).copied()
    }

    fn glyph_id(&self, gid: GlyphId) -> FontGlyphId {
        FontGlyphId::new(self.index, gid)
    }

    /// Outline bytes of `gid` exactly as stored in `glyf`; empty for glyphs
    /// without an outline
    pub fn glyph_bytes(&self, gid: GlyphId) -> Result<&'a [u8]> {
        let malformed = |reason| AssembleError::MalformedGlyph { glyph: self.glyph_id(gid), reason };
        if gid.to_u16() >= self.num_glyphs {
            return Err(malformed("glyph id is past the end of the font"));
        }
        let idx = gid.as_usize();
        let (Some(start), Some(end)) = (self.loca.get_raw(idx), self.loca.get_raw(idx + 1)) else {
            return Err(malformed("loca has no entry"));
        };
        if end < start {
            return Err(malformed("loca offsets decrease"));
        }
        self.glyf
            .offset_data()
            .as_bytes()
            .get(start as usize..end as usize)
            .ok_or_else(|| malformed("glyph extends past the glyf table"))
    }

    /// Parsed outline of `gid`, `None` for an empty glyph
    pub fn glyph(&self, gid: GlyphId) -> Result<Option<Glyph<'a>>> {
        self.loca
            .get_glyf(read_fonts::types::GlyphId::new(gid.to_u32()), &self.glyf)
            .map_err(|_| AssembleError::MalformedGlyph {
                glyph: self.glyph_id(gid),
                reason: "outline could not be parsed",
            })
    }

    /// Glyphs referenced directly by `gid` if it is a composite
    pub fn components(&self, gid: GlyphId) -> Result<Vec<GlyphId>> {
        let Some(Glyph::Composite(composite)) = self.glyph(gid)? else {
            return Ok(Vec::new());
        };
        composite
            .components()
            .map(|component| {
                let child = GlyphId::new(component.glyph.to_u16());
                if child.to_u16() < self.num_glyphs {
                    Ok(child)
                } else {
                    Err(AssembleError::UnresolvedComponent { glyph: self.glyph_id(gid), component: child })
                }
            })
            .collect()
    }

    /// Advance width and left side bearing in source units
    pub fn metrics(&self, gid: GlyphId) -> (u16, i16) {
        self.metrics.get(gid.as_usize()).copied().unwrap_or_default()
    }

    /// Name of `gid` in the source `post` table, if it has one
    pub fn glyph_name(&self, gid: GlyphId) -> Option<&str> {
        self.post.as_ref().and_then(|post| post.glyph_name(GlyphId16::new(gid.to_u16())))
    }

    /// Raw bytes of any table in the source font
    pub fn table_data(&self, tag: Tag) -> Option<&'a [u8]> {
        self.font.table_data(tag).map(|data| data.as_bytes())
    }
}

/// Rank of a Unicode subtable: full-repertoire format 12 first, then format 4
fn subtable_rank(platform: PlatformId, encoding: u16, subtable: &CmapSubtable) -> Option<u8> {
    let unicode = platform == PlatformId::Unicode;
    match subtable {
        CmapSubtable::Format12(_) if unicode || (platform == PlatformId::Windows && encoding == 10) => Some(0),
        CmapSubtable::Format4(_) if unicode || (platform == PlatformId::Windows && encoding == 1) => Some(1),
        CmapSubtable::Format4(_) | CmapSubtable::Format12(_) | CmapSubtable::Format6(_) => Some(2),
        _ => None,
    }
}

fn best_subtable<'a>(cmap: &Cmap<'a>) -> Option<CmapSubtable<'a>> {
    cmap.encoding_records()
        .iter()
        .filter_map(|record| {
            let subtable = record.subtable(cmap.offset_data()).ok()?;
            let rank = subtable_rank(record.platform_id(), record.encoding_id(), &subtable)?;
            Some((rank, subtable))
        })
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, subtable)| subtable)
}

/// Every (codepoint, glyph) pair of a subtable, unmapped entries skipped
fn subtable_mappings(subtable: &CmapSubtable) -> Vec<(Codepoint, GlyphId)> {
    let pairs: Vec<(u32, u32)> = match subtable {
        CmapSubtable::Format4(f4) => f4.iter().map(|(cp, gid)| (cp, gid.to_u32())).collect(),
        CmapSubtable::Format12(f12) => f12.iter().map(|(cp, gid)| (cp, gid.to_u32())).collect(),
        CmapSubtable::Format6(f6) => {
            let first = f6.first_code() as u32;
            f6.glyph_id_array()
                .iter()
                .enumerate()
                .map(|(i, gid)| (first + i as u32, gid.get() as u32))
                .collect()
        }
        _ => Vec::new(),
    };
    pairs
        .into_iter()
        .filter(|&(cp, gid)| gid != 0 && gid <= u16::MAX as u32 && cp <= 0x10FFFF)
        .map(|(cp, gid)| (Codepoint::new(cp), GlyphId::new(gid as u16)))
        .collect()
}
