//! Old to new glyph id mapping
//!
//! [`GlyphMap::build`] decides which source glyphs end up in the output and
//! under which id:
//!
//! 1. every selected codepoint is mapped to its source glyph, with remaps
//!    applied, into one merged character map;
//! 2. new ids are handed out contiguously: 0 is the base font's `.notdef`,
//!    then selected glyphs font by font in ascending source codepoint order;
//! 3. composite components are pulled in through a FIFO worklist until no
//!    new glyph is discovered, and get the next ids in discovery order.

use std::collections::{BTreeMap, HashMap, VecDeque, btree_map::Entry};

use indexmap::IndexSet;
use log::debug;

use crate::{
    AssembleError, Result,
    glyph_name::{GlyphName, NOTDEF},
    options::Options,
    scale::Scale,
    selection::{GlyphMetadata, Selection},
    source::FontInstance,
    types::{Codepoint, FontGlyphId, FontIndex, GlyphId, NewGlyphId},
};

/// Largest glyph count the 16-bit glyph id space allows
pub const MAX_GLYPHS: usize = u16::MAX as usize;

/// Key under which identical component-only simple glyphs are merged
type DedupeKey<'a> = (&'a [u8], Scale, (u16, i16));

/// The merged glyph set of one generation request
#[derive(Debug, Clone, Default)]
pub struct GlyphMap {
    char_map: BTreeMap<Codepoint, FontGlyphId>,
    glyph_codepoints: HashMap<FontGlyphId, Codepoint>,
    old_to_new: HashMap<FontGlyphId, NewGlyphId>,
    new_to_old: Vec<Vec<FontGlyphId>>,
    names: IndexSet<GlyphName>,
    metadata: BTreeMap<NewGlyphId, GlyphMetadata>,
}

/// A glyph reached directly through a selected codepoint
struct Seed {
    glyph: FontGlyphId,
    source_cp: Codepoint,
    output_cp: Codepoint,
}

impl GlyphMap {
    /// Compute the output glyph set for `fonts`
    ///
    /// `scales[i]` is the rescale factor of `fonts[i]`; it only matters for
    /// deciding whether two component glyphs are interchangeable.
    pub fn build(
        fonts: &[FontInstance<'_>],
        base: FontIndex,
        scales: &[Scale],
        options: &Options,
    ) -> Result<Self> {
        if fonts.is_empty() {
            return Err(AssembleError::NoFonts);
        }
        if base.as_usize() >= fonts.len() {
            return Err(AssembleError::FontOutOfRange { font: base, count: fonts.len() });
        }

        let mut map = Self::default();
        let seeds = map.merge_char_maps(fonts)?;

        let mut builder = Builder {
            map,
            dedupe: HashMap::new(),
            metadata_from: HashMap::new(),
            queue: VecDeque::new(),
            options,
        };
        builder.place_notdef(&fonts[base.as_usize()], scales)?;
        for seed in &seeds {
            builder.place_selected(&fonts[seed.glyph.font.as_usize()], seed, scales)?;
        }
        builder.close_over_components(fonts, scales)?;

        let map = builder.map;
        debug!(
            "Glyph map: {} codepoints, {} glyphs from {} selected",
            map.char_map.len(),
            map.new_to_old.len(),
            seeds.len()
        );
        Ok(map)
    }

    fn merge_char_maps(&mut self, fonts: &[FontInstance<'_>]) -> Result<Vec<Seed>> {
        let mut seeds = Vec::new();

        for font in fonts {
            let selected: Vec<Codepoint> = match &font.selection().codepoints {
                Selection::All => font.char_map().keys().copied().collect(),
                Selection::Codepoints(set) => set.iter().copied().collect(),
            };
            if selected.is_empty() {
                return Err(AssembleError::EmptySelection { font: font.index() });
            }

            for source_cp in selected {
                let gid = font.glyph_for(source_cp).ok_or(AssembleError::CodepointNotInFont {
                    font: font.index(),
                    codepoint: source_cp,
                })?;
                let glyph = FontGlyphId::new(font.index(), gid);
                let output_cp = font.selection().output_codepoint(source_cp);

                match self.char_map.entry(output_cp) {
                    Entry::Vacant(slot) => {
                        slot.insert(glyph);
                    }
                    Entry::Occupied(slot) if *slot.get() == glyph => continue,
                    Entry::Occupied(slot) => {
                        return Err(AssembleError::DuplicateCodepoint {
                            codepoint: output_cp,
                            first: *slot.get(),
                            second: glyph,
                        });
                    }
                }
                self.glyph_codepoints
                    .entry(glyph)
                    .and_modify(|cp| *cp = (*cp).min(output_cp))
                    .or_insert(output_cp);
                seeds.push(Seed { glyph, source_cp, output_cp });
            }
        }

        Ok(seeds)
    }

    /// Number of glyphs in the output
    pub fn glyph_count(&self) -> u16 {
        self.new_to_old.len() as u16
    }

    /// Output codepoint → source glyph, ascending by codepoint
    pub fn char_map(&self) -> &BTreeMap<Codepoint, FontGlyphId> {
        &self.char_map
    }

    /// Output codepoint → output glyph, ascending by codepoint
    pub fn cmap_entries(&self) -> impl Iterator<Item = (Codepoint, NewGlyphId)> + '_ {
        self.char_map
            .iter()
            .filter_map(|(cp, glyph)| self.new_id(*glyph).map(|id| (*cp, id)))
    }

    /// Lowest output codepoint that maps to `glyph`
    pub fn codepoint_of(&self, glyph: FontGlyphId) -> Option<Codepoint> {
        self.glyph_codepoints.get(&glyph).copied()
    }

    pub fn new_id(&self, glyph: FontGlyphId) -> Option<NewGlyphId> {
        self.old_to_new.get(&glyph).copied()
    }

    /// Whether `glyph` has been placed in the output
    pub fn is_resolved(&self, glyph: FontGlyphId) -> bool {
        self.old_to_new.contains_key(&glyph)
    }

    /// Every source glyph placed in the output
    pub fn resolved(&self) -> impl Iterator<Item = FontGlyphId> + '_ {
        self.old_to_new.keys().copied()
    }

    /// Source glyphs merged into `id`; the first one supplies the outline
    pub fn sources(&self, id: NewGlyphId) -> &[FontGlyphId] {
        self.new_to_old.get(id.as_usize()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The source glyph whose outline and metrics `id` is built from
    pub fn primary(&self, id: NewGlyphId) -> Option<FontGlyphId> {
        self.sources(id).first().copied()
    }

    /// Output glyphs in id order with the source glyph each one is built from
    pub fn glyphs(&self) -> impl Iterator<Item = (NewGlyphId, FontGlyphId)> + '_ {
        self.new_to_old
            .iter()
            .enumerate()
            .filter_map(|(i, sources)| Some((NewGlyphId::new(i as u16), *sources.first()?)))
    }

    pub fn name(&self, id: NewGlyphId) -> Option<&GlyphName> {
        self.names.get_index(id.as_usize())
    }

    /// Output glyph names, indexed by new id
    pub fn names(&self) -> &IndexSet<GlyphName> {
        &self.names
    }

    /// Caller-supplied metrics for `id`
    pub fn metadata(&self, id: NewGlyphId) -> Option<&GlyphMetadata> {
        self.metadata.get(&id)
    }
}

struct Builder<'a, 'o> {
    map: GlyphMap,
    dedupe: HashMap<DedupeKey<'a>, NewGlyphId>,
    /// Output codepoint whose selection supplied each glyph's metadata
    metadata_from: HashMap<NewGlyphId, Codepoint>,
    queue: VecDeque<FontGlyphId>,
    options: &'o Options,
}

impl<'a> Builder<'a, '_> {
    fn push(&mut self, glyph: FontGlyphId, name: GlyphName) -> Result<NewGlyphId> {
        let count = self.map.new_to_old.len();
        if count >= MAX_GLYPHS {
            return Err(AssembleError::TooManyGlyphs { count: count + 1 });
        }
        let id = NewGlyphId::new(count as u16);
        self.map.new_to_old.push(vec![glyph]);
        self.map.names.insert(name);
        self.map.old_to_new.insert(glyph, id);
        self.queue.push_back(glyph);
        Ok(id)
    }

    /// Remember a simple glyph so that identical components can share its id
    fn register_outline(
        &mut self,
        font: &FontInstance<'a>,
        glyph: FontGlyphId,
        id: NewGlyphId,
        scales: &[Scale],
    ) -> Result<()> {
        if self.options.dedupe_components
            && let Some(key) = dedupe_key(font, glyph.glyph, scales)?
        {
            self.dedupe.entry(key).or_insert(id);
        }
        Ok(())
    }

    fn place_notdef(&mut self, base: &FontInstance<'a>, scales: &[Scale]) -> Result<()> {
        let glyph = FontGlyphId::new(base.index(), GlyphId::new(0));
        let id = self.push(glyph, GlyphName::new(NOTDEF))?;
        self.register_outline(base, glyph, id, scales)
    }

    fn place_selected(&mut self, font: &FontInstance<'a>, seed: &Seed, scales: &[Scale]) -> Result<()> {
        let metadata = font.selection().metadata.get(&seed.source_cp).copied();

        // a second codepoint of an already placed glyph can still carry metrics
        if let Some(id) = self.map.new_id(seed.glyph) {
            if let Some(metadata) = metadata {
                self.attach_metadata(seed, id, metadata)?;
            }
            return Ok(());
        }

        let selection = font.selection();
        let name = selection
            .renames
            .get(&seed.source_cp)
            .map(GlyphName::new)
            .or_else(|| font.glyph_name(seed.glyph.glyph).map(GlyphName::new))
            .unwrap_or_else(|| GlyphName::for_codepoint(seed.output_cp));

        if let Some(existing) = self.map.names.get_index_of(&name) {
            return Err(AssembleError::DuplicateGlyphName {
                name: name.into_string(),
                first: self.map.new_to_old[existing][0],
                second: seed.glyph,
            });
        }

        let id = self.push(seed.glyph, name)?;
        match metadata {
            Some(metadata) => self.attach_metadata(seed, id, metadata)?,
            None => self.register_outline(font, seed.glyph, id, scales)?,
        }
        Ok(())
    }

    /// Give `id` caller-supplied metrics; two different sets for one glyph
    /// are an error
    fn attach_metadata(&mut self, seed: &Seed, id: NewGlyphId, metadata: GlyphMetadata) -> Result<()> {
        if let Some(existing) = self.map.metadata.get(&id) {
            if *existing == metadata {
                return Ok(());
            }
            let first = self.metadata_from.get(&id).copied().unwrap_or(seed.output_cp);
            return Err(AssembleError::ConflictingMetadata { glyph: seed.glyph, first, second: seed.output_cp });
        }
        self.map.metadata.insert(id, metadata);
        self.metadata_from.insert(id, seed.output_cp);
        // metrics differ from the outline's own, so components must not share it
        self.dedupe.retain(|_, shared| *shared != id);
        Ok(())
    }

    fn place_component(&mut self, font: &FontInstance<'a>, glyph: FontGlyphId, scales: &[Scale]) -> Result<()> {
        if self.options.dedupe_components
            && let Some(key) = dedupe_key(font, glyph.glyph, scales)?
            && let Some(&id) = self.dedupe.get(&key)
        {
            debug!("{glyph} is identical to {}, sharing {id}", self.map.new_to_old[id.as_usize()][0]);
            self.map.new_to_old[id.as_usize()].push(glyph);
            self.map.old_to_new.insert(glyph, id);
            return Ok(());
        }

        let stem = font
            .glyph_name(glyph.glyph)
            .map(GlyphName::new)
            .unwrap_or_else(|| GlyphName::for_glyph(glyph.glyph));
        let name = unique_name(&self.map.names, stem);
        let id = self.push(glyph, name)?;
        self.register_outline(font, glyph, id, scales)
    }

    /// Drain the worklist until every component of every placed glyph is placed
    fn close_over_components(&mut self, fonts: &[FontInstance<'a>], scales: &[Scale]) -> Result<()> {
        while let Some(glyph) = self.queue.pop_front() {
            let font = &fonts[glyph.font.as_usize()];
            for component in font.components(glyph.glyph)? {
                let child = FontGlyphId::new(glyph.font, component);
                if !self.map.is_resolved(child) {
                    self.place_component(font, child, scales)?;
                }
            }
        }
        Ok(())
    }
}

/// Outline bytes, scale and metrics of a simple or empty glyph
///
/// Composite glyphs have no key: equal bytes still name different
/// components in different fonts.
fn dedupe_key<'a>(font: &FontInstance<'a>, gid: GlyphId, scales: &[Scale]) -> Result<Option<DedupeKey<'a>>> {
    let bytes = font.glyph_bytes(gid)?;
    let is_composite = bytes.len() >= 2 && i16::from_be_bytes([bytes[0], bytes[1]]) < 0;
    if is_composite {
        return Ok(None);
    }
    let scale = scales.get(font.index().as_usize()).copied().unwrap_or(Scale::IDENTITY);
    Ok(Some((bytes, scale, font.metrics(gid))))
}

/// `stem`, or `stem.1`, `stem.2`, … whichever is free first
fn unique_name(taken: &IndexSet<GlyphName>, stem: GlyphName) -> GlyphName {
    if !taken.contains(&stem) {
        return stem;
    }
    let mut n = 1usize;
    loop {
        let candidate = GlyphName::new(format!("{stem}.{n}"));
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_name() {
        let mut taken: IndexSet<GlyphName> = ["A", "A.1", "B"].into_iter().map(GlyphName::from).collect();
        assert_eq!(unique_name(&taken, GlyphName::new("C")), "C");
        assert_eq!(unique_name(&taken, GlyphName::new("A")), "A.2");
        taken.insert(GlyphName::new("A.2"));
        assert_eq!(unique_name(&taken, GlyphName::new("B")), "B.1");
    }

    #[test]
    fn test_empty_map() {
        let map = GlyphMap::default();
        assert_eq!(map.glyph_count(), 0);
        assert!(map.sources(NewGlyphId::NOTDEF).is_empty());
        assert_eq!(map.primary(NewGlyphId::new(3)), None);
        assert_eq!(map.cmap_entries().count(), 0);
    }
}
