//! Font-wide metadata tables: name, OS/2 and meta

use log::debug;
use read_fonts::{TableProvider, types::NameId};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{
        name::{Name, NameRecord},
        os2::Os2,
    },
};

use crate::{
    Result,
    context::AssemblyContext,
    error::InTable,
    options::TableStrategy,
    serializer::FontSerializer,
    tables::{META, NAME, OS2},
    types::Codepoint,
};

const DEFAULT_FAMILY: &str = "Fontsmith";
const WINDOWS_PLATFORM: u16 = 3;
const UNICODE_BMP_ENCODING: u16 = 1;
const ENGLISH_US: u16 = 0x0409;

/// Name table entries written when regenerating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontNames {
    pub family: String,
    pub subfamily: String,
    pub full_name: String,
    pub postscript_name: String,
}

impl FontNames {
    pub fn regular(family: &str) -> Self {
        let family = family.trim();
        let family = if family.is_empty() { DEFAULT_FAMILY } else { family };
        let stem: String = family
            .chars()
            .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
            .collect();
        let stem = if stem.is_empty() { DEFAULT_FAMILY.to_string() } else { stem };

        Self {
            family: family.to_string(),
            subfamily: "Regular".to_string(),
            full_name: format!("{family} Regular"),
            postscript_name: format!("{stem}-Regular"),
        }
    }

    /// (nameID, value), sorted by nameID
    fn records(&self) -> [(u16, &str); 4] {
        [
            (1, self.family.as_str()),
            (2, self.subfamily.as_str()),
            (4, self.full_name.as_str()),
            (6, self.postscript_name.as_str()),
        ]
    }
}

/// Add the metadata tables for the output font
///
/// Tables the base font does not have are skipped when copying.
pub fn add_metadata<'a>(ctx: &AssemblyContext<'a>, out: &mut FontSerializer<'a>) -> Result<()> {
    match ctx.options().metadata_strategy {
        TableStrategy::CopyFromBase => {
            let base = ctx.base_font();
            if let Ok(name) = base.font().name() {
                let name: Name = name.to_owned_table();
                out.add_table(&name).in_table(NAME)?;
            }
            if let Ok(os2) = base.font().os2() {
                let mut os2: Os2 = os2.to_owned_table();
                let range = char_index_range(ctx.glyph_map().cmap_entries().map(|(cp, _)| cp));
                if let Some((first, last)) = range {
                    os2.us_first_char_index = first;
                    os2.us_last_char_index = last;
                }
                out.add_table(&os2).in_table(OS2)?;
            }
            if let Some(meta) = base.table_data(META) {
                out.add_raw(META, meta);
            }
            debug!("metadata: copied from {}", base.index());
        }
        TableStrategy::RegenerateDefault => {
            let family = ctx.options().family_name.as_deref().unwrap_or(DEFAULT_FAMILY);
            let names = FontNames::regular(family);
            debug!("metadata: regenerated name table for {:?}", names.family);
            out.add_table(&build_name(&names)).in_table(NAME)?;
        }
    }
    Ok(())
}

/// First and last output codepoints, clamped to the 16-bit OS/2 fields
fn char_index_range(codepoints: impl Iterator<Item = Codepoint>) -> Option<(u16, u16)> {
    let mut range: Option<(u32, u32)> = None;
    for cp in codepoints {
        let cp = cp.to_u32();
        range = Some(match range {
            None => (cp, cp),
            Some((lo, hi)) => (lo.min(cp), hi.max(cp)),
        });
    }
    range.map(|(lo, hi)| (lo.min(0xFFFF) as u16, hi.min(0xFFFF) as u16))
}

/// A name table with Windows Unicode English records
pub(crate) fn build_name(names: &FontNames) -> Name {
    let records = names
        .records()
        .into_iter()
        .map(|(id, value)| {
            NameRecord::new(
                WINDOWS_PLATFORM,
                UNICODE_BMP_ENCODING,
                ENGLISH_US,
                NameId::new(id),
                value.to_string().into(),
            )
        })
        .collect();
    Name::new(records)
}
