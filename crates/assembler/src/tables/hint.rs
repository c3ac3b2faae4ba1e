//! TrueType hinting tables
//!
//! `fpgm`, `prep`, `cvt ` and `gasp` are copied from the base font only.
//! Glyphs from other fonts lose their glyf instructions, and maxp takes its
//! hinting limits from the same base font.

use log::{debug, warn};
use read_fonts::{TableProvider, types::Tag};
use write_fonts::{from_obj::ToOwnedTable, tables::gasp::Gasp};

use crate::{
    Result,
    context::AssemblyContext,
    error::InTable,
    serializer::FontSerializer,
    tables::{CVT, FPGM, GASP, PREP},
};

pub const HINT_TABLES: [Tag; 4] = [FPGM, PREP, CVT, GASP];

/// Copy the base font's hinting tables into `out`
///
/// The programs are bytecode and go in unchanged; gasp is re-encoded.
pub fn add_hinting<'a>(ctx: &AssemblyContext<'a>, out: &mut FontSerializer<'a>) -> Result<()> {
    let base = ctx.base_font();
    for tag in [FPGM, PREP, CVT] {
        if let Some(data) = base.table_data(tag) {
            out.add_raw(tag, data);
        }
    }
    if let Ok(gasp) = base.font().gasp() {
        let gasp: Gasp = gasp.to_owned_table();
        out.add_table(&gasp).in_table(GASP)?;
    }

    let dropped: Vec<_> = ctx
        .fonts()
        .iter()
        .filter(|font| font.index() != base.index())
        .filter(|font| HINT_TABLES.into_iter().any(|tag| font.table_data(tag).is_some()))
        .map(|font| font.index())
        .collect();
    if !dropped.is_empty() {
        warn!(
            "Hinting of {} is dropped; only {} keeps its instructions",
            dropped.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            base.index()
        );
    }

    debug!(
        "Hinting tables from {}: {:?}",
        base.index(),
        HINT_TABLES.into_iter().filter(|tag| out.contains(*tag)).collect::<Vec<_>>()
    );
    Ok(())
}
