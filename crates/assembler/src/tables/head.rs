//! head assembly

use log::debug;
use read_fonts::TableProvider;
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::head::{Flags, Head, MacStyle},
};

use crate::{Result, context::AssemblyContext, options::TableStrategy, tables::glyf::GlyfOutput, types::Bounds};

const MAGIC_NUMBER: u32 = 0x5F0F_3CF5;

// baseline at y=0, lsb at x=0, integer ppem
const DEFAULT_FLAGS: u16 = 0x000B;

/// Build head with the configured strategy
///
/// Both strategies leave checksumAdjustment at zero for the serializer and
/// agree with the assembled glyf on bounds and loca format. Caller-supplied
/// glyph bounds count towards the font bounds.
pub fn assemble_head(ctx: &AssemblyContext, glyf: &GlyfOutput) -> Result<Head> {
    let bounds = glyf.font_bounds(ctx.glyph_map());
    let index_to_loc_format = glyf.index_to_loc_format();
    let source = ctx.base_font().font().head()?;

    let mut head = match ctx.options().head_strategy {
        TableStrategy::CopyFromBase => {
            debug!("head: copied from {}", ctx.base());
            source.to_owned_table()
        }
        TableStrategy::RegenerateDefault => {
            debug!("head: regenerated");
            Head {
                font_revision: font_types::Fixed::from_f64(1.0),
                checksum_adjustment: 0,
                magic_number: MAGIC_NUMBER,
                flags: Flags::from_bits_truncate(DEFAULT_FLAGS),
                units_per_em: 0,
                created: source.created(),
                modified: source.modified(),
                x_min: 0,
                y_min: 0,
                x_max: 0,
                y_max: 0,
                mac_style: MacStyle::empty(),
                lowest_rec_ppem: 8,
                font_direction_hint: 2,
                index_to_loc_format,
            }
        }
    };

    head.checksum_adjustment = 0;
    head.units_per_em = ctx.units_per_em();
    set_bounds(&mut head, bounds);
    head.index_to_loc_format = index_to_loc_format;
    Ok(head)
}

fn set_bounds(head: &mut Head, b: Bounds) {
    head.x_min = b.x_min;
    head.y_min = b.y_min;
    head.x_max = b.x_max;
    head.y_max = b.y_max;
}
