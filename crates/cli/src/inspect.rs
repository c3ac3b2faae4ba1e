//! `inspect` command.

use std::{fs::read, path::Path};

use anyhow::{Context, Result};
use fontsmith_assembler::{FontIndex, FontInstance, FontSelection};
use read_fonts::{FontRef, types::Tag};

/// Summary of one font file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSummary {
    pub tables: Vec<(Tag, u32)>,
    pub num_glyphs: u16,
    pub units_per_em: u16,
    pub codepoints: usize,
}

pub fn summarize(data: &[u8]) -> Result<FontSummary> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let tables = font
        .table_directory
        .table_records()
        .iter()
        .map(|record| (record.tag(), record.length()))
        .collect();

    let selection = FontSelection::all();
    let instance = FontInstance::load(FontIndex::new(0), "", data, &selection, true)?;

    Ok(FontSummary {
        tables,
        num_glyphs: instance.num_glyphs(),
        units_per_em: instance.units_per_em(),
        codepoints: instance.char_map().len(),
    })
}

pub fn inspect(path: &Path) -> Result<()> {
    let data = read(path).with_context(|| format!("Failed to read font: {}", path.display()))?;
    let summary = summarize(&data).with_context(|| format!("Failed to inspect {}", path.display()))?;

    println!("{}", path.display());
    println!("  glyphs:       {}", summary.num_glyphs);
    println!("  unitsPerEm:   {}", summary.units_per_em);
    println!("  codepoints:   {}", summary.codepoints);
    println!("  tables:");
    for (tag, length) in &summary.tables {
        println!("    {tag}  {length:>8}");
    }
    Ok(())
}
