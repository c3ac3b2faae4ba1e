//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::{
    generate::{extract, generate},
    inspect::inspect,
    project::{LanguageName, ModeName},
};

#[derive(Parser)]
#[command(name = "fontsmith")]
#[command(about = "Assemble a TrueType font from glyphs picked out of other fonts")]
pub struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override the project file's `[options]`.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// Output file, or directory in batch mode
    #[arg(short, long)]
    pub output: PathBuf,
    #[arg(long, value_enum)]
    pub mode: Option<ModeName>,
    /// Font index for `--mode current`
    #[arg(long)]
    pub font: Option<usize>,
    /// Write a post table with glyph names
    #[arg(long)]
    pub glyph_names: bool,
    /// Keep outlines in source units when units-per-em differ
    #[arg(long)]
    pub no_rescale: bool,
    #[arg(long)]
    pub regenerate_head: bool,
    /// Write a fresh name table instead of copying the base font's
    #[arg(long)]
    pub regenerate_metadata: bool,
    /// Family name for a regenerated name table
    #[arg(long)]
    pub family_name: Option<String>,
    /// Write a source header naming every codepoint next to each font
    #[arg(long, value_enum, value_name = "LANG")]
    pub header: Option<LanguageName>,
    /// Include the font file in the header as a byte array
    #[arg(long, requires = "header")]
    pub embed_font: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build font files from a TOML project
    Generate {
        project: PathBuf,
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// Copy a set of codepoints out of one font
    Extract {
        font: PathBuf,
        /// Codepoints such as `41,0x42-0x5A,U+0061`
        #[arg(short, long)]
        codepoints: String,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        glyph_names: bool,
    },
    /// Print a font's table directory and glyph summary
    Inspect { font: PathBuf },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Generate { project, args } => generate(&project, &args)?,
            Commands::Extract { font, codepoints, output, glyph_names } => {
                extract(&font, &codepoints, &output, glyph_names)?
            }
            Commands::Inspect { font } => inspect(&font)?,
        }
        Ok(())
    }
}
