//! `generate` and `extract` commands.

use std::path::Path;

use anyhow::{Context, Result};
use fontsmith_assembler::{
    FontIndex, FontSelection, GenerationMode, GenerationReport, Generator, Options, Project, ProjectFont,
    Selection, TableStrategy,
};

use crate::{
    cli::GenerateArgs,
    codepoints::parse_codepoints,
    project::{ProjectFile, generation_mode},
};

/// Apply command-line flags on top of the project's options.
pub fn apply_args(mut options: Options, args: &GenerateArgs) -> Result<Options> {
    if let Some(mode) = args.mode {
        let font = args.font.or(match options.mode {
            GenerationMode::Current(index) => Some(index.as_usize()),
            _ => None,
        });
        options = options.mode(generation_mode(mode, font)?);
    } else if let (Some(font), GenerationMode::Current(_)) = (args.font, options.mode) {
        options = options.mode(GenerationMode::Current(FontIndex::new(font)));
    }
    if args.glyph_names {
        options = options.glyph_names(true);
    }
    if args.no_rescale {
        options = options.disable_rescale(true);
    }
    if args.regenerate_head {
        options = options.head_strategy(TableStrategy::RegenerateDefault);
    }
    if args.regenerate_metadata {
        options = options.metadata_strategy(TableStrategy::RegenerateDefault);
    }
    if let Some(family) = &args.family_name {
        options = options.family_name(family.clone());
    }
    if let Some(language) = args.header {
        options = options.header(language.into());
    }
    if args.embed_font {
        options = options.embed_font(true);
    }
    Ok(options)
}

pub fn generate(project_path: &Path, args: &GenerateArgs) -> Result<()> {
    let file = ProjectFile::load(project_path)?;
    let project = file.project()?;
    let options = apply_args(file.options()?, args)?;

    println!("Generating from {} fonts:", project.fonts.len());
    for font in &project.fonts {
        println!("  - {}{}", font.path.display(), if font.base { " (base)" } else { "" });
    }

    let report = Generator::new(options)
        .generate(&project, &args.output)
        .with_context(|| format!("Failed to generate {}", args.output.display()))?;
    print_report(&report);
    Ok(())
}

pub fn extract(font: &Path, codepoints: &str, output: &Path, glyph_names: bool) -> Result<()> {
    let selection = FontSelection {
        codepoints: Selection::Codepoints(parse_codepoints(codepoints)?),
        ..Default::default()
    };
    let project = Project::new().add_font(ProjectFont::new(font, selection).base(true));

    let report = Generator::new(Options::new().glyph_names(glyph_names))
        .generate(&project, output)
        .with_context(|| format!("Failed to extract from {}", font.display()))?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &GenerationReport) {
    for file in &report.files {
        println!(
            "Wrote {} ({} glyphs, {} codepoints, {:.1} KB)",
            file.path.display(),
            file.glyph_count,
            file.codepoint_count,
            file.size as f64 / 1024.0
        );
        if let Some(header) = &file.header {
            println!("Wrote {}", header.display());
        }
    }
}
