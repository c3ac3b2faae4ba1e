//! Generation entry point
//!
//! A [`Generator`] turns a [`Project`] into one or more font files. Every
//! table of a file is assembled in memory before anything is written, and
//! nothing is shared between calls.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use read_fonts::types::Tag;

use crate::{
    AssembleError, Result,
    context::AssemblyContext,
    error::InTable,
    header::{FontHeader, HeaderSymbol, header_symbols},
    options::{GenerationMode, Options},
    selection::{FontSelection, Project},
    serializer::{FontSerializer, ensure_dir, write_atomically},
    source::{FontInstance, SourceFont},
    tables::{
        self,
        cmap::assemble_cmap,
        glyf::assemble_glyf,
        head::assemble_head,
        hint::add_hinting,
        hmtx::{assemble_hhea, assemble_hmtx},
        maxp::assemble_maxp,
        meta::add_metadata,
        post::assemble_post,
    },
    types::FontIndex,
};

/// One source font and what to take from it
#[derive(Debug, Clone, Copy)]
pub struct FontInput<'a> {
    pub source: &'a SourceFont,
    pub selection: &'a FontSelection,
    pub base: bool,
}

impl<'a> FontInput<'a> {
    pub fn new(source: &'a SourceFont, selection: &'a FontSelection) -> Self {
        Self { source, selection, base: false }
    }

    pub fn base(mut self, base: bool) -> Self {
        self.base = base;
        self
    }
}

/// A serialized font and a summary of what went into it
#[derive(Debug, Clone)]
pub struct AssembledFont {
    pub data: Vec<u8>,
    pub glyph_count: u16,
    pub codepoint_count: usize,
    pub tables: Vec<Tag>,
    /// Named codepoints for a source header
    pub symbols: Vec<HeaderSymbol>,
}

/// A font file written by [`Generator::generate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub size: usize,
    pub glyph_count: u16,
    pub codepoint_count: usize,
    /// Source header written next to the font
    pub header: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub files: Vec<GeneratedFile>,
}

impl GenerationReport {
    pub fn total_size(&self) -> usize {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Builds font files from glyph selections
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: Options,
}

impl Generator {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Open every font of `project` and write the output the mode asks for
    ///
    /// `output` is a file for [`GenerationMode::Merged`] and
    /// [`GenerationMode::Current`], and a directory for
    /// [`GenerationMode::Batch`]. A batch is written all or nothing: when one
    /// file fails, the files already written for it are removed again.
    pub fn generate(&self, project: &Project, output: &Path) -> Result<GenerationReport> {
        if project.fonts.is_empty() {
            return Err(AssembleError::NoFonts);
        }
        let sources = project
            .fonts
            .iter()
            .map(|font| SourceFont::open(&font.path))
            .collect::<Result<Vec<_>>>()?;
        let inputs: Vec<FontInput> = project
            .fonts
            .iter()
            .zip(&sources)
            .map(|(font, source)| FontInput::new(source, &font.selection).base(font.base))
            .collect();

        info!("Generating {:?} output from {} fonts", self.options.mode, inputs.len());

        let report = match self.options.mode {
            GenerationMode::Merged => {
                let font = self.assemble(&inputs)?;
                GenerationReport { files: vec![self.write_output(output, font)?] }
            }
            GenerationMode::Current(index) => {
                let input = inputs
                    .get(index.as_usize())
                    .ok_or(AssembleError::FontOutOfRange { font: index, count: inputs.len() })?;
                let font = self.assemble(&[input.base(true)])?;
                GenerationReport { files: vec![self.write_output(output, font)?] }
            }
            GenerationMode::Batch => self.generate_batch(&inputs, output)?,
        };

        info!("Wrote {} files ({} bytes)", report.files.len(), report.total_size());
        Ok(report)
    }

    fn generate_batch(&self, inputs: &[FontInput], dir: &Path) -> Result<GenerationReport> {
        let mut used = HashSet::new();
        let mut pending = Vec::with_capacity(inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            let font = self.assemble(&[input.base(true)])?;
            let stem = input
                .source
                .path()
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("font{i}"));
            let stem = if used.insert(stem.clone()) { stem } else { format!("{stem}-{i}") };
            pending.push((dir.join(format!("{stem}.ttf")), font));
        }

        ensure_dir(dir)?;
        let mut files: Vec<GeneratedFile> = Vec::with_capacity(pending.len());
        for (path, font) in pending {
            match self.write_output(&path, font) {
                Ok(file) => files.push(file),
                Err(err) => {
                    remove_written(&files);
                    return Err(err);
                }
            }
        }
        Ok(GenerationReport { files })
    }

    /// Assemble `inputs` into one font in memory
    pub fn assemble(&self, inputs: &[FontInput]) -> Result<AssembledFont> {
        if inputs.is_empty() {
            return Err(AssembleError::NoFonts);
        }
        let fonts = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                FontInstance::load(
                    FontIndex::new(i),
                    input.source.name(),
                    input.source.data(),
                    input.selection,
                    input.base,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let ctx = AssemblyContext::new(&fonts, &self.options)?;
        let mut serializer = build_tables(&ctx)?;
        let data = serializer.serialize()?;

        let map = ctx.glyph_map();
        info!(
            "Assembled {} glyphs for {} codepoints from {} fonts ({} bytes)",
            map.glyph_count(),
            map.char_map().len(),
            fonts.len(),
            data.len()
        );

        Ok(AssembledFont {
            data,
            glyph_count: map.glyph_count(),
            codepoint_count: map.char_map().len(),
            tables: serializer.tags().collect(),
            symbols: header_symbols(map),
        })
    }

    /// Write `font` to `path`, and its header when one is asked for
    fn write_output(&self, path: &Path, font: AssembledFont) -> Result<GeneratedFile> {
        write_atomically(path, &font.data)?;
        let mut file = GeneratedFile {
            path: path.to_path_buf(),
            size: font.data.len(),
            glyph_count: font.glyph_count,
            codepoint_count: font.codepoint_count,
            header: None,
        };

        let Some(language) = self.options.header else {
            return Ok(file);
        };
        let header_path = header_path(path, language.extension());
        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let file_name = path.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let mut header = FontHeader::new(&stem, file_name, &font.symbols);
        if self.options.embed_font {
            header = header.with_font_data(&font.data);
        }

        if let Err(err) = write_atomically(&header_path, header.render(language).as_bytes()) {
            remove_written(std::slice::from_ref(&file));
            return Err(err);
        }
        debug!("Wrote {:?} header {}", language, header_path.display());
        file.header = Some(header_path);
        Ok(file)
    }
}

/// `path` with its extension swapped for `extension`, or appended when the
/// swap would name the font file itself
fn header_path(path: &Path, extension: &str) -> PathBuf {
    let swapped = path.with_extension(extension);
    if swapped != path {
        return swapped;
    }
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn build_tables<'a>(ctx: &AssemblyContext<'a>) -> Result<FontSerializer<'a>> {
    let mut out = FontSerializer::new();

    let glyf = assemble_glyf(ctx).in_table(tables::GLYF)?;
    let maxp = assemble_maxp(ctx, &glyf).in_table(tables::MAXP)?;
    let cmap = assemble_cmap(ctx).in_table(tables::CMAP)?;
    let hmtx = assemble_hmtx(ctx).in_table(tables::HMTX)?;
    let hhea = assemble_hhea(ctx, &hmtx, &glyf).in_table(tables::HHEA)?;
    let head = assemble_head(ctx, &glyf).in_table(tables::HEAD)?;

    if ctx.options().glyph_names {
        let post = assemble_post(ctx).in_table(tables::POST)?;
        out.add_table(&post).in_table(tables::POST)?;
    }
    add_metadata(ctx, &mut out)?;
    add_hinting(ctx, &mut out)?;

    out.add_table(&head).in_table(tables::HEAD)?;
    out.add_table(&hhea).in_table(tables::HHEA)?;
    out.add_table(&maxp).in_table(tables::MAXP)?;
    out.add_table(&cmap).in_table(tables::CMAP)?;
    out.add_table(&hmtx).in_table(tables::HMTX)?;
    out.add_table(&glyf.loca).in_table(tables::LOCA)?;
    out.add_table(&glyf.glyf).in_table(tables::GLYF)?;

    debug!("Built tables: {:?}", out.tags().collect::<Vec<_>>());
    Ok(out)
}

/// Undo a batch that failed part way
fn remove_written(files: &[GeneratedFile]) {
    for path in files.iter().flat_map(|file| std::iter::once(&file.path).chain(&file.header)) {
        match fs::remove_file(path) {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) => warn!("Could not remove {}: {e}", path.display()),
        }
    }
}
