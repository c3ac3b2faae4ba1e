//! Project files.
//!
//! A project is a TOML file with an optional `[options]` table and one
//! `[[fonts]]` entry per source font:
//!
//! ```toml
//! [options]
//! mode = "merged"
//! glyph-names = true
//! header = "cpp"
//!
//! [[fonts]]
//! path = "Text.ttf"
//! base = true
//! codepoints = ["0x41-0x5A", "U+0061"]
//! rename = { "U+0041" = "alpha" }
//!
//! [[fonts]]
//! path = "Icons.ttf"
//! codepoints = "all"
//! remap = { "0xE000" = "0xF000" }
//! metrics = { "0xE000" = { advance = 1000 } }
//! ```

use std::{
    collections::BTreeMap,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use fontsmith_assembler::{
    Bounds, FontIndex, FontSelection, GenerationMode, GlyphMetadata, HeaderLanguage, Options, Project,
    ProjectFont, Selection, TableStrategy,
};
use log::debug;
use serde::Deserialize;

use crate::codepoints::{parse_codepoint, parse_codepoints, parse_range};

/// Output mode names shared by the project file and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModeName {
    Merged,
    Current,
    Batch,
}

/// Header language names shared by the project file and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageName {
    C,
    Cpp,
    Csharp,
    Lua,
    Python,
    Rust,
}

impl From<LanguageName> for HeaderLanguage {
    fn from(name: LanguageName) -> Self {
        match name {
            LanguageName::C => HeaderLanguage::C,
            LanguageName::Cpp => HeaderLanguage::Cpp,
            LanguageName::Csharp => HeaderLanguage::CSharp,
            LanguageName::Lua => HeaderLanguage::Lua,
            LanguageName::Python => HeaderLanguage::Python,
            LanguageName::Rust => HeaderLanguage::Rust,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyName {
    Copy,
    Regenerate,
}

impl From<StrategyName> for TableStrategy {
    fn from(name: StrategyName) -> Self {
        match name {
            StrategyName::Copy => TableStrategy::CopyFromBase,
            StrategyName::Regenerate => TableStrategy::RegenerateDefault,
        }
    }
}

/// Resolve a mode name, `font` is only used by [`ModeName::Current`].
pub fn generation_mode(mode: ModeName, font: Option<usize>) -> Result<GenerationMode> {
    Ok(match mode {
        ModeName::Merged => GenerationMode::Merged,
        ModeName::Batch => GenerationMode::Batch,
        ModeName::Current => {
            let Some(font) = font else {
                bail!("Mode \"current\" needs a font index");
            };
            GenerationMode::Current(FontIndex::new(font))
        }
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectOptions {
    pub mode: Option<ModeName>,
    pub font: Option<usize>,
    pub glyph_names: Option<bool>,
    pub disable_rescale: Option<bool>,
    pub head: Option<StrategyName>,
    pub metadata: Option<StrategyName>,
    pub dedupe_components: Option<bool>,
    pub family_name: Option<String>,
    pub header: Option<LanguageName>,
    pub embed_font: Option<bool>,
}

/// A codepoint written as a TOML integer or string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CodepointValue {
    Number(u32),
    Text(String),
}

impl CodepointValue {
    fn codepoints(&self) -> Result<Vec<fontsmith_assembler::Codepoint>> {
        match self {
            Self::Number(n) => Ok(vec![parse_codepoint(&n.to_string())?]),
            Self::Text(text) => parse_range(text),
        }
    }

    fn codepoint(&self) -> Result<fontsmith_assembler::Codepoint> {
        match self {
            Self::Number(n) => parse_codepoint(&n.to_string()),
            Self::Text(text) => parse_codepoint(text),
        }
    }
}

/// `"all"`, a comma separated string, or an array of values and ranges.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CodepointSpec {
    Text(String),
    List(Vec<CodepointValue>),
}

impl Default for CodepointSpec {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl CodepointSpec {
    pub fn selection(&self) -> Result<Selection> {
        match self {
            Self::Text(text) if text.trim().eq_ignore_ascii_case("all") => Ok(Selection::All),
            Self::Text(text) => Ok(Selection::Codepoints(parse_codepoints(text)?)),
            Self::List(values) => {
                let mut set = std::collections::BTreeSet::new();
                for value in values {
                    set.extend(value.codepoints()?);
                }
                Ok(Selection::Codepoints(set))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsEntry {
    pub advance: Option<u16>,
    /// `[x_min, y_min, x_max, y_max]`
    pub bounds: Option<[i16; 4]>,
}

impl From<&MetricsEntry> for GlyphMetadata {
    fn from(entry: &MetricsEntry) -> Self {
        let mut metadata = GlyphMetadata::new();
        if let Some(advance) = entry.advance {
            metadata = metadata.advance_width(advance);
        }
        if let Some([x_min, y_min, x_max, y_max]) = entry.bounds {
            metadata = metadata.bounds(Bounds::new(x_min, y_min, x_max, y_max));
        }
        metadata
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub base: bool,
    #[serde(default)]
    pub codepoints: CodepointSpec,
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
    #[serde(default)]
    pub remap: BTreeMap<String, CodepointValue>,
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricsEntry>,
}

impl FontEntry {
    fn selection(&self) -> Result<FontSelection> {
        let mut selection = FontSelection { codepoints: self.codepoints.selection()?, ..Default::default() };
        for (cp, name) in &self.rename {
            selection = selection.rename(parse_codepoint(cp)?, name.clone());
        }
        for (from, to) in &self.remap {
            selection = selection.remap(parse_codepoint(from)?, to.codepoint()?);
        }
        for (cp, entry) in &self.metrics {
            selection = selection.with_metadata(parse_codepoint(cp)?, entry.into());
        }
        Ok(selection)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    #[serde(default)]
    pub options: ProjectOptions,
    #[serde(default)]
    pub fonts: Vec<FontEntry>,
}

impl ProjectFile {
    /// Read a project file; font paths are taken relative to its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_to_string(path)
            .with_context(|| format!("Failed to read project: {}", path.display()))?;
        let root = path.parent().unwrap_or(Path::new(""));
        let file = Self::parse(&text, root)
            .with_context(|| format!("Invalid project: {}", path.display()))?;
        debug!("Loaded {} with {} fonts", path.display(), file.fonts.len());
        Ok(file)
    }

    pub fn parse(text: &str, root: &Path) -> Result<Self> {
        let mut file: Self = toml::from_str(text)?;
        for font in &mut file.fonts {
            if font.path.is_relative() {
                font.path = root.join(&font.path);
            }
        }
        Ok(file)
    }

    pub fn project(&self) -> Result<Project> {
        let mut project = Project::new();
        for (i, font) in self.fonts.iter().enumerate() {
            let selection = font
                .selection()
                .with_context(|| format!("Invalid selection for font {i} ({})", font.path.display()))?;
            project = project.add_font(ProjectFont::new(&font.path, selection).base(font.base));
        }
        Ok(project)
    }

    /// Generation options as written in the file.
    pub fn options(&self) -> Result<Options> {
        let o = &self.options;
        let mut options = Options::new();
        if let Some(mode) = o.mode {
            options = options.mode(generation_mode(mode, o.font)?);
        }
        if let Some(glyph_names) = o.glyph_names {
            options = options.glyph_names(glyph_names);
        }
        if let Some(disable) = o.disable_rescale {
            options = options.disable_rescale(disable);
        }
        if let Some(head) = o.head {
            options = options.head_strategy(head.into());
        }
        if let Some(metadata) = o.metadata {
            options = options.metadata_strategy(metadata.into());
        }
        if let Some(dedupe) = o.dedupe_components {
            options = options.dedupe_components(dedupe);
        }
        if let Some(family) = &o.family_name {
            options = options.family_name(family.clone());
        }
        if let Some(language) = o.header {
            options = options.header(language.into());
        }
        if let Some(embed) = o.embed_font {
            options = options.embed_font(embed);
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use fontsmith_assembler::Codepoint;

    use super::*;

    const PROJECT: &str = r#"
[options]
mode = "batch"
glyph-names = true
head = "regenerate"
header = "csharp"

[[fonts]]
path = "Text.ttf"
base = true
codepoints = ["0x41-0x43", 97]
rename = { "U+0041" = "alpha" }

[[fonts]]
path = "/abs/Icons.ttf"
codepoints = "all"
remap = { "0xE000" = "0xF000" }
metrics = { "0xE000" = { advance = 1000, bounds = [0, -100, 900, 800] } }
"#;

    #[test]
    fn test_parse_project() {
        let file = ProjectFile::parse(PROJECT, Path::new("fonts")).unwrap();
        let project = file.project().unwrap();

        assert_eq!(project.fonts.len(), 2);
        assert_eq!(project.fonts[0].path, Path::new("fonts/Text.ttf"));
        assert_eq!(project.fonts[1].path, Path::new("/abs/Icons.ttf"));
        assert!(project.fonts[0].base);

        let text = &project.fonts[0].selection;
        let expected: Vec<Codepoint> = [0x41, 0x42, 0x43, 97].into_iter().map(Codepoint::new).collect();
        assert_eq!(text.codepoints, Selection::Codepoints(expected.into_iter().collect()));
        assert_eq!(text.renames.get(&Codepoint::new(0x41)).map(String::as_str), Some("alpha"));

        let icons = &project.fonts[1].selection;
        assert_eq!(icons.codepoints, Selection::All);
        assert_eq!(icons.output_codepoint(Codepoint::new(0xE000)), Codepoint::new(0xF000));
        let metadata = icons.metadata.get(&Codepoint::new(0xE000)).unwrap();
        assert_eq!(metadata.advance_width, Some(1000));
        assert_eq!(metadata.bounds, Some(Bounds::new(0, -100, 900, 800)));
    }

    #[test]
    fn test_options_from_file() {
        let options = ProjectFile::parse(PROJECT, Path::new("")).unwrap().options().unwrap();
        assert_eq!(options.mode, GenerationMode::Batch);
        assert!(options.glyph_names);
        assert_eq!(options.head_strategy, TableStrategy::RegenerateDefault);
        assert_eq!(options.metadata_strategy, TableStrategy::CopyFromBase);
        assert_eq!(options.header, Some(HeaderLanguage::CSharp));
        assert!(!options.embed_font);
    }

    #[test]
    fn test_current_mode_needs_font() {
        let text = "[options]\nmode = \"current\"\n";
        assert!(ProjectFile::parse(text, Path::new("")).unwrap().options().is_err());

        let text = "[options]\nmode = \"current\"\nfont = 1\n";
        let options = ProjectFile::parse(text, Path::new("")).unwrap().options().unwrap();
        assert_eq!(options.mode, GenerationMode::Current(FontIndex::new(1)));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(ProjectFile::parse("[options]\ncolour = 1\n", Path::new("")).is_err());
    }
}
