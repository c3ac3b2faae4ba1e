//! Source headers for generated fonts
//!
//! A header names every codepoint of a font after its glyph, so that code
//! drawing with the font can refer to `ICON_<PREFIX>_<NAME>` instead of a
//! raw codepoint. It can also carry the font file itself as a byte array.

use std::{collections::HashSet, fmt};

use crate::{remap::GlyphMap, types::Codepoint};

const BYTES_PER_LINE: usize = 16;

/// Language a header is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderLanguage {
    C,
    Cpp,
    CSharp,
    Lua,
    Python,
    Rust,
}

impl HeaderLanguage {
    pub const ALL: [Self; 6] = [Self::C, Self::Cpp, Self::CSharp, Self::Lua, Self::Python, Self::Rust];

    /// File extension for a header in this language
    pub fn extension(self) -> &'static str {
        match self {
            Self::C | Self::Cpp => "h",
            Self::CSharp => "cs",
            Self::Lua => "lua",
            Self::Python => "py",
            Self::Rust => "rs",
        }
    }

    fn comment(self) -> &'static str {
        match self {
            Self::Lua => "--",
            Self::Python => "#",
            _ => "//",
        }
    }

    /// String literal holding the one character `cp`
    fn char_literal(self, cp: char) -> String {
        let wide = cp as u32 > 0xFFFF;
        match self {
            Self::C => {
                let mut buf = [0u8; 4];
                let escaped: String = cp.encode_utf8(&mut buf).bytes().map(|b| format!("\\x{b:02x}")).collect();
                format!("\"{escaped}\"")
            }
            Self::Cpp if wide => format!("u8\"\\U{:08x}\"", cp as u32),
            Self::Cpp => format!("u8\"\\u{:04x}\"", cp as u32),
            Self::CSharp | Self::Python if wide => format!("\"\\U{:08x}\"", cp as u32),
            Self::CSharp | Self::Python => format!("\"\\u{:04x}\"", cp as u32),
            Self::Lua | Self::Rust => format!("\"\\u{{{:x}}}\"", cp as u32),
        }
    }
}

/// One named codepoint of a header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSymbol {
    pub name: String,
    pub codepoint: Codepoint,
}

/// Symbols for every codepoint of `map`, named after the output glyphs
///
/// Names are upper-cased identifiers. A glyph reached through several
/// codepoints gets its codepoint appended from the second one on.
pub fn header_symbols(map: &GlyphMap) -> Vec<HeaderSymbol> {
    let mut taken = HashSet::new();
    map.cmap_entries()
        .map(|(codepoint, id)| {
            let stem = map
                .name(id)
                .map(|name| identifier(name.as_str()))
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("U{:04X}", codepoint.to_u32()));
            let name = if taken.contains(&stem) { format!("{stem}_{:04X}", codepoint.to_u32()) } else { stem };
            taken.insert(name.clone());
            HeaderSymbol { name, codepoint }
        })
        .collect()
}

/// Upper-case `text`, anything but ASCII letters and digits turned into `_`
fn identifier(text: &str) -> String {
    let mut ident: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A header ready to be rendered in any [`HeaderLanguage`]
#[derive(Debug, Clone)]
pub struct FontHeader<'a> {
    prefix: String,
    font_file: String,
    symbols: &'a [HeaderSymbol],
    font_data: Option<&'a [u8]>,
}

impl<'a> FontHeader<'a> {
    /// `prefix` is turned into an identifier; `font_file` is the file name
    /// the header refers to
    pub fn new(prefix: &str, font_file: impl Into<String>, symbols: &'a [HeaderSymbol]) -> Self {
        let prefix = identifier(prefix);
        let prefix = if prefix.is_empty() { "FONT".to_string() } else { prefix };
        Self { prefix, font_file: font_file.into(), symbols, font_data: None }
    }

    /// Embed the font file as a byte array
    pub fn with_font_data(mut self, data: &'a [u8]) -> Self {
        self.font_data = Some(data);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn render(&self, language: HeaderLanguage) -> String {
        Rendered { header: self, language }.to_string()
    }

    fn range(&self) -> Option<(u32, u32)> {
        let codepoints = self.symbols.iter().map(|s| s.codepoint.to_u32());
        Some((codepoints.clone().min()?, codepoints.max()?))
    }
}

struct Rendered<'h, 'a> {
    header: &'h FontHeader<'a>,
    language: HeaderLanguage,
}

impl fmt::Display for Rendered<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.header;
        let lang = self.language;
        let p = &h.prefix;
        let file = escape(&h.font_file);

        writeln!(f, "{} Generated by fontsmith for {file}", lang.comment())?;
        writeln!(f)?;

        let symbol = |s: &HeaderSymbol| s.codepoint.to_char().map(|c| (c, lang.char_literal(c)));

        match lang {
            HeaderLanguage::C | HeaderLanguage::Cpp => {
                if lang == HeaderLanguage::C {
                    writeln!(f, "#ifndef FONTSMITH_{p}_H\n#define FONTSMITH_{p}_H\n")?;
                } else {
                    writeln!(f, "#pragma once\n")?;
                }
                writeln!(f, "#define FONT_ICON_FILE_NAME_{p} \"{file}\"")?;
                if let Some((min, max)) = h.range() {
                    writeln!(f, "\n#define ICON_MIN_{p} 0x{min:04X}\n#define ICON_MAX_{p} 0x{max:04X}")?;
                }
                writeln!(f)?;
                for s in h.symbols {
                    if let Some((c, literal)) = symbol(s) {
                        writeln!(f, "#define ICON_{p}_{} {literal} // U+{:04X}", s.name, c as u32)?;
                    }
                }
                if let Some(data) = h.font_data {
                    writeln!(f, "\nstatic const unsigned int FONT_DATA_SIZE_{p} = {};", data.len())?;
                    writeln!(f, "static const unsigned char FONT_DATA_{p}[{}] = {{", data.len())?;
                    write_bytes(f, data, "    ")?;
                    writeln!(f, "}};")?;
                }
                if lang == HeaderLanguage::C {
                    writeln!(f, "\n#endif // FONTSMITH_{p}_H")?;
                }
            }
            HeaderLanguage::CSharp => {
                writeln!(f, "public static class {p}\n{{")?;
                writeln!(f, "    public const string FontIconFileName = \"{file}\";")?;
                if let Some((min, max)) = h.range() {
                    writeln!(f, "    public const int IconMin = 0x{min:04X};\n    public const int IconMax = 0x{max:04X};")?;
                }
                writeln!(f)?;
                for s in h.symbols {
                    if let Some((c, literal)) = symbol(s) {
                        writeln!(f, "    public const string {} = {literal}; // U+{:04X}", s.name, c as u32)?;
                    }
                }
                if let Some(data) = h.font_data {
                    writeln!(f, "\n    public static readonly byte[] FontData = new byte[] {{")?;
                    write_bytes(f, data, "        ")?;
                    writeln!(f, "    }};")?;
                }
                writeln!(f, "}}")?;
            }
            HeaderLanguage::Lua => {
                writeln!(f, "local M = {{}}\n")?;
                writeln!(f, "M.FONT_ICON_FILE_NAME_{p} = \"{file}\"")?;
                if let Some((min, max)) = h.range() {
                    writeln!(f, "M.ICON_MIN_{p} = 0x{min:04X}\nM.ICON_MAX_{p} = 0x{max:04X}")?;
                }
                writeln!(f)?;
                for s in h.symbols {
                    if let Some((c, literal)) = symbol(s) {
                        writeln!(f, "M.ICON_{p}_{} = {literal} -- U+{:04X}", s.name, c as u32)?;
                    }
                }
                if let Some(data) = h.font_data {
                    writeln!(f, "\nM.FONT_DATA_{p} = {{")?;
                    write_bytes(f, data, "    ")?;
                    writeln!(f, "}}")?;
                }
                writeln!(f, "\nreturn M")?;
            }
            HeaderLanguage::Python => {
                writeln!(f, "FONT_ICON_FILE_NAME_{p} = \"{file}\"")?;
                if let Some((min, max)) = h.range() {
                    writeln!(f, "ICON_MIN_{p} = 0x{min:04X}\nICON_MAX_{p} = 0x{max:04X}")?;
                }
                writeln!(f)?;
                for s in h.symbols {
                    if let Some((c, literal)) = symbol(s) {
                        writeln!(f, "ICON_{p}_{} = {literal}  # U+{:04X}", s.name, c as u32)?;
                    }
                }
                if let Some(data) = h.font_data {
                    writeln!(f, "\nFONT_DATA_{p} = bytes([")?;
                    write_bytes(f, data, "    ")?;
                    writeln!(f, "])")?;
                }
            }
            HeaderLanguage::Rust => {
                writeln!(f, "pub const FONT_ICON_FILE_NAME_{p}: &str = \"{file}\";")?;
                if let Some((min, max)) = h.range() {
                    writeln!(f, "pub const ICON_MIN_{p}: u32 = 0x{min:04X};\npub const ICON_MAX_{p}: u32 = 0x{max:04X};")?;
                }
                writeln!(f)?;
                for s in h.symbols {
                    if let Some((c, literal)) = symbol(s) {
                        writeln!(f, "pub const ICON_{p}_{}: &str = {literal}; // U+{:04X}", s.name, c as u32)?;
                    }
                }
                if let Some(data) = h.font_data {
                    writeln!(f, "\npub static FONT_DATA_{p}: [u8; {}] = [", data.len())?;
                    write_bytes(f, data, "    ")?;
                    writeln!(f, "];")?;
                }
            }
        }
        Ok(())
    }
}

/// Comma separated hex bytes, `BYTES_PER_LINE` to a line
fn write_bytes(f: &mut fmt::Formatter<'_>, data: &[u8], indent: &str) -> fmt::Result {
    for row in data.chunks(BYTES_PER_LINE) {
        f.write_str(indent)?;
        for (i, byte) in row.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "0x{byte:02x},")?;
        }
        writeln!(f)?;
    }
    Ok(())
}
