//! Domain-specific newtypes for type safety
//!
//! Source glyph ids, output glyph ids and codepoints are all small integers in
//! the font format; keeping them apart in the type system makes it impossible
//! to index an output table with a source id by accident.

use std::{
    fmt,
    fmt::{Display, Formatter, Result},
};

use write_fonts::tables::glyf::Bbox;

macro_rules! u16_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u16);

        impl $name {
            pub const fn new(id: u16) -> Self {
                Self(id)
            }

            pub const fn to_u16(self) -> u16 {
                self.0
            }

            pub const fn to_u32(self) -> u32 {
                self.0 as u32
            }

            pub const fn as_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u16> for $name {
            fn from(id: u16) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u16 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $label, self.0)
            }
        }
    };
}

/// Index of a source font, in the order the fonts were opened
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontIndex(pub usize);

impl FontIndex {
    pub const fn new(idx: usize) -> Self {
        Self(idx)
    }

    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for FontIndex {
    fn from(idx: usize) -> Self {
        Self(idx)
    }
}

impl From<FontIndex> for usize {
    fn from(FontIndex(idx): FontIndex) -> Self {
        idx
    }
}

impl Display for FontIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "Font[{}]", self.0)
    }
}

u16_id!(
    /// A glyph ID inside one source font
    GlyphId,
    "GID"
);

u16_id!(
    /// A glyph ID in the assembled output font
    NewGlyphId,
    "NGID"
);

impl NewGlyphId {
    /// The missing-glyph slot every output font starts with
    pub const NOTDEF: Self = Self(0);
}

/// A source glyph qualified by the font it comes from
///
/// This is the key used everywhere glyphs from different fonts meet: two
/// fonts may both have a glyph 5, but `Font[0]:GID5` and `Font[1]:GID5`
/// never compare equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontGlyphId {
    pub font: FontIndex,
    pub glyph: GlyphId,
}

impl FontGlyphId {
    pub const fn new(font: FontIndex, glyph: GlyphId) -> Self {
        Self { font, glyph }
    }
}

impl Display for FontGlyphId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}:{}", self.font, self.glyph)
    }
}

/// A Unicode codepoint
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codepoint(pub u32);

impl Codepoint {
    pub const fn new(cp: u32) -> Self {
        Self(cp)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Convert to a Rust char if valid
    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.0)
    }

    /// Whether the codepoint fits the Basic Multilingual Plane
    pub const fn is_bmp(self) -> bool {
        self.0 <= 0xFFFF
    }
}

impl From<u32> for Codepoint {
    fn from(cp: u32) -> Self {
        Self(cp)
    }
}

impl From<Codepoint> for u32 {
    fn from(cp: Codepoint) -> Self {
        cp.0
    }
}

impl Display for Codepoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "U+{:04X}", self.0)
    }
}

/// A glyph bounding box in font units
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl Bounds {
    pub const fn new(x_min: i16, y_min: i16, x_max: i16, y_max: i16) -> Self {
        Self { x_min, y_min, x_max, y_max }
    }

    /// The smallest box containing all `points`, or `None` if there are none
    pub fn from_points(points: impl IntoIterator<Item = (i16, i16)>) -> Option<Self> {
        let mut points = points.into_iter();
        let (x, y) = points.next()?;
        Some(points.fold(Self::new(x, y, x, y), |b, (x, y)| Self {
            x_min: b.x_min.min(x),
            y_min: b.y_min.min(y),
            x_max: b.x_max.max(x),
            y_max: b.y_max.max(y),
        }))
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    pub fn width(&self) -> i32 {
        self.x_max as i32 - self.x_min as i32
    }
}

impl From<Bounds> for Bbox {
    fn from(b: Bounds) -> Self {
        Bbox { x_min: b.x_min, y_min: b.y_min, x_max: b.x_max, y_max: b.y_max }
    }
}
