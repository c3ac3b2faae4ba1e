//! Per-table assembly for the output font

use read_fonts::types::Tag;

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hint;
pub mod hmtx;
pub mod maxp;
pub mod meta;
pub mod post;

pub const CMAP: Tag = Tag::new(b"cmap");
pub const GLYF: Tag = Tag::new(b"glyf");
pub const LOCA: Tag = Tag::new(b"loca");
pub const HEAD: Tag = Tag::new(b"head");
pub const HHEA: Tag = Tag::new(b"hhea");
pub const HMTX: Tag = Tag::new(b"hmtx");
pub const MAXP: Tag = Tag::new(b"maxp");
pub const POST: Tag = Tag::new(b"post");
pub const NAME: Tag = Tag::new(b"name");
pub const OS2: Tag = Tag::new(b"OS/2");
pub const META: Tag = Tag::new(b"meta");
pub const FPGM: Tag = Tag::new(b"fpgm");
pub const PREP: Tag = Tag::new(b"prep");
pub const CVT: Tag = Tag::new(b"cvt ");
pub const GASP: Tag = Tag::new(b"gasp");
