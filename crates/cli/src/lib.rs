//! fontsmith CLI library.

pub mod cli;
pub mod codepoints;
pub mod generate;
pub mod inspect;
pub mod project;

pub use project::ProjectFile;
