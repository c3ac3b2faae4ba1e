//! Units-per-em conversion between a source font and the output font

use crate::{
    AssembleError, Result,
    strategies::{saturate_i16, saturate_u16},
    types::FontIndex,
};

/// Linear factor `target / source` applied to every coordinate of a source font
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Scale {
    target: u16,
    source: u16,
}

impl Scale {
    pub const IDENTITY: Self = Self { target: 1, source: 1 };

    /// Scale from a font with `source` units per em into `target` units per em
    ///
    /// A zero on either side would produce a non-finite or degenerate factor.
    pub fn between(font: FontIndex, target: u16, source: u16) -> Result<Self> {
        if target == 0 || source == 0 {
            return Err(AssembleError::NonFiniteScale { font, units_per_em: target.min(source) });
        }
        if target == source {
            return Ok(Self::IDENTITY);
        }
        Ok(Self { target, source })
    }

    pub fn is_identity(&self) -> bool {
        self.target == self.source
    }

    pub fn factor(&self) -> f64 {
        self.target as f64 / self.source as f64
    }

    fn apply(&self, value: i32) -> i32 {
        if self.is_identity() {
            value
        } else {
            (value as f64 * self.factor()).round() as i32
        }
    }

    /// Scale a signed coordinate, saturating at the i16 limits
    pub fn coord(&self, value: i16) -> i16 {
        saturate_i16(self.apply(value as i32))
    }

    /// Scale an unsigned distance such as an advance width
    pub fn distance(&self, value: u16) -> u16 {
        saturate_u16(self.apply(value as i32))
    }

    /// Scale a value that is allowed to exceed the i16 range, such as a
    /// composite offset before it is encoded
    pub fn wide(&self, value: i32) -> i32 {
        self.apply(value)
    }
}
