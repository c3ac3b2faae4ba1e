//! Codepoint list parsing.
//!
//! Accepts `U+0041`, `0x41` and decimal `65`, single values or `start-end`
//! ranges, separated by commas or whitespace.

use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use fontsmith_assembler::Codepoint;

const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Parse one codepoint.
pub fn parse_codepoint(text: &str) -> Result<Codepoint> {
    let text = text.trim();
    let hex = ["U+", "u+", "0x", "0X"].iter().find_map(|prefix| text.strip_prefix(prefix));
    let parsed = match hex {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => text.parse(),
    };
    let value = parsed.with_context(|| format!("Invalid codepoint: {text:?}"))?;

    if value > MAX_CODEPOINT {
        bail!("Codepoint {text} is beyond U+10FFFF");
    }
    Ok(Codepoint::new(value))
}

/// Parse a codepoint or an inclusive `start-end` range.
pub fn parse_range(text: &str) -> Result<Vec<Codepoint>> {
    let text = text.trim();
    let Some((start, end)) = text.split_once('-') else {
        return Ok(vec![parse_codepoint(text)?]);
    };
    let (start, end) = (parse_codepoint(start)?, parse_codepoint(end)?);
    if start > end {
        bail!("Range {text} is reversed");
    }
    Ok((start.to_u32()..=end.to_u32()).map(Codepoint::new).collect())
}

/// Parse a list such as `41,0x42-0x5A,U+0061`.
pub fn parse_codepoints(text: &str) -> Result<BTreeSet<Codepoint>> {
    let mut codepoints = BTreeSet::new();
    for item in text.split([',', ' ', '\t', '\n']).filter(|s| !s.is_empty()) {
        codepoints.extend(parse_range(item)?);
    }
    Ok(codepoints)
}
