//! Strategies for combining font-wide values from several source fonts

/// Maximum over `values`, or `default` when there are none
pub fn max_or<T: Ord + Copy>(values: impl IntoIterator<Item = T>, default: T) -> T {
    values.into_iter().max().unwrap_or(default)
}

/// Minimum over `values`, or `default` when there are none
pub fn min_or<T: Ord + Copy>(values: impl IntoIterator<Item = T>, default: T) -> T {
    values.into_iter().min().unwrap_or(default)
}

/// Clamp a wide intermediate into the i16 range of a font field
pub fn saturate_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Clamp a wide intermediate into the u16 range of a font field
pub fn saturate_u16(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}
