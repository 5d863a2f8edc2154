//! Helper functions for the encoder pipeline.
//!
//! Allocation, MCU arithmetic and comment handling shared by
//! [`Encoder`](super::Encoder) and the sampling code.

use crate::error::Result;

// ============================================================================
// Allocation Helpers
// ============================================================================

/// Allocate a Vec of `len` copies of `value` with fallible allocation.
#[inline]
pub(crate) fn try_alloc_vec<T: Clone>(value: T, len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    v.resize(len, value);
    Ok(v)
}

// ============================================================================
// Size Helpers
// ============================================================================

/// Number of MCUs needed to cover `size` pixels.
#[inline]
pub(crate) fn mcu_count(size: usize, mcu_size: usize) -> usize {
    size.div_ceil(mcu_size)
}

// ============================================================================
// Comment Helpers
// ============================================================================

/// Longest prefix of `s` that is at most `max` bytes and ends on a char
/// boundary.
pub(crate) fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
