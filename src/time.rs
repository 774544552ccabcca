//! Time-to-slot mapping.
//!
//! All correctness of the ring hinges on these two pure functions. Both are
//! expressed in terms of a single window index `w(t) = floor(t / chunk_length)`,
//! computed via [`i64::div_euclid`] rather than the default truncating `/`.
//! Truncating division rounds toward zero and misplaces negative timestamps at
//! the zero boundary; flooring division does not, and is what the boundary
//! examples in the module tests below assume.

/// The inclusive end timestamp of the `chunk_length`-tick window containing `t`.
///
/// All timestamps `u` with `chunk_end(u) == chunk_end(t)` lie in
/// `(chunk_end(t) - chunk_length, chunk_end(t)]`.
#[inline]
pub fn chunk_end(t: i64, chunk_length: i64) -> i64 {
    debug_assert!(chunk_length >= 1);
    let window = t.div_euclid(chunk_length);
    window * chunk_length + chunk_length - 1
}

/// The ring slot index `0 <= slot(t) < chunk_count` that timestamp `t` maps to.
#[inline]
pub fn slot(t: i64, chunk_length: i64, chunk_count: u32) -> u32 {
    debug_assert!(chunk_length >= 1);
    debug_assert!(chunk_count >= 1);
    let window = t.div_euclid(chunk_length);
    window.rem_euclid(i64::from(chunk_count)) as u32
}
