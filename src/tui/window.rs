//! Visible-window computation for the parameter list.
//!
//! The window holds at most `2k + 1` rows, centres the selection when the list
//! is long enough, and sticks to either end of the list instead of leaving
//! dead rows. The clamp order matters: `end` is clamped to the list length
//! before `org` is re-derived from it, otherwise windows near the bottom come
//! out one row short.

use std::ops::Range;

/// Half-open index range `[org, end)` of rows to render.
///
/// `selected` is the selection index, `flankers` the number of rows shown on
/// each side of it, and `len` the list length. An empty list yields `0..0`.
#[must_use]
pub fn visible_window(selected: usize, flankers: usize, len: usize) -> Range<usize> {
    let span = flankers.saturating_mul(2).saturating_add(1);

    let org = selected.saturating_sub(flankers);
    let end = org.saturating_add(span).min(len);
    let org = end.saturating_sub(span);

    org..end
}
