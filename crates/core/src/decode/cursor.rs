//! Cursor based slicing of count-encoded arrays
//!
//! A flat array is shared by every scheme; a parallel counts array says how
//! many elements belong to each scheme. Slicing walks the schemes in order
//! and hands back the next `counts[i]` elements together with the advanced
//! cursor.

/// Position of the next unconsumed element in a flat array
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor(usize);

impl Cursor {
    pub fn new(position: usize) -> Self {
        Self(position)
    }

    pub fn position(self) -> usize {
        self.0
    }

    pub fn advanced_by(self, count: usize) -> Self {
        Self(self.0 + count)
    }
}

/// Takes `count` elements starting at `cursor`.
///
/// Callers validate the counts against the array length up front, so the
/// range is always in bounds.
pub fn take<T>(values: &[T], cursor: Cursor, count: usize) -> (&[T], Cursor) {
    let end = cursor.advanced_by(count);
    (&values[cursor.position()..end.position()], end)
}

/// Count declared for `scheme_index`, zero when the category is unused
pub fn count_for_scheme(counts: &[usize], scheme_index: usize) -> usize {
    counts.get(scheme_index).copied().unwrap_or(0)
}

/// Slices the elements belonging to `scheme_index`.
///
/// An empty `values` array means no scheme uses the category; every scheme
/// gets an empty slice and `counts` is never consulted.
pub fn slice_for_scheme<'a, T>(
    values: &'a [T],
    counts: &[usize],
    scheme_index: usize,
    cursor: Cursor,
) -> (&'a [T], Cursor) {
    if values.is_empty() {
        return (&[], cursor);
    }

    take(values, cursor, count_for_scheme(counts, scheme_index))
}
