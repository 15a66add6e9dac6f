// Copyright 2025 the Windrow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal change-window computation.
//!
//! The incremental engines report the smallest `[start, end)` window of
//! positions for which a change notification must be emitted to keep
//! downstream observers consistent: positions outside the window hold the
//! same entry, at the same position, before and after the change. Trimming
//! the unchanged prefix and suffix this way avoids invalidating an entire
//! projection for an edit that only disturbed a few slots.

use windrow_list_model::Delta;

/// Window for an edit described by which old indices were dropped and which
/// new indices hold inserted entries.
///
/// `dropped` (pre-change coordinates) and `inserted` (post-change
/// coordinates) must be ascending. Relies on surviving entries keeping their
/// relative order across the edit, which a stable re-sort guarantees.
///
/// Returns `None` for a true no-op (nothing dropped, nothing inserted):
/// no notification should be emitted at all.
pub(crate) fn edit_window(
    old_len: usize,
    new_len: usize,
    dropped: &[usize],
    inserted: &[usize],
) -> Option<Delta> {
    let start = match (dropped.first(), inserted.first()) {
        (None, None) => {
            debug_assert_eq!(old_len, new_len, "a no-op edit must preserve length");
            return None;
        }
        (Some(&d), None) => d,
        (None, Some(&i)) => i,
        (Some(&d), Some(&i)) => d.min(i),
    };

    // Trim the common suffix: walk both ends back while neither side's
    // trailing slot was touched. The k-th surviving entry from the end is
    // the same entry on both sides, so those slots are identical.
    let mut old_end = old_len;
    let mut new_end = new_len;
    while old_end > start
        && new_end > start
        && dropped.binary_search(&(old_end - 1)).is_err()
        && inserted.binary_search(&(new_end - 1)).is_err()
    {
        old_end -= 1;
        new_end -= 1;
    }

    Some(Delta::new(start, old_end - start, new_end - start))
}

/// Window for an in-place permutation, keyed by per-slot identity.
///
/// `old` and `new` carry one identity key per slot (the engines use the
/// entry's source position, which is unique within a backing array).
/// Returns `None` when nothing moved.
pub(crate) fn permuted_window<K: PartialEq>(old: &[K], new: &[K]) -> Option<Delta> {
    debug_assert_eq!(
        old.len(),
        new.len(),
        "a permutation must preserve cardinality"
    );
    let len = old.len();

    let mut start = 0;
    while start < len && old[start] == new[start] {
        start += 1;
    }
    if start == len {
        return None;
    }

    let mut end = len;
    while end > start && old[end - 1] == new[end - 1] {
        end -= 1;
    }

    Some(Delta::replacement(start, end - start))
}

#[cfg(test)]
mod tests {
    use super::{edit_window, permuted_window};
    use windrow_list_model::Delta;

    #[test]
    fn noop_edit_emits_nothing() {
        assert_eq!(edit_window(5, 5, &[], &[]), None);
    }

    #[test]
    fn single_drop_is_a_one_slot_window() {
        // Old [a b c d], drop index 1 -> [a c d].
        assert_eq!(edit_window(4, 3, &[1], &[]), Some(Delta::removal(1, 1)));
    }

    #[test]
    fn single_insert_is_a_one_slot_window() {
        // Old [a b c], insert at new index 2 -> [a b x c].
        assert_eq!(edit_window(3, 4, &[], &[2]), Some(Delta::insertion(2, 1)));
    }

    #[test]
    fn replacement_in_place_spans_both_sides() {
        // Drop old index 2, insert new index 2: [.. a X b ..] -> [.. a Y b ..].
        assert_eq!(edit_window(5, 5, &[2], &[2]), Some(Delta::replacement(2, 1)));
    }

    #[test]
    fn scattered_changes_span_their_hull() {
        // Drops at old 1 and 4 (len 6 -> 4), nothing inserted.
        assert_eq!(edit_window(6, 4, &[1, 4], &[]), Some(Delta::new(1, 4, 2)));
    }

    #[test]
    fn drop_at_tail_keeps_prefix_untouched() {
        assert_eq!(edit_window(4, 3, &[3], &[]), Some(Delta::removal(3, 1)));
    }

    #[test]
    fn unmoved_permutation_is_silent() {
        assert_eq!(permuted_window(&[1, 2, 3], &[1, 2, 3]), None);
    }

    #[test]
    fn permutation_window_trims_prefix_and_suffix() {
        assert_eq!(
            permuted_window(&[0, 1, 2, 3, 4], &[0, 3, 1, 2, 4]),
            Some(Delta::replacement(1, 3))
        );
    }

    #[test]
    fn full_reversal_spans_everything() {
        assert_eq!(
            permuted_window(&[0, 1, 2], &[2, 1, 0]),
            Some(Delta::replacement(0, 3))
        );
    }
}
