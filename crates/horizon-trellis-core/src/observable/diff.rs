//! Order-preserving diff between two snapshots of a sequence.
//!
//! The engine works in three passes:
//!
//! 1. The common prefix and suffix are trimmed; they never change.
//! 2. Within the remaining window, the longest common subsequence is kept in
//!    place. Those elements kept their relative order and are not reported.
//! 3. Every other old element is matched against the first unused new
//!    position holding an equal element, scanning in index order. A match is a
//!    move; no match is a removal. New positions left unmatched are additions.
//!
//! With duplicate values the first-available tie-break in step 3 can pair
//! equal elements differently than a caller might expect. The result always
//! replays exactly (see [`ListDelta::apply_to`]), but which of several equal
//! elements is reported as moved is a heuristic, not a contract.

use std::collections::BTreeSet;

use super::delta::ListDelta;

/// Windows larger than this many LCS cells skip the common-subsequence pass
/// and fall back to pure move/remove/add matching.
const MAX_LCS_CELLS: usize = 1 << 22;

/// Computes the delta that turns `old` into `new`.
pub fn diff<T: PartialEq + Clone>(old: &[T], new: &[T]) -> ListDelta<T> {
    let mut delta = ListDelta::new();

    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_window = &old[prefix..old.len() - suffix];
    let new_window = &new[prefix..new.len() - suffix];
    if old_window.is_empty() && new_window.is_empty() {
        return delta;
    }

    let (kept_old, kept_new) = common_subsequence(old_window, new_window);

    let mut unused: BTreeSet<usize> = (0..new_window.len())
        .filter(|index| !kept_new.contains(index))
        .collect();

    for (offset, element) in old_window.iter().enumerate() {
        if kept_old.contains(&offset) {
            continue;
        }

        let target = unused
            .iter()
            .copied()
            .find(|&candidate| new_window[candidate] == *element);

        match target {
            Some(candidate) => {
                unused.remove(&candidate);
                delta
                    .moved
                    .insert(prefix + candidate, (prefix + offset, element.clone()));
            }
            None => {
                delta.removed.insert(prefix + offset, element.clone());
            }
        }
    }

    for offset in unused {
        delta.added.insert(prefix + offset, new_window[offset].clone());
    }

    delta
}

/// Returns the offsets (in `a` and in `b`) of one longest common subsequence.
fn common_subsequence<T: PartialEq>(a: &[T], b: &[T]) -> (BTreeSet<usize>, BTreeSet<usize>) {
    let mut kept_a = BTreeSet::new();
    let mut kept_b = BTreeSet::new();

    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 || (n + 1).saturating_mul(m + 1) > MAX_LCS_CELLS {
        return (kept_a, kept_b);
    }

    // lengths[i * width + j] = LCS length of a[i..] and b[j..]
    let width = m + 1;
    let mut lengths = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i * width + j] = if a[i] == b[j] {
                lengths[(i + 1) * width + j + 1] + 1
            } else {
                lengths[(i + 1) * width + j].max(lengths[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            kept_a.insert(i);
            kept_b.insert(j);
            i += 1;
            j += 1;
        } else if lengths[(i + 1) * width + j] >= lengths[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    (kept_a, kept_b)
}
