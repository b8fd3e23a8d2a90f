//! Sort engine for the player statistics table.
use crate::{PlayerStatRecord, SortValue, StatKey};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: StatKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self { key: StatKey::Rating, direction: SortDirection::Desc }
    }
}

impl SortSpec {
    pub fn new(key: StatKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// Header click: the same key flips direction, a new key starts descending.
pub fn select_sort_key(current: SortSpec, clicked: StatKey) -> SortSpec {
    if current.key == clicked {
        SortSpec { key: clicked, direction: current.direction.flipped() }
    } else {
        SortSpec { key: clicked, direction: SortDirection::Desc }
    }
}

/// Compare two records under `spec`. Mixed or missing values compare equal.
pub fn compare_records(a: &PlayerStatRecord, b: &PlayerStatRecord, spec: SortSpec) -> Ordering {
    let ordering = match (a.sort_value(spec.key), b.sort_value(spec.key)) {
        (SortValue::Number(x), SortValue::Number(y)) => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (SortValue::Text(x), SortValue::Text(y)) => locale_cmp(x, y),
        _ => return Ordering::Equal,
    };
    match spec.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Accent- and case-insensitive ordering, so `"Émile"` files under `e` and
/// `"alpha"` sits next to `"Alpha"`. Ties break on accents, then on case
/// (lowercase first), so the order stays deterministic.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

/// Decomposed, mark-stripped, lowercased characters of `s`.
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase)
}

/// Return `records` reordered by `spec`; the input slice is left untouched.
/// Records that compare equal keep their input order.
pub fn apply_sort(records: &[PlayerStatRecord], spec: SortSpec) -> Vec<PlayerStatRecord> {
    stable_order(records.len(), |i, j| compare_records(&records[i], &records[j], spec))
        .into_iter()
        .map(|i| records[i].clone())
        .collect()
}

/// Bottom-up merge sort over indices.
///
/// The comparator is not a total order once values are missing or of mixed
/// type, and `slice::sort_by` may panic on inconsistent orderings. A merge
/// that only takes from the right run on a strict `Less` never panics and
/// keeps ties in input order.
fn stable_order<F>(len: usize, mut cmp: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut order: Vec<usize> = (0..len).collect();
    let mut scratch: Vec<usize> = Vec::with_capacity(len);
    let mut width = 1;

    while width < len {
        scratch.clear();
        for start in (0..len).step_by(2 * width) {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut i, mut j) = (start, mid);
            while i < mid && j < end {
                if cmp(order[j], order[i]) == Ordering::Less {
                    scratch.push(order[j]);
                    j += 1;
                } else {
                    scratch.push(order[i]);
                    i += 1;
                }
            }
            scratch.extend_from_slice(&order[i..mid]);
            scratch.extend_from_slice(&order[j..end]);
        }
        std::mem::swap(&mut order, &mut scratch);
        width *= 2;
    }

    order
}
