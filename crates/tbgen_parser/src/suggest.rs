//! "Did you mean" suggestions for misspelled port directions.

use crate::ast::Direction;

/// Suggests the direction `word` was most likely meant to be.
///
/// A word that extends a direction (`outputt`, `inputs`) or abbreviates one to
/// at least three letters (`inp`) matches it; otherwise the closest direction
/// within an edit distance of two wins. Ties go to keyword order.
pub fn suggest_direction(word: &str) -> Option<Direction> {
    let lower = word.to_ascii_lowercase();
    if let Some(dir) = Direction::ALL.into_iter().find(|d| {
        let kw = d.as_str();
        lower.starts_with(kw) || (lower.len() >= 3 && kw.starts_with(&lower))
    }) {
        return Some(dir);
    }
    Direction::ALL
        .into_iter()
        .map(|d| (edit_distance(&lower, d.as_str()), d))
        .filter(|(dist, _)| *dist <= 2)
        .min_by_key(|(dist, _)| *dist)
        .map(|(_, d)| d)
}

/// Levenshtein distance over bytes.
fn edit_distance(a: &str, b: &str) -> usize {
    let b = b.as_bytes();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.bytes().enumerate() {
        let mut cur = vec![i + 1; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        prev = cur;
    }
    prev[b.len()]
}
