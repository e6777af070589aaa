//! Longest Common Subsequence
//!
//! Standard O(n·m) dynamic-programming table, backtracked to an
//! explicit matching rather than just a length: the reconciler needs
//! to know *which* occurrences survive, not how many.

/// Compute the LCS of `left` and `right` as matched index pairs,
/// ascending in both components.
pub fn lcs_matches<T: PartialEq>(left: &[T], right: &[T]) -> Vec<(usize, usize)> {
    let n = left.len();
    let m = right.len();

    // table[i][j] = LCS length of left[i..] and right[j..]
    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if left[i] == right[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut matches = Vec::with_capacity(table[0][0]);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if left[i] == right[j] {
            matches.push((i, j));
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }

    matches
}
