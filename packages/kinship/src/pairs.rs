//! Canonical index enumeration
//!
//! Every builder and mapper visits node pairs in the same fixed order:
//!
//! ```text
//! (0,1) (0,2) ... (0,n-1)
//!       (1,2) ... (1,n-1)
//!             ...
//!                 (n-2,n-1)
//! ```
//!
//! The clique finder walks k-subsets of `0..n` in lexicographic order:
//!
//! ```text
//! n = 5, k = 3
//! 0 1 2 -> 0 1 3 -> 0 1 4 -> 0 2 3 -> 0 2 4 -> 0 3 4 -> 1 2 3 -> ... -> 2 3 4
//! ```

/// Number of unordered pairs over `n` nodes
pub fn pair_count(n: usize) -> usize {
    if n < 2 {
        0
    } else {
        n * (n - 1) / 2
    }
}

/// Iterator over unordered index pairs `(i, j)`, `i < j`, outer `i`
/// ascending, inner `j` ascending
#[derive(Debug, Clone)]
pub struct PairEnumerator {
    n: usize,
    i: usize,
    j: usize,
}

impl PairEnumerator {
    pub fn new(n: usize) -> Self {
        Self { n, i: 0, j: 1 }
    }
}

impl Iterator for PairEnumerator {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.j >= self.n {
            return None;
        }

        let pair = (self.i, self.j);
        self.j += 1;
        if self.j == self.n {
            self.i += 1;
            self.j = self.i + 1;
        }
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.j >= self.n {
            0
        } else {
            // rest of row i, then every full row below it
            (self.n - self.j) + pair_count(self.n - self.i - 1)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PairEnumerator {}

/// Lexicographic k-combinations of `0..n`.
///
/// Visits all `C(n, k)` combinations, first (`0..k`) and last (`n-k..n`)
/// included. Yields borrowed slices, so it is advanced with
/// [`Combinations::advance`] instead of `Iterator`.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }

    /// Move to the next combination, returning it
    pub fn advance(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.indices);
        }

        let k = self.indices.len();
        // rightmost position that has not reached its maximum (n - k + i)
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.indices[i] < self.n - k + i {
                break;
            }
        }

        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(&self.indices)
    }
}
