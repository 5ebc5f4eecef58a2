// Bounded subset enumeration and Cartesian iteration.
//
// Subsets come out in lexicographic index order, so truncating with
// `.take(n)` keeps the first `n` subsets that always include the earliest
// players, without materializing the rest.

/// Lazy iterator over all `k`-element subsets of `items`.
pub struct Combinations<'a, T> {
    items: &'a [T],
    indices: Vec<usize>,
    done: bool,
}

impl<'a, T> Combinations<'a, T> {
    pub fn new(items: &'a [T], k: usize) -> Self {
        Combinations {
            items,
            indices: (0..k).collect(),
            done: k > items.len(),
        }
    }

    /// Advance `indices` to the next subset. Returns false when exhausted.
    fn advance(&mut self) -> bool {
        let n = self.items.len();
        let k = self.indices.len();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if self.indices[i] < n - k + i {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl<'a, T> Iterator for Combinations<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let subset = self.indices.iter().map(|&i| &self.items[i]).collect();
        if !self.advance() {
            self.done = true;
        }
        Some(subset)
    }
}

/// At most `limit` subsets of size `k` drawn from `items`.
///
/// `k == 0` yields a single empty subset; `k > items.len()` yields none.
pub fn combinations<T>(items: &[T], k: usize, limit: usize) -> Vec<Vec<&T>> {
    Combinations::new(items, k).take(limit).collect()
}

/// Odometer over the Cartesian product of several option lists.
///
/// Yields one index per list, the last list varying fastest (the order a
/// stack of nested `for` loops would visit). An empty list empties the
/// whole product.
pub struct CartesianIndices {
    sizes: Vec<usize>,
    current: Vec<usize>,
    done: bool,
}

impl CartesianIndices {
    pub fn new(sizes: Vec<usize>) -> Self {
        let done = sizes.iter().any(|&s| s == 0);
        let current = vec![0; sizes.len()];
        CartesianIndices {
            sizes,
            current,
            done,
        }
    }
}

impl Iterator for CartesianIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.current.clone();

        let mut pos = self.sizes.len();
        loop {
            if pos == 0 {
                self.done = true;
                break;
            }
            pos -= 1;
            self.current[pos] += 1;
            if self.current[pos] < self.sizes[pos] {
                break;
            }
            self.current[pos] = 0;
        }

        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choose_two_of_four_in_lexicographic_order() {
        let items = ['a', 'b', 'c', 'd'];
        let subsets: Vec<String> = combinations(&items, 2, usize::MAX)
            .into_iter()
            .map(|s| s.into_iter().collect())
            .collect();
        assert_eq!(subsets, vec!["ab", "ac", "ad", "bc", "bd", "cd"]);
    }

    #[test]
    fn choose_zero_is_one_empty_subset() {
        let items = [1, 2, 3];
        let subsets = combinations(&items, 0, usize::MAX);
        assert_eq!(subsets.len(), 1);
        assert!(subsets[0].is_empty());
    }

    #[test]
    fn choose_more_than_available_is_empty() {
        let items = [1, 2];
        assert!(combinations(&items, 3, usize::MAX).is_empty());
        let none: [u8; 0] = [];
        assert!(combinations(&none, 1, usize::MAX).is_empty());
    }

    #[test]
    fn choose_all_is_single_subset() {
        let items = [1, 2, 3];
        let subsets = combinations(&items, 3, usize::MAX);
        assert_eq!(subsets, vec![vec![&1, &2, &3]]);
    }

    #[test]
    fn limit_truncates_lazily() {
        let items: Vec<u32> = (0..20).collect();
        // C(20, 10) is 184756; only five are built.
        let subsets = combinations(&items, 10, 5);
        assert_eq!(subsets.len(), 5);
        assert_eq!(*subsets[4][9], 13);
    }

    #[test]
    fn cartesian_visits_last_axis_fastest() {
        let visited: Vec<Vec<usize>> = CartesianIndices::new(vec![2, 1, 3]).collect();
        assert_eq!(
            visited,
            vec![
                vec![0, 0, 0],
                vec![0, 0, 1],
                vec![0, 0, 2],
                vec![1, 0, 0],
                vec![1, 0, 1],
                vec![1, 0, 2],
            ]
        );
    }

    #[test]
    fn cartesian_with_empty_axis_is_empty() {
        assert_eq!(CartesianIndices::new(vec![3, 0, 2]).count(), 0);
    }

    #[test]
    fn cartesian_of_no_axes_is_single_empty_choice() {
        let visited: Vec<Vec<usize>> = CartesianIndices::new(vec![]).collect();
        assert_eq!(visited, vec![Vec::<usize>::new()]);
    }
}
