/// Every unordered index pair (i, j) with i < j, in lexicographic order
pub fn all_pairs(count: usize) -> Vec<(usize, usize)> {
    (0..count)
        .flat_map(|i| ((i + 1)..count).map(move |j| (i, j)))
        .collect()
}

/// Adjacent index pairs of a cycle: (0, 1), (1, 2), ..., (n-1, 0)
///
/// Two devices form a single segment; fewer than two form none.
pub fn ring_segments(count: usize) -> Vec<(usize, usize)> {
    match count {
        0 | 1 => Vec::new(),
        2 => vec![(0, 1)],
        n => (0..n).map(|i| (i, (i + 1) % n)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pairs() {
        assert_eq!(all_pairs(3), vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(all_pairs(5).len(), 10);
        assert!(all_pairs(1).is_empty());
    }

    #[test]
    fn test_ring_segments() {
        assert_eq!(ring_segments(4), vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert_eq!(ring_segments(2), vec![(0, 1)]);
        assert!(ring_segments(1).is_empty());
    }
}
