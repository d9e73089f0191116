//! Text diffs between document revisions

use similar::{ChangeTag, TextDiff};

/// Line counts of a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffStats {
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffStats {
    /// Count inserted and deleted lines between two texts
    pub fn compute(old: &str, new: &str) -> Self {
        let mut stats = Self::default();
        for change in TextDiff::from_lines(old, new).iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => stats.insertions += 1,
                ChangeTag::Delete => stats.deletions += 1,
                ChangeTag::Equal => {}
            }
        }
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.insertions == 0 && self.deletions == 0
    }
}

/// Unified diff of `old` against `new`, empty when they are equal.
pub fn unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> String {
    if old == new {
        return String::new();
    }
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(old_label, new_label)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_have_no_diff() {
        assert_eq!(unified_diff("a\n", "a\n", "a", "b"), "");
        assert!(DiffStats::compute("a\n", "a\n").is_empty());
    }

    #[test]
    fn test_unified_diff_marks_changes() {
        let diff = unified_diff("a: 1\nb: 2\n", "a: 1\nb: 3\n", "old", "new");
        assert!(diff.contains("--- old"));
        assert!(diff.contains("+++ new"));
        assert!(diff.contains("-b: 2"));
        assert!(diff.contains("+b: 3"));
    }

    #[test]
    fn test_stats_count_lines() {
        let stats = DiffStats::compute("a\nb\n", "a\nc\nd\n");
        assert_eq!(stats.insertions, 2);
        assert_eq!(stats.deletions, 1);
    }
}
