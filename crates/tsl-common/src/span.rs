//! Node identities and byte ranges handed over by the host parser.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a syntax node, assigned by the host.
///
/// The type oracle answers `type_of_node` queries keyed by this id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Half-open byte range `[start, end)` into a source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: u32,
    pub end: u32,
}

impl SourceRange {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// Returns `true` if `other` lies entirely inside this range.
    #[inline]
    pub const fn contains(self, other: SourceRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl PartialOrd for SourceRange {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ranges order by start offset, then by end offset.
impl Ord for SourceRange {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_order_by_start_then_end() {
        let mut ranges = vec![
            SourceRange::new(10, 20),
            SourceRange::new(4, 9),
            SourceRange::new(10, 12),
        ];
        ranges.sort();
        assert_eq!(
            ranges,
            vec![
                SourceRange::new(4, 9),
                SourceRange::new(10, 12),
                SourceRange::new(10, 20),
            ]
        );
    }

    #[test]
    fn contains_and_len() {
        let outer = SourceRange::new(0, 10);
        assert!(outer.contains(SourceRange::new(2, 5)));
        assert!(!outer.contains(SourceRange::new(8, 12)));
        assert_eq!(outer.len(), 10);
        assert!(SourceRange::new(5, 5).is_empty());
    }
}
