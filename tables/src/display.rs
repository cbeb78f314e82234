//! Diagnostic formatting of built tables.
//!
//! Nothing here is part of an artifact contract; it exists so a table can be
//! eyeballed from the command line.

use std::fmt;

use serde::Serialize;

/// Length and extrema of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    /// Number of entries.
    pub len: usize,
    /// Smallest entry (0 for an empty table).
    pub min: i64,
    /// Largest entry (0 for an empty table).
    pub max: i64,
}

impl TableSummary {
    /// Summarizes any table of integer entries.
    pub fn of<T: Copy + Into<i64>>(values: &[T]) -> Self {
        let mut iter = values.iter().map(|&v| v.into());
        let first = iter.next().unwrap_or(0);
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Self {
            len: values.len(),
            min,
            max,
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} entries, min {}, max {}", self.len, self.min, self.max)
    }
}

/// Formats `values` as a comma separated listing, `per_line` entries to a
/// line.
pub fn format_listing<T: fmt::Display>(values: &[T], per_line: usize) -> String {
    values
        .chunks(per_line.max(1))
        .map(|row| {
            row.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_signed_and_unsigned() {
        let s = TableSummary::of(&[3u32, 9, 1]);
        assert_eq!((s.len, s.min, s.max), (3, 1, 9));
        assert_eq!(s.to_string(), "3 entries, min 1, max 9");

        let g = TableSummary::of(&[-5i64, 7, 0]);
        assert_eq!((g.min, g.max), (-5, 7));

        let empty = TableSummary::of::<u32>(&[]);
        assert_eq!((empty.len, empty.min, empty.max), (0, 0, 0));
    }

    #[test]
    fn listing_wraps() {
        assert_eq!(format_listing(&[1, 2, 3, 4, 5], 2), "1, 2,\n3, 4,\n5");
        assert_eq!(format_listing::<u32>(&[], 8), "");
    }
}
