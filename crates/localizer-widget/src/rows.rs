#![forbid(unsafe_code)]

//! Auto-grow row bounds for text surfaces.

use std::fmt;

/// Number of visible lines in `text`: one plus the number of `\n` separators.
#[must_use]
pub fn line_count(text: &str) -> usize {
    1 + text.bytes().filter(|&b| b == b'\n').count()
}

/// Inclusive `[min, max]` bounds on a surface's visible row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBounds {
    min: u32,
    max: u32,
}

/// Row bounds rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRowBounds {
    pub rows: u32,
    pub max_rows: u32,
}

impl fmt::Display for InvalidRowBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows == 0 {
            write!(f, "rows must be at least 1")
        } else {
            write!(
                f,
                "maxRows ({}) must not be smaller than rows ({})",
                self.max_rows, self.rows
            )
        }
    }
}

impl std::error::Error for InvalidRowBounds {}

impl Default for RowBounds {
    fn default() -> Self {
        Self { min: 3, max: 3 }
    }
}

impl RowBounds {
    /// Create bounds; requires `1 <= rows <= max_rows`.
    pub const fn new(rows: u32, max_rows: u32) -> Result<Self, InvalidRowBounds> {
        if rows == 0 || max_rows < rows {
            return Err(InvalidRowBounds { rows, max_rows });
        }
        Ok(Self {
            min: rows,
            max: max_rows,
        })
    }

    #[inline]
    #[must_use]
    pub const fn min(self) -> u32 {
        self.min
    }

    #[inline]
    #[must_use]
    pub const fn max(self) -> u32 {
        self.max
    }

    /// Clamp a line count into the bounds.
    #[must_use]
    pub fn clamp(self, lines: usize) -> u32 {
        let lines = u32::try_from(lines).unwrap_or(u32::MAX);
        lines.clamp(self.min, self.max)
    }

    /// Row count a surface holding `text` should show.
    #[must_use]
    pub fn rows_for(self, text: &str) -> u32 {
        self.clamp(line_count(text))
    }
}
