//! Source location tracking for diagnostics
//!
//! Every diagnostic the analyzer reports names a position inside a header
//! unit. Line and column are 1-based; `offset` is the character offset
//! from the start of the unit.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in a header unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub unit: String,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl SourceLocation {
    pub fn new(unit: &str, line: u32, column: u32, offset: u32) -> Self {
        Self {
            unit: unit.to_string(),
            line,
            column,
            offset,
        }
    }

    /// The first character of a unit.
    pub fn start_of(unit: &str) -> Self {
        Self::new(unit, 1, 1, 0)
    }

    /// Location of a definition seeded into the analyzer itself rather
    /// than read from any unit (builtin types).
    pub fn predefined() -> Self {
        Self::new("<builtin>", 0, 0, 0)
    }

    /// Create a dummy location for testing
    pub fn dummy() -> Self {
        Self::new("<unknown>", 0, 0, 0)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.unit, self.line, self.column)
    }
}

/// A span in a header unit (from start to end location).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// Create a span from a single location
    pub fn from_location(location: SourceLocation) -> Self {
        Self {
            end: location.clone(),
            start: location,
        }
    }

    /// Create a dummy span for testing
    pub fn dummy() -> Self {
        Self::from_location(SourceLocation::dummy())
    }

    /// Check if this span is in the same unit as another
    pub fn same_unit(&self, other: &SourceSpan) -> bool {
        self.start.unit == other.start.unit
    }

    /// Extend this span to include another span
    pub fn extend(&self, other: &SourceSpan) -> SourceSpan {
        if !self.same_unit(other) {
            return self.clone();
        }

        let start = if self.start.offset <= other.start.offset {
            self.start.clone()
        } else {
            other.start.clone()
        };

        let end = if self.end.offset >= other.end.offset {
            self.end.clone()
        } else {
            other.end.clone()
        };

        SourceSpan::new(start, end)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.unit != self.end.unit {
            write!(f, "{} to {}", self.start, self.end)
        } else if self.start.line == self.end.line {
            if self.start.column == self.end.column {
                write!(f, "{}:{}", self.start.unit, self.start.line)
            } else {
                write!(
                    f,
                    "{}:{}:{}-{}",
                    self.start.unit, self.start.line, self.start.column, self.end.column
                )
            }
        } else {
            write!(
                f,
                "{}:{}:{}-{}:{}",
                self.start.unit, self.start.line, self.start.column, self.end.line, self.end.column
            )
        }
    }
}
