//! Register range classification.
//!
//! A [`RangeTable`] lists the system register offsets that take part in the
//! firmware update handshake. Tables are static per variant and small, so a
//! linear scan is all the lookup needs.

/// Inclusive register range `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegRange {
    pub start: u32,
    pub end: u32,
}

impl RegRange {
    /// Creates a range covering `start..=end`.
    pub const fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "range start must not exceed end");
        Self { start, end }
    }

    /// Returns true if `offset` lies inside the range.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset <= self.end
    }
}

/// Returns true if `offset` falls inside any of `ranges`.
pub fn reg_in_ranges(offset: u32, ranges: &[RegRange]) -> bool {
    ranges.iter().any(|range| range.contains(offset))
}

/// Static set of handshake register ranges for one device variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeTable {
    ranges: &'static [RegRange],
}

impl RangeTable {
    pub const fn new(ranges: &'static [RegRange]) -> Self {
        Self { ranges }
    }

    /// Table that classifies no offset as handshake.
    pub const fn empty() -> Self {
        Self { ranges: &[] }
    }

    /// Returns true if `offset` is a handshake register.
    #[inline]
    pub fn is_handshake(&self, offset: u32) -> bool {
        reg_in_ranges(offset, self.ranges)
    }

    pub fn ranges(&self) -> &'static [RegRange] {
        self.ranges
    }
}
