use crate::error::{SelpgError, SelpgResult};

/// Largest accepted page number or page length, (1 << 32) - 1.
pub const MAX_PAGE: i64 = (1 << 32) - 1;

/// An inclusive, 1-based range of pages: `1 <= start <= end <= MAX_PAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: u64,
    end: u64,
}

impl PageRange {
    /// Validate raw option values. The start page is checked first, so a
    /// bad start is reported even when the end page is also bad.
    pub fn new(start: i64, end: i64) -> SelpgResult<Self> {
        if !(1..=MAX_PAGE).contains(&start) {
            return Err(SelpgError::InvalidStartPage(start));
        }
        if !(1..=MAX_PAGE).contains(&end) || end < start {
            return Err(SelpgError::InvalidEndPage(end));
        }

        Ok(PageRange {
            start: start as u64,
            end: end as u64,
        })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn contains(&self, page: u64) -> bool {
        (self.start..=self.end).contains(&page)
    }
}

/// Validate a lines-per-page value against the same bound as page numbers.
pub fn parse_page_len(len: i64) -> SelpgResult<u64> {
    if (1..=MAX_PAGE).contains(&len) {
        Ok(len as u64)
    } else {
        Err(SelpgError::InvalidPageLen(len))
    }
}
