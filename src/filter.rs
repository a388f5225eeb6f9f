use crate::config::PageType;
use crate::error::{SelpgError, SelpgResult};
use crate::input::ChunkReader;
use crate::page_range::PageRange;
use std::fmt;
use std::io::{BufRead, Write};

/// Page counts observed while filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    /// Pages holding at least one complete chunk.
    pub pages: u64,
    /// Pages that are complete. Only the last page in lines mode can be
    /// short, so this is `pages` or `pages - 1`.
    pub full_pages: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeWarning {
    StartPastEnd { start_page: u64, total: u64 },
    EndPastEnd { end_page: u64, total: u64 },
}

impl fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeWarning::StartPastEnd { start_page, total } => write!(
                f,
                "start_page ({}) greater than total pages ({}), no output written",
                start_page, total
            ),
            RangeWarning::EndPastEnd { end_page, total } => write!(
                f,
                "end_page ({}) greater than total pages ({}), less output than expected",
                end_page, total
            ),
        }
    }
}

impl FilterSummary {
    pub fn warning(&self, range: &PageRange) -> Option<RangeWarning> {
        if self.pages < range.start() {
            Some(RangeWarning::StartPastEnd {
                start_page: range.start(),
                total: self.pages,
            })
        } else if self.full_pages < range.end() {
            Some(RangeWarning::EndPastEnd {
                end_page: range.end(),
                total: self.full_pages,
            })
        } else {
            None
        }
    }
}

/// Copy the pages in `range` from `reader` to `out`, byte for byte.
pub fn select_pages<R: BufRead, W: Write>(
    reader: &mut ChunkReader<R>,
    out: &mut W,
    range: PageRange,
    page_type: PageType,
) -> SelpgResult<FilterSummary> {
    let delim = page_type.delimiter();
    let summary = match page_type {
        PageType::Lines { page_len } => select_lines(reader, out, delim, range, page_len)?,
        PageType::FormFeed => select_form_feeds(reader, out, delim, range)?,
    };
    log::debug!("filtered {:?}", summary);
    Ok(summary)
}

fn select_lines<R: BufRead, W: Write>(
    reader: &mut ChunkReader<R>,
    out: &mut W,
    delim: u8,
    range: PageRange,
    page_len: u64,
) -> SelpgResult<FilterSummary> {
    let mut page_ctr: u64 = 1;
    let mut line_ctr: u64 = 0;

    while let Some(line) = reader.next_chunk(delim).map_err(SelpgError::InputRead)? {
        line_ctr += 1;
        if line_ctr > page_len {
            page_ctr += 1;
            line_ctr = 1;
            log::trace!("page {} begins", page_ctr);
        }
        if range.contains(page_ctr) {
            out.write_all(line).map_err(SelpgError::Write)?;
        }
    }

    if line_ctr == 0 {
        return Ok(FilterSummary {
            pages: 0,
            full_pages: 0,
        });
    }

    let full_pages = if line_ctr == page_len {
        page_ctr
    } else {
        page_ctr - 1
    };
    Ok(FilterSummary {
        pages: page_ctr,
        full_pages,
    })
}

fn select_form_feeds<R: BufRead, W: Write>(
    reader: &mut ChunkReader<R>,
    out: &mut W,
    delim: u8,
    range: PageRange,
) -> SelpgResult<FilterSummary> {
    let mut page_ctr: u64 = 1;

    while let Some(page) = reader.next_chunk(delim).map_err(SelpgError::InputRead)? {
        if range.contains(page_ctr) {
            out.write_all(page).map_err(SelpgError::Write)?;
        }
        page_ctr += 1;
    }

    Ok(FilterSummary {
        pages: page_ctr - 1,
        full_pages: page_ctr - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    fn select(input: &[u8], start: i64, end: i64, page_type: PageType) -> (Vec<u8>, FilterSummary) {
        let mut reader = ChunkReader::new(Cursor::new(input.to_vec()));
        let mut out = Vec::new();
        let range = PageRange::new(start, end).unwrap();
        let summary = select_pages(&mut reader, &mut out, range, page_type).unwrap();
        (out, summary)
    }

    fn numbered_lines(range: std::ops::RangeInclusive<u32>) -> Vec<u8> {
        range.map(|n| format!("L{}\n", n)).collect::<String>().into_bytes()
    }

    const TEN: PageType = PageType::Lines { page_len: 10 };

    #[test]
    fn test_second_page_of_lines() {
        let (out, summary) = select(&numbered_lines(1..=30), 2, 2, TEN);
        assert_eq!(out, numbered_lines(11..=20));
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.full_pages, 3);
    }

    #[test]
    fn test_first_line_of_next_page_not_emitted() {
        let (out, _) = select(&numbered_lines(1..=11), 1, 1, TEN);
        assert_eq!(out, numbered_lines(1..=10));
    }

    #[test]
    fn test_form_feed_pages() {
        let (out, summary) = select(b"A\x0CB\x0CC\x0CD\x0C", 2, 3, PageType::FormFeed);
        assert_eq!(out, b"B\x0CC\x0C");
        assert_eq!(summary.pages, 4);
    }

    #[test]
    fn test_form_feed_ignores_page_len() {
        let input = b"one\ntwo\n\x0Cthree\n\x0Cfour\x0C";
        let config_a = crate::config::ConfigBuilder::new(2, 3)
            .page_len(Some(1))
            .form_feed(true)
            .build()
            .unwrap();
        let config_b = crate::config::ConfigBuilder::new(2, 3)
            .page_len(Some(1_000_000))
            .form_feed(true)
            .build()
            .unwrap();
        let (out_a, _) = select(input, 2, 3, config_a.page_type);
        let (out_b, _) = select(input, 2, 3, config_b.page_type);
        assert_eq!(out_a, b"three\n\x0Cfour\x0C");
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn test_start_past_last_page() {
        let range = PageRange::new(3, 4).unwrap();
        let (out, summary) = select(&numbered_lines(1..=5), 3, 4, TEN);
        assert!(out.is_empty());
        assert_eq!(summary.pages, 1);
        assert_eq!(
            summary.warning(&range).unwrap().to_string(),
            "start_page (3) greater than total pages (1), no output written"
        );
    }

    #[test]
    fn test_end_past_last_page() {
        let range = PageRange::new(1, 3).unwrap();
        let (out, summary) = select(&numbered_lines(1..=25), 1, 3, TEN);
        assert_eq!(out, numbered_lines(1..=25));
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.full_pages, 2);
        assert_eq!(
            summary.warning(&range),
            Some(RangeWarning::EndPastEnd {
                end_page: 3,
                total: 2
            })
        );
    }

    #[test]
    fn test_no_warning_when_range_fits() {
        let range = PageRange::new(1, 3).unwrap();
        let (_, summary) = select(&numbered_lines(1..=30), 1, 3, TEN);
        assert_eq!(summary.warning(&range), None);
    }

    #[test]
    fn test_empty_input() {
        let range = PageRange::new(1, 1).unwrap();
        let (out, summary) = select(b"", 1, 1, TEN);
        assert!(out.is_empty());
        assert_eq!(summary.pages, 0);
        assert!(matches!(
            summary.warning(&range),
            Some(RangeWarning::StartPastEnd { total: 0, .. })
        ));
    }

    #[test]
    fn test_trailing_partial_line_dropped() {
        let (out, summary) = select(b"a\nb\nno newline", 1, 5, TEN);
        assert_eq!(out, b"a\nb\n");
        assert_eq!(summary.pages, 1);
        assert_eq!(summary.full_pages, 0);
    }

    #[test]
    fn test_trailing_partial_page_dropped() {
        let (out, summary) = select(b"A\x0CB\x0Cunterminated", 1, 10, PageType::FormFeed);
        assert_eq!(out, b"A\x0CB\x0C");
        assert_eq!(summary.pages, 2);
    }

    #[test]
    fn test_whole_input_round_trip() {
        let input = numbered_lines(1..=23);
        let (out, _) = select(&input, 1, 100, PageType::Lines { page_len: 4 });
        assert_eq!(out, input);
    }

    #[test]
    fn test_single_pages_concatenate_to_whole() {
        let input = numbered_lines(1..=17);
        let page_type = PageType::Lines { page_len: 5 };
        let (whole, summary) = select(&input, 1, 4, page_type);

        let mut pieces = Vec::new();
        for page in 1..=summary.pages as i64 {
            pieces.extend(select(&input, page, page, page_type).0);
        }
        assert_eq!(pieces, whole);
    }

    #[test]
    fn test_bytes_pass_through_unchanged() {
        let input = "ünï\r\n\x00\x7f\n".as_bytes();
        let (out, _) = select(input, 1, 1, TEN);
        assert_eq!(out, input);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure() {
        let mut reader = ChunkReader::new(Cursor::new(b"x\n".to_vec()));
        let range = PageRange::new(1, 1).unwrap();
        let err = select_pages(&mut reader, &mut FailingWriter, range, TEN).unwrap_err();
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_unselected_pages_never_written() {
        let mut reader = ChunkReader::new(Cursor::new(numbered_lines(1..=10)));
        let range = PageRange::new(2, 2).unwrap();
        let summary = select_pages(&mut reader, &mut FailingWriter, range, TEN).unwrap();
        assert_eq!(summary.pages, 1);
    }
}
