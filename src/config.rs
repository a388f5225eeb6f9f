use crate::error::{SelpgError, SelpgResult};
use crate::page_range::{parse_page_len, PageRange};
use std::io;
use std::path::PathBuf;

pub const DEFAULT_PAGE_LEN: i64 = 72;
pub const DEFAULT_SPOOLER: &str = "cat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    /// Pages of exactly `page_len` newline-terminated lines.
    Lines { page_len: u64 },
    /// Pages terminated by a form-feed byte.
    FormFeed,
}

impl PageType {
    pub fn delimiter(&self) -> u8 {
        match self {
            PageType::Lines { .. } => b'\n',
            PageType::FormFeed => b'\x0C',
        }
    }
}

/// Validated run configuration. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub range: PageRange,
    pub page_type: PageType,
    pub in_filename: Option<PathBuf>,
    pub print_dest: Option<String>,
    pub spooler: String,
}

pub struct ConfigBuilder {
    start_page: i64,
    end_page: i64,
    page_len: Option<i64>,
    form_feed: bool,
    in_filename: Option<PathBuf>,
    print_dest: Option<String>,
    spooler: String,
}

impl ConfigBuilder {
    pub fn new(start_page: i64, end_page: i64) -> Self {
        ConfigBuilder {
            start_page,
            end_page,
            page_len: None,
            form_feed: false,
            in_filename: None,
            print_dest: None,
            spooler: DEFAULT_SPOOLER.to_string(),
        }
    }

    pub fn page_len(mut self, page_len: Option<i64>) -> Self {
        self.page_len = page_len;
        self
    }

    pub fn form_feed(mut self, form_feed: bool) -> Self {
        self.form_feed = form_feed;
        self
    }

    pub fn in_filename(mut self, path: Option<PathBuf>) -> Self {
        self.in_filename = path;
        self
    }

    pub fn print_dest(mut self, dest: Option<String>) -> Self {
        self.print_dest = dest;
        self
    }

    pub fn spooler(mut self, program: impl Into<String>) -> Self {
        self.spooler = program.into();
        self
    }

    /// Checks run in the order start page, end page, page length, input
    /// file, so the first failing rule decides the exit code.
    pub fn build(self) -> SelpgResult<Config> {
        let range = PageRange::new(self.start_page, self.end_page)?;
        let page_len = parse_page_len(self.page_len.unwrap_or(DEFAULT_PAGE_LEN))?;

        let page_type = if self.form_feed {
            if self.page_len.is_some() {
                log::warn!("-l {} ignored, pages are form-feed delimited", page_len);
            }
            PageType::FormFeed
        } else {
            PageType::Lines { page_len }
        };

        if let Some(path) = &self.in_filename {
            // Only a definite "not found" is fatal here; anything else
            // surfaces when the file is opened.
            if let Err(err) = std::fs::metadata(path) {
                if err.kind() == io::ErrorKind::NotFound {
                    return Err(SelpgError::InputMissing(path.clone()));
                }
            }
        }

        let config = Config {
            range,
            page_type,
            in_filename: self.in_filename,
            print_dest: self.print_dest,
            spooler: self.spooler,
        };
        log::debug!("validated {:?}", config);
        Ok(config)
    }
}
