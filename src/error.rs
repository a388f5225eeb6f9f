use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelpgError {
    #[error("not enough arguments")]
    NotEnoughArgs,

    #[error("1st arg should be -s start_page")]
    StartNotFirst,

    #[error("2nd arg should be -e end_page")]
    EndNotSecond,

    #[error("invalid start page {0}")]
    InvalidStartPage(i64),

    #[error("invalid end page {0}")]
    InvalidEndPage(i64),

    #[error("invalid page length {0}")]
    InvalidPageLen(i64),

    /// A numeric option whose value clap could not parse at all.
    #[error("{0}")]
    BadNumber(String),

    /// Any other misuse reported by the option parser.
    #[error("{0}")]
    BadUsage(String),

    #[error("input file \"{}\" does not exist", .0.display())]
    InputMissing(PathBuf),

    #[error("could not open input file \"{}\"", .path.display())]
    InputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read input")]
    InputRead(#[source] io::Error),

    #[error("could not open file {dest}")]
    DestOpen {
        dest: String,
        #[source]
        source: io::Error,
    },

    #[error("could not open pipe to {program} for {dest}")]
    Spawn {
        program: String,
        dest: String,
        #[source]
        source: io::Error,
    },

    #[error("could not write output")]
    Write(#[source] io::Error),
}

impl SelpgError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SelpgError::NotEnoughArgs | SelpgError::BadUsage(_) => 1,
            SelpgError::StartNotFirst | SelpgError::EndNotSecond => 2,
            SelpgError::InvalidStartPage(_)
            | SelpgError::InvalidEndPage(_)
            | SelpgError::InvalidPageLen(_)
            | SelpgError::BadNumber(_) => 3,
            SelpgError::InputMissing(_) => 4,
            SelpgError::InputOpen { .. } | SelpgError::InputRead(_) => 5,
            SelpgError::DestOpen { .. } | SelpgError::Spawn { .. } => 6,
            SelpgError::Write(_) => 7,
        }
    }

    /// Argument errors are followed by the usage line on stderr.
    pub fn is_usage(&self) -> bool {
        self.exit_code() <= 3
    }
}

pub type SelpgResult<T> = Result<T, SelpgError>;
