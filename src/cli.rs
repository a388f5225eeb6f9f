use crate::config::{Config, ConfigBuilder, DEFAULT_SPOOLER};
use crate::error::{SelpgError, SelpgResult};
use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "selpg")]
#[command(about = "Select a range of pages from text input")]
#[command(version, allow_negative_numbers = true)]
pub struct Cli {
    /// First page to print
    #[arg(short = 's', long = "start_page", value_name = "start_page")]
    pub start_page: i64,

    /// Last page to print
    #[arg(short = 'e', long = "end_page", value_name = "end_page")]
    pub end_page: i64,

    /// Lines per page [default: 72]
    #[arg(short = 'l', long = "page_len", value_name = "lines_per_page")]
    pub page_len: Option<i64>,

    /// Pages are delimited by form feeds instead of a line count
    #[arg(short = 'f', long = "form_feed")]
    pub form_feed: bool,

    /// Send the output to this destination through the spooler
    #[arg(short = 'd', long = "print_dest", value_name = "dest")]
    pub print_dest: Option<String>,

    /// Program that receives the output when -d is given
    #[arg(long, value_name = "CMD", default_value = DEFAULT_SPOOLER)]
    pub spooler: String,

    /// Input file (default: standard input)
    pub in_filename: Option<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> SelpgResult<Config> {
        ConfigBuilder::new(self.start_page, self.end_page)
            .page_len(self.page_len)
            .form_feed(self.form_feed)
            .in_filename(self.in_filename)
            .print_dest(self.print_dest)
            .spooler(self.spooler)
            .build()
    }
}

pub fn usage(progname: &str) -> String {
    format!(
        "{} -s start_page -e end_page [ -f | -l lines_per_page ] [ -d dest ] [ in_filename ]",
        progname
    )
}

/// Parse the full argument vector, program name included.
///
/// `-h` and `--version` print and exit through clap.
pub fn parse_args(progname: &str, args: &[OsString]) -> SelpgResult<Cli> {
    let wants_info = args
        .iter()
        .skip(1)
        .any(|a| matches!(a.to_str(), Some("-h" | "--help" | "-V" | "--version")));
    if !wants_info {
        check_order(args)?;
    }

    let command = Cli::command().override_usage(usage(progname));
    let matches = match command.try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err) => return Err(clap_error(err)),
    };
    Cli::from_arg_matches(&matches).map_err(clap_error)
}

fn clap_error(err: clap::Error) -> SelpgError {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        kind => {
            let rendered = err.render().to_string();
            let detail = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ")
                .to_string();
            if kind == ErrorKind::ValueValidation {
                SelpgError::BadNumber(detail)
            } else {
                SelpgError::BadUsage(detail)
            }
        }
    }
}

/// `-s` and its value must come first, then `-e` and its value.
fn check_order(args: &[OsString]) -> SelpgResult<()> {
    if args.len() < 3 {
        return Err(SelpgError::NotEnoughArgs);
    }

    let next = match option_width(&args[1], 's', "--start_page") {
        Some(width) => 1 + width,
        None => return Err(SelpgError::StartNotFirst),
    };

    let Some(second) = args.get(next) else {
        return Err(SelpgError::NotEnoughArgs);
    };
    match option_width(second, 'e', "--end_page") {
        Some(width) if next + width <= args.len() => Ok(()),
        Some(_) => Err(SelpgError::NotEnoughArgs),
        None => Err(SelpgError::EndNotSecond),
    }
}

/// Number of tokens an option occupies: 2 for `-s N`, 1 for `-sN`.
fn option_width(arg: &OsStr, short: char, long: &str) -> Option<usize> {
    let arg = arg.to_str()?;
    let short = format!("-{}", short);
    if arg == short || arg == long {
        Some(2)
    } else if arg.starts_with(&short) || arg.starts_with(&format!("{}=", long)) {
        Some(1)
    } else {
        None
    }
}
