mod cli;
mod config;
mod error;
mod filter;
mod input;
mod page_range;
mod sink;

use anyhow::Result;
use error::SelpgError;
use input::ChunkReader;
use sink::Sink;
use std::env;
use std::ffi::OsString;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<OsString> = env::args_os().collect();
    let progname = args
        .first()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "selpg".to_string());

    if let Err(err) = run(&progname, &args) {
        eprintln!("{}: {:#}", progname, err);
        let code = match err.downcast_ref::<SelpgError>() {
            Some(err) => {
                if err.is_usage() {
                    eprintln!("\nUsage: {}", cli::usage(&progname));
                }
                err.exit_code()
            }
            None => 1,
        };
        process::exit(code);
    }
}

fn run(progname: &str, args: &[OsString]) -> Result<()> {
    let config = cli::parse_args(progname, args)?.into_config()?;

    let mut reader = ChunkReader::open(config.in_filename.as_deref())?;
    let mut sink = Sink::open(&config)?;

    let summary = filter::select_pages(&mut reader, &mut sink, config.range, config.page_type)?;
    sink.finish()?;

    if let Some(warning) = summary.warning(&config.range) {
        eprintln!("{}: {}", progname, warning);
    }

    Ok(())
}
