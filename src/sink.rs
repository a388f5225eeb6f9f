use crate::config::Config;
use crate::error::{SelpgError, SelpgResult};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Stdout, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

/// Where selected pages go.
pub enum Sink {
    Stdout(BufWriter<Stdout>),
    Spooler(Spooler),
}

impl Sink {
    pub fn open(config: &Config) -> SelpgResult<Self> {
        match &config.print_dest {
            None => Ok(Sink::Stdout(BufWriter::new(io::stdout()))),
            Some(dest) => Ok(Sink::Spooler(Spooler::spawn(&config.spooler, dest)?)),
        }
    }

    /// Flush everything, close the pipe and wait for the spooler, if any.
    pub fn finish(self) -> SelpgResult<()> {
        match self {
            Sink::Stdout(mut out) => out.flush().map_err(SelpgError::Write),
            Sink::Spooler(mut spooler) => {
                let status = spooler.close().map_err(SelpgError::Write)?;
                if let Some(status) = status {
                    if status.success() {
                        log::debug!("{} exited with {}", spooler.program, status);
                    } else {
                        log::warn!("{} exited with {}", spooler.program, status);
                    }
                }
                Ok(())
            }
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout(out) => out.write(buf),
            Sink::Spooler(spooler) => spooler.stdin()?.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout(out) => out.flush(),
            Sink::Spooler(spooler) => spooler.stdin()?.flush(),
        }
    }
}

/// A child process whose stdout is the destination file and whose stdin
/// receives the selected pages.
pub struct Spooler {
    program: String,
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    reaped: bool,
}

impl Spooler {
    pub fn spawn(program: &str, dest: &str) -> SelpgResult<Self> {
        // Created files get mode 0o666, less the umask.
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(dest)
            .map_err(|source| SelpgError::DestOpen {
                dest: dest.to_string(),
                source,
            })?;

        let spawn_err = |source| SelpgError::Spawn {
            program: program.to_string(),
            dest: dest.to_string(),
            source,
        };

        let mut child = Command::new(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::from(file))
            .spawn()
            .map_err(spawn_err)?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(spawn_err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "child has no stdin",
            )));
        };

        log::debug!("spawned {} (pid {}) writing to {}", program, child.id(), dest);

        Ok(Spooler {
            program: program.to_string(),
            child,
            stdin: Some(BufWriter::new(stdin)),
            reaped: false,
        })
    }

    fn stdin(&mut self) -> io::Result<&mut BufWriter<ChildStdin>> {
        self.stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "spooler pipe closed"))
    }

    /// Close our end of the pipe so the child sees end of input, then wait.
    /// The child is reaped even when the final flush fails.
    fn close(&mut self) -> io::Result<Option<ExitStatus>> {
        let flushed = match self.stdin.take() {
            Some(mut stdin) => stdin.flush(),
            None => Ok(()),
        };

        let status = if self.reaped {
            None
        } else {
            self.reaped = true;
            Some(self.child.wait()?)
        };

        flushed.map(|_| status)
    }
}

impl Drop for Spooler {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::debug!("closing {} on drop: {}", self.program, err);
        }
    }
}
