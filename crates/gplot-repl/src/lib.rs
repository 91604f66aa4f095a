//! The `gplot` shell.
//!
//! Reads command lines from a terminal, a script file or `-e` arguments and
//! prints each reply. With `--json` every input line is a JSON-encoded
//! [`Message`] and every output line the dispatched message.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gplot_command::{GrammarError, Message};
use gplot_session::{ConfigError, Reply, Session, SessionConfig};
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// gplot - inspect and edit plot state from the command line
#[derive(Parser, Debug)]
#[command(name = "gplot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./gplot.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run the commands in FILE instead of reading standard input
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Exchange JSON-encoded messages instead of text
    #[arg(long)]
    pub json: bool,

    /// Run COMMAND before anything else; may be repeated
    #[arg(short = 'e', long = "exec", value_name = "COMMAND")]
    pub exec: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ReplError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("failed to read {path}: {source}")]
    Script {
        path: PathBuf,
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Route `tracing` output to stderr. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .try_init();
}

pub fn run(cli: Cli) -> Result<ExitCode, ReplError> {
    let config = SessionConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log.filter);
    info!(json = cli.json, script = ?cli.script, "starting shell");

    let mut shell = Shell::new(config)?;
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let startup = shell.config.shell.startup.clone();
    let mut failures = shell.run_lines(startup.iter().map(String::as_str), &mut out, &mut err)?;
    failures += shell.run_lines(cli.exec.iter().map(String::as_str), &mut out, &mut err)?;

    if !shell.session.is_finished() {
        if let Some(path) = &cli.script {
            let file = File::open(path).map_err(|source| ReplError::Script {
                path: path.clone(),
                source,
            })?;
            failures += shell.run_reader(BufReader::new(file), cli.json, &mut out, &mut err)?;
        } else if cli.exec.is_empty() {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal() && !cli.json;
            let prompt = interactive.then(|| shell.config.shell.prompt.clone());
            failures += shell.run_input(
                stdin.lock(),
                prompt.as_deref(),
                cli.json,
                &mut out,
                &mut err,
            )?;
        }
    }

    debug!(failures, "shell finished");
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// A session plus the settings that shape its output.
pub struct Shell {
    pub session: Session,
    pub config: SessionConfig,
}

impl Shell {
    pub fn new(config: SessionConfig) -> Result<Self, ReplError> {
        Ok(Self {
            session: Session::new()?,
            config,
        })
    }

    /// Execute text lines; returns how many failed.
    pub fn run_lines<'a>(
        &mut self,
        lines: impl IntoIterator<Item = &'a str>,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<usize> {
        let mut failures = 0;
        for line in lines {
            if self.session.is_finished() {
                break;
            }
            if !self.text_line(line, out, err)? {
                failures += 1;
            }
        }
        Ok(failures)
    }

    /// Execute every line of `input`, text or JSON.
    pub fn run_reader(
        &mut self,
        input: impl BufRead,
        json: bool,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<usize> {
        self.run_input(input, None, json, out, err)
    }

    fn run_input(
        &mut self,
        mut input: impl BufRead,
        prompt: Option<&str>,
        json: bool,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<usize> {
        let mut failures = 0;
        let mut buf = Vec::new();
        while !self.session.is_finished() {
            if let Some(prompt) = prompt {
                write!(out, "{prompt}")?;
                out.flush()?;
            }
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let ok = match std::str::from_utf8(&buf) {
                Ok(line) if json => self.json_line(line, out, err)?,
                Ok(line) => self.text_line(line, out, err)?,
                Err(e) => {
                    warn!(error = %e, "skipping undecodable input line");
                    writeln!(err, "error: line is not valid UTF-8")?;
                    false
                }
            };
            if !ok {
                failures += 1;
            }
        }
        Ok(failures)
    }

    /// Returns whether the line succeeded. Blank lines and `#` comments are
    /// skipped.
    fn text_line(
        &mut self,
        line: &str,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<bool> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(true);
        }
        if self.config.shell.echo {
            writeln!(out, "> {line}")?;
        }
        let reply = self.session.execute(line);
        print_reply(&reply, out, err)?;
        Ok(!reply.is_error())
    }

    fn json_line(
        &mut self,
        line: &str,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<bool> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }
        let message = match Message::from_json(line) {
            Ok(message) => message,
            Err(e) => {
                writeln!(err, "error: invalid message: {e}")?;
                return Ok(false);
            }
        };
        let done = self.session.execute_message(message);
        let encoded = done.to_json().map_err(io::Error::other)?;
        writeln!(out, "{encoded}")?;
        Ok(!done.is_error())
    }
}

fn print_reply(reply: &Reply, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
    for line in &reply.lines {
        writeln!(out, "{line}")?;
    }
    if let Some(message) = &reply.error {
        writeln!(err, "error: {message}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn shell() -> Shell {
        Shell::new(SessionConfig::default()).unwrap()
    }

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn cli_flags() {
        let cli = Cli::parse_from(["gplot", "--json", "-e", "plot x", "-e", "graphs"]);
        assert!(cli.json);
        assert_eq!(cli.exec, ["plot x", "graphs"]);
        assert!(cli.script.is_none());
    }

    #[test]
    fn text_lines_print_replies_and_errors() {
        let mut sh = shell();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let failures = sh
            .run_lines(["# comment", "fog = 50%", "get fog", "bogus"], &mut out, &mut err)
            .unwrap();
        assert_eq!(failures, 1);
        assert_eq!(text(out), "50%\n");
        assert_eq!(text(err), "error: unrecognized command: bogus\n");
    }

    #[test]
    fn echo_prefixes_commands() {
        let mut config = SessionConfig::default();
        config.shell.echo = true;
        let mut sh = Shell::new(config).unwrap();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        sh.run_lines(["eval 1+1"], &mut out, &mut err).unwrap();
        assert_eq!(text(out), "> eval 1+1\n2\n");
    }

    #[test]
    fn json_lines_round_trip() {
        let mut sh = shell();
        let input = Cursor::new(
            "{\"id\":\"assign\",\"args\":[{\"type\":\"str\",\"value\":\"grid\"},{\"type\":\"str\",\"value\":\"full\"}]}\n\
             {\"id\":\"get\",\"args\":[{\"type\":\"str\",\"value\":\"grid\"}]}\n\
             not json\n",
        );
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let failures = sh.run_reader(input, true, &mut out, &mut err).unwrap();
        assert_eq!(failures, 1);

        let out = text(out);
        let replies: Vec<Message> = out
            .lines()
            .map(|l| Message::from_json(l).unwrap())
            .collect();
        assert_eq!(replies.len(), 2);
        assert!(replies[0].args.is_empty());
        assert_eq!(replies[1].args[0].as_str(), Some("full"));
        assert!(text(err).starts_with("error: invalid message"));
    }

    #[test]
    fn quit_stops_reading() {
        let mut sh = shell();
        let input = Cursor::new("plot x\nquit\nplot x^2\n");
        let (mut out, mut err) = (Vec::new(), Vec::new());
        sh.run_reader(input, false, &mut out, &mut err).unwrap();
        assert_eq!(sh.session.workspace().graphs().len(), 1);
    }

    #[test]
    fn undecodable_line_is_reported_and_skipped() {
        let mut sh = shell();
        let input = Cursor::new(b"plot x\nget \xff\xfe\nplot x^2\n".to_vec());
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let failures = sh.run_reader(input, false, &mut out, &mut err).unwrap();
        assert_eq!(failures, 1);
        assert_eq!(sh.session.workspace().graphs().len(), 2);
        assert_eq!(text(out), "graph 1\ngraph 2\n");
        assert_eq!(text(err), "error: line is not valid UTF-8\n");
    }

    #[test]
    fn script_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "plot sin(x)\n1.width = 2\nget 1.width").unwrap();
        let reader = BufReader::new(File::open(file.path()).unwrap());
        let mut sh = shell();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let failures = sh.run_reader(reader, false, &mut out, &mut err).unwrap();
        assert_eq!(failures, 0);
        assert_eq!(text(out), "graph 1\n2\n");
    }
}
