use std::{
    ffi::OsString,
    fmt::Display,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use log::{debug, trace, warn};
use thiserror::Error;
use url::Url;

pub const DEFAULT_CLIENT: &str = "/usr/bin/svn";

const REDACTED: &str = "******";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Output is captured and discarded unless the command fails.
    Silent,
    /// Output is streamed as the client produces it.
    Normal,
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Could not start {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("{command} failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// An invocation of the Subversion command line client.
///
/// `Display` masks the value following `--password`, so a command can be
/// logged or embedded in an error as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvnCommand {
    program: PathBuf,
    args: Vec<OsString>,
    home: Option<PathBuf>,
}

impl SvnCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        SvnCommand {
            program: program.into(),
            args: vec!["--non-interactive".into()],
            home: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Home directory the client reads its `.subversion` directory from.
    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// `svn --non-interactive [--trust-server-cert] checkout <url> <destination>`
    pub fn checkout(
        client: &Path,
        home: &Path,
        url: &Url,
        destination: &Path,
        trust_server_cert: bool,
    ) -> Self {
        let mut command = SvnCommand::new(client).home(home);
        if trust_server_cert {
            command = command.arg("--trust-server-cert");
        }
        command
            .arg("checkout")
            .arg(url.as_str())
            .arg(destination)
    }

    /// `svn --non-interactive --username <user> --password <password> info <url>`
    pub fn info_probe(client: &Path, home: &Path, url: &Url, user: &str, password: &str) -> Self {
        SvnCommand::new(client)
            .home(home)
            .arg("--username")
            .arg(user)
            .arg("--password")
            .arg(password)
            .arg("info")
            .arg(url.as_str())
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn home_dir(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl Display for SvnCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        let mut hide_next = false;
        for arg in self.arg_strings() {
            if hide_next {
                write!(f, " {REDACTED}")?;
            } else {
                write!(f, " {arg}")?;
            }
            hide_next = arg == "--password";
        }
        Ok(())
    }
}

/// Runs client commands. Exit code interpretation belongs to the runner.
pub trait CommandRunner {
    fn run(&self, command: &SvnCommand, mode: Mode) -> Result<(), CommandError>;
}

/// Runs commands as child processes with stdin closed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn prepare(command: &SvnCommand) -> Command {
        let mut process = Command::new(command.program());
        process.args(command.args()).stdin(Stdio::null());
        if let Some(home) = command.home_dir() {
            process.env("HOME", home);
        }
        process
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &SvnCommand, mode: Mode) -> Result<(), CommandError> {
        trace!("Running {command} ({mode:?})");
        let spawn_error = |source| CommandError::Spawn {
            command: command.to_string(),
            source,
        };
        let mut process = Self::prepare(command);

        let (status, stderr) = match mode {
            Mode::Silent => {
                let output = process
                    .stdout(Stdio::null())
                    .stderr(Stdio::piped())
                    .output()
                    .map_err(spawn_error)?;
                (
                    output.status,
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                )
            }
            Mode::Normal => {
                let mut child = process
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::piped())
                    .spawn()
                    .map_err(spawn_error)?;
                let captured = child.stderr.take().map(forward_stderr).unwrap_or_default();
                (child.wait().map_err(spawn_error)?, captured)
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::Failed {
                command: command.to_string(),
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            })
        }
    }
}

/// Logs each stderr line as it arrives and returns everything read. Bytes
/// that are not UTF-8 are replaced rather than treated as an error.
fn forward_stderr(stderr: impl Read) -> String {
    let mut reader = BufReader::new(stderr);
    let mut captured = String::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                let text = text.trim_end_matches(['\r', '\n']);
                warn!("{text}");
                captured.push_str(text);
                captured.push('\n');
            }
            Err(error) => {
                debug!("Stopped reading client stderr: {error}");
                break;
            }
        }
    }
    captured
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn url() -> Url {
        Url::parse("https://svn.example.com/repo/trunk").unwrap()
    }

    #[test]
    fn checkout_arguments() {
        let command = SvnCommand::checkout(
            Path::new("/usr/bin/svn"),
            Path::new("/home/ci"),
            &url(),
            Path::new("/work/source"),
            false,
        );
        assert_eq!(command.program(), Path::new("/usr/bin/svn"));
        assert_eq!(command.home_dir(), Some(Path::new("/home/ci")));
        assert_eq!(
            command.arg_strings(),
            vec![
                "--non-interactive",
                "checkout",
                "https://svn.example.com/repo/trunk",
                "/work/source"
            ]
        );
    }

    #[test]
    fn checkout_trusting_server_cert() {
        let command = SvnCommand::checkout(
            Path::new("svn"),
            Path::new("/home/ci"),
            &url(),
            Path::new("/work/source"),
            true,
        );
        assert_eq!(
            command.arg_strings(),
            vec![
                "--non-interactive",
                "--trust-server-cert",
                "checkout",
                "https://svn.example.com/repo/trunk",
                "/work/source"
            ]
        );
    }

    #[test]
    fn probe_arguments() {
        let command = SvnCommand::info_probe(
            Path::new("svn"),
            Path::new("/home/ci"),
            &url(),
            "alice",
            "secret",
        );
        assert_eq!(
            command.arg_strings(),
            vec![
                "--non-interactive",
                "--username",
                "alice",
                "--password",
                "secret",
                "info",
                "https://svn.example.com/repo/trunk"
            ]
        );
    }

    #[test]
    fn display_masks_password() {
        let command = SvnCommand::info_probe(
            Path::new("svn"),
            Path::new("/home/ci"),
            &url(),
            "alice",
            "secret",
        );
        assert_eq!(
            command.to_string(),
            "svn --non-interactive --username alice --password ****** info https://svn.example.com/repo/trunk"
        );
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_failure() {
        let command = SvnCommand {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".into(), "echo oops >&2; exit 3".into()],
            home: None,
        };

        for mode in [Mode::Silent, Mode::Normal] {
            match SystemRunner.run(&command, mode) {
                Err(CommandError::Failed { stderr, .. }) => assert_eq!(stderr, "oops"),
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_accepts_non_utf8_stderr() {
        let command = SvnCommand {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".into(), "printf 'svn: warning \\377\\n' >&2; exit 0".into()],
            home: None,
        };

        for mode in [Mode::Silent, Mode::Normal] {
            assert!(SystemRunner.run(&command, mode).is_ok(), "{mode:?}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_keeps_non_utf8_stderr_on_failure() {
        let command = SvnCommand {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".into(), "printf 'bad \\377\\n' >&2; exit 1".into()],
            home: None,
        };

        match SystemRunner.run(&command, Mode::Normal) {
            Err(CommandError::Failed { stderr, .. }) => assert_eq!(stderr, "bad \u{FFFD}"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_passes_home() {
        let home = tempfile::tempdir().unwrap();
        let command = SvnCommand {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".into(), "touch \"$HOME/marker\"".into()],
            home: Some(home.path().to_path_buf()),
        };
        SystemRunner.run(&command, Mode::Silent).unwrap();
        assert!(home.path().join("marker").exists());
    }

    #[test]
    fn system_runner_missing_program() {
        let command = SvnCommand::new("/nonexistent/svn").arg("info");
        assert!(matches!(
            SystemRunner.run(&command, Mode::Silent),
            Err(CommandError::Spawn { .. })
        ));
    }
}
