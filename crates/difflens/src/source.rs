#![forbid(unsafe_code)]

//! Where raw diff output comes from: a file, stdin, or a `git diff` run
//! with difftastic as the external diff program.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Read raw output from a file, or stdin when `path` is `None` or `-`.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    let bytes = match path {
        Some(path) if path != Path::new("-") => fs::read(path)?,
        _ => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            buf
        }
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// A `git diff` invocation that renders through difftastic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffCommand {
    /// External diff program (`difft` unless configured).
    pub program: String,
    /// Width passed to difftastic through `DFT_WIDTH`.
    pub width: usize,
    /// Extra arguments appended to `git diff`.
    pub args: Vec<String>,
}

impl DiffCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, width: usize) -> Self {
        Self {
            program: program.into(),
            width,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build the process command without running it.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-c")
            .arg(format!("diff.external={}", self.program))
            .arg("diff")
            .arg("--ext-diff")
            .args(&self.args)
            .env("DFT_COLOR", "always")
            .env("DFT_WIDTH", self.width.to_string());
        cmd
    }

    /// Run and capture stdout.
    pub fn run(&self) -> Result<String> {
        tracing::debug!(program = %self.program, width = self.width, args = ?self.args, "running diff");
        let output = self
            .command()
            .output()
            .map_err(|err| Error::Command(format!("failed to launch git: {err}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Command(format!(
                "git diff failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_file_lossily() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a.rs --- Rust\n\xff1 x\n").unwrap();
        let text = read_input(Some(file.path())).unwrap();
        assert_eq!(text, "a.rs --- Rust\n\u{fffd}1 x\n");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_input(Some(Path::new("/nonexistent/difflens-input"))).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn command_sets_difftastic_env() {
        let cmd = DiffCommand::new("difft", 140).args(["HEAD~1", "--", "src"]);
        let built = cmd.command();
        assert_eq!(built.get_program(), "git");
        let args: Vec<_> = built.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            ["-c", "diff.external=difft", "diff", "--ext-diff", "HEAD~1", "--", "src"]
        );
        let envs: Vec<_> = built
            .get_envs()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.map(|v| v.to_string_lossy().into_owned()),
                )
            })
            .collect();
        assert!(envs.contains(&("DFT_COLOR".into(), Some("always".into()))));
        assert!(envs.contains(&("DFT_WIDTH".into(), Some("140".into()))));
    }
}
