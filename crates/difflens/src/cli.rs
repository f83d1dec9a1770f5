#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually to keep the binary lean. Environment configuration
//! (`DIFFLENS_*`, see [`crate::config`]) is read first; explicit flags
//! override it.

use std::env;
use std::path::PathBuf;
use std::process;

use difflens_core::Cursor;

use crate::config::{Config, ConfigError, Layout};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
difflens: navigable, re-themable views of difftastic output

USAGE:
    difflens [OPTIONS] [FILE]
    difflens [OPTIONS] --run [-- GIT_DIFF_ARGS...]

Reads raw `difft` output (with color) from FILE, or stdin when FILE is
missing or `-`. With --run, runs `git diff` using difftastic as the
external diff program instead.

OPTIONS:
    --run                Run `git diff` through difftastic; args after `--` go to git
    --width=N            Terminal width the diff is rendered for (default: $COLUMNS or 120)
    --layout=MODE        Output layout: 'unified' (default) or 'split'
    --headers            List file headers (line, file, language, step) and exit
    --json               Export parsed lines, spans and headers as JSON
    --jump=LINE:COL      Print the source location for a cursor position as path:line
    --no-color           Print clean text without SGR codes
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    DIFFLENS_WIDTH            Override default --width
    DIFFLENS_LAYOUT           Override default --layout (split|unified)
    DIFFLENS_DARK             Force dark (1) or light (0) colors
    DIFFLENS_COLOR            Emit colors (1) or not (0)
    DIFFLENS_COMMAND          External diff program for --run (default: difft)
    DIFFLENS_STYLE_<CLASS>    Style for ADD, DELETE, CHANGE, INFO, HINT, DIM, NEUTRAL:
                              name:Group | #rrggbb[/#rrggbb] | link:Group[:bg]
    DIFFLENS_LOG              Log filter for stderr diagnostics (default: warn)";

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Run(Opts),
    Help,
    Version,
}

/// What to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Render,
    Headers,
    Json,
    Jump(Cursor),
}

/// Parsed command-line options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opts {
    /// Input file; `None` reads stdin.
    pub file: Option<PathBuf>,
    /// Run `git diff` instead of reading input.
    pub run: bool,
    /// Arguments after `--`, passed to `git diff`.
    pub run_args: Vec<String>,
    pub width: Option<usize>,
    pub layout: Option<Layout>,
    pub headers: bool,
    pub json: bool,
    pub jump: Option<Cursor>,
    /// `Some(false)` for `--no-color`.
    pub color: Option<bool>,
}

impl Opts {
    /// Parse the process arguments, exiting on `--help`, `--version` and
    /// invalid arguments.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1)) {
            Ok(Action::Run(opts)) => opts,
            Ok(Action::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Action::Version) => {
                println!("difflens {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(2);
            }
        }
    }

    /// Parse an argument list (without the program name).
    pub fn parse_from<I, S>(args: I) -> Result<Action, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut opts = Self::default();
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => return Ok(Action::Help),
                "--version" | "-V" => return Ok(Action::Version),
                "--run" => opts.run = true,
                "--headers" => opts.headers = true,
                "--json" => opts.json = true,
                "--no-color" => opts.color = Some(false),
                "--" => {
                    opts.run_args = args[i + 1..].to_vec();
                    break;
                }
                other => {
                    if let Some(val) = other.strip_prefix("--width=") {
                        match val.parse() {
                            Ok(n) => opts.width = Some(n),
                            Err(_) => {
                                return Err(ConfigError::new("--width", val, "expected integer"));
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--layout=") {
                        match Layout::parse(val) {
                            Some(layout) => opts.layout = Some(layout),
                            None => {
                                return Err(ConfigError::new(
                                    "--layout",
                                    val,
                                    "expected split|unified",
                                ));
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--jump=") {
                        match parse_position(val) {
                            Some(cursor) => opts.jump = Some(cursor),
                            None => {
                                return Err(ConfigError::new("--jump", val, "expected LINE:COL"));
                            }
                        }
                    } else if other.starts_with('-') && other != "-" {
                        return Err(ConfigError::new("argument", other, "unknown argument"));
                    } else if opts.file.is_some() {
                        return Err(ConfigError::new("FILE", other, "only one input file"));
                    } else {
                        opts.file = Some(PathBuf::from(other));
                    }
                }
            }
            i += 1;
        }

        if opts.run && opts.file.is_some() {
            return Err(ConfigError::new(
                "--run",
                "",
                "cannot combine --run with an input file",
            ));
        }
        if !opts.run && !opts.run_args.is_empty() {
            return Err(ConfigError::new(
                "--",
                opts.run_args.join(" "),
                "arguments after -- need --run",
            ));
        }
        Ok(Action::Run(opts))
    }

    /// Apply explicit flags on top of environment configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if let Some(color) = self.color {
            config.color = color;
        }
    }

    /// The requested output. Jump wins over headers, headers over JSON.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if let Some(cursor) = self.jump {
            Mode::Jump(cursor)
        } else if self.headers {
            Mode::Headers
        } else if self.json {
            Mode::Json
        } else {
            Mode::Render
        }
    }
}

/// Parse `LINE:COL` (or `LINE`, column 0).
fn parse_position(value: &str) -> Option<Cursor> {
    let (line, col) = match value.split_once(':') {
        Some((line, col)) => (line, col),
        None => (value, "0"),
    };
    Some(Cursor::new(
        line.trim().parse().ok()?,
        col.trim().parse().ok()?,
    ))
}
