#![forbid(unsafe_code)]

//! Binary pipeline: load raw output, build the session, print the
//! requested mode.

use std::io::Write;

use difflens_core::Session;
use difflens_style::StyleSheet;

use crate::cli::{Mode, Opts};
use crate::config::{Config, Layout};
use crate::render;
use crate::source::{DiffCommand, read_input};
use crate::Result;

/// Merge environment configuration with explicit flags.
///
/// Environment diagnostics are logged and their defaults kept; invalid
/// values from flags are errors.
pub fn resolve_config(opts: &Opts) -> Result<Config> {
    let parsed = Config::from_env_with_diagnostics();
    for err in &parsed.errors {
        tracing::warn!(%err, "ignoring invalid environment setting");
    }
    let mut config = parsed.config;
    opts.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Read the raw diff from `--run`, a file, or stdin.
pub fn load(opts: &Opts, config: &Config) -> Result<String> {
    if opts.run {
        DiffCommand::new(config.command.clone(), config.width)
            .args(opts.run_args.iter().cloned())
            .run()
    } else {
        read_input(opts.file.as_deref())
    }
}

/// Parse `raw` and write the requested output.
///
/// Returns `false` when a jump resolves to no source line; nothing is
/// printed then.
pub fn execute<W: Write>(w: &mut W, opts: &Opts, config: &Config, raw: &str) -> Result<bool> {
    let mut session = Session::new(config.theme(), StyleSheet::with_defaults());
    session.reload(raw);
    tracing::debug!(
        lines = session.document().len(),
        headers = session.document().headers().len(),
        mode = ?opts.mode(),
        "loaded diff"
    );

    match opts.mode() {
        Mode::Jump(cursor) => {
            let Some(target) = render::jump(session.document(), cursor.line, cursor.col)? else {
                return Ok(false);
            };
            writeln!(w, "{target}")?;
        }
        Mode::Headers => render::render_headers(w, session.document().headers())?,
        Mode::Json => {
            let split_width = (config.layout == Layout::Split).then_some(config.width);
            render::render_json(w, session.document(), split_width)?;
        }
        Mode::Render => match config.layout {
            Layout::Unified => render::render_unified(w, &mut session, config.color)?,
            Layout::Split => render::render_split(w, &mut session, config.width, config.color)?,
        },
    }
    w.flush()?;
    let stats = session.cache().stats();
    tracing::debug!(styles = stats.size, hit_rate = stats.hit_rate(), "format cache");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use difflens_core::Cursor;

    const RAW: &str = "lib.rs --- Rust\n\
                       1 fn a() {}     1 fn b() {}\n\
                       2 }             2 }\n";

    fn output(opts: &Opts, config: &Config) -> (bool, String) {
        let mut out = Vec::new();
        let found = execute(&mut out, opts, config, RAW).unwrap();
        (found, String::from_utf8(out).unwrap())
    }

    #[test]
    fn headers_mode() {
        let opts = Opts {
            headers: true,
            ..Opts::default()
        };
        let (found, out) = output(&opts, &Config::default());
        assert!(found);
        assert_eq!(out, "1\tlib.rs\tRust\t\n");
    }

    #[test]
    fn jump_mode() {
        let mut opts = Opts {
            jump: Some(Cursor::new(3, 18)),
            ..Opts::default()
        };
        let (found, out) = output(&opts, &Config::default());
        assert!(found);
        assert_eq!(out, "lib.rs:2\n");

        // The header line carries no change markers.
        opts.jump = Some(Cursor::new(1, 0));
        let (found, out) = output(&opts, &Config::default());
        assert!(!found);
        assert!(out.is_empty());
    }

    #[test]
    fn jump_outside_document_is_error() {
        let opts = Opts {
            jump: Some(Cursor::new(40, 0)),
            ..Opts::default()
        };
        let mut out = Vec::new();
        assert!(execute(&mut out, &opts, &Config::default(), RAW).is_err());
    }

    #[test]
    fn unified_plain_round_trips_text() {
        let config = Config {
            color: false,
            ..Config::default()
        };
        let (_, out) = output(&Opts::default(), &config);
        assert_eq!(out, RAW);
    }

    #[test]
    fn load_reads_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), RAW).unwrap();
        let opts = Opts {
            file: Some(file.path().to_path_buf()),
            ..Opts::default()
        };
        assert_eq!(load(&opts, &Config::default()).unwrap(), RAW);
    }
}
