#![forbid(unsafe_code)]

//! difflens binary entry point.

use std::io::{self, BufWriter};

use difflens::{app, cli, logging};

fn main() {
    logging::init();
    let opts = cli::Opts::parse();

    let result = app::resolve_config(&opts).and_then(|config| {
        let raw = app::load(&opts, &config)?;
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        app::execute(&mut out, &opts, &config, &raw)
    });

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(difflens::Error::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Err(e) => {
            eprintln!("difflens: {e}");
            std::process::exit(1);
        }
    }
}
