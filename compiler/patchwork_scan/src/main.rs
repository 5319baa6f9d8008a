//! `patchwork-scan`: dump the prompt scanner's tokens for a file.

use std::io;

use patchwork_scan::{init_tracing, parse_args, read_source, write_tokens, CliError, USAGE};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        if matches!(err, CliError::UnknownOption(_)) {
            eprintln!("{USAGE}");
        }
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), CliError> {
    let options = parse_args(args)?;
    if options.help {
        println!("{USAGE}");
        println!();
        println!("Options:");
        println!("  --state        Print the scanner snapshot after each token");
        println!("  --no-skipped   Hide whitespace skipped before external tokens");
        return Ok(());
    }

    let source = read_source(&options.path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_tokens(&mut out, &options.path, &source, &options).map_err(|source| CliError::Io {
        path: "<stdout>".to_string(),
        source,
    })
}
