use anyhow::Result;
use std::path::PathBuf;
use std::process::ExitCode;

use fspot_xmp::{logging, migrate, Config};

/// Exit code used after printing the help text.
const HELP_EXIT_CODE: u8 = 3;

#[derive(Debug, Default, PartialEq)]
struct Args {
    verbose: bool,
    db_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    Run(Args),
}

/// Parse arguments, without the program name.
///
/// `--help` anywhere wins over every other argument, including invalid ones.
fn parse_args(args: &[String]) -> Result<Command, String> {
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(Command::Help);
    }

    let mut parsed = Args::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--verbose" | "-v" => {
                parsed.verbose = true;
            }
            "--version" | "-V" => {
                return Ok(Command::Version);
            }
            "--db" | "-d" => {
                let path = args.get(i + 1).ok_or("--db requires a path argument")?;
                parsed.db_path = Some(PathBuf::from(path));
                i += 1;
            }
            "--config" | "-c" => {
                let path = args.get(i + 1).ok_or("--config requires a path argument")?;
                parsed.config_path = Some(PathBuf::from(path));
                i += 1;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(Command::Run(parsed))
}

fn print_help() {
    eprintln!(
        r#"fspot-xmp - migrate F-Spot tags to darktable

Extracts the tags assigned in the F-Spot database and writes an .xmp file
next to every image that exists on disk and has no .xmp file yet. Tags
nested in categories are written with their full path, so darktable
rebuilds the same hierarchy on import.

Run it once, before importing the library into darktable. Images that
already have an .xmp file are left untouched, so an interrupted run can be
restarted safely.

USAGE:
    fspot-xmp [OPTIONS]

OPTIONS:
    --verbose, -v       Log every skipped image
    --db, -d PATH       F-Spot database (default: ~/.config/f-spot/photos.db)
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    FSPOT_XMP_CONFIG    Path to config file (overrides default location)
    FSPOT_XMP_LOG       Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/fspot-xmp/config.toml"#
    );
}

fn run(args: Args) -> Result<()> {
    let mut config = match args.config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };
    if let Some(db_path) = args.db_path {
        config.db_path = db_path;
    }

    let _ = logging::init(args.verbose, &config.log_dir());

    let summary = migrate::run(&config.db_path, config.run_options(args.verbose))?;
    println!("{}", summary);
    Ok(())
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let args = match parse_args(&argv) {
        Ok(Command::Help) => {
            print_help();
            return ExitCode::from(HELP_EXIT_CODE);
        }
        Ok(Command::Version) => {
            println!("fspot-xmp {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Ok(Command::Run(args)) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_args(&args)
    }

    #[test]
    fn test_help_wins_over_unknown_arguments() {
        assert_eq!(parse(&["--bogus", "-h"]), Ok(Command::Help));
        assert!(parse(&["-v", "--db"]).is_err());
        assert_eq!(parse(&["--db", "--help"]), Ok(Command::Help));
    }

    #[test]
    fn test_run_arguments() {
        assert_eq!(parse(&[]), Ok(Command::Run(Args::default())));
        assert_eq!(
            parse(&["-v", "--db", "/srv/photos.db"]),
            Ok(Command::Run(Args {
                verbose: true,
                db_path: Some(PathBuf::from("/srv/photos.db")),
                config_path: None,
            }))
        );
        assert_eq!(parse(&["-V"]), Ok(Command::Version));
    }

    #[test]
    fn test_unknown_argument_rejected() {
        assert_eq!(
            parse(&["--bogus"]),
            Err("Unknown argument: --bogus".to_string())
        );
    }
}
