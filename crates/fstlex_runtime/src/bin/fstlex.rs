//! fstlex CLI entry point.

use fstlex_morphology::LemmatizeOptions;
use fstlex_runtime::{Repl, Reply, Service, ServiceConfig};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    config: Option<PathBuf>,
    language: Option<String>,
    commands: Vec<String>,
    show_help: bool,
    show_version: bool,
    // Lemmatization switches
    split_compounds: bool,
    non_compound_only: bool,
    no_derivations: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--split-compounds" => config.split_compounds = true,
            "--non-compound-only" => config.non_compound_only = true,
            "--no-derivations" => config.no_derivations = true,
            "-c" | "--config" => {
                let value = args.next().ok_or("--config requires a value")?;
                config.config = Some(PathBuf::from(value));
            }
            "-l" | "--lang" => {
                config.language = Some(args.next().ok_or("--lang requires a value")?);
            }
            "-e" | "--exec" => {
                config.commands.push(args.next().ok_or("--exec requires a value")?);
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}").into());
            }
            other => return Err(format!("unexpected argument: {other}").into()),
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("fstlex {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let path = config.config.clone().unwrap_or_else(|| PathBuf::from("fstlex.yaml"));
    let service = Service::from_config(&ServiceConfig::from_path(&path)?)?;

    let switches = LemmatizeOptions::new()
        .with_split_compounds(config.split_compounds)
        .with_non_compound_only(config.non_compound_only)
        .with_no_derivations(config.no_derivations);

    let mut repl = Repl::new(service)?.with_switches(switches);
    if let Some(language) = &config.language {
        repl = repl.with_language(language)?;
    }

    // Batch mode: run the given commands and exit
    if !config.commands.is_empty() {
        for command in &config.commands {
            match repl.execute(command)? {
                Reply::Text(text) => println!("{text}"),
                Reply::Quit => break,
            }
        }
        return Ok(());
    }

    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mfstlex\x1b[0m - FST analysis, lemmatization, and paradigm selection

\x1b[1mUSAGE:\x1b[0m
    fstlex [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -h, --help            Print help information
    -V, --version         Print version information
    -c, --config FILE     Service configuration (default: fstlex.yaml)
    -l, --lang CODE       Start in this language
    -e, --exec COMMAND    Run a command and exit (repeatable)

\x1b[1mLEMMATIZATION OPTIONS:\x1b[0m
    --split-compounds     Split compound analyses into their parts
    --non-compound-only   Drop compound analyses
    --no-derivations      Drop derivation analyses

\x1b[1mEXAMPLES:\x1b[0m
    fstlex -c conf/fstlex.yaml                  Start interactive REPL
    fstlex -l sme -e \"analyze beaggin\"          Lemmatize one form
    fstlex -e \"generate mannat V+Ind+Prs+Sg1\"   Generate one form

\x1b[1mLOGGING:\x1b[0m
    RUST_LOG=fstlex::analyzer=debug fstlex ...

\x1b[1mREPL COMMANDS:\x1b[0m
    help                  List commands
    Ctrl+D                Exit REPL
    Ctrl+C                Cancel current input"
    );
}
