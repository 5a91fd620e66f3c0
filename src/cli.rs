// src/cli.rs
use clap::{Arg, ArgAction, Command, error::ErrorKind};
use colored::*;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::infra::t;

pub mod commands {
    pub mod clean;
    pub mod run;
}

use commands::run::RunOptions;

/// Exit code for a command line that could not be parsed.
pub const EXIT_USAGE: u8 = 2;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` or `--lang=<VALUE>` argument.
fn pre_parse_language(args: &[OsString]) -> Option<String> {
    let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        return args.get(pos + 1).cloned();
    }
    args.iter()
        .find_map(|arg| arg.strip_prefix("--lang="))
        .map(str::to_string)
}

pub fn build_cli() -> Command {
    Command::new("harness-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about").to_string())
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help(t!("arg_debug").to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fail-fast")
                .short('x')
                .long("fail-fast")
                .help(t!("arg_fail_fast").to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("clean")
                .short('c')
                .long("clean")
                .help(t!("arg_clean").to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("arg_verbose").to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("unit")
                .short('u')
                .long("unit")
                .help(t!("arg_unit").to_string())
                .value_name("UNIT")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("dir")
                .short('C')
                .long("dir")
                .help(t!("arg_dir").to_string())
                .value_name("DIR")
                .default_value(".")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .help(t!("arg_timeout").to_string())
                .value_name("SECS")
                .value_parser(clap::value_parser!(u64).range(1..))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang").to_string())
                .value_name("LANGUAGE")
                .action(ArgAction::Set),
        )
}

/// Runs the CLI against the process arguments.
pub async fn run() -> ExitCode {
    run_from(std::env::args_os()).await
}

/// Parses `args` (program name first), dispatches, and maps the outcome to an
/// exit code: 0 success/help/clean, 1 failure, 2 usage error.
pub async fn run_from<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    // Pre-parse language and initialize i18n first.
    let requested_lang = pre_parse_language(&args);
    crate::init_locale(requested_lang.as_deref());

    let matches = match build_cli().try_get_matches_from(&args) {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            let _ = build_cli().print_help();
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let fixture_dir = matches
        .get_one::<PathBuf>("dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    let result = if matches.get_flag("clean") {
        commands::clean::execute(&fixture_dir).await.map(|_| 0)
    } else {
        let options = RunOptions {
            fixture_dir,
            skip_setup: matches.get_flag("debug"),
            fail_fast: matches.get_flag("fail-fast"),
            verbose: matches.get_flag("verbose"),
            unit: matches.get_one::<String>("unit").cloned(),
            timeout_secs: matches.get_one::<u64>("timeout").copied(),
            lang_from_cli: requested_lang.is_some(),
        };
        commands::run::execute(options).await
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {:#}", t!("error_prefix").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
