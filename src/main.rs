/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     main.rs
 * Purpose:  Command-line entry point for the MUNI interpreter.
 *
 * Usage:
 *   muni <script.mun> [args...] [--config FILE] [-v|-vv|-q|--log LEVEL]
 *
 * Reads the script, runs it on a large-stack thread, waits for outstanding
 * signal and watch handlers, and exits 1 on any fatal error.
 *
 * --------------------------------------------------------------------------
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the MUNI programming language project.
 *
 * MUNI is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use clap::{Parser, ValueEnum};
use tracing::{debug, error};

use muni::diagnostics::DiagnosticPrinter;
use muni::{Interpreter, InterpreterConfig};

/// Stack for the thread that runs the main program. Deep recursion in the
/// evaluator needs far more than the platform default.
const MAIN_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Environment variable holding a tracing filter, e.g. `MUNI_LOG=debug`.
const LOG_ENV: &str = "MUNI_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "muni",
    version = env!("CARGO_PKG_VERSION"),
    about = "MUNI: typed scripting with signals and watchers"
)]
struct Cli {
    /// Script to run
    script: PathBuf,

    /// Arguments passed to the script, available through args()
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,

    /// Configuration file (defaults to muni.json next to the script)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (use multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Set log level (overrides --verbose/--quiet and MUNI_LOG)
    #[arg(long, value_enum)]
    log: Option<LogLevel>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet, cli.log);

    let worker = thread::Builder::new()
        .name("muni-main".into())
        .stack_size(MAIN_STACK_SIZE)
        .spawn(move || run(cli));

    match worker.map(|handle| handle.join()) {
        Ok(Ok(true)) => ExitCode::SUCCESS,
        Ok(Ok(false)) => ExitCode::FAILURE,
        Ok(Err(_)) => {
            error!("interpreter thread panicked");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: cannot start interpreter thread: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs the script. Returns whether it completed without a fatal error.
fn run(cli: Cli) -> bool {
    let file_name = cli.script.display().to_string();

    let source = match fs::read_to_string(&cli.script) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file_name, e);
            return false;
        }
    };

    let printer = DiagnosticPrinter::new(&file_name, source.as_str());

    let config = match InterpreterConfig::discover(cli.config.as_deref(), &cli.script) {
        Ok(config) => config,
        Err(err) => {
            printer.print(&err);
            return false;
        }
    };
    let wait = config.wait_for_handlers;

    let mut interpreter = Interpreter::with_config(config);
    interpreter.set_module_dir(script_dir(&cli.script));
    interpreter.set_program_args(cli.args);

    let result = interpreter.run_source(&source);

    if wait {
        let panicked = interpreter.wait_for_handlers();
        debug!(panicked, "handlers finished");
    }

    match result {
        Ok(_) => true,
        Err(err) => {
            printer.print(&err);
            false
        }
    }
}

fn script_dir(script: &Path) -> PathBuf {
    match script.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn setup_logging(verbose: u8, quiet: bool, log_level: Option<LogLevel>) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if let Some(level) = log_level {
        EnvFilter::new(match level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        })
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(formatter)
        .with(filter)
        .init();
}
