mod cli;

use std::io::{stdout, Write};
use std::panic;
use std::process::ExitCode;

use anyhow::{Context, Result};
use crossterm::terminal::disable_raw_mode;
use tracing_subscriber::EnvFilter;

use maskpin::terminal::escape::{color, fg, BOLD, DIM, RESET};
use maskpin::{Config, CrosstermTerminal, PinError, PinPrompt};

use crate::cli::{Args, Command, USAGE};

/// Environment variable holding a tracing filter, e.g. `MASKPIN_LOG=debug`
const LOG_ENV: &str = "MASKPIN_LOG";

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn setup_panic_handler() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // The guard's Drop also restores, but only if unwinding reaches it
        let _ = disable_raw_mode();
        original_hook(panic_info);
    }));
}

/// Load the config file and layer command-line overrides on top
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = Config::load()?;
    args.apply(&mut config);
    Ok(config)
}

fn session(config: &Config) -> Result<PinPrompt<CrosstermTerminal>> {
    let policy = config.policy()?;
    Ok(PinPrompt::on_terminal(policy)
        .with_mask(config.mask)
        .with_mismatch_notice(config.notice()))
}

/// Hand the PIN to whoever is reading stdout
fn emit_pin(pin: &str) -> Result<()> {
    let mut out = stdout();
    writeln!(out, "{}", pin).context("Failed to write PIN to stdout")?;
    out.flush()?;
    Ok(())
}

fn run_prompt(config: &Config) -> Result<()> {
    let pin = session(config)?.prompt_pin(&config.prompt)?;
    emit_pin(pin.expose())
}

fn run_confirm(config: &Config) -> Result<()> {
    let confirmed = session(config)?.get_pin_with_confirmation(
        &config.prompt,
        &config.confirm_prompt,
        config.max_attempts,
    )?;
    emit_pin(confirmed.pin.expose())
}

/// Walks an operator through both entry points and reports each step
fn run_selftest(config: &Config) -> Result<()> {
    let mut prompt = session(config)?;
    let ok = fg(color::GREEN);
    let bar = "-".repeat(40);

    eprintln!("{BOLD}{}=== PIN Input Test ==={RESET}", fg(color::CYAN));
    eprintln!();

    eprintln!("Test 1: Basic PIN input");
    eprintln!("{DIM}{bar}{RESET}");
    let pin = prompt.prompt_pin("Enter test PIN: ")?;
    eprintln!("{ok}✓{RESET} accepted {} characters", pin.len());
    eprintln!();

    eprintln!("Test 2: PIN with confirmation");
    eprintln!("{DIM}{bar}{RESET}");
    let confirmed = prompt.get_pin_with_confirmation(
        &config.prompt,
        &config.confirm_prompt,
        config.max_attempts,
    )?;
    eprintln!(
        "{ok}✓{RESET} confirmed {} characters after {} mismatched round(s)",
        confirmed.pin.len(),
        confirmed.mismatches
    );
    eprintln!();

    eprintln!("{ok}✓ All tests passed!{RESET}");
    Ok(())
}

fn run_init_config(config: &Config) -> Result<()> {
    config.check()?;
    let path = config.save()?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    if args.command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = resolve_config(args)?;
    tracing::debug!(
        min = config.min_length,
        max = config.max_length,
        attempts = config.max_attempts,
        "configuration resolved"
    );

    match args.command {
        Command::Prompt => run_prompt(&config),
        Command::Confirm => run_confirm(&config),
        Command::SelfTest => run_selftest(&config),
        Command::InitConfig => run_init_config(&config),
        Command::Help => Ok(()),
    }
}

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(2);
        }
    };

    setup_logging(args.verbose);
    setup_panic_handler();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<PinError>()
                .map(PinError::exit_code)
                .unwrap_or(1);
            eprintln!("{}{:#}{RESET}", fg(color::RED), e);
            ExitCode::from(code as u8)
        }
    }
}
