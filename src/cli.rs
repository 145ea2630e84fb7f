//! CLI argument parsing
//!
//! Handles subcommand selection and the per-run overrides that are layered
//! on top of the config file.

use std::env;

use anyhow::{anyhow, bail, Context, Result};

use maskpin::{Charset, Config};

pub const USAGE: &str = "\
usage: maskpin [prompt|confirm|selftest|init-config] [options]

commands:
  prompt         ask once for a PIN and print it to stdout (default)
  confirm        ask twice and print the PIN once both entries match
  selftest       interactive check of single and confirmed entry
  init-config    write the effective settings to the config file

options:
  --prompt TEXT           first prompt
  --confirm-prompt TEXT   second prompt
  --min N                 minimum PIN length
  --max N                 maximum PIN length
  --charset SET           digits | alnum | printable | literal characters
  --mask C                glyph echoed per keystroke
  --attempts N            confirmation rounds before giving up
  -v, --verbose           debug logging on stderr
  -h, --help              show this help";

/// Subcommand to run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Command {
    /// Single masked entry
    #[default]
    Prompt,
    /// Enter + confirm
    Confirm,
    /// Interactive smoke test of both entry points
    SelfTest,
    /// Persist the resolved settings
    InitConfig,
    Help,
}

/// Parsed command-line arguments. `None` means "use the config file".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    pub command: Command,
    pub prompt: Option<String>,
    pub confirm_prompt: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub charset: Option<Charset>,
    pub mask: Option<char>,
    pub max_attempts: Option<u32>,
    pub verbose: bool,
}

impl Args {
    /// Layer explicit flags over `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(prompt) = &self.prompt {
            config.prompt = prompt.clone();
        }
        if let Some(prompt) = &self.confirm_prompt {
            config.confirm_prompt = prompt.clone();
        }
        if let Some(min) = self.min_length {
            config.min_length = min;
        }
        if let Some(max) = self.max_length {
            config.max_length = max;
        }
        if let Some(charset) = &self.charset {
            config.charset = charset.clone();
        }
        if let Some(mask) = self.mask {
            config.mask = mask;
        }
        if let Some(attempts) = self.max_attempts {
            config.max_attempts = attempts;
        }
    }
}

/// Parse the process arguments
pub fn parse_args() -> Result<Args> {
    parse_args_from(env::args().skip(1)) // Skip the binary name
}

pub fn parse_args_from<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut iter = args.into_iter().peekable();

    // Check for subcommand first
    if let Some(first) = iter.peek() {
        let command = match first.as_str() {
            "prompt" => Some(Command::Prompt),
            "confirm" => Some(Command::Confirm),
            "selftest" => Some(Command::SelfTest),
            "init-config" => Some(Command::InitConfig),
            _ => None,
        };
        if let Some(command) = command {
            iter.next(); // consume the subcommand
            parsed.command = command;
        }
    }

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--prompt" => parsed.prompt = Some(value(&mut iter, &arg)?),
            "--confirm-prompt" => parsed.confirm_prompt = Some(value(&mut iter, &arg)?),
            "--min" => parsed.min_length = Some(number(&mut iter, &arg)?),
            "--max" => parsed.max_length = Some(number(&mut iter, &arg)?),
            "--attempts" => parsed.max_attempts = Some(number(&mut iter, &arg)?),
            "--charset" => {
                let raw = value(&mut iter, &arg)?;
                let charset =
                    Charset::parse(&raw).ok_or_else(|| anyhow!("--charset needs a non-empty value"))?;
                parsed.charset = Some(charset);
            }
            "--mask" => {
                let raw = value(&mut iter, &arg)?;
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => parsed.mask = Some(c),
                    _ => bail!("--mask takes exactly one printable character, got {:?}", raw),
                }
            }
            "-v" | "--verbose" => parsed.verbose = true,
            "-h" | "--help" => parsed.command = Command::Help,
            _ => bail!("Unknown argument: {}\n\n{}", arg, USAGE),
        }
    }

    Ok(parsed)
}

fn value(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    iter.next()
        .ok_or_else(|| anyhow!("{} needs a value", flag))
}

fn number<T: std::str::FromStr>(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = value(iter, flag)?;
    raw.parse()
        .with_context(|| format!("{} expects a number, got {:?}", flag, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        parse_args_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults_to_prompt() {
        let args = parse(&[]).unwrap();
        assert_eq!(args, Args::default());
        assert_eq!(args.command, Command::Prompt);
    }

    #[test]
    fn test_confirm_with_overrides() {
        let args = parse(&[
            "confirm",
            "--prompt",
            "New PIN: ",
            "--confirm-prompt",
            "Again: ",
            "--attempts",
            "1",
            "--min",
            "6",
            "--max",
            "6",
        ])
        .unwrap();
        assert_eq!(args.command, Command::Confirm);
        assert_eq!(args.prompt.as_deref(), Some("New PIN: "));
        assert_eq!(args.confirm_prompt.as_deref(), Some("Again: "));
        assert_eq!(args.max_attempts, Some(1));
        assert_eq!(args.min_length, Some(6));
        assert_eq!(args.max_length, Some(6));
    }

    #[test]
    fn test_charset_and_mask() {
        let args = parse(&["--charset", "alnum", "--mask", "•"]).unwrap();
        assert_eq!(args.charset, Some(Charset::Alphanumeric));
        assert_eq!(args.mask, Some('•'));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse(&["--min"]).is_err());
        assert!(parse(&["--min", "four"]).is_err());
        assert!(parse(&["--mask", "**"]).is_err());
        assert!(parse(&["--attempts", "-1"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
    }

    #[test]
    fn test_help_flag() {
        assert_eq!(parse(&["confirm", "-h"]).unwrap().command, Command::Help);
    }

    #[test]
    fn test_apply_overrides_only_given_fields() {
        let args = parse(&["--max", "12", "--mask", "#"]).unwrap();
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.max_length, 12);
        assert_eq!(config.mask, '#');
        assert_eq!(config.min_length, Config::default().min_length);
        assert_eq!(config.prompt, Config::default().prompt);
    }
}
