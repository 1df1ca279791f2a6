// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line parsing — flags, positional paths and pipeline steps.

use std::path::PathBuf;

use bildwerk_core::{BildwerkConfig, Result};
use bildwerk_image::Transform;
use thiserror::Error;

pub const USAGE: &str = "\
Usage: bildwerk [--config FILE] [--recipe FILE] INPUT OUTPUT [STEP ...]

Loads INPUT, applies the recipe (if any) and then each STEP in order, and
saves the result to OUTPUT. The output format follows OUTPUT's extension.

Steps:
  grayscale              convert to a single luma channel
  blur[=K[,SIGMA]]       Gaussian blur, odd kernel K (default 5)
  edges[=LOW,HIGH]       Canny edge map (default 100,200)
  brightness=F           multiply samples by F (> 0)
  contrast=F             scale distance from the mean by F (>= 0)
  reset                  go back to the image as loaded

Options:
  --config FILE          JSON settings (default: $XDG_CONFIG_HOME/bildwerk/config.json)
  --recipe FILE          JSON list of steps applied before STEP arguments
  -h, --help             print this help

Set RUST_LOG=debug for detailed logs.";

/// Malformed command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("{0} needs a file argument")]
    MissingValue(String),

    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("missing INPUT path")]
    MissingInput,

    #[error("missing OUTPUT path")]
    MissingOutput,
}

/// What the user asked for.
#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Run(Invocation),
}

/// A full run: load, steps, save.
#[derive(Debug, Default, PartialEq)]
pub struct Invocation {
    pub config: Option<PathBuf>,
    pub recipe: Option<PathBuf>,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Raw step text; parsed once the configuration is known.
    pub steps: Vec<String>,
}

/// One positional step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Reset,
    Apply(Transform),
}

impl Step {
    pub fn parse(text: &str, config: &BildwerkConfig) -> Result<Self> {
        if text.trim().eq_ignore_ascii_case("reset") {
            return Ok(Step::Reset);
        }
        Transform::parse(text, config).map(Step::Apply)
    }
}

/// Parse the arguments after the program name.
pub fn parse_args(args: &[String]) -> std::result::Result<Command, UsageError> {
    let mut invocation = Invocation::default();
    let mut positional = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--config" | "--recipe" => {
                let value = iter
                    .next()
                    .ok_or_else(|| UsageError::MissingValue(arg.clone()))?;
                let slot = if arg == "--config" {
                    &mut invocation.config
                } else {
                    &mut invocation.recipe
                };
                *slot = Some(PathBuf::from(value));
            }
            "--" => {
                positional.extend(iter.by_ref().cloned());
            }
            flag if flag.starts_with("--") => {
                return Err(UsageError::UnknownOption(flag.to_string()));
            }
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    invocation.input = positional.next().map(PathBuf::from).ok_or(UsageError::MissingInput)?;
    invocation.output = positional.next().map(PathBuf::from).ok_or(UsageError::MissingOutput)?;
    invocation.steps = positional.collect();
    Ok(Command::Run(invocation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_core::BildwerkError;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn paths_and_steps() {
        let cmd = parse_args(&args(&["in.jpg", "out.png", "grayscale", "blur=7"])).unwrap();
        assert_eq!(
            cmd,
            Command::Run(Invocation {
                input: "in.jpg".into(),
                output: "out.png".into(),
                steps: vec!["grayscale".into(), "blur=7".into()],
                ..Invocation::default()
            })
        );
    }

    #[test]
    fn options_anywhere() {
        let cmd = parse_args(&args(&["in.jpg", "--recipe", "r.json", "out.png", "--config", "c.json"]))
            .unwrap();
        let Command::Run(inv) = cmd else {
            panic!("expected a run");
        };
        assert_eq!(inv.config, Some(PathBuf::from("c.json")));
        assert_eq!(inv.recipe, Some(PathBuf::from("r.json")));
        assert!(inv.steps.is_empty());
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse_args(&args(&["in.jpg", "--help"])).unwrap(), Command::Help);
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), Command::Help);
    }

    #[test]
    fn usage_errors() {
        assert_eq!(parse_args(&args(&[])).unwrap_err(), UsageError::MissingInput);
        assert_eq!(parse_args(&args(&["in.jpg"])).unwrap_err(), UsageError::MissingOutput);
        assert_eq!(
            parse_args(&args(&["in.jpg", "out.png", "--config"])).unwrap_err(),
            UsageError::MissingValue("--config".into())
        );
        assert_eq!(
            parse_args(&args(&["--fast", "in.jpg", "out.png"])).unwrap_err(),
            UsageError::UnknownOption("--fast".into())
        );
    }

    #[test]
    fn double_dash_ends_options() {
        let Command::Run(inv) = parse_args(&args(&["--", "--odd-name.png", "out.png"])).unwrap() else {
            panic!("expected a run");
        };
        assert_eq!(inv.input, PathBuf::from("--odd-name.png"));
    }

    #[test]
    fn reset_is_a_step() {
        let config = BildwerkConfig::default();
        assert_eq!(Step::parse("reset", &config).unwrap(), Step::Reset);
        assert_eq!(
            Step::parse("contrast=0.5", &config).unwrap(),
            Step::Apply(Transform::Contrast { factor: 0.5 })
        );
        assert!(matches!(
            Step::parse("sharpen", &config),
            Err(BildwerkError::InvalidStep(_))
        ));
    }
}
