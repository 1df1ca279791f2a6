// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — command-line image transform tool
//
// Entry point. Initialises logging, parses the command line, runs the
// load → transform → save sequence, and reports failures in plain English.

mod cli;
mod services;

use std::process::ExitCode;

use bildwerk_core::human_errors::humanize_error;
use bildwerk_core::{BildwerkError, Result};
use bildwerk_image::{ImageSession, Recipe};

use cli::{Command, Invocation, Step};
use services::config_dir;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match cli::parse_args(&args) {
        Ok(Command::Help) => {
            println!("{}", cli::USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Run(invocation)) => invocation,
        Err(err) => {
            eprintln!("bildwerk: {err}\n\n{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    match run(&invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::from(1)
        }
    }
}

/// Load, apply recipe and steps, save.
fn run(invocation: &Invocation) -> Result<()> {
    let config = config_dir::load_config(invocation.config.as_deref())?;

    // Parse everything up front so a typo fails before any work is done.
    let steps = invocation
        .steps
        .iter()
        .map(|text| Step::parse(text, &config))
        .collect::<Result<Vec<_>>>()?;
    let recipe = invocation.recipe.as_ref().map(Recipe::load).transpose()?;

    let mut session = ImageSession::new(config);
    session.load(&invocation.input)?;

    if let Some(recipe) = &recipe {
        session.apply_recipe(recipe)?;
    }
    for step in steps {
        match step {
            Step::Reset => session.reset()?,
            Step::Apply(transform) => session.apply(transform)?,
        };
    }

    session.save(&invocation.output)?;

    let current = session.current()?;
    println!(
        "{} -> {} ({}x{}, {} channel{})",
        invocation.input.display(),
        invocation.output.display(),
        current.width(),
        current.height(),
        current.channels(),
        if current.channels() == 1 { "" } else { "s" },
    );
    Ok(())
}

/// Print a user-facing explanation of `err` to stderr.
fn report(err: &BildwerkError) {
    tracing::error!(error = %err, "bildwerk failed");
    let human = humanize_error(err);
    eprintln!("{}\n{}", human.message, human.suggestion);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn invocation(dir: &std::path::Path, output: &str, steps: &[&str]) -> Invocation {
        let input = dir.join("in.png");
        // Black left half, white right half.
        RgbImage::from_fn(16, 16, |x, _| if x < 8 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) })
            .save(&input)
            .expect("write input");
        let config = dir.join("config.json");
        std::fs::write(&config, "{}").expect("write config");
        Invocation {
            config: Some(config),
            recipe: None,
            input,
            output: dir.join(output),
            steps: steps.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn run_writes_transformed_output() {
        let dir = tempfile::tempdir().unwrap();
        let inv = invocation(dir.path(), "out.png", &["grayscale", "blur=3", "edges"]);
        run(&inv).expect("run");

        let out = image::open(&inv.output).expect("output decodes").to_luma8();
        assert_eq!(out.dimensions(), (16, 16));
        // blur=3 turns the step into 0, 64, 191, 255 across x = 6..=9; the
        // gradient peaks equally at x = 7 and 8 and suppression keeps x = 7.
        for y in 0..16 {
            let on: Vec<u32> = (0..16).filter(|&x| out.get_pixel(x, y)[0] == 255).collect();
            assert_eq!(on, vec![7], "row {y}");
        }
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn reset_step_discards_earlier_steps() {
        let dir = tempfile::tempdir().unwrap();
        let inv = invocation(dir.path(), "out.png", &["grayscale", "brightness=0.2", "reset"]);
        run(&inv).expect("run");

        let original = image::open(&inv.input).unwrap().to_rgb8();
        let out = image::open(&inv.output).unwrap().to_rgb8();
        assert_eq!(out, original);
    }

    #[test]
    fn recipe_runs_before_steps() {
        let dir = tempfile::tempdir().unwrap();
        let mut inv = invocation(dir.path(), "out.png", &["brightness=1.0"]);
        let recipe = dir.path().join("recipe.json");
        std::fs::write(&recipe, r#"{ "steps": [ { "op": "grayscale" } ] }"#).unwrap();
        inv.recipe = Some(recipe);
        run(&inv).expect("run");

        let out = image::open(&inv.output).unwrap();
        assert_eq!(out.color(), image::ColorType::L8);
    }

    #[test]
    fn bad_step_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let inv = invocation(dir.path(), "out.png", &["grayscale", "sharpen"]);
        assert!(matches!(run(&inv), Err(BildwerkError::InvalidStep(_))));
        assert!(!inv.output.exists());
    }

    #[test]
    fn unsupported_output_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let inv = invocation(dir.path(), "out.nope", &[]);
        assert!(matches!(run(&inv), Err(BildwerkError::Encode { .. })));
    }
}
