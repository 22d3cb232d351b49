//! Sing command implementation
//!
//! Turns a speech recording into a vocal that follows a composed melody.

use anyhow::{Context, Result};
use colored::Colorize;
use songsmith_backend_audio::{resynthesize_vocal, VocalOutcome, VocalReport};
use songsmith_spec::VocalConfig;
use std::path::Path;
use std::process::ExitCode;

use super::audio_exit_code;
use super::json_output::{print_json, CommandOutput, JsonError, SingResult};

/// Run the sing command
///
/// # Arguments
/// * `speech` - Speech WAV to transform
/// * `notes` - Note artifact written by `compose`
/// * `output` - Destination WAV
/// * `config_path` - Optional JSON file overriding pipeline defaults
/// * `alpha` - Optional blend weight, applied after the config file
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 when a vocal was written (including the fallback path),
/// 1 for missing or invalid inputs, 2 if the output could not be produced
pub fn run(
    speech: &str,
    notes: &str,
    output: &str,
    config_path: Option<&str>,
    alpha: Option<f64>,
    json_output: bool,
) -> Result<ExitCode> {
    let config = load_config(config_path, alpha)?;

    if !json_output {
        println!("{} {}", "Singing:".cyan().bold(), speech);
        println!("  {} {}", "Melody:".dimmed(), notes);
    }

    let result = resynthesize_vocal(Path::new(speech), Path::new(notes), Path::new(output), &config);
    match result {
        Ok(report) => {
            if json_output {
                print_json(&CommandOutput::ok(to_result(&report)))?;
            } else {
                print_summary(&report);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if json_output {
                print_json(&CommandOutput::<SingResult>::err(JsonError::from_backend(&e)))?;
            } else {
                eprintln!("{} {}", "FAILED".red().bold(), e);
            }
            Ok(audio_exit_code(&e))
        }
    }
}

/// Defaults, then the config file, then `--alpha`.
fn load_config(config_path: Option<&str>, alpha: Option<f64>) -> Result<VocalConfig> {
    let config = match config_path {
        Some(path) => VocalConfig::from_json_file(Path::new(path))
            .with_context(|| format!("Failed to load vocal config: {}", path))?,
        None => VocalConfig::default(),
    };
    let config = match alpha {
        Some(alpha) => config.with_alpha(alpha),
        None => config,
    };
    config.validate().context("Invalid vocal config")?;
    Ok(config)
}

fn to_result(report: &VocalReport) -> SingResult {
    let (outcome, fallback_reason) = match &report.outcome {
        VocalOutcome::Resynthesized { .. } => ("resynthesized", None),
        VocalOutcome::FallbackPolished { reason } => ("fallback_polished", Some(reason.clone())),
    };
    SingResult {
        output_path: report.output_path.display().to_string(),
        outcome: outcome.to_string(),
        fallback_reason,
        sample_rate: report.sample_rate,
        duration_seconds: report.duration_seconds,
        pcm_hash: report.pcm_hash.clone(),
    }
}

fn print_summary(report: &VocalReport) {
    match &report.outcome {
        VocalOutcome::Resynthesized {
            frames,
            voiced_frames,
        } => {
            println!(
                "  {} {} of {} frames voiced",
                "Resynthesized:".dimmed(),
                voiced_frames,
                frames
            );
        }
        VocalOutcome::FallbackPolished { reason } => {
            println!("  {} {}", "Fallback:".yellow().bold(), reason);
        }
    }
    println!(
        "{} {} ({:.2}s @ {} Hz)",
        "Wrote:".green().bold(),
        report.output_path.display(),
        report.duration_seconds,
        report.sample_rate
    );
}
