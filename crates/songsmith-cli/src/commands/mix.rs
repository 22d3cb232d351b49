//! Mix command implementation

use anyhow::Result;
use colored::Colorize;
use songsmith_backend_audio::mix_files;
use songsmith_backend_audio::mixdown::VOCAL_GAIN_DB;
use std::path::Path;
use std::process::ExitCode;

use super::audio_exit_code;
use super::json_output::{print_json, CommandOutput, JsonError, MixResult};

/// Run the mix command
///
/// Overlays the vocal on the instrumental with a fixed vocal boost.
///
/// # Returns
/// Exit code: 0 on success, 1 for missing or mismatched inputs, 2 on write failure
pub fn run(instrumental: &str, vocal: &str, output: &str, json_output: bool) -> Result<ExitCode> {
    if !json_output {
        println!("{} {} + {}", "Mixing:".cyan().bold(), instrumental, vocal);
        println!("  {} +{} dB", "Vocal gain:".dimmed(), VOCAL_GAIN_DB);
    }

    match mix_files(Path::new(instrumental), Path::new(vocal), Path::new(output)) {
        Ok(pcm_hash) => {
            if json_output {
                print_json(&CommandOutput::ok(MixResult {
                    output_path: output.to_string(),
                    pcm_hash,
                }))?;
            } else {
                println!("{} {}", "Wrote:".green().bold(), output);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if json_output {
                print_json(&CommandOutput::<MixResult>::err(JsonError::from_backend(&e)))?;
            } else {
                eprintln!("{} {}", "FAILED".red().bold(), e);
            }
            Ok(audio_exit_code(&e))
        }
    }
}
