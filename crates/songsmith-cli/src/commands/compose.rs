//! Compose command implementation
//!
//! Composes a melody for a prompt and writes the note artifact and MIDI file.

use anyhow::Result;
use colored::Colorize;
use songsmith_backend_music::{compose_to_dir, ComposeOutput};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{print_json, CommandOutput, ComposeResult, JsonError};
use super::EXIT_GENERATION_ERROR;

/// Run the compose command
///
/// # Arguments
/// * `prompt` - Free-text prompt; it seeds the generator
/// * `emotion` - Mood name (unknown moods use the neutral table)
/// * `genre` - Genre name (unknown genres use the default table)
/// * `out_dir` - Directory receiving `music_<hash>.notes.json` and `.mid`
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 2 if the artifacts could not be written
pub fn run(prompt: &str, emotion: &str, genre: &str, out_dir: &str, json_output: bool) -> Result<ExitCode> {
    if !json_output {
        println!("{} {:?}", "Composing:".cyan().bold(), prompt);
    }

    match compose_to_dir(prompt, emotion, genre, Path::new(out_dir)) {
        Ok(output) => {
            if json_output {
                print_json(&CommandOutput::ok(to_result(&output)))?;
            } else {
                print_summary(&output);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if json_output {
                print_json(&CommandOutput::<ComposeResult>::err(JsonError::from_backend(&e)))?;
            } else {
                eprintln!("{} {}", "FAILED".red().bold(), e);
            }
            Ok(ExitCode::from(EXIT_GENERATION_ERROR))
        }
    }
}

fn to_result(output: &ComposeOutput) -> ComposeResult {
    let composition = &output.composition;
    ComposeResult {
        notes_path: output.notes_path.display().to_string(),
        midi_path: output.midi_path.display().to_string(),
        genre: composition.genre.to_string(),
        emotion: composition.emotion.to_string(),
        scale: composition.scale.as_str().to_string(),
        tempo: composition.sequence.tempo,
        note_count: composition.sequence.notes.len(),
        duration_seconds: output.duration_seconds,
        sequence_hash: output.sequence_hash.clone(),
        midi_hash: output.midi_hash.clone(),
    }
}

fn print_summary(output: &ComposeOutput) {
    let composition = &output.composition;
    println!(
        "  {} {} / {} ({}, {} bpm)",
        "Profile:".dimmed(),
        composition.genre,
        composition.emotion,
        composition.scale.as_str(),
        composition.sequence.tempo
    );
    println!(
        "  {} {} intro + {} melody notes, {:.2}s",
        "Notes:".dimmed(),
        composition.intro().len(),
        composition.melody().len(),
        output.duration_seconds
    );
    println!("  {} {}", "Hash:".dimmed(), output.sequence_hash);
    println!("{} {}", "Wrote:".green().bold(), output.notes_path.display());
    println!("{} {}", "Wrote:".green().bold(), output.midi_path.display());
}
