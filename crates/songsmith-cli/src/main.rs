//! Songsmith CLI - compose melodies and sing speech along them
//!
//! `compose` writes a note artifact and MIDI file for a prompt, `sing` turns a
//! speech recording into a vocal following that artifact, and `mix` lays the
//! vocal over a rendered instrumental.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use songsmith_cli::{commands, setup_tracing};

/// Songsmith - Prompt-to-song generation
#[derive(Parser)]
#[command(name = "songsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a melody for a prompt and write its note artifact and MIDI file
    Compose {
        /// Free-text prompt; the same prompt always composes the same melody
        prompt: String,

        /// Mood (happy, sad, calm, angry, neutral)
        #[arg(short, long, default_value = "neutral")]
        emotion: String,

        /// Genre (lofi, pop, classical, default)
        #[arg(short, long, default_value = "default")]
        genre: String,

        /// Output directory for the generated files
        #[arg(short, long, default_value = ".")]
        out_dir: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Turn a speech recording into a vocal that follows a composed melody
    Sing {
        /// Speech WAV file
        #[arg(short, long)]
        speech: String,

        /// Note artifact written by `compose`
        #[arg(short, long)]
        notes: String,

        /// Output WAV path
        #[arg(short, long)]
        output: String,

        /// JSON file overriding vocal pipeline defaults
        #[arg(short, long)]
        config: Option<String>,

        /// Weight of the melody in the pitch blend (0 = speech, 1 = melody)
        #[arg(long)]
        alpha: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Overlay a vocal on an instrumental track
    Mix {
        /// Instrumental WAV file
        #[arg(short, long)]
        instrumental: String,

        /// Vocal WAV file
        #[arg(short, long)]
        vocal: String,

        /// Output WAV path
        #[arg(short, long)]
        output: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing() {
        eprintln!("{}: {}", colored::Colorize::yellow("warning"), e);
    }

    let result = match cli.command {
        Commands::Compose {
            prompt,
            emotion,
            genre,
            out_dir,
            json,
        } => commands::compose::run(&prompt, &emotion, &genre, &out_dir, json),
        Commands::Sing {
            speech,
            notes,
            output,
            config,
            alpha,
            json,
        } => commands::sing::run(&speech, &notes, &output, config.as_deref(), alpha, json),
        Commands::Mix {
            instrumental,
            vocal,
            output,
            json,
        } => commands::mix::run(&instrumental, &vocal, &output, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(commands::EXIT_INPUT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_parses_compose_defaults() {
        let cli = Cli::try_parse_from(["songsmith", "compose", "a calm evening"]).unwrap();
        match cli.command {
            Commands::Compose {
                prompt,
                emotion,
                genre,
                out_dir,
                json,
            } => {
                assert_eq!(prompt, "a calm evening");
                assert_eq!(emotion, "neutral");
                assert_eq!(genre, "default");
                assert_eq!(out_dir, ".");
                assert!(!json);
            }
            _ => panic!("expected compose command"),
        }
    }

    #[test]
    fn test_cli_parses_compose_with_profile() {
        let cli = Cli::try_parse_from([
            "songsmith",
            "compose",
            "storm",
            "--emotion",
            "angry",
            "-g",
            "pop",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Compose {
                emotion, genre, json, ..
            } => {
                assert_eq!(emotion, "angry");
                assert_eq!(genre, "pop");
                assert!(json);
            }
            _ => panic!("expected compose command"),
        }
    }

    #[test]
    fn test_cli_parses_sing() {
        let cli = Cli::try_parse_from([
            "songsmith",
            "sing",
            "--speech",
            "speech.wav",
            "--notes",
            "music_abc.notes.json",
            "--output",
            "vocal.wav",
            "--alpha",
            "0.7",
        ])
        .unwrap();
        match cli.command {
            Commands::Sing {
                speech,
                notes,
                output,
                config,
                alpha,
                json,
            } => {
                assert_eq!(speech, "speech.wav");
                assert_eq!(notes, "music_abc.notes.json");
                assert_eq!(output, "vocal.wav");
                assert_eq!(config, None);
                assert_eq!(alpha, Some(0.7));
                assert!(!json);
            }
            _ => panic!("expected sing command"),
        }
    }

    #[test]
    fn test_cli_sing_requires_notes() {
        let result = Cli::try_parse_from(["songsmith", "sing", "--speech", "s.wav", "--output", "v.wav"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_mix() {
        let cli = Cli::try_parse_from([
            "songsmith",
            "mix",
            "-i",
            "inst.wav",
            "-v",
            "vocal.wav",
            "-o",
            "song.wav",
        ])
        .unwrap();
        match cli.command {
            Commands::Mix {
                instrumental,
                vocal,
                output,
                json,
            } => {
                assert_eq!(instrumental, "inst.wav");
                assert_eq!(vocal, "vocal.wav");
                assert_eq!(output, "song.wav");
                assert!(!json);
            }
            _ => panic!("expected mix command"),
        }
    }
}
