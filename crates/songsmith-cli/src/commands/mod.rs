//! Command implementations for the songsmith CLI.

pub mod compose;
pub mod json_output;
pub mod mix;
pub mod sing;

use std::process::ExitCode;

use songsmith_backend_audio::AudioError;
use songsmith_spec::SpecError;

/// Exit code for a bad or missing input.
pub const EXIT_INPUT_ERROR: u8 = 1;
/// Exit code for a failure while generating output.
pub const EXIT_GENERATION_ERROR: u8 = 2;

/// Maps an audio backend error to the process exit code.
pub fn audio_exit_code(err: &AudioError) -> ExitCode {
    let input = match err {
        AudioError::InputMissing { .. }
        | AudioError::InvalidSampleRate { .. }
        | AudioError::InvalidParameter { .. }
        | AudioError::Wav { .. } => true,
        AudioError::Spec(spec) => spec_is_input(spec),
        AudioError::BackendUnavailable { .. }
        | AudioError::FrameGridMismatch { .. }
        | AudioError::AnalysisSizeMismatch { .. }
        | AudioError::FftSizeMismatch { .. }
        | AudioError::Io(_) => false,
    };
    ExitCode::from(if input {
        EXIT_INPUT_ERROR
    } else {
        EXIT_GENERATION_ERROR
    })
}

/// Config and artifact problems are the caller's; I/O is not.
fn spec_is_input(err: &SpecError) -> bool {
    !matches!(err, SpecError::Io(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_input_is_exit_one() {
        let err = AudioError::InputMissing {
            path: PathBuf::from("speech.wav"),
        };
        assert_eq!(audio_exit_code(&err), ExitCode::from(EXIT_INPUT_ERROR));
    }

    #[test]
    fn test_invalid_config_is_exit_one() {
        let err = AudioError::Spec(SpecError::invalid_config("alpha", "out of range"));
        assert_eq!(audio_exit_code(&err), ExitCode::from(EXIT_INPUT_ERROR));
    }

    #[test]
    fn test_write_failure_is_exit_two() {
        let err = AudioError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(audio_exit_code(&err), ExitCode::from(EXIT_GENERATION_ERROR));
    }
}
