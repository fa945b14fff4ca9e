use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::FfmpegConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::process::run_command;

/// Whether the file is already a WAV container, judged by extension
pub fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
}

/// Where the converted WAV for `input` is written: a sibling with a `.wav` extension
pub fn converted_path(input: &Path) -> PathBuf {
    input.with_extension("wav")
}

/// Perform Stage 0: make sure the audio is a WAV the diarizer can read
///
/// WAV input is returned untouched. Anything else is converted by ffmpeg to
/// 16 kHz mono PCM next to the original, overwriting any previous conversion.
pub async fn normalize_audio(input: &Path, config: &FfmpegConfig) -> PipelineResult<PathBuf> {
    if is_wav(input) {
        debug!("{:?} is already WAV, skipping conversion", input);
        return Ok(input.to_path_buf());
    }

    let output = converted_path(input);
    info!(
        "Converting {:?} to WAV for diarization...",
        input.file_name().unwrap_or(input.as_os_str())
    );

    let args = build_ffmpeg_args(input, &output);
    run_command(&config.binary, &args, config.timeout)
        .await
        .map_err(|e| match e {
            PipelineError::CommandFailed { .. } | PipelineError::CommandTimedOut { .. } => {
                PipelineError::Conversion(e.to_string())
            }
            other => other,
        })?;

    if !output.exists() {
        return Err(PipelineError::Conversion(format!(
            "ffmpeg reported success but {} was not written",
            output.display()
        )));
    }

    Ok(output)
}

fn build_ffmpeg_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-y".to_string(),
        "-i".to_string(),
        input.display().to_string(),
        "-ar".to_string(),
        "16000".to_string(),
        "-ac".to_string(),
        "1".to_string(),
        "-c:a".to_string(),
        "pcm_s16le".to_string(),
        output.display().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_wav_case_insensitive() {
        assert!(is_wav(Path::new("talk.wav")));
        assert!(is_wav(Path::new("talk.WAV")));
        assert!(!is_wav(Path::new("talk.m4a")));
        assert!(!is_wav(Path::new("talk")));
        assert!(!is_wav(Path::new("wav")));
    }

    #[test]
    fn test_converted_path_is_sibling() {
        assert_eq!(
            converted_path(Path::new("/data/meeting.m4a")),
            PathBuf::from("/data/meeting.wav")
        );
    }

    #[test]
    fn test_ffmpeg_args_end_with_output() {
        let args = build_ffmpeg_args(Path::new("in.mp3"), Path::new("in.wav"));
        assert_eq!(args.last().map(String::as_str), Some("in.wav"));
        let input_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input_pos + 1], "in.mp3");
        assert!(args.contains(&"-y".to_string()));
    }

    #[tokio::test]
    async fn test_wav_input_is_passed_through() {
        let config = FfmpegConfig {
            binary: "definitely-not-ffmpeg".to_string(),
            timeout: None,
        };
        let path = normalize_audio(Path::new("/data/a.wav"), &config)
            .await
            .unwrap();
        assert_eq!(path, PathBuf::from("/data/a.wav"));
    }

    #[tokio::test]
    async fn test_missing_ffmpeg_is_reported() {
        let config = FfmpegConfig {
            binary: "definitely-not-ffmpeg".to_string(),
            timeout: None,
        };
        let err = normalize_audio(Path::new("/data/a.mp3"), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::CommandMissing { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_converter_is_conversion_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.mp3");
        std::fs::write(&input, b"not audio").unwrap();
        let config = FfmpegConfig {
            binary: "false".to_string(),
            timeout: None,
        };
        let err = normalize_audio(&input, &config).await.unwrap_err();
        assert!(matches!(err, PipelineError::Conversion(_)));
    }
}
