use std::path::PathBuf;

use tokio::process::Command;
use tracing::debug;

use crate::download::{TransferOutcome, TransferRequest};
use crate::error::{AppError, Result};
use crate::ports::MediaTransfer;

/// Runs the `yt-dlp` binary for each transfer.
pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn build_args(request: &TransferRequest) -> Vec<String> {
        vec![
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            "--no-playlist".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            request.audio_format.clone(),
            "--audio-quality".to_string(),
            request.audio_quality.clone(),
            "--paths".to_string(),
            request.destination.to_string_lossy().into_owned(),
            "--output".to_string(),
            request.output_template.clone(),
            "--no-simulate".to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            request.url.clone(),
        ]
    }
}

#[async_trait::async_trait]
impl MediaTransfer for YtDlp {
    async fn transfer(&self, request: &TransferRequest) -> Result<Vec<TransferOutcome>> {
        let args = Self::build_args(request);
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                AppError::Download(format!("failed to run {}: {}", self.binary.display(), e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        Ok(collect_outcomes(&stdout, &stderr, output.status.success()))
    }
}

/// Turns yt-dlp's printed file paths and exit status into transfer outcomes.
/// A failed run contributes a leading error so it is what callers see first.
///
/// yt-dlp prints `--paths` joined with the file name, so a relative path is
/// relative to the working directory, not to the destination.
pub fn collect_outcomes(stdout: &str, stderr: &str, success: bool) -> Vec<TransferOutcome> {
    let mut outcomes: Vec<TransferOutcome> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let path = PathBuf::from(line);
            TransferOutcome::File(std::path::absolute(&path).unwrap_or(path))
        })
        .collect();

    if !success {
        let detail = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .unwrap_or("yt-dlp exited with an error")
            .to_string();
        outcomes.insert(0, TransferOutcome::Error(detail));
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_build_args() {
        let request = TransferRequest::new("https://www.youtube.com/watch?v=abc", Path::new("/music/Mix"));
        let args = YtDlp::build_args(&request);

        let joined = args.join(" ");
        assert!(joined.contains("--extract-audio --audio-format mp3 --audio-quality 0"));
        assert!(joined.contains("--paths /music/Mix"));
        assert!(joined.contains("--output %(artist)s - %(track)s.%(ext)s"));
        assert!(joined.contains("--print after_move:filepath"));
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/watch?v=abc");
    }

    #[test]
    fn test_collect_outcomes_success() {
        let outcomes = collect_outcomes("/music/Mix/Portishead - Roads.mp3\n", "", true);
        assert_eq!(
            outcomes,
            vec![TransferOutcome::File(PathBuf::from("/music/Mix/Portishead - Roads.mp3"))]
        );
    }

    #[test]
    fn test_collect_outcomes_relative_path_resolves_from_working_dir() {
        // `--paths music/Mix` makes yt-dlp print the already joined path.
        let outcomes = collect_outcomes("music/Mix/Portishead - Roads.mp3\n", "", true);
        assert_eq!(
            outcomes,
            vec![TransferOutcome::File(
                std::env::current_dir()
                    .unwrap()
                    .join("music/Mix/Portishead - Roads.mp3")
            )]
        );
    }

    #[test]
    fn test_collect_outcomes_failure_comes_first() {
        let outcomes = collect_outcomes(
            "",
            "WARNING: something\nERROR: [youtube] abc: Video unavailable\n",
            false,
        );
        assert_eq!(
            outcomes,
            vec![TransferOutcome::Error("ERROR: [youtube] abc: Video unavailable".to_string())]
        );
    }

    #[test]
    fn test_collect_outcomes_nothing_produced() {
        assert!(collect_outcomes("", "", true).is_empty());
    }
}
