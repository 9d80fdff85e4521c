pub mod cover;
pub mod downloader;
pub mod ytdlp;

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub use cover::HttpCoverFetcher;
pub use downloader::TrackDownloader;
pub use ytdlp::YtDlp;

pub const AUDIO_FORMAT: &str = "mp3";
/// yt-dlp VBR quality scale, 0 is best.
pub const AUDIO_QUALITY: &str = "0";
pub const OUTPUT_TEMPLATE: &str = "%(artist)s - %(track)s.%(ext)s";

/// What to hand to the transfer collaborator for one track.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub url: String,
    pub destination: PathBuf,
    pub audio_format: String,
    pub audio_quality: String,
    pub output_template: String,
}

impl TransferRequest {
    pub fn new(url: impl Into<String>, destination: &Path) -> Self {
        Self {
            url: url.into(),
            destination: destination.to_path_buf(),
            audio_format: AUDIO_FORMAT.to_string(),
            audio_quality: AUDIO_QUALITY.to_string(),
            output_template: OUTPUT_TEMPLATE.to_string(),
        }
    }
}

/// One entry of a transfer's result collection.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    File(PathBuf),
    Error(String),
}

/// Temporary cover image. The file is removed when this value is dropped.
#[derive(Debug)]
pub struct CoverImage {
    path: PathBuf,
}

impl CoverImage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CoverImage {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed cover image {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove cover image {}: {}", self.path.display(), e),
        }
    }
}

#[derive(Debug)]
pub struct DownloadedMedia {
    pub audio_path: PathBuf,
    pub cover: Option<CoverImage>,
}

impl DownloadedMedia {
    pub fn cover_path(&self) -> Option<&Path> {
        self.cover.as_ref().map(CoverImage::path)
    }

    /// Deletes the cover image (if any) and keeps only the audio file.
    pub fn release_cover(self) -> PathBuf {
        let DownloadedMedia { audio_path, cover } = self;
        drop(cover);
        audio_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_request_defaults() {
        let request = TransferRequest::new("https://www.youtube.com/watch?v=abc", Path::new("/music/Mix"));

        assert_eq!(request.audio_format, "mp3");
        assert_eq!(request.audio_quality, "0");
        assert_eq!(request.output_template, "%(artist)s - %(track)s.%(ext)s");
        assert_eq!(request.destination, PathBuf::from("/music/Mix"));
    }

    #[test]
    fn test_release_cover_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let cover_path = dir.path().join("cover.jpg");
        std::fs::write(&cover_path, b"\xFF\xD8\xFF").unwrap();

        let media = DownloadedMedia {
            audio_path: dir.path().join("Artist - Title.mp3"),
            cover: Some(CoverImage::new(cover_path.clone())),
        };
        assert_eq!(media.cover_path(), Some(cover_path.as_path()));

        let audio_path = media.release_cover();
        assert_eq!(audio_path, dir.path().join("Artist - Title.mp3"));
        assert!(!cover_path.exists());
    }

    #[test]
    fn test_cover_removed_on_drop_even_if_already_gone() {
        let dir = tempfile::tempdir().unwrap();
        let cover_path = dir.path().join("gone.jpg");

        // Nothing to remove; dropping must not panic.
        drop(CoverImage::new(cover_path.clone()));

        std::fs::write(&cover_path, b"x").unwrap();
        drop(CoverImage::new(cover_path.clone()));
        assert!(!cover_path.exists());
    }
}
