use std::path::Path;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::download::{CoverImage, DownloadedMedia, TransferOutcome, TransferRequest};
use crate::error::{AppError, Result};
use crate::ports::{CoverFetcher, MediaTransfer, Pause};
use crate::ytmusic::SearchCandidate;

pub struct TrackDownloader {
    transfer: Box<dyn MediaTransfer>,
    covers: Box<dyn CoverFetcher>,
    pause: Box<dyn Pause>,
    max_delay: Duration,
}

impl TrackDownloader {
    pub fn new(
        transfer: Box<dyn MediaTransfer>,
        covers: Box<dyn CoverFetcher>,
        pause: Box<dyn Pause>,
        max_delay: Duration,
    ) -> Self {
        Self {
            transfer,
            covers,
            pause,
            max_delay,
        }
    }

    pub async fn download(
        &self,
        candidate: &SearchCandidate,
        destination_dir: &Path,
    ) -> Result<DownloadedMedia> {
        prepare_directory(destination_dir)?;

        self.random_delay().await;

        let request = TransferRequest::new(candidate.watch_url(), destination_dir);
        let outcomes = self.transfer.transfer(&request).await?;

        let audio_path = match outcomes.into_iter().next() {
            Some(TransferOutcome::File(path)) => path,
            Some(TransferOutcome::Error(detail)) => return Err(AppError::Download(detail)),
            None => return Err(AppError::Download(String::new())),
        };

        debug!("Downloaded {}", audio_path.display());

        let cover = self.download_cover(candidate, destination_dir).await;

        Ok(DownloadedMedia { audio_path, cover })
    }

    async fn random_delay(&self) {
        if self.max_delay.is_zero() {
            return;
        }

        let max_millis = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        let delay = Duration::from_millis(rand::rng().random_range(0..=max_millis));

        info!(
            "Sleeping for {:.3} seconds to mimic human behavior",
            delay.as_secs_f64()
        );
        self.pause.pause(delay).await;
    }

    async fn download_cover(
        &self,
        candidate: &SearchCandidate,
        destination_dir: &Path,
    ) -> Option<CoverImage> {
        let thumbnail = candidate.thumbnails.first()?;

        let bytes = match self.covers.fetch(&thumbnail.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Could not fetch cover for {}: {}", candidate.title, e);
                return None;
            }
        };

        let cover_path = destination_dir.join(format!("{}.jpg", Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&cover_path, &bytes).await {
            warn!("Could not save cover {}: {}", cover_path.display(), e);
            return None;
        }

        Some(CoverImage::new(cover_path))
    }
}

fn prepare_directory(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(AppError::InvalidPath(format!(
                "{} is not a directory",
                path.display()
            )));
        }
        return Ok(());
    }

    std::fs::create_dir_all(path)?;
    Ok(())
}
