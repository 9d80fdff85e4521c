use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::download::{HttpCoverFetcher, TrackDownloader, YtDlp};
use crate::error::{Result, TrackFailure};
use crate::listenbrainz::{ListenBrainzClient, RemotePlaylist, TrackDescriptor};
use crate::matcher::TrackMatcher;
use crate::playlist::{PlaylistResult, PlaylistWriter, ProcessedItem};
use crate::ports::{MusicSearch, PlaylistSource, TagWriter, TokioPause};
use crate::sanitize::sanitize_filename;
use crate::sync::report::{FailedTrack, PlaylistStatus, SyncReport};
use crate::tagger::LoftyTagger;
use crate::ytmusic::{CandidateKind, YtMusicClient};

pub struct PlaylistSync {
    playlists: Box<dyn PlaylistSource>,
    search: Box<dyn MusicSearch>,
    downloader: TrackDownloader,
    tagger: Box<dyn TagWriter>,
    writer: PlaylistWriter,
    matcher: TrackMatcher,
    username: String,
    destination_root: PathBuf,
    report_dir: Option<PathBuf>,
}

impl PlaylistSync {
    /// Wires the production collaborators: ListenBrainz, YouTube Music, yt-dlp and lofty.
    pub fn new(config: &Config) -> Result<Self> {
        let downloader = TrackDownloader::new(
            Box::new(YtDlp::new(&config.ytdlp_path)),
            Box::new(HttpCoverFetcher::new()?),
            Box::new(TokioPause),
            config.max_sleep,
        );

        Ok(Self::with_collaborators(
            config,
            Box::new(ListenBrainzClient::new()?),
            Box::new(YtMusicClient::new()?),
            downloader,
            Box::new(LoftyTagger),
        ))
    }

    pub fn with_collaborators(
        config: &Config,
        playlists: Box<dyn PlaylistSource>,
        search: Box<dyn MusicSearch>,
        downloader: TrackDownloader,
        tagger: Box<dyn TagWriter>,
    ) -> Self {
        Self {
            playlists,
            search,
            downloader,
            tagger,
            writer: PlaylistWriter::new(),
            matcher: TrackMatcher::new(config.try_songs),
            username: config.listenbrainz_username.clone(),
            destination_root: config.destination_path.clone(),
            report_dir: config.report_dir.clone(),
        }
    }

    pub async fn list_playlists(&self) -> Result<Vec<RemotePlaylist>> {
        self.playlists.playlists_created_for(&self.username).await
    }

    pub async fn sync_all(&self) -> Result<Vec<SyncReport>> {
        let playlists = self.list_playlists().await?;
        self.sync_playlists(&playlists).await
    }

    /// Syncs only the remote playlists whose names match (case-insensitive).
    pub async fn sync_named(&self, names: &[String]) -> Result<Vec<SyncReport>> {
        let all_playlists = self.list_playlists().await?;

        for name in names {
            if !all_playlists
                .iter()
                .any(|p| p.name.to_lowercase() == name.to_lowercase())
            {
                warn!("No playlist named '{}' found for {}", name, self.username);
            }
        }

        let selected: Vec<RemotePlaylist> = all_playlists
            .into_iter()
            .filter(|p| {
                names
                    .iter()
                    .any(|name| p.name.to_lowercase() == name.to_lowercase())
            })
            .collect();

        if selected.is_empty() {
            warn!("No valid playlists found to sync");
            return Ok(Vec::new());
        }

        self.sync_playlists(&selected).await
    }

    async fn sync_playlists(&self, playlists: &[RemotePlaylist]) -> Result<Vec<SyncReport>> {
        info!(
            "Starting sync of {} playlists into {}",
            playlists.len(),
            self.destination_root.display()
        );

        let pb = ProgressBar::new(playlists.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut reports = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            pb.set_message(format!("Syncing: {}", playlist.name));
            reports.push(self.sync_playlist(playlist).await);
            pb.inc(1);
        }

        pb.finish_and_clear();
        info!("Done");

        if let Some(dir) = &self.report_dir {
            save_reports(dir, &reports)?;
        }

        Ok(reports)
    }

    /// Materializes one remote playlist under `{root}/{sanitized name}`.
    /// An existing destination means the playlist was synced before and is skipped.
    pub async fn sync_playlist(&self, playlist: &RemotePlaylist) -> SyncReport {
        info!("Processing playlist {}", playlist.name);

        let destination_dir = self.destination_root.join(sanitize_filename(&playlist.name));
        debug!("Checking if playlist exists at {}", destination_dir.display());

        if destination_dir.exists() {
            info!(
                "Skipping {}, since this playlist already exists in the download directory",
                playlist.name
            );
            return SyncReport::skipped(playlist.name.clone());
        }

        let mut report = SyncReport::new(playlist.name.clone());

        let tracks = match self.playlists.tracks(playlist.id).await {
            Ok(tracks) => tracks,
            Err(e) => {
                error!("Could not fetch tracks for {}: {}", playlist.name, e);
                report.error = Some(e.to_string());
                return report;
            }
        };
        report.total_tracks = tracks.len();

        if let Err(e) = fs::create_dir(&destination_dir) {
            error!(
                "Could not create {}: {}",
                destination_dir.display(),
                e
            );
            report.error = Some(e.to_string());
            return report;
        }

        let mut result = PlaylistResult {
            title: playlist.name.clone(),
            items: Vec::new(),
        };

        for track in &tracks {
            info!("Downloading {} ({})", track, track.album);

            match self.process_track(track, &destination_dir).await {
                Ok(item) => {
                    report.downloaded += 1;
                    result.items.push(item);
                }
                Err(failure) => {
                    log_track_failure(track, &failure);
                    report.failed += 1;
                    report.failed_tracks.push(FailedTrack {
                        artist: track.artist.clone(),
                        album: track.album.clone(),
                        title: track.title.clone(),
                        kind: failure.kind().to_string(),
                        reason: failure.to_string(),
                    });
                }
            }
        }

        report.calculate_success_rate();

        info!("Generating playlist file for {}", playlist.name);
        match self.writer.write(&destination_dir, &result) {
            Ok(path) => {
                report.status = PlaylistStatus::Written;
                report.playlist_path = Some(path);
            }
            Err(e) => {
                error!("Could not generate playlist for {}: {}", playlist.name, e);
                report.error = Some(e.to_string());
            }
        }

        info!(
            "Playlist sync completed: {} - {}/{} tracks downloaded ({:.1}% success rate)",
            playlist.name, report.downloaded, report.total_tracks, report.success_rate
        );

        report
    }

    async fn process_track(
        &self,
        track: &TrackDescriptor,
        destination_dir: &Path,
    ) -> std::result::Result<ProcessedItem, TrackFailure> {
        let candidates = self
            .search
            .search(
                &track.to_string(),
                CandidateKind::Song,
                self.matcher.max_candidates(),
            )
            .await?;

        let candidate = self.matcher.matches(track, &candidates)?;
        debug!("Matched {} to {}", track, candidate.watch_url());

        let media = self.downloader.download(&candidate, destination_dir).await?;

        let tagged = self.tagger.fill_tags(&media, track);
        let audio_path = media.release_cover();

        if let Err(e) = tagged {
            remove_untagged(&audio_path);
            return Err(e.into());
        }

        Ok(ProcessedItem {
            track: track.clone(),
            audio_path,
        })
    }
}

fn log_track_failure(track: &TrackDescriptor, failure: &TrackFailure) {
    match failure {
        TrackFailure::NotFound => warn!("Track not found: {}", track),
        TrackFailure::Mismatch {
            scanned,
            closest: Some((closest, score)),
        } => warn!(
            "Got a mismatched track for {}: closest of {} candidates was {} ({:.2})",
            track, scanned, closest, score
        ),
        TrackFailure::Mismatch { scanned, closest: None } => {
            warn!("Got a mismatched track for {} ({} candidates)", track, scanned)
        }
        TrackFailure::Download(detail) => warn!("Could not download track {}: {}", track, detail),
        TrackFailure::Tag(detail) => warn!("Could not tag track {}: {}", track, detail),
        TrackFailure::Unknown(detail) => error!("Unknown error for {}: {}", track, detail),
    }
}

fn remove_untagged(audio_path: &Path) {
    if let Err(e) = fs::remove_file(audio_path) {
        warn!(
            "Could not remove untagged file {}: {}",
            audio_path.display(),
            e
        );
    }
}

fn save_reports(dir: &Path, reports: &[SyncReport]) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    fs::create_dir_all(dir)?;

    let filename = dir.join(format!("sync_report_{}.json", timestamp));
    let json = serde_json::to_string_pretty(reports)?;

    fs::write(&filename, json)?;

    info!("Sync report saved to: {}", filename.display());

    Ok(filename)
}
