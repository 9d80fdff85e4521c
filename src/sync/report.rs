use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistStatus {
    /// Destination already existed, nothing was done.
    Skipped,
    /// Playlist file written (possibly with some tracks missing).
    Written,
    /// Tracks could not be fetched or the playlist file was not written.
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub playlist_name: String,
    pub status: PlaylistStatus,
    pub total_tracks: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub failed_tracks: Vec<FailedTrack>,
    pub playlist_path: Option<PathBuf>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedTrack {
    pub artist: String,
    pub album: String,
    pub title: String,
    pub kind: String,
    pub reason: String,
}

impl SyncReport {
    pub fn new(playlist_name: String) -> Self {
        Self {
            playlist_name,
            status: PlaylistStatus::Failed,
            total_tracks: 0,
            downloaded: 0,
            failed: 0,
            success_rate: 0.0,
            failed_tracks: Vec::new(),
            playlist_path: None,
            error: None,
        }
    }

    pub fn skipped(playlist_name: String) -> Self {
        Self {
            status: PlaylistStatus::Skipped,
            ..Self::new(playlist_name)
        }
    }

    pub fn calculate_success_rate(&mut self) {
        if self.total_tracks > 0 {
            self.success_rate = (self.downloaded as f64 / self.total_tracks as f64) * 100.0;
        }
    }
}

pub fn print_summary(reports: &[SyncReport]) {
    let written = reports
        .iter()
        .filter(|r| r.status == PlaylistStatus::Written)
        .count();
    let skipped = reports
        .iter()
        .filter(|r| r.status == PlaylistStatus::Skipped)
        .count();
    let failed = reports.len() - written - skipped;
    let total_tracks: usize = reports.iter().map(|r| r.total_tracks).sum();
    let total_downloaded: usize = reports.iter().map(|r| r.downloaded).sum();
    let total_failed: usize = reports.iter().map(|r| r.failed).sum();

    println!();
    println!("{}", "=".repeat(60));
    println!("{}", "SYNC SUMMARY".bold());
    println!("{}", "=".repeat(60));
    println!(
        "Playlists: {} written, {} skipped, {} failed",
        written.to_string().green(),
        skipped,
        failed.to_string().red()
    );
    println!("Total tracks processed: {}", total_tracks);
    println!("Downloaded: {}", total_downloaded.to_string().green());
    println!("Failed: {}", total_failed.to_string().red());
    println!("{}", "=".repeat(60));

    let synced: Vec<&SyncReport> = reports
        .iter()
        .filter(|r| r.status != PlaylistStatus::Skipped)
        .collect();
    if synced.is_empty() {
        return;
    }

    println!("\nPlaylist breakdown:");
    for report in synced {
        let rate = format!("{:.1}%", report.success_rate);
        let status = match report.status {
            PlaylistStatus::Failed => "failed".red(),
            _ if report.success_rate >= 90.0 => rate.green(),
            _ if report.success_rate >= 70.0 => rate.yellow(),
            _ => rate.red(),
        };

        println!(
            "  {}: {}/{} ({})",
            report.playlist_name, report.downloaded, report.total_tracks, status
        );
        for track in &report.failed_tracks {
            println!(
                "     {} {} - {}: {}",
                "x".red(),
                track.artist,
                track.title,
                track.reason
            );
        }
    }
}
