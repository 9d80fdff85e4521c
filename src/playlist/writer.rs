use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::playlist::PlaylistResult;
use crate::playlist::m3u::{M3U_EXTENSION, M3uPlaylist};
use crate::sanitize::sanitize_filename;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaylistWriter;

impl PlaylistWriter {
    pub fn new() -> Self {
        Self
    }

    /// Writes `{destination_dir}/{title}.m3u`, overwriting an existing file of that name.
    /// Nothing is written when the playlist fails validation.
    pub fn write(&self, destination_dir: &Path, result: &PlaylistResult) -> Result<PathBuf> {
        let playlist = build_playlist(destination_dir, result);
        playlist.validate()?;

        let path = playlist_path(destination_dir, &result.title);
        std::fs::write(&path, playlist.render())?;

        info!(
            "Wrote playlist {} with {} entries",
            path.display(),
            playlist.entries().len()
        );
        Ok(path)
    }
}

pub fn playlist_path(destination_dir: &Path, title: &str) -> PathBuf {
    destination_dir.join(format!("{}.{}", sanitize_filename(title), M3U_EXTENSION))
}

pub fn build_playlist(destination_dir: &Path, result: &PlaylistResult) -> M3uPlaylist {
    let mut playlist = M3uPlaylist::new(header_title(&result.title));
    for item in &result.items {
        playlist.push(entry_path(destination_dir, &item.audio_path));
    }
    playlist
}

/// Remote titles may span lines; the `#PLAYLIST:` header must not.
pub fn header_title(title: &str) -> String {
    title
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Path of `audio_path` as stored in the playlist: relative to `destination_dir`
/// when the file lives under it, absolute otherwise.
pub fn entry_path(destination_dir: &Path, audio_path: &Path) -> String {
    let base = std::fs::canonicalize(destination_dir).unwrap_or_else(|_| destination_dir.to_path_buf());
    let file = std::fs::canonicalize(audio_path).unwrap_or_else(|_| audio_path.to_path_buf());

    match file.strip_prefix(&base) {
        Ok(relative) => {
            let relative = relative.to_string_lossy().into_owned();
            // Keep names like "#1 Crush.mp3" from reading as M3U directives.
            if relative.starts_with('#') {
                format!("./{}", relative)
            } else {
                relative
            }
        }
        Err(_) => file.to_string_lossy().into_owned(),
    }
}
