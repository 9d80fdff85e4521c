use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::Accessor;
use lofty::read_from_path;
use lofty::tag::{ItemKey, Tag};
use tracing::debug;

use crate::download::DownloadedMedia;
use crate::error::{AppError, Result};
use crate::listenbrainz::TrackDescriptor;
use crate::ports::TagWriter;

/// Writes title, artist, album, album artist and cover art with lofty.
pub struct LoftyTagger;

impl TagWriter for LoftyTagger {
    fn fill_tags(&self, media: &DownloadedMedia, track: &TrackDescriptor) -> Result<()> {
        let path = &media.audio_path;

        let mut tagged_file = read_from_path(path)
            .map_err(|e| AppError::Tag(format!("Failed to read {}: {}", path.display(), e)))?;

        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| AppError::Tag(format!("No writable tag available for {:?}", tag_type)))?;

        tag.set_title(track.title.clone());
        tag.set_artist(track.artist.clone());
        tag.set_album(track.album.clone());
        // Album artist is not tracked separately.
        tag.insert_text(ItemKey::AlbumArtist, track.artist.clone());

        if let Some(cover_path) = media.cover_path() {
            let data = std::fs::read(cover_path).map_err(|e| {
                AppError::Tag(format!("Failed to read cover {}: {}", cover_path.display(), e))
            })?;
            tag.remove_picture_type(PictureType::CoverFront);
            tag.push_picture(Picture::new_unchecked(
                PictureType::CoverFront,
                Some(MimeType::Jpeg),
                None,
                data,
            ));
        }

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .map_err(|e| AppError::Tag(format!("Failed to write tags: {}", e)))?;

        debug!("Tagged {} as {}", path.display(), track);
        Ok(())
    }
}
