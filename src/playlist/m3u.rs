use crate::error::{AppError, Result};

pub const M3U_EXTENSION: &str = "m3u";

/// Extended M3U document: a `#PLAYLIST:` title header followed by path entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct M3uPlaylist {
    title: String,
    entries: Vec<String>,
}

impl M3uPlaylist {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, path: impl Into<String>) {
        self.entries.push(path.into());
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Generation("playlist title is empty".into()));
        }
        if has_line_break(&self.title) {
            return Err(AppError::Generation(format!(
                "playlist title '{}' contains a line break",
                self.title.escape_debug()
            )));
        }

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.trim().is_empty() {
                return Err(AppError::Generation(format!("entry {} is empty", index + 1)));
            }
            if has_line_break(entry) {
                return Err(AppError::Generation(format!(
                    "entry {} contains a line break",
                    index + 1
                )));
            }
            if entry.starts_with('#') {
                return Err(AppError::Generation(format!(
                    "entry {} would be read as a directive: {}",
                    index + 1,
                    entry
                )));
            }
        }

        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = String::from("#EXTM3U\n");
        out.push_str(&format!("#PLAYLIST:{}\n", self.title));
        for entry in &self.entries {
            out.push_str(entry);
            out.push('\n');
        }
        out
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains('\n') || value.contains('\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let mut playlist = M3uPlaylist::new("Weekly Jams");
        playlist.push("Portishead - Roads.mp3");
        playlist.push("Massive Attack - Teardrop.mp3");

        assert!(playlist.validate().is_ok());
        assert_eq!(
            playlist.render(),
            "#EXTM3U\n#PLAYLIST:Weekly Jams\nPortishead - Roads.mp3\nMassive Attack - Teardrop.mp3\n"
        );
    }

    #[test]
    fn test_render_without_entries() {
        let playlist = M3uPlaylist::new("Empty");
        assert!(playlist.validate().is_ok());
        assert_eq!(playlist.render(), "#EXTM3U\n#PLAYLIST:Empty\n");
    }

    #[test]
    fn test_validate_rejects_malformed() {
        assert!(M3uPlaylist::new("").validate().is_err());
        assert!(M3uPlaylist::new("Two\nLines").validate().is_err());

        let mut empty_entry = M3uPlaylist::new("Mix");
        empty_entry.push("  ");
        assert!(matches!(empty_entry.validate(), Err(AppError::Generation(_))));

        let mut broken_entry = M3uPlaylist::new("Mix");
        broken_entry.push("a.mp3\r\nb.mp3");
        assert!(broken_entry.validate().is_err());

        let mut directive = M3uPlaylist::new("Mix");
        directive.push("#EXTINF:-1,x");
        assert!(directive.validate().is_err());
    }
}
