//! Output directory for generated artifacts
//!
//! Layout under the root:
//! - `songs/`  MIDI files
//! - `images/` PNG album art
//! - `videos/` reserved, nothing is written there yet
//! - `lyrics_<record id>_<suffix>.txt` at the top level
//!
//! References handed back to callers are paths relative to the root, which
//! is also how the HTTP layer serves them.

use chrono::{DateTime, Utc};
use museai_common::{Error, Genre, Result};
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Kind of file an artifact is stored as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Song,
    Image,
    Lyrics,
}

impl ArtifactKind {
    fn subdir(&self) -> Option<&'static str> {
        match self {
            ArtifactKind::Song => Some("songs"),
            ArtifactKind::Image => Some("images"),
            ArtifactKind::Lyrics => None,
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            ArtifactKind::Song => "song",
            ArtifactKind::Image => "art",
            ArtifactKind::Lyrics => "lyrics",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Song => "mid",
            ArtifactKind::Image => "png",
            ArtifactKind::Lyrics => "txt",
        }
    }
}

/// When, and as which item of a request, an artifact was produced
#[derive(Debug, Clone, Copy)]
pub struct ArtifactStamp {
    pub created: DateTime<Utc>,
    pub index: u32,
}

/// Root of the artifact output tree
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and its subdirectories; safe to call repeatedly
    pub fn ensure_directories(&self) -> Result<()> {
        for sub in ["songs", "images", "videos"] {
            std::fs::create_dir_all(self.root.join(sub))?;
        }
        Ok(())
    }

    /// File name for a generated artifact
    ///
    /// `<prefix>_<unix seconds>_<index>_<genre>_<8 hex chars>.<ext>`; the
    /// random suffix keeps concurrent requests in the same second apart.
    pub fn file_name(&self, kind: ArtifactKind, genre: Genre, stamp: &ArtifactStamp) -> String {
        format!(
            "{}_{}_{}_{}_{}.{}",
            kind.prefix(),
            stamp.created.timestamp(),
            stamp.index,
            genre.as_str(),
            random_suffix(),
            kind.extension()
        )
    }

    /// Write under a freshly generated name, returning the relative reference
    pub fn save(
        &self,
        kind: ArtifactKind,
        genre: Genre,
        stamp: &ArtifactStamp,
        bytes: &[u8],
    ) -> Result<String> {
        let name = self.file_name(kind, genre, stamp);
        self.save_named(kind, &name, bytes)
    }

    /// Write under an explicit file name, returning the relative reference
    pub fn save_named(&self, kind: ArtifactKind, file_name: &str, bytes: &[u8]) -> Result<String> {
        if !is_plain_file_name(file_name) {
            return Err(Error::Internal(format!(
                "artifact name '{}' must be a plain file name",
                file_name
            )));
        }

        let reference = match kind.subdir() {
            Some(sub) => format!("{}/{}", sub, file_name),
            None => file_name.to_string(),
        };
        let path = self.resolve(&reference);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(reference)
    }

    /// Lyrics file named after the generation record
    ///
    /// `lyrics_<record id>_<8 hex chars>.txt`; record ids repeat across
    /// requests in the same second, the suffix does not.
    pub fn save_lyrics(&self, record_id: &str, lyrics: &str) -> Result<String> {
        let name = format!(
            "{}_{}_{}.{}",
            ArtifactKind::Lyrics.prefix(),
            record_id,
            random_suffix(),
            ArtifactKind::Lyrics.extension()
        );
        self.save_named(ArtifactKind::Lyrics, &name, lyrics.as_bytes())
    }

    /// Absolute location of a reference returned by `save`
    pub fn resolve(&self, reference: &str) -> PathBuf {
        self.root.join(reference)
    }
}

/// First 8 hex characters of a random UUID
fn random_suffix() -> String {
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(8);
    suffix
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
