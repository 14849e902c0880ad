//! Persistent favorites list.
//!
//! Favorites are keyed by an id derived from the content itself, so
//! toggling the same recommendation twice always round-trips back to
//! the starting state. The list is persisted as a small versioned
//! JSON file rewritten in full on every mutation; persistence
//! failures degrade to an in-memory list rather than failing the
//! user's action.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::{ContentKind, Recommendation};

/// Bumped when the on-disk entry shape changes.
const FORMAT_VERSION: u32 = 1;

/// On-disk envelope around the entries.
#[derive(Debug, Serialize, Deserialize)]
struct FavoritesFile {
    version: u32,
    entries: Vec<FavoriteEntry>,
}

/// One favorited item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Derived identity: `movie-{title}` or `anime-{mal_id}`.
    pub id: String,
    pub title: String,
    pub poster: Option<String>,
    pub rating: f64,
    pub kind: ContentKind,
    /// Upstream numeric id, when the source has one.
    pub source_id: Option<u64>,
}

impl FavoriteEntry {
    fn from_recommendation(rec: &Recommendation) -> Self {
        match rec {
            Recommendation::Movie(m) => Self {
                id: format!("movie-{}", m.title),
                title: m.title.clone(),
                poster: m.poster.clone(),
                rating: m.rating,
                kind: ContentKind::Movie,
                source_id: None,
            },
            Recommendation::Anime(a) => Self {
                id: format!("anime-{}", a.mal_id),
                title: a.title.clone(),
                poster: a.image.clone(),
                rating: a.score.unwrap_or(0.0),
                kind: ContentKind::Anime,
                source_id: Some(a.mal_id),
            },
        }
    }
}

/// The favorites list, with best-effort file persistence.
#[derive(Debug)]
pub struct FavoritesStore {
    path: Option<PathBuf>,
    entries: Vec<FavoriteEntry>,
}

impl FavoritesStore {
    /// Open the store backed by `path`, loading any existing file.
    ///
    /// A missing file is an empty list. An unreadable or unparsable
    /// file is logged and treated as empty; a file with an unknown
    /// format version is left alone and ignored.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load(&path);
        Self {
            path: Some(path),
            entries,
        }
    }

    /// An ephemeral store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Vec::new(),
        }
    }

    fn load(path: &Path) -> Vec<FavoriteEntry> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "could not read favorites");
                return Vec::new();
            }
        };

        match serde_json::from_str::<FavoritesFile>(&raw) {
            Ok(file) if file.version == FORMAT_VERSION => file.entries,
            Ok(file) => {
                tracing::warn!(
                    path = %path.display(),
                    version = file.version,
                    "unknown favorites format version, ignoring file"
                );
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "could not parse favorites");
                Vec::new()
            }
        }
    }

    /// Add the recommendation if absent, remove it if present.
    /// Returns true when it ended up favorited.
    pub fn toggle(&mut self, rec: &Recommendation) -> bool {
        let entry = FavoriteEntry::from_recommendation(rec);
        let favorited = match self.entries.iter().position(|e| e.id == entry.id) {
            Some(idx) => {
                self.entries.remove(idx);
                false
            }
            None => {
                self.entries.push(entry);
                true
            }
        };
        self.persist();
        favorited
    }

    pub fn is_favorite(&self, rec: &Recommendation) -> bool {
        let id = FavoriteEntry::from_recommendation(rec).id;
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn list(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Rewrite the whole file. Failures are logged and the in-memory
    /// list stays authoritative for the session.
    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let file = FavoritesFile {
            version: FORMAT_VERSION,
            entries: self.entries.clone(),
        };
        let result = serde_json::to_string_pretty(&file)
            .map_err(std::io::Error::other)
            .and_then(|json| {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, json)
            });

        if let Err(err) = result {
            tracing::warn!(path = %path.display(), error = %err, "could not persist favorites");
        }
    }
}
