//! Track / ParsedBatch - Ingestion output
//!
//! One `Track` per data row, one `ParsedBatch` per input file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Batch handle passed through the fan-out.
pub type SharedBatch = Arc<ParsedBatch>;

/// A single track row
///
/// Field order and names match the JSON output format. `spotfy_id` is spelled
/// that way in every file the tool has ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    artist_name: String,
    track_name: String,
    album_name: String,
    #[serde(rename = "spotfy_id")]
    spotify_id: String,
}

impl Track {
    /// Create a track from its four fields
    pub fn new(
        spotify_id: impl Into<String>,
        track_name: impl Into<String>,
        album_name: impl Into<String>,
        artist_name: impl Into<String>,
    ) -> Self {
        Self {
            artist_name: artist_name.into(),
            track_name: track_name.into(),
            album_name: album_name.into(),
            spotify_id: spotify_id.into(),
        }
    }

    /// Spotify track identifier
    pub fn spotify_id(&self) -> &str {
        &self.spotify_id
    }

    /// Track title
    pub fn track_name(&self) -> &str {
        &self.track_name
    }

    /// Album the track belongs to
    pub fn album_name(&self) -> &str {
        &self.album_name
    }

    /// Performing artist
    pub fn artist_name(&self) -> &str {
        &self.artist_name
    }
}

/// All tracks parsed from one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBatch {
    /// Input file name with its extension stripped
    base_name: String,

    /// Path the batch was read from
    source: PathBuf,

    /// Tracks in source row order
    tracks: Vec<Track>,
}

impl ParsedBatch {
    /// Create a batch
    pub fn new(base_name: impl Into<String>, source: impl Into<PathBuf>, tracks: Vec<Track>) -> Self {
        Self {
            base_name: base_name.into(),
            source: source.into(),
            tracks,
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Freeze the batch for fan-out
    pub fn into_shared(self) -> SharedBatch {
        Arc::new(self)
    }
}
