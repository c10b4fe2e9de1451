use std::path::PathBuf;

/// Convenience result type used across mobweave.
pub type WeaveResult<T> = Result<T, WeaveError>;

/// Top-level error taxonomy for graph building.
///
/// Variants carry the track id, clip index, entry key or source name needed to find the
/// offending metadata entry.
#[derive(thiserror::Error, Debug)]
pub enum WeaveError {
    /// The metadata document could not be read or lacks its timeline/track structure.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A media entry is missing a field required by its declared kind.
    #[error("malformed media entry '{entry}': {reason}")]
    MalformedMediaEntry {
        /// Top-level document key of the entry.
        entry: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A media entry declares a kind other than picture or sound.
    #[error("unsupported media kind '{kind}' in media entry '{entry}'")]
    UnsupportedMediaKind {
        /// Top-level document key of the entry.
        entry: String,
        /// Declared kind string.
        kind: String,
    },

    /// A clip names a source that no media entry provides.
    #[error("track {track_id} clip {clip_index}: unknown source reference '{source_name}'")]
    UnknownSourceReference {
        /// Owning track identifier.
        track_id: u32,
        /// Zero-based clip index within the track.
        clip_index: usize,
        /// Logical source name as written in the clip.
        source_name: String,
    },

    /// Two adjacent clips on one track overlap or are out of order.
    #[error(
        "track {track_id} clip {clip_index}: timeline_in {timeline_in} overlaps previous clip ending at {previous_out}"
    )]
    OverlappingClips {
        /// Owning track identifier.
        track_id: u32,
        /// Zero-based index of the later clip.
        clip_index: usize,
        /// Inclusive timeline-out of the previous clip.
        previous_out: u64,
        /// Timeline-in of the offending clip.
        timeline_in: u64,
    },

    /// A clip's offsets or duration are inconsistent.
    #[error("track {track_id} clip {clip_index}: {reason}")]
    InvalidClip {
        /// Owning track identifier.
        track_id: u32,
        /// Zero-based clip index within the track.
        clip_index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// A track's declared type is neither video nor audio.
    #[error("track {track_id} ('{name}'): unknown track type '{track_type}'")]
    UnknownTrackType {
        /// Track identifier.
        track_id: u32,
        /// Human-readable track name.
        name: String,
        /// Declared type string.
        track_type: String,
    },

    /// The assembled graph breaks a structural invariant.
    #[error("graph invariant violation: {0}")]
    GraphInvariantViolation(String),

    /// Referenced media files do not exist.
    #[error("missing source files: {}", format_paths(.0))]
    MissingSourceFiles(Vec<PathBuf>),

    /// The persistence collaborator failed during a build stage.
    #[error("persistence failure during {stage}: {source}")]
    PersistenceFailure {
        /// Build stage that issued the failing call.
        stage: &'static str,
        /// Collaborator error.
        source: anyhow::Error,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WeaveError {
    /// Build a [`WeaveError::MalformedDocument`] value.
    pub fn document(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Build a [`WeaveError::MalformedMediaEntry`] value.
    pub fn media_entry(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedMediaEntry {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`WeaveError::GraphInvariantViolation`] value.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::GraphInvariantViolation(msg.into())
    }

    /// Wrap a collaborator error with the stage that triggered it.
    pub fn persistence(stage: &'static str, source: anyhow::Error) -> Self {
        Self::PersistenceFailure { stage, source }
    }

    /// True for failures that only drop the offending track under a skip policy.
    pub fn is_track_local(&self) -> bool {
        matches!(self, Self::UnknownTrackType { .. })
    }
}

/// Attach a build stage to collaborator errors.
pub(crate) trait StageContext<T> {
    /// Convert into [`WeaveError::PersistenceFailure`] tagged with `stage`.
    fn stage(self, stage: &'static str) -> WeaveResult<T>;
}

impl<T> StageContext<T> for anyhow::Result<T> {
    fn stage(self, stage: &'static str) -> WeaveResult<T> {
        self.map_err(|e| WeaveError::persistence(stage, e))
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
