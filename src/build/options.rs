use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::WeaveResult;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// What to do with a track whose declared type is neither video nor audio.
pub enum UnknownTrackPolicy {
    /// Drop the track, report it, and keep building.
    #[default]
    Skip,
    /// Fail the whole build.
    Abort,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Essence linkage for every registered source.
pub enum LinkageMode {
    /// Point at external files by base name.
    #[default]
    Linked,
    /// Mark essence as carried inside the container.
    Embedded,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Build configuration.
pub struct BuildOptions {
    /// Right-pad every track with filler up to the timeline's `total_frames`.
    pub pad_to_timeline: bool,
    /// Handling of unknown track types.
    pub unknown_track_policy: UnknownTrackPolicy,
    /// Essence linkage mode.
    pub linkage: LinkageMode,
    /// Compile tracks on the rayon pool.
    pub parallel_tracks: bool,
}

impl BuildOptions {
    /// Load options from a JSON file. Missing fields keep their defaults.
    pub fn from_path(path: &Path) -> WeaveResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read build options '{}'", path.display()))?;
        let opts = serde_json::from_str(&text)
            .with_context(|| format!("parse build options '{}'", path.display()))?;
        Ok(opts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/build/options.rs"]
mod tests;
