use std::path::Path;

use anyhow::Context as _;

use crate::foundation::{
    core::{EditRate, MediaKind},
    error::{WeaveError, WeaveResult},
};

/// Top-level document keys that never describe media.
pub const RESERVED_KEYS: [&str; 3] = ["timeline", "tracks", "description"];

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Timeline header of a metadata document.
pub struct TimelineInfo {
    /// Composition name.
    pub name: String,
    /// Edit rate shared by every timeline slot.
    pub edit_rate: EditRate,
    /// Declared total length in frames.
    pub total_frames: u64,
    /// Informative duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// One edit track: an ordered list of clips of a single media kind.
pub struct Track {
    /// Declared type, `"video"` or `"audio"`.
    #[serde(rename = "type")]
    pub track_type: String,
    /// Human-readable name.
    pub name: String,
    /// Positive identifier, unique within the timeline. Becomes the slot id.
    pub track_id: u32,
    /// Clips ordered by timeline position.
    #[serde(default)]
    pub clips: Vec<Clip>,
}

impl Track {
    /// Resolve the declared type to a media kind.
    pub fn media_kind(&self) -> WeaveResult<MediaKind> {
        match self.track_type.to_ascii_lowercase().as_str() {
            "video" => Ok(MediaKind::Picture),
            "audio" => Ok(MediaKind::Sound),
            _ => Err(WeaveError::UnknownTrackType {
                track_id: self.track_id,
                name: self.name.clone(),
                track_type: self.track_type.clone(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A span of a source placed on a track. Timeline offsets are inclusive.
pub struct Clip {
    /// Logical name of the referenced media.
    pub source_file: String,
    /// First source frame used.
    #[serde(default)]
    pub source_in: u64,
    /// First timeline frame covered.
    pub timeline_in: u64,
    /// Last timeline frame covered (inclusive).
    pub timeline_out: u64,
    /// Declared duration; computed from the timeline offsets when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl Clip {
    /// Clip covering `duration` frames starting at `timeline_in`.
    pub fn new(
        source_file: impl Into<String>,
        source_in: u64,
        timeline_in: u64,
        duration: u64,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            source_in,
            timeline_in,
            timeline_out: timeline_in.saturating_add(duration.saturating_sub(1)),
            duration: Some(duration),
        }
    }

    /// Length in frames, checked against the inclusive timeline offsets.
    pub fn checked_duration(&self) -> Result<u64, String> {
        if self.timeline_out < self.timeline_in {
            return Err(format!(
                "timeline_out {} precedes timeline_in {}",
                self.timeline_out, self.timeline_in
            ));
        }
        let span = (self.timeline_out - self.timeline_in)
            .checked_add(1)
            .ok_or_else(|| {
                format!(
                    "timeline span {}..={} does not fit in 64 bits",
                    self.timeline_in, self.timeline_out
                )
            })?;
        match self.duration {
            Some(d) if d != span => Err(format!(
                "duration {d} disagrees with timeline span {}..={} ({span} frames)",
                self.timeline_in, self.timeline_out
            )),
            _ => Ok(span),
        }
    }
}

#[derive(Clone, Debug)]
/// Parsed edit-decision metadata: timeline header, tracks, and raw media entries.
pub struct MetadataDocument {
    /// Timeline header.
    pub timeline: TimelineInfo,
    /// Tracks in document order.
    pub tracks: Vec<Track>,
    /// Free-text description, if any.
    pub description: Option<String>,
    entries: Vec<(String, serde_json::Value)>,
}

impl MetadataDocument {
    /// Empty document with the given timeline header.
    pub fn new(timeline: TimelineInfo) -> Self {
        Self {
            timeline,
            tracks: Vec::new(),
            description: None,
            entries: Vec::new(),
        }
    }

    /// Read and parse a JSON document from disk.
    pub fn from_path(path: &Path) -> WeaveResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read metadata document '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON document from text.
    pub fn from_json_str(text: &str) -> WeaveResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| WeaveError::document(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Split a JSON object into header, tracks and candidate media entries.
    pub fn from_value(value: serde_json::Value) -> WeaveResult<Self> {
        let serde_json::Value::Object(mut map) = value else {
            return Err(WeaveError::document("document root must be a JSON object"));
        };

        let timeline = map
            .remove("timeline")
            .ok_or_else(|| WeaveError::document("missing 'timeline' section"))?;
        let timeline: TimelineInfo = serde_json::from_value(timeline)
            .map_err(|e| WeaveError::document(format!("timeline: {e}")))?;

        let tracks = map
            .remove("tracks")
            .ok_or_else(|| WeaveError::document("missing 'tracks' section"))?;
        let tracks: Vec<Track> = serde_json::from_value(tracks)
            .map_err(|e| WeaveError::document(format!("tracks: {e}")))?;

        let description = match map.remove("description") {
            Some(serde_json::Value::String(s)) => Some(s),
            _ => None,
        };

        Ok(Self {
            timeline,
            tracks,
            description,
            entries: map.into_iter().collect(),
        })
    }

    /// Attach a media entry under `key`. Replaces any entry with the same key.
    pub fn insert_entry(
        &mut self,
        key: impl Into<String>,
        entry: serde_json::Value,
    ) -> WeaveResult<()> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(WeaveError::document(format!("'{key}' is a reserved key")));
        }
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, entry));
        Ok(())
    }

    /// Raw non-reserved top-level entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Rebuild the JSON object form of this document.
    pub fn to_value(&self) -> WeaveResult<serde_json::Value> {
        let mut map = serde_json::Map::new();
        for (k, v) in &self.entries {
            map.insert(k.clone(), v.clone());
        }
        map.insert(
            "timeline".to_string(),
            serde_json::to_value(&self.timeline).map_err(anyhow::Error::from)?,
        );
        map.insert(
            "tracks".to_string(),
            serde_json::to_value(&self.tracks).map_err(anyhow::Error::from)?,
        );
        if let Some(d) = &self.description {
            map.insert(
                "description".to_string(),
                serde_json::Value::String(d.clone()),
            );
        }
        Ok(serde_json::Value::Object(map))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/document.rs"]
mod tests;
