use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use crate::{
    foundation::core::{EditRate, MediaKind, Rational},
    foundation::error::{WeaveError, WeaveResult},
    metadata::document::{MetadataDocument, RESERVED_KEYS},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Stored picture attributes of a video source.
pub struct PictureFormat {
    /// Stored width in pixels.
    pub width: u32,
    /// Stored height in pixels.
    pub height: u32,
    /// Display aspect ratio.
    pub aspect_ratio: Rational,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// PCM attributes of an audio source.
pub struct SoundFormat {
    /// Samples per second.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Bits per sample.
    pub bit_depth: u16,
    /// Bytes per sample frame across all channels.
    pub block_align: u16,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Kind-specific format of a media source.
pub enum MediaFormat {
    /// Video source.
    Picture(PictureFormat),
    /// Audio source.
    Sound(SoundFormat),
}

impl MediaFormat {
    /// Media kind implied by the format.
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Picture(_) => MediaKind::Picture,
            Self::Sound(_) => MediaKind::Sound,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One unique media source referenced by the timeline.
pub struct MediaDescriptor {
    /// Logical name clips use to reference this source.
    pub name: String,
    /// Path of the underlying media file.
    pub file: PathBuf,
    /// Kind-specific format attributes.
    pub format: MediaFormat,
    /// Length in timeline frames.
    pub duration_frames: u64,
    /// Length in seconds.
    pub duration_seconds: f64,
}

impl MediaDescriptor {
    /// Media kind of the source.
    pub fn kind(&self) -> MediaKind {
        self.format.kind()
    }

    /// File name of the source without directories, as written into locators.
    pub fn file_basename(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
struct MediaEntryDef {
    file: PathBuf,
    #[serde(default)]
    basename: Option<String>,
    media_kind: String,
    duration_frames: u64,
    #[serde(default)]
    duration_seconds: Option<f64>,
    format: serde_json::Value,
}

#[derive(Clone, Debug, Default)]
/// Deduplicated mapping from logical media name to descriptor.
pub struct MediaCatalog {
    by_name: BTreeMap<String, MediaDescriptor>,
}

impl MediaCatalog {
    /// Collect every media entry of `doc`.
    ///
    /// Candidates are top-level objects outside the reserved keys that carry a `file` field.
    #[tracing::instrument(skip(doc))]
    pub fn from_document(doc: &MetadataDocument) -> WeaveResult<Self> {
        let mut catalog = Self::default();
        for (key, value) in doc.entries() {
            if RESERVED_KEYS.contains(&key) {
                continue;
            }
            let Some(obj) = value.as_object() else {
                continue;
            };
            if !obj.contains_key("file") {
                tracing::debug!(entry = key, "skipping object without 'file'");
                continue;
            }
            let descriptor = parse_entry(key, value, doc.timeline.edit_rate)?;
            tracing::info!(
                entry = key,
                name = %descriptor.name,
                kind = %descriptor.kind(),
                "found media"
            );
            catalog.insert(key, descriptor)?;
        }
        Ok(catalog)
    }

    /// Add a descriptor. Repeats of the same name and file collapse into one entry.
    pub fn insert(&mut self, entry: &str, descriptor: MediaDescriptor) -> WeaveResult<()> {
        match self.by_name.get(&descriptor.name) {
            Some(existing) if existing.file == descriptor.file => {
                tracing::debug!(name = %descriptor.name, "duplicate media reference collapsed");
                Ok(())
            }
            Some(existing) => Err(WeaveError::media_entry(
                entry,
                format!(
                    "logical name '{}' already refers to '{}', not '{}'",
                    descriptor.name,
                    existing.file.display(),
                    descriptor.file.display()
                ),
            )),
            None => {
                self.by_name.insert(descriptor.name.clone(), descriptor);
                Ok(())
            }
        }
    }

    /// Lookup by logical name.
    pub fn get(&self, name: &str) -> Option<&MediaDescriptor> {
        self.by_name.get(name)
    }

    /// Descriptors ordered by logical name.
    pub fn iter(&self) -> impl Iterator<Item = &MediaDescriptor> {
        self.by_name.values()
    }

    /// Number of unique sources.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// True when no media entries were found.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Distinct file paths referenced by the catalog.
    pub fn files(&self) -> Vec<&Path> {
        self.by_name
            .values()
            .map(|d| d.file.as_path())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn parse_entry(
    key: &str,
    value: &serde_json::Value,
    edit_rate: EditRate,
) -> WeaveResult<MediaDescriptor> {
    let def: MediaEntryDef = serde_json::from_value(value.clone())
        .map_err(|e| WeaveError::media_entry(key, e.to_string()))?;

    let format = match def.media_kind.to_ascii_lowercase().as_str() {
        "picture" => MediaFormat::Picture(parse_format(key, def.format)?),
        "sound" => MediaFormat::Sound(parse_format(key, def.format)?),
        _ => {
            return Err(WeaveError::UnsupportedMediaKind {
                entry: key.to_string(),
                kind: def.media_kind,
            });
        }
    };

    if def.duration_frames == 0 {
        return Err(WeaveError::media_entry(key, "duration_frames must be > 0"));
    }
    let duration_seconds = match def.duration_seconds {
        Some(s) if s.is_finite() && s > 0.0 => s,
        Some(s) => {
            return Err(WeaveError::media_entry(
                key,
                format!("duration_seconds must be finite and > 0, got {s}"),
            ));
        }
        None => def.duration_frames as f64 / edit_rate.as_f64(),
    };

    let name = match def.basename {
        Some(name) if !name.trim().is_empty() => name,
        _ => def
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| WeaveError::media_entry(key, "file has no file name"))?,
    };

    Ok(MediaDescriptor {
        name,
        file: def.file,
        format,
        duration_frames: def.duration_frames,
        duration_seconds,
    })
}

fn parse_format<T: serde::de::DeserializeOwned>(
    key: &str,
    format: serde_json::Value,
) -> WeaveResult<T> {
    serde_json::from_value(format)
        .map_err(|e| WeaveError::media_entry(key, format!("format: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/catalog.rs"]
mod tests;
