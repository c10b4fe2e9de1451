use crate::{
    build::registry::SourceRegistry,
    foundation::core::{MediaKind, SlotId},
    foundation::error::{WeaveError, WeaveResult},
    metadata::document::Track,
    store::model::{Component, SourceClip},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Sequence emitted for one track, ready to be attached to a composition slot.
pub struct CompiledTrack {
    /// Slot id; equals the track id.
    pub slot_id: SlotId,
    /// Track name.
    pub name: String,
    /// Kind of every component.
    pub media_kind: MediaKind,
    /// Fillers and source clips in timeline order.
    pub components: Vec<Component>,
    /// Length the sequence must add up to.
    pub expected_span: u64,
}

impl CompiledTrack {
    /// Sum of component lengths.
    pub fn length(&self) -> u64 {
        self.components.iter().map(Component::length).sum()
    }
}

/// Turns tracks into filler/source-clip sequences against a populated registry.
///
/// Compilation only reads the registry, so tracks can be compiled in any order or in parallel.
#[derive(Clone, Copy, Debug)]
pub struct TrackCompiler<'a> {
    registry: &'a SourceRegistry,
    pad_to: Option<u64>,
}

impl<'a> TrackCompiler<'a> {
    /// Compiler leaving each track as long as its last clip.
    pub fn new(registry: &'a SourceRegistry) -> Self {
        Self {
            registry,
            pad_to: None,
        }
    }

    /// Right-pad every track with filler up to `total_frames`.
    pub fn pad_to(mut self, total_frames: u64) -> Self {
        self.pad_to = Some(total_frames);
        self
    }

    /// Compile one track.
    ///
    /// Emits a leading filler when the first clip starts after frame 0, a filler for every gap
    /// between clips, and one source clip per clip. Fails on overlapping or unordered clips,
    /// unknown sources, and unknown track types.
    #[tracing::instrument(skip(self, track), fields(track_id = track.track_id, name = %track.name))]
    pub fn compile(&self, track: &Track) -> WeaveResult<CompiledTrack> {
        let kind = track.media_kind()?;
        let mut components = Vec::with_capacity(track.clips.len() * 2 + 1);
        let mut previous_end: Option<u64> = None;

        for (clip_index, clip) in track.clips.iter().enumerate() {
            let invalid = |reason: String| WeaveError::InvalidClip {
                track_id: track.track_id,
                clip_index,
                reason,
            };
            let duration = clip.checked_duration().map_err(invalid)?;
            let clip_end = clip.timeline_out.checked_add(1).ok_or_else(|| {
                invalid(format!(
                    "timeline_out {} is past the last addressable frame",
                    clip.timeline_out
                ))
            })?;

            let gap = match previous_end {
                None => clip.timeline_in,
                Some(end) if clip.timeline_in < end => {
                    return Err(WeaveError::OverlappingClips {
                        track_id: track.track_id,
                        clip_index,
                        previous_out: end - 1,
                        timeline_in: clip.timeline_in,
                    });
                }
                Some(end) => clip.timeline_in - end,
            };
            if gap > 0 {
                tracing::debug!(clip_index, frames = gap, "filler");
                components.push(Component::filler(kind, gap));
            }

            let entry = self.registry.resolve(&clip.source_file).ok_or_else(|| {
                WeaveError::UnknownSourceReference {
                    track_id: track.track_id,
                    clip_index,
                    source_name: clip.source_file.clone(),
                }
            })?;
            if entry.media_kind != kind {
                return Err(invalid(format!(
                    "source '{}' is {} media on a {kind} track",
                    entry.name, entry.media_kind
                )));
            }

            tracing::debug!(
                clip_index,
                source = %entry.name,
                frames = duration,
                timeline_in = clip.timeline_in,
                "source clip"
            );
            components.push(Component::SourceClip(SourceClip {
                media_kind: kind,
                length: duration,
                start: clip.source_in,
                source: Some(entry.master_ref()),
            }));
            previous_end = Some(clip_end);
        }

        let end = previous_end.unwrap_or(0);
        let expected_span = match self.pad_to {
            Some(total) => {
                if total > end {
                    tracing::debug!(frames = total - end, "trailing filler");
                    components.push(Component::filler(kind, total - end));
                }
                total
            }
            None => end,
        };

        Ok(CompiledTrack {
            slot_id: SlotId(track.track_id),
            name: track.name.clone(),
            media_kind: kind,
            components,
            expected_span,
        })
    }
}

/// Compile `track` without right-padding.
pub fn compile_track(track: &Track, registry: &SourceRegistry) -> WeaveResult<CompiledTrack> {
    TrackCompiler::new(registry).compile(track)
}

#[cfg(test)]
#[path = "../../tests/unit/build/compiler.rs"]
mod tests;
