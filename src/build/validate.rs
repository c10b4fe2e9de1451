use std::collections::HashSet;

use crate::{
    build::assemble::CompositionGraph,
    build::compiler::CompiledTrack,
    build::registry::SourceRegistry,
    foundation::error::{WeaveError, WeaveResult},
    metadata::document::Track,
    store::backend::MobStore,
    store::model::Component,
};

/// Check that every declared track id is positive and unique across the timeline.
///
/// Covers every track of the document, including tracks a skip policy later drops.
pub fn validate_track_ids(tracks: &[Track]) -> WeaveResult<()> {
    let mut seen = HashSet::with_capacity(tracks.len());
    for track in tracks {
        if track.track_id == 0 {
            return Err(WeaveError::invariant(format!(
                "track '{}' has id 0; track ids start at 1",
                track.name
            )));
        }
        if !seen.insert(track.track_id) {
            return Err(WeaveError::invariant(format!(
                "track id {} is declared by more than one track",
                track.track_id
            )));
        }
    }
    Ok(())
}

/// Check compiled tracks before anything is attached to a composition.
///
/// - slot ids are positive and unique
/// - every sequence adds up to its expected span
/// - every source clip points at a master slot produced by `registry`, within its length
/// - every component carries the track's media kind
pub fn validate_tracks(tracks: &[CompiledTrack], registry: &SourceRegistry) -> WeaveResult<()> {
    let mut seen = HashSet::with_capacity(tracks.len());
    for track in tracks {
        if track.slot_id.0 == 0 {
            return Err(WeaveError::invariant(format!(
                "track '{}' compiled to slot id 0",
                track.name
            )));
        }
        if !seen.insert(track.slot_id) {
            return Err(WeaveError::invariant(format!(
                "track id {} is used by more than one track",
                track.slot_id
            )));
        }

        let length = track.length();
        if length != track.expected_span {
            return Err(WeaveError::invariant(format!(
                "track {} ('{}') sums to {length} frames, expected {}",
                track.slot_id, track.name, track.expected_span
            )));
        }

        for (i, component) in track.components.iter().enumerate() {
            if component.media_kind() != track.media_kind {
                return Err(WeaveError::invariant(format!(
                    "track {} component {i} is {} on a {} track",
                    track.slot_id,
                    component.media_kind(),
                    track.media_kind
                )));
            }
            let Component::SourceClip(clip) = component else {
                continue;
            };
            let Some(target) = clip.source else {
                return Err(WeaveError::invariant(format!(
                    "track {} component {i} is a source clip without a reference",
                    track.slot_id
                )));
            };
            let Some(entry) = registry.by_master(target.mob) else {
                return Err(WeaveError::invariant(format!(
                    "track {} component {i} references mob {} which this build did not register",
                    track.slot_id, target.mob
                )));
            };
            if target.slot != entry.master_slot {
                return Err(WeaveError::invariant(format!(
                    "track {} component {i} references slot {} of master '{}', which has slot {}",
                    track.slot_id, target.slot, entry.name, entry.master_slot
                )));
            }
            if clip.start.saturating_add(clip.length) > entry.length {
                return Err(WeaveError::invariant(format!(
                    "track {} component {i} reads frames {}..{} of '{}', which has {} frames",
                    track.slot_id,
                    clip.start,
                    clip.start.saturating_add(clip.length),
                    entry.name,
                    entry.length
                )));
            }
        }
    }
    Ok(())
}

/// Check the assembled graph against the container it was written into.
pub fn validate_graph(
    graph: &CompositionGraph,
    store: &dyn MobStore,
    registry: &SourceRegistry,
) -> WeaveResult<()> {
    validate_tracks(&graph.slots, registry)?;

    let compositions = store.compositions();
    if compositions.len() != 1 {
        return Err(WeaveError::invariant(format!(
            "expected exactly one composition, found {}",
            compositions.len()
        )));
    }
    if compositions[0] != graph.composition {
        return Err(WeaveError::invariant(format!(
            "container composition {} is not the assembled composition {}",
            compositions[0], graph.composition
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/build/validate.rs"]
mod tests;
