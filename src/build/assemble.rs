use std::fmt;

use crate::{
    build::compiler::CompiledTrack,
    build::registry::{SourceEntry, SourceRegistry},
    foundation::core::EditRate,
    foundation::error::{StageContext as _, WeaveResult},
    metadata::document::TimelineInfo,
    store::backend::MobStore,
    store::model::{MobId, SlotSpec},
};

const STAGE: &str = "composition assembler";

#[derive(Clone, Debug, serde::Serialize)]
/// The built graph: one composition mob, its slots, and the source pairs they reference.
pub struct CompositionGraph {
    /// Composition mob handle.
    pub composition: MobId,
    /// Composition name.
    pub name: String,
    /// Edit rate of every slot.
    pub edit_rate: EditRate,
    /// Declared timeline length in frames.
    pub total_frames: u64,
    /// Timeline slots in track order.
    pub slots: Vec<CompiledTrack>,
    /// Registered master/source pairs.
    pub sources: Vec<SourceEntry>,
}

impl CompositionGraph {
    /// Slot lookup by track id.
    pub fn slot(&self, track_id: u32) -> Option<&CompiledTrack> {
        self.slots.iter().find(|s| s.slot_id.0 == track_id)
    }
}

impl fmt::Display for CompositionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Timeline '{}' @ {} fps ({} frames declared)",
            self.name, self.edit_rate, self.total_frames
        )?;
        for slot in &self.slots {
            writeln!(
                f,
                "  {} (Track {}, {}): {} frames",
                slot.name,
                slot.slot_id,
                slot.media_kind,
                slot.length()
            )?;
            let mut position = 0u64;
            for c in &slot.components {
                writeln!(f, "    @{position:>8}  {c}")?;
                position += c.length();
            }
        }
        writeln!(f, "Sources:")?;
        for s in &self.sources {
            writeln!(
                f,
                "  - {} ({}, {} frames) master {}",
                s.name, s.media_kind, s.length, s.master
            )?;
        }
        Ok(())
    }
}

/// Delete composition mobs left from an earlier build of the same container.
pub fn remove_stale_compositions(store: &mut dyn MobStore) -> WeaveResult<usize> {
    let stale = store.compositions();
    for id in &stale {
        tracing::warn!(composition = %id, "removing pre-existing composition");
        store.remove_mob(*id).stage(STAGE)?;
    }
    Ok(stale.len())
}

/// Create the single composition mob and one timeline slot per compiled track.
///
/// Pre-existing compositions are removed first so the container ends up with exactly one.
#[tracing::instrument(skip_all, fields(name = %timeline.name, tracks = tracks.len()))]
pub fn assemble(
    store: &mut dyn MobStore,
    timeline: &TimelineInfo,
    tracks: Vec<CompiledTrack>,
    registry: &SourceRegistry,
) -> WeaveResult<CompositionGraph> {
    remove_stale_compositions(store)?;

    let composition = store.create_composition(&timeline.name).stage(STAGE)?;
    tracing::info!(%composition, "created composition");

    for track in &tracks {
        let slot = store
            .create_timeline_slot(
                composition,
                SlotSpec {
                    slot_id: track.slot_id,
                    name: Some(track.name.clone()),
                    media_kind: track.media_kind,
                    edit_rate: timeline.edit_rate,
                },
            )
            .stage(STAGE)?;
        for component in &track.components {
            store.append_component(slot, component.clone()).stage(STAGE)?;
        }
    }

    Ok(CompositionGraph {
        composition,
        name: timeline.name.clone(),
        edit_rate: timeline.edit_rate,
        total_frames: timeline.total_frames,
        slots: tracks,
        sources: registry.iter().cloned().collect(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/build/assemble.rs"]
mod tests;
