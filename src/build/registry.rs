use std::collections::BTreeMap;

use crate::{
    build::options::LinkageMode,
    foundation::core::{EditRate, MediaKind, SlotId},
    foundation::error::{StageContext as _, WeaveResult},
    metadata::catalog::{MediaCatalog, MediaDescriptor, MediaFormat},
    store::backend::MobStore,
    store::model::{
        CdciDescriptor, Component, DescriptorFormat, EssenceDescriptor, EssenceReference,
        FrameLayout, MobId, MobKind, MobSlotRef, PcmDescriptor, SlotSpec, SourceClip,
    },
};

const STAGE: &str = "source registry";

/// Slot used on both master and source mobs.
pub const ESSENCE_SLOT: SlotId = SlotId(1);

/// Picture descriptors always declare 8-bit components.
pub const PICTURE_COMPONENT_WIDTH: u32 = 8;
/// Picture descriptors always declare 4:2:2 horizontal subsampling.
pub const PICTURE_HORIZONTAL_SUBSAMPLING: u32 = 2;
/// Line map of a progressive frame.
pub const PROGRESSIVE_LINE_MAP: [i32; 2] = [42, 0];

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Handles of a registered master/source pair.
pub struct SourceEntry {
    /// Logical media name.
    pub name: String,
    /// Master mob clips reference.
    pub master: MobId,
    /// Physical source mob.
    pub source: MobId,
    /// Slot on the master carrying the essence.
    pub master_slot: SlotId,
    /// Essence kind.
    pub media_kind: MediaKind,
    /// Master slot length in edit units.
    pub length: u64,
    /// Linkage of the source essence.
    pub essence: EssenceReference,
}

impl SourceEntry {
    /// Reference to the master slot, as used by timeline source clips.
    pub fn master_ref(&self) -> MobSlotRef {
        MobSlotRef {
            mob: self.master,
            slot: self.master_slot,
        }
    }
}

#[derive(Clone, Debug)]
/// Name-keyed registry of master/source pairs, one per unique media source.
pub struct SourceRegistry {
    edit_rate: EditRate,
    linkage: LinkageMode,
    entries: BTreeMap<String, SourceEntry>,
}

impl SourceRegistry {
    /// Empty registry for a timeline running at `edit_rate`.
    pub fn new(edit_rate: EditRate, linkage: LinkageMode) -> Self {
        Self {
            edit_rate,
            linkage,
            entries: BTreeMap::new(),
        }
    }

    /// Register every catalog entry in name order.
    #[tracing::instrument(skip(catalog, store))]
    pub fn populate(
        catalog: &MediaCatalog,
        store: &mut dyn MobStore,
        edit_rate: EditRate,
        linkage: LinkageMode,
    ) -> WeaveResult<Self> {
        let mut registry = Self::new(edit_rate, linkage);
        for descriptor in catalog.iter() {
            registry.register(store, descriptor)?;
        }
        tracing::info!(
            pairs = registry.len(),
            "created master and source mobs for all media"
        );
        Ok(registry)
    }

    /// Create the master/source pair for `descriptor`.
    ///
    /// Idempotent per logical name: repeated calls return the handles of the first one and issue
    /// no store calls. A pair with the same name already in the container, left by an earlier
    /// build, is removed and recreated from the current metadata.
    pub fn register(
        &mut self,
        store: &mut dyn MobStore,
        descriptor: &MediaDescriptor,
    ) -> WeaveResult<SourceEntry> {
        if let Some(existing) = self.entries.get(&descriptor.name) {
            tracing::debug!(name = %descriptor.name, "source already registered");
            return Ok(existing.clone());
        }

        let kind = descriptor.kind();
        let length = descriptor.duration_frames;
        let source_name = format!("{}.PHYS", descriptor.name);
        remove_previous(store, MobKind::Master, &descriptor.name)?;
        remove_previous(store, MobKind::Source, &source_name)?;

        let master = store.create_master(&descriptor.name).stage(STAGE)?;
        let source = store.create_source(&source_name).stage(STAGE)?;

        let essence = match self.linkage {
            LinkageMode::Linked => EssenceReference::Linked(
                store
                    .create_locator(&descriptor.file_basename())
                    .stage(STAGE)?,
            ),
            LinkageMode::Embedded => EssenceReference::Embedded,
        };
        store
            .set_essence_descriptor(
                source,
                essence_descriptor(descriptor, self.edit_rate, essence.clone()),
            )
            .stage(STAGE)?;

        let source_slot = store
            .create_timeline_slot(source, self.essence_slot(kind))
            .stage(STAGE)?;
        store
            .append_component(
                source_slot,
                Component::SourceClip(SourceClip {
                    media_kind: kind,
                    length,
                    start: 0,
                    source: None,
                }),
            )
            .stage(STAGE)?;

        let master_slot = store
            .create_timeline_slot(master, self.essence_slot(kind))
            .stage(STAGE)?;
        store
            .append_component(
                master_slot,
                Component::SourceClip(SourceClip {
                    media_kind: kind,
                    length,
                    start: 0,
                    source: Some(source_slot),
                }),
            )
            .stage(STAGE)?;

        let entry = SourceEntry {
            name: descriptor.name.clone(),
            master,
            source,
            master_slot: master_slot.slot,
            media_kind: kind,
            length,
            essence,
        };
        tracing::info!(name = %entry.name, frames = length, %kind, "registered source");
        self.entries.insert(entry.name.clone(), entry.clone());
        Ok(entry)
    }

    /// Lookup by logical name.
    pub fn resolve(&self, name: &str) -> Option<&SourceEntry> {
        self.entries.get(name)
    }

    /// Entry whose master mob is `master`, if it was produced by this registry.
    pub fn by_master(&self, master: MobId) -> Option<&SourceEntry> {
        self.entries.values().find(|e| e.master == master)
    }

    /// Entries ordered by logical name.
    pub fn iter(&self) -> impl Iterator<Item = &SourceEntry> {
        self.entries.values()
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Edit rate of every registered slot.
    pub fn edit_rate(&self) -> EditRate {
        self.edit_rate
    }

    fn essence_slot(&self, media_kind: MediaKind) -> SlotSpec {
        SlotSpec {
            slot_id: ESSENCE_SLOT,
            name: None,
            media_kind,
            edit_rate: self.edit_rate,
        }
    }
}

fn remove_previous(store: &mut dyn MobStore, kind: MobKind, name: &str) -> WeaveResult<()> {
    while let Some(stale) = store.find_mob(kind, name) {
        tracing::debug!(%name, mob = %stale, ?kind, "replacing mob from an earlier build");
        store.remove_mob(stale).stage(STAGE)?;
    }
    Ok(())
}

/// Build the essence descriptor of a source.
pub fn essence_descriptor(
    descriptor: &MediaDescriptor,
    edit_rate: EditRate,
    essence: EssenceReference,
) -> EssenceDescriptor {
    let format = match &descriptor.format {
        MediaFormat::Picture(p) => DescriptorFormat::Cdci(CdciDescriptor {
            sample_rate: edit_rate,
            stored_width: p.width,
            stored_height: p.height,
            frame_layout: FrameLayout::FullFrame,
            image_aspect_ratio: p.aspect_ratio,
            length: descriptor.duration_frames,
            component_width: PICTURE_COMPONENT_WIDTH,
            horizontal_subsampling: PICTURE_HORIZONTAL_SUBSAMPLING,
            video_line_map: PROGRESSIVE_LINE_MAP,
        }),
        MediaFormat::Sound(s) => DescriptorFormat::Pcm(PcmDescriptor {
            sample_rate: s.sample_rate,
            audio_sampling_rate: s.sample_rate,
            channels: s.channels,
            quantization_bits: s.bit_depth,
            block_align: s.block_align,
            average_bps: u64::from(s.sample_rate)
                * u64::from(s.channels)
                * u64::from(s.bit_depth / 8),
            length: (f64::from(s.sample_rate) * descriptor.duration_seconds).round() as u64,
        }),
    };
    EssenceDescriptor { format, essence }
}

#[cfg(test)]
#[path = "../../tests/unit/build/registry.rs"]
mod tests;
