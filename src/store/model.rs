use std::fmt;

use crate::foundation::core::{EditRate, MediaKind, Rational, SlotId};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
/// Opaque mob handle issued by a [`crate::MobStore`].
pub struct MobId(pub uuid::Uuid);

impl MobId {
    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for MobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Role of a mob in the graph.
pub enum MobKind {
    /// Logical, editor-facing view of one media unit.
    Master,
    /// Physical, essence-bearing unit.
    Source,
    /// The timeline.
    Composition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Reference to one slot of one mob.
pub struct MobSlotRef {
    /// Owning mob.
    pub mob: MobId,
    /// Slot within the mob.
    pub slot: SlotId,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Gap component carrying no essence.
pub struct Filler {
    /// Kind of the owning slot.
    pub media_kind: MediaKind,
    /// Length in edit units.
    pub length: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Component referencing a span of another mob's slot.
pub struct SourceClip {
    /// Kind of the owning slot.
    pub media_kind: MediaKind,
    /// Length in edit units.
    pub length: u64,
    /// Offset into the referenced slot.
    pub start: u64,
    /// Referenced slot; `None` marks the end of the derivation chain (a source mob's own essence).
    pub source: Option<MobSlotRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Unit of a slot's segment.
pub enum Component {
    /// Gap.
    Filler(Filler),
    /// Reference into another mob.
    SourceClip(SourceClip),
}

impl Component {
    /// Gap of `length` edit units.
    pub fn filler(media_kind: MediaKind, length: u64) -> Self {
        Self::Filler(Filler { media_kind, length })
    }

    /// Length in edit units.
    pub fn length(&self) -> u64 {
        match self {
            Self::Filler(f) => f.length,
            Self::SourceClip(c) => c.length,
        }
    }

    /// Kind of the owning slot.
    pub fn media_kind(&self) -> MediaKind {
        match self {
            Self::Filler(f) => f.media_kind,
            Self::SourceClip(c) => c.media_kind,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filler(x) => write!(f, "Filler(len={})", x.length),
            Self::SourceClip(c) => match &c.source {
                Some(r) => write!(
                    f,
                    "SourceClip(len={}, mob={}, slot={}, start={})",
                    c.length, r.mob, r.slot, c.start
                ),
                None => write!(f, "SourceClip(len={}, origin)", c.length),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// External pointer to essence data.
pub struct Locator {
    /// URL or path string.
    pub url: String,
}

impl Locator {
    /// Network locator for `url`.
    pub fn network(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Where a source mob's essence lives. Exactly one mode per source.
pub enum EssenceReference {
    /// Essence stays in an external file found through the locator.
    Linked(Locator),
    /// Essence is carried inside the container.
    Embedded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Field layout of stored pictures.
pub enum FrameLayout {
    /// Progressive, one field per frame.
    FullFrame,
    /// Two interleaved fields.
    SeparateFields,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Component-video (Y'CbCr) picture descriptor.
pub struct CdciDescriptor {
    /// Picture rate; equals the timeline edit rate.
    pub sample_rate: EditRate,
    /// Stored width in pixels.
    pub stored_width: u32,
    /// Stored height in pixels.
    pub stored_height: u32,
    /// Field layout.
    pub frame_layout: FrameLayout,
    /// Display aspect ratio.
    pub image_aspect_ratio: Rational,
    /// Length in frames.
    pub length: u64,
    /// Bits per component.
    pub component_width: u32,
    /// Horizontal chroma subsampling factor (2 for 4:2:2).
    pub horizontal_subsampling: u32,
    /// First active line of each field.
    pub video_line_map: [i32; 2],
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Linear PCM sound descriptor.
pub struct PcmDescriptor {
    /// Samples per second.
    pub sample_rate: u32,
    /// Audio sampling rate; equals `sample_rate` for unresampled PCM.
    pub audio_sampling_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Bits per sample.
    pub quantization_bits: u16,
    /// Bytes per sample frame across all channels.
    pub block_align: u16,
    /// Average bytes per second.
    pub average_bps: u64,
    /// Length in samples.
    pub length: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Kind-specific descriptor payload.
pub enum DescriptorFormat {
    /// Picture essence.
    Cdci(CdciDescriptor),
    /// Sound essence.
    Pcm(PcmDescriptor),
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Essence descriptor attached to a source mob.
pub struct EssenceDescriptor {
    /// Format payload.
    pub format: DescriptorFormat,
    /// Linkage mode.
    pub essence: EssenceReference,
}

impl EssenceDescriptor {
    /// Media kind implied by the payload.
    pub fn media_kind(&self) -> MediaKind {
        match self.format {
            DescriptorFormat::Cdci(_) => MediaKind::Picture,
            DescriptorFormat::Pcm(_) => MediaKind::Sound,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Parameters for a new timeline slot.
pub struct SlotSpec {
    /// Identifier, unique within the mob.
    pub slot_id: SlotId,
    /// Optional display name.
    pub name: Option<String>,
    /// Kind of every component on the slot.
    pub media_kind: MediaKind,
    /// Edit rate of component lengths.
    pub edit_rate: EditRate,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Timeline slot with its sequence segment.
pub struct TimelineSlot {
    /// Identifier, unique within the mob.
    pub slot_id: SlotId,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Kind of every component on the slot.
    pub media_kind: MediaKind,
    /// Edit rate of component lengths.
    pub edit_rate: EditRate,
    /// Sequence components in timeline order.
    pub components: Vec<Component>,
}

impl TimelineSlot {
    /// Total length of the sequence.
    pub fn length(&self) -> u64 {
        self.components.iter().map(Component::length).sum()
    }
}

impl From<SlotSpec> for TimelineSlot {
    fn from(spec: SlotSpec) -> Self {
        Self {
            slot_id: spec.slot_id,
            name: spec.name,
            media_kind: spec.media_kind,
            edit_rate: spec.edit_rate,
            components: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Named media object owning slots.
pub struct Mob {
    /// Handle.
    pub id: MobId,
    /// Role.
    pub kind: MobKind,
    /// Display name.
    pub name: String,
    /// Slots in creation order.
    pub slots: Vec<TimelineSlot>,
    /// Essence descriptor; source mobs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<EssenceDescriptor>,
}

impl Mob {
    /// Slot lookup by id.
    pub fn slot(&self, slot_id: SlotId) -> Option<&TimelineSlot> {
        self.slots.iter().find(|s| s.slot_id == slot_id)
    }
}
