//! mobweave turns edit-decision timeline metadata into a linked interchange composition graph.
//!
//! A metadata document lists media sources and tracks of clips. mobweave builds the mob graph an
//! editing application expects: one master/source mob pair per unique source, and a single
//! composition mob whose timeline slots sequence source clips and fillers.
//!
//! # Pipeline overview
//!
//! 1. **Catalog**: `MetadataDocument -> MediaCatalog` (deduplicated media by logical name)
//! 2. **Register**: `MediaCatalog -> SourceRegistry` (master/source mobs with essence descriptors)
//! 3. **Compile**: `Track -> CompiledTrack` (fillers for gaps, source clips for clips)
//! 4. **Assemble**: `CompiledTrack* -> CompositionGraph` (one composition, one slot per track)
//! 5. **Validate** then **commit** through a [`MobStore`]
//!
//! The builder never touches container internals: every entity is created through
//! [`MobStore`], and nothing is committed unless validation passed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod build;
mod foundation;
mod metadata;
mod store;

pub use build::assemble::{CompositionGraph, assemble, remove_stale_compositions};
pub use build::compiler::{CompiledTrack, TrackCompiler, compile_track};
pub use build::options::{BuildOptions, LinkageMode, UnknownTrackPolicy};
pub use build::pipeline::{BuildReport, SkippedTrack, build_and_commit, build_graph};
pub use build::registry::{ESSENCE_SLOT, SourceEntry, SourceRegistry, essence_descriptor};
pub use build::validate::{validate_graph, validate_track_ids, validate_tracks};
pub use foundation::core::{EditRate, MediaKind, Rational, SlotId};
pub use foundation::error::{WeaveError, WeaveResult};
pub use metadata::catalog::{
    MediaCatalog, MediaDescriptor, MediaFormat, PictureFormat, SoundFormat,
};
pub use metadata::document::{Clip, MetadataDocument, RESERVED_KEYS, TimelineInfo, Track};
pub use metadata::files::{ExistenceChecker, FsExistenceChecker};
pub use store::backend::MobStore;
pub use store::json::JsonContainer;
pub use store::memory::{CONTAINER_FORMAT, CONTAINER_VERSION, ContainerSnapshot, MemoryStore};
pub use store::model::{
    CdciDescriptor, Component, DescriptorFormat, EssenceDescriptor, EssenceReference, Filler,
    FrameLayout, Locator, Mob, MobId, MobKind, MobSlotRef, PcmDescriptor, SlotSpec, SourceClip,
    TimelineSlot,
};
