use std::path::PathBuf;

use super::*;
use crate::build::compiler::compile_track;
use crate::build::options::LinkageMode;
use crate::foundation::core::{MediaKind, Rational, SlotId};
use crate::metadata::catalog::{MediaDescriptor, MediaFormat, PictureFormat};
use crate::metadata::document::{Clip, Track};
use crate::store::memory::MemoryStore;
use crate::store::model::{Component, MobKind};

fn timeline() -> TimelineInfo {
    TimelineInfo {
        name: "Reel 1".to_string(),
        edit_rate: Rational::integer(25).unwrap(),
        total_frames: 200,
        duration_seconds: None,
    }
}

fn setup() -> (MemoryStore, SourceRegistry, Vec<CompiledTrack>) {
    let mut store = MemoryStore::new();
    let mut registry = SourceRegistry::new(timeline().edit_rate, LinkageMode::Linked);
    registry
        .register(
            &mut store,
            &MediaDescriptor {
                name: "A001.mov".to_string(),
                file: PathBuf::from("A001.mov"),
                format: MediaFormat::Picture(PictureFormat {
                    width: 1280,
                    height: 720,
                    aspect_ratio: Rational::new(16, 9).unwrap(),
                }),
                duration_frames: 500,
                duration_seconds: 20.0,
            },
        )
        .unwrap();

    let tracks = [1, 4]
        .into_iter()
        .map(|id| {
            let track = Track {
                track_type: "video".to_string(),
                name: format!("V{id}"),
                track_id: id,
                clips: vec![Clip::new("A001.mov", 0, 10, 40)],
            };
            compile_track(&track, &registry).unwrap()
        })
        .collect();
    (store, registry, tracks)
}

#[test]
fn one_slot_per_track_keyed_by_track_id() {
    let (mut store, registry, tracks) = setup();
    let graph = assemble(&mut store, &timeline(), tracks, &registry).unwrap();

    assert_eq!(store.compositions(), vec![graph.composition]);
    let comp = store.mob(graph.composition).unwrap();
    assert_eq!(comp.name, "Reel 1");
    assert_eq!(comp.kind, MobKind::Composition);
    assert_eq!(comp.slots.len(), 2);

    let slot = comp.slot(SlotId(4)).unwrap();
    assert_eq!(slot.name.as_deref(), Some("V4"));
    assert_eq!(slot.media_kind, MediaKind::Picture);
    assert_eq!(slot.edit_rate, timeline().edit_rate);
    assert_eq!(slot.length(), 50);
    assert!(matches!(slot.components[0], Component::Filler(_)));

    assert_eq!(graph.slot(1).unwrap().components, comp.slot(SlotId(1)).unwrap().components);
    assert_eq!(graph.sources.len(), 1);
}

#[test]
fn stale_compositions_are_replaced() {
    let (mut store, registry, tracks) = setup();
    let old = store.create_composition("previous build").unwrap();

    let graph = assemble(&mut store, &timeline(), tracks, &registry).unwrap();
    assert!(store.mob(old).is_none());
    assert_eq!(store.compositions(), vec![graph.composition]);
    assert_eq!(store.mobs_of_kind(MobKind::Master).count(), 1);
}

#[test]
fn summary_lists_slots_and_sources() {
    let (mut store, registry, tracks) = setup();
    let graph = assemble(&mut store, &timeline(), tracks, &registry).unwrap();
    let text = graph.to_string();

    assert!(text.starts_with("Timeline 'Reel 1' @ 25 fps (200 frames declared)"));
    assert!(text.contains("V1 (Track 1, Picture): 50 frames"));
    assert!(text.contains("Filler(len=10)"));
    assert!(text.contains("- A001.mov (Picture, 500 frames)"));
}
