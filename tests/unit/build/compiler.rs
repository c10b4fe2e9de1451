use std::path::PathBuf;

use super::*;
use crate::build::options::LinkageMode;
use crate::foundation::core::Rational;
use crate::metadata::catalog::{MediaDescriptor, MediaFormat, PictureFormat, SoundFormat};
use crate::metadata::document::Clip;
use crate::store::memory::MemoryStore;

fn registry() -> SourceRegistry {
    let mut store = MemoryStore::new();
    let mut registry = SourceRegistry::new(Rational::integer(25).unwrap(), LinkageMode::Linked);
    for (name, format) in [
        (
            "A001.mov",
            MediaFormat::Picture(PictureFormat {
                width: 1920,
                height: 1080,
                aspect_ratio: Rational::new(16, 9).unwrap(),
            }),
        ),
        (
            "A001.wav",
            MediaFormat::Sound(SoundFormat {
                sample_rate: 48000,
                channels: 2,
                bit_depth: 16,
                block_align: 4,
            }),
        ),
    ] {
        let descriptor = MediaDescriptor {
            name: name.to_string(),
            file: PathBuf::from(name),
            format,
            duration_frames: 1000,
            duration_seconds: 40.0,
        };
        registry.register(&mut store, &descriptor).unwrap();
    }
    registry
}

fn video(clips: Vec<Clip>) -> Track {
    Track {
        track_type: "video".to_string(),
        name: "V1".to_string(),
        track_id: 1,
        clips,
    }
}

fn lengths(track: &CompiledTrack) -> Vec<(&'static str, u64)> {
    track
        .components
        .iter()
        .map(|c| match c {
            Component::Filler(f) => ("filler", f.length),
            Component::SourceClip(s) => ("clip", s.length),
        })
        .collect()
}

#[test]
fn gaps_between_clips_become_fillers() {
    let registry = registry();
    let track = video(vec![
        Clip::new("A001.mov", 0, 0, 50),
        Clip::new("A001.mov", 200, 100, 50),
    ]);
    let compiled = compile_track(&track, &registry).unwrap();

    assert_eq!(
        lengths(&compiled),
        vec![("clip", 50), ("filler", 50), ("clip", 50)]
    );
    assert_eq!(compiled.length(), 150);
    assert_eq!(compiled.expected_span, 150);
    assert_eq!(compiled.slot_id, SlotId(1));
}

#[test]
fn late_first_clip_gets_a_leading_filler() {
    let registry = registry();
    let track = video(vec![Clip::new("A001.mov", 0, 125, 75)]);
    let compiled = compile_track(&track, &registry).unwrap();
    assert_eq!(lengths(&compiled), vec![("filler", 125), ("clip", 75)]);
}

#[test]
fn adjacent_clips_have_no_filler() {
    let registry = registry();
    let track = video(vec![
        Clip::new("A001.mov", 0, 0, 10),
        Clip::new("A001.mov", 10, 10, 10),
    ]);
    let compiled = compile_track(&track, &registry).unwrap();
    assert_eq!(lengths(&compiled), vec![("clip", 10), ("clip", 10)]);
}

#[test]
fn length_matches_last_timeline_out() {
    let registry = registry();
    let track = video(vec![
        Clip::new("A001.mov", 0, 3, 7),
        Clip::new("A001.mov", 0, 40, 1),
        Clip::new("A001.mov", 0, 90, 33),
    ]);
    let compiled = compile_track(&track, &registry).unwrap();
    let last_out = track.clips.last().unwrap().timeline_out;
    assert_eq!(compiled.length(), last_out + 1);
}

#[test]
fn source_clips_reference_the_master_slot() {
    let registry = registry();
    let track = video(vec![Clip::new("A001.mov", 37, 0, 10)]);
    let compiled = compile_track(&track, &registry).unwrap();
    let Component::SourceClip(clip) = &compiled.components[0] else {
        panic!("expected a source clip");
    };
    assert_eq!(clip.start, 37);
    assert_eq!(
        clip.source,
        Some(registry.resolve("A001.mov").unwrap().master_ref())
    );
}

#[test]
fn overlapping_clips_are_rejected() {
    let registry = registry();
    let track = video(vec![
        Clip::new("A001.mov", 0, 0, 50),
        Clip::new("A001.mov", 0, 49, 10),
    ]);
    let err = compile_track(&track, &registry).unwrap_err();
    assert!(matches!(
        err,
        WeaveError::OverlappingClips {
            track_id: 1,
            clip_index: 1,
            previous_out: 49,
            timeline_in: 49
        }
    ));
}

#[test]
fn unknown_sources_are_rejected() {
    let registry = registry();
    let track = video(vec![Clip::new("B002.mov", 0, 0, 10)]);
    let err = compile_track(&track, &registry).unwrap_err();
    assert!(matches!(
        err,
        WeaveError::UnknownSourceReference { clip_index: 0, ref source_name, .. } if source_name == "B002.mov"
    ));
}

#[test]
fn sound_sources_do_not_fit_picture_tracks() {
    let registry = registry();
    let track = video(vec![Clip::new("A001.wav", 0, 0, 10)]);
    let err = compile_track(&track, &registry).unwrap_err();
    assert!(matches!(err, WeaveError::InvalidClip { clip_index: 0, .. }));
}

#[test]
fn inconsistent_durations_are_invalid() {
    let registry = registry();
    let mut clip = Clip::new("A001.mov", 0, 0, 10);
    clip.duration = Some(11);
    let err = compile_track(&video(vec![clip]), &registry).unwrap_err();
    assert!(matches!(err, WeaveError::InvalidClip { track_id: 1, .. }));
}

#[test]
fn unknown_track_types_fail_compilation() {
    let registry = registry();
    let mut track = video(vec![]);
    track.track_type = "subtitle".to_string();
    let err = compile_track(&track, &registry).unwrap_err();
    assert!(err.is_track_local());
}

#[test]
fn padding_fills_to_the_timeline_end() {
    let registry = registry();
    let compiler = TrackCompiler::new(&registry).pad_to(300);

    let track = video(vec![Clip::new("A001.mov", 0, 100, 50)]);
    let compiled = compiler.compile(&track).unwrap();
    assert_eq!(
        lengths(&compiled),
        vec![("filler", 100), ("clip", 50), ("filler", 150)]
    );
    assert_eq!(compiled.expected_span, 300);

    let empty = compiler.compile(&video(vec![])).unwrap();
    assert_eq!(lengths(&empty), vec![("filler", 300)]);
}

#[test]
fn empty_tracks_compile_to_empty_sequences() {
    let registry = registry();
    let compiled = compile_track(&video(vec![]), &registry).unwrap();
    assert!(compiled.components.is_empty());
    assert_eq!(compiled.expected_span, 0);
}

#[test]
fn audio_tracks_carry_sound_components() {
    let registry = registry();
    let track = Track {
        track_type: "audio".to_string(),
        name: "A1".to_string(),
        track_id: 2,
        clips: vec![Clip::new("A001.wav", 0, 5, 20)],
    };
    let compiled = compile_track(&track, &registry).unwrap();
    assert_eq!(compiled.media_kind, MediaKind::Sound);
    assert!(compiled.components.iter().all(|c| c.media_kind() == MediaKind::Sound));
}

#[test]
fn clips_ending_on_the_last_frame_are_invalid() {
    let registry = registry();
    let edge = Clip {
        source_file: "A001.mov".to_string(),
        source_in: 0,
        timeline_in: u64::MAX - 9,
        timeline_out: u64::MAX,
        duration: None,
    };

    let err = compile_track(&video(vec![edge.clone()]), &registry).unwrap_err();
    assert!(matches!(err, WeaveError::InvalidClip { track_id: 1, clip_index: 0, .. }));

    let err = compile_track(&video(vec![Clip::new("A001.mov", 0, 0, 10), edge]), &registry)
        .unwrap_err();
    assert!(matches!(err, WeaveError::InvalidClip { track_id: 1, clip_index: 1, .. }));
}

#[test]
fn clips_just_below_the_last_frame_compile() {
    let registry = registry();
    let track = video(vec![Clip::new("A001.mov", 0, u64::MAX - 10, 10)]);
    let compiled = compile_track(&track, &registry).unwrap();
    assert_eq!(lengths(&compiled), vec![("filler", u64::MAX - 10), ("clip", 10)]);
    assert_eq!(compiled.expected_span, u64::MAX);
}
