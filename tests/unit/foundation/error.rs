use super::*;

#[test]
fn messages_name_the_offending_entry() {
    let e = WeaveError::UnknownSourceReference {
        track_id: 2,
        clip_index: 3,
        source_name: "B002.mov".to_string(),
    };
    assert_eq!(
        e.to_string(),
        "track 2 clip 3: unknown source reference 'B002.mov'"
    );

    let e = WeaveError::media_entry("cam_a", "format: missing field `width`");
    assert_eq!(
        e.to_string(),
        "malformed media entry 'cam_a': format: missing field `width`"
    );
}

#[test]
fn missing_files_are_listed() {
    let e = WeaveError::MissingSourceFiles(vec![PathBuf::from("a.mov"), PathBuf::from("b.wav")]);
    assert_eq!(e.to_string(), "missing source files: a.mov, b.wav");
}

#[test]
fn stage_context_wraps_collaborator_errors() {
    let r: anyhow::Result<()> = Err(anyhow::anyhow!("disk full"));
    let e = r.stage("commit").unwrap_err();
    assert!(matches!(e, WeaveError::PersistenceFailure { stage: "commit", .. }));
    assert_eq!(e.to_string(), "persistence failure during commit: disk full");
}

#[test]
fn only_unknown_track_types_are_track_local() {
    let unknown = WeaveError::UnknownTrackType {
        track_id: 3,
        name: "Subs".to_string(),
        track_type: "subtitle".to_string(),
    };
    assert!(unknown.is_track_local());
    assert!(!WeaveError::invariant("x").is_track_local());
    assert!(!WeaveError::document("x").is_track_local());
}
