use super::*;

#[test]
fn defaults_link_and_skip() {
    let opts = BuildOptions::default();
    assert!(!opts.pad_to_timeline);
    assert!(!opts.parallel_tracks);
    assert_eq!(opts.unknown_track_policy, UnknownTrackPolicy::Skip);
    assert_eq!(opts.linkage, LinkageMode::Linked);
}

#[test]
fn partial_json_keeps_defaults() {
    let opts: BuildOptions =
        serde_json::from_str(r#"{ "unknown_track_policy": "abort", "linkage": "embedded" }"#)
            .unwrap();
    assert_eq!(opts.unknown_track_policy, UnknownTrackPolicy::Abort);
    assert_eq!(opts.linkage, LinkageMode::Embedded);
    assert!(!opts.pad_to_timeline);
}

#[test]
fn from_path_reads_and_reports_errors() {
    let dir = std::env::temp_dir().join(format!("mobweave_options_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let good = dir.join("good.json");
    std::fs::write(&good, r#"{ "pad_to_timeline": true, "parallel_tracks": true }"#).unwrap();
    let opts = BuildOptions::from_path(&good).unwrap();
    assert!(opts.pad_to_timeline && opts.parallel_tracks);

    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{ "linkage": "teleported" }"#).unwrap();
    assert!(BuildOptions::from_path(&bad).is_err());
    assert!(BuildOptions::from_path(&dir.join("absent.json")).is_err());

    std::fs::remove_dir_all(&dir).unwrap();
}
