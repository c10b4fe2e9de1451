use super::*;

#[test]
fn closures_report_missing_paths_sorted_and_deduplicated() {
    let present = |p: &Path| p == Path::new("a.mov");
    let missing = present.missing(&[
        Path::new("c.wav"),
        Path::new("a.mov"),
        Path::new("b.mov"),
        Path::new("c.wav"),
    ]);
    assert_eq!(missing, vec![PathBuf::from("b.mov"), PathBuf::from("c.wav")]);
}

#[test]
fn fs_checker_resolves_relative_paths_against_root() {
    let root = std::env::temp_dir().join(format!("mobweave_files_{}", std::process::id()));
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("A001.mov"), b"").unwrap();

    let checker = FsExistenceChecker::with_root(&root);
    let missing = checker.missing(&[Path::new("A001.mov"), Path::new("B002.mov")]);
    assert_eq!(missing, vec![PathBuf::from("B002.mov")]);

    let absolute = root.join("A001.mov");
    assert!(FsExistenceChecker::new().missing(&[absolute.as_path()]).is_empty());

    std::fs::remove_dir_all(&root).unwrap();
}
