use super::*;
use crate::foundation::core::{MediaKind, Rational, SlotId};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("mobweave_json_{}", std::process::id()))
        .join(name)
}

#[test]
fn nothing_is_written_before_commit() {
    let path = temp_path("pending.json");
    let _ = std::fs::remove_file(&path);

    let mut container = JsonContainer::create(&path);
    container.create_composition("Reel 1").unwrap();
    assert!(!path.exists());

    let bytes = container.commit().unwrap();
    assert!(path.exists());
    assert_eq!(std::fs::metadata(&path).unwrap().len(), bytes);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn open_restores_committed_content() {
    let path = temp_path("reopen.json");

    let mut container = JsonContainer::create(&path);
    let comp = container.create_composition("Reel 1").unwrap();
    container
        .create_timeline_slot(
            comp,
            SlotSpec {
                slot_id: SlotId(1),
                name: Some("V1".to_string()),
                media_kind: MediaKind::Picture,
                edit_rate: Rational::integer(24).unwrap(),
            },
        )
        .unwrap();
    container.commit().unwrap();

    let reopened = JsonContainer::open(&path).unwrap();
    assert_eq!(reopened.path(), path.as_path());
    assert_eq!(reopened.compositions(), vec![comp]);
    let mob = reopened.store().mob(comp).unwrap();
    assert_eq!(mob.slots[0].name.as_deref(), Some("V1"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn open_rejects_garbage_and_open_or_create_starts_empty() {
    let path = temp_path("garbage.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"{ \"format\": \"nope\", \"version\": 1, \"mobs\": [] }").unwrap();
    assert!(JsonContainer::open(&path).is_err());
    let _ = std::fs::remove_file(&path);

    let fresh = JsonContainer::open_or_create(temp_path("absent.json")).unwrap();
    assert!(fresh.store().mobs().is_empty());
}
