use cutout::app::drop_zone::*;
use eframe::egui::{DroppedFile, HoveredFile};
use std::path::{Path, PathBuf};

fn local(path: &str) -> DroppedFile {
    DroppedFile {
        path: Some(PathBuf::from(path)),
        name: path.to_string(),
        ..Default::default()
    }
}

#[test]
fn single_local_image_is_accepted() {
    let zone = DropZone::new();
    let request = zone.accept(&[local("/pics/cat.png")]).unwrap();
    assert_eq!(request.path, PathBuf::from("/pics/cat.png"));
}

#[test]
fn uppercase_extension_is_accepted() {
    let zone = DropZone::new();
    assert!(zone.accept(&[local("/pics/photo.JPG")]).is_some());
}

#[test]
fn multi_file_drop_is_rejected() {
    let zone = DropZone::new();
    assert!(zone
        .accept(&[local("/pics/a.png"), local("/pics/b.png")])
        .is_none());
}

#[test]
fn non_local_drop_is_rejected() {
    let zone = DropZone::new();
    let web = DroppedFile {
        name: "cat.png".into(),
        bytes: Some(vec![1u8, 2, 3].into()),
        ..Default::default()
    };
    assert!(zone.accept(&[web]).is_none());
}

#[test]
fn unsupported_extension_is_rejected() {
    let zone = DropZone::new();
    assert!(zone.accept(&[local("/pics/cat.gif")]).is_none());
    assert!(zone.accept(&[]).is_none());
}

#[test]
fn disabled_zone_accepts_nothing() {
    let mut zone = DropZone::new();
    zone.disable();
    assert!(!zone.enabled);
    assert_eq!(zone.prompt, BUSY_PROMPT);
    assert!(zone.accept(&[local("/pics/cat.png")]).is_none());
}

#[test]
fn reset_restores_prompt() {
    let mut zone = DropZone::new();
    zone.disable();
    zone.reset();
    assert!(zone.enabled);
    assert_eq!(zone.prompt, PROMPT);
}

#[test]
fn hover_feedback_matches_acceptance() {
    let zone = DropZone::new();
    let good = HoveredFile {
        path: Some(PathBuf::from("/pics/cat.webp")),
        ..Default::default()
    };
    let bad = HoveredFile {
        path: Some(PathBuf::from("/pics/cat.bmp")),
        ..Default::default()
    };
    assert!(zone.would_accept(&[good.clone()]));
    assert!(!zone.would_accept(&[bad]));
    assert!(!zone.would_accept(&[good.clone(), good]));
}

#[test]
fn accept_paths_works_on_plain_paths() {
    let path = Path::new("/pics/dog.jpeg");
    assert!(accept_paths([Some(path)]).is_some());
    assert!(accept_paths([None]).is_none());
}
