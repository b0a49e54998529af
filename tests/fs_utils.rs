use cutout::fs_utils::*;
use std::{fs, path::Path};
use tempfile::tempdir;

#[test]
fn supported_extensions_are_case_insensitive() {
    assert!(is_supported_image(Path::new("/pics/cat.png")));
    assert!(is_supported_image(Path::new("/pics/cat.JPG")));
    assert!(is_supported_image(Path::new("/pics/cat.Jpeg")));
    assert!(is_supported_image(Path::new("/pics/cat.webp")));
}

#[test]
fn unsupported_extensions_are_rejected() {
    assert!(!is_supported_image(Path::new("/pics/cat.gif")));
    assert!(!is_supported_image(Path::new("/pics/cat.png.txt")));
    assert!(!is_supported_image(Path::new("/pics/cat")));
    assert!(!is_supported_image(Path::new("/pics/.png")));
}

#[test]
fn artifact_name_keeps_stem_case_and_normalizes_extension() {
    let dir = Path::new("/tmp/out");
    let path = artifact_path(Path::new("/home/me/photo.JPG"), dir).unwrap();
    assert_eq!(path, dir.join("photo_result.png"));
}

#[test]
fn artifact_name_only_strips_last_extension() {
    let dir = Path::new("/tmp/out");
    let path = artifact_path(Path::new("holiday.beach.webp"), dir).unwrap();
    assert_eq!(path, dir.join("holiday.beach_result.png"));
}

#[test]
fn artifact_path_requires_file_name() {
    assert!(artifact_path(Path::new("/"), Path::new("/tmp")).is_err());
}

#[test]
fn write_artifact_overwrites_previous_result() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested").join("cat_result.png");
    write_artifact(&path, b"first").unwrap();
    write_artifact(&path, b"second").unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"second");
}

#[test]
fn read_image_bytes_mentions_path_on_failure() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("broken.webp");
    let err = read_image_bytes(&missing).unwrap_err();
    let text = format!("{err:#}");
    assert!(text.contains("broken.webp"));
}

#[test]
fn default_output_dir_is_temp_dir() {
    assert_eq!(default_output_dir(), std::env::temp_dir());
}
