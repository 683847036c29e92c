use std::fs;
use std::path::Path;

use slide_carousel::error::Error;
use slide_carousel::scan::{is_slide_image, scan_slides};
use tempfile::tempdir;

#[test]
fn extensions_match_case_insensitively() {
    for name in ["a.png", "b.JPG", "c.jpeg", "d.Gif", "e.JPEG"] {
        assert!(is_slide_image(Path::new(name)), "{name}");
    }
    for name in ["a.webp", "b.txt", "noext", ".jpg"] {
        assert!(!is_slide_image(Path::new(name)), "{name}");
    }
}

#[test]
fn scan_lists_images_sorted_by_name() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::write(root.join("03.jpg"), b"x").unwrap();
    fs::write(root.join("01.png"), b"x").unwrap();
    fs::write(root.join("02.gif"), b"x").unwrap();
    fs::write(root.join("readme.md"), b"x").unwrap();

    let slides = scan_slides(root).unwrap();
    let names: Vec<&str> = slides.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["01", "02", "03"]);
    let first = slides[0].image.as_deref().unwrap();
    assert_eq!(Path::new(first), root.join("01.png"));
}

#[test]
fn scan_does_not_descend_into_subdirectories() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::write(root.join("top.jpg"), b"x").unwrap();
    fs::create_dir_all(root.join("nested.jpg")).unwrap();
    fs::write(root.join("nested.jpg").join("inner.jpg"), b"x").unwrap();

    let slides = scan_slides(root).unwrap();
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].name, "top");
}

#[test]
fn scan_rejects_missing_directory() {
    let tmp = tempdir().unwrap();
    let missing = tmp.path().join("nope");
    assert!(matches!(scan_slides(&missing), Err(Error::BadDir(p)) if p == missing));

    let file = tmp.path().join("file.jpg");
    fs::write(&file, b"x").unwrap();
    assert!(matches!(scan_slides(&file), Err(Error::BadDir(_))));
}
