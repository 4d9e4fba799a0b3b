//! Tests for TreeBuilder over real directories

use std::fs;
use std::path::{Path, PathBuf};

use rstest::rstest;
use tempfile::TempDir;

use seltree::domain::{natural_cmp, DomainError, EntryKind, FlatEntry, TreeBuilder};
use seltree::infrastructure::DirectorySource;
use seltree::util::testing::init_test_setup;

fn touch(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    fs::write(&path, "").expect("write file");
    path
}

/// <tmp>/{Chapter 2/{notes.txt, video.mkv}, Chapter 10/intro.mp4, readme.md, slides.pdf}
fn course_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "Chapter 10/intro.mp4");
    touch(temp.path(), "Chapter 2/video.mkv");
    touch(temp.path(), "Chapter 2/notes.txt");
    touch(temp.path(), "slides.pdf");
    touch(temp.path(), "readme.md");
    temp
}

fn flatten(dir: &Path) -> Vec<FlatEntry> {
    TreeBuilder::flatten(&DirectorySource::default(), dir.to_path_buf())
        .collect::<Result<Vec<_>, _>>()
        .expect("flatten")
}

#[test]
fn given_course_directory_when_flattening_then_preorder_dirs_before_files() {
    init_test_setup();
    let temp = course_dir();

    let entries = flatten(temp.path());

    let names: Vec<&str> = entries.iter().skip(1).map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Chapter 2",
            "notes.txt",
            "video.mkv",
            "Chapter 10",
            "intro.mp4",
            "readme.md",
            "slides.pdf",
        ]
    );
    let depths: Vec<usize> = entries.iter().map(|e| e.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 2, 1, 2, 1, 1]);
}

#[test]
fn given_course_directory_when_flattening_then_ids_and_parents_link_up() {
    let temp = course_dir();

    let entries = flatten(temp.path());

    let ids: Vec<usize> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, (0..entries.len()).collect::<Vec<_>>());
    let parents: Vec<Option<usize>> = entries.iter().map(|e| e.parent_id).collect();
    assert_eq!(
        parents,
        vec![None, Some(0), Some(1), Some(1), Some(0), Some(4), Some(0), Some(0)]
    );
    assert_eq!(entries[0].kind, EntryKind::Container);
    assert_eq!(entries[2].kind, EntryKind::Leaf);
}

#[test]
fn given_course_directory_when_flattening_then_parent_index_is_level_local_counter() {
    let temp = course_dir();

    let entries = flatten(temp.path());

    let counters: Vec<(&str, usize)> = entries
        .iter()
        .skip(1)
        .map(|e| (e.name.as_str(), e.parent_index))
        .collect();
    assert_eq!(
        counters,
        vec![
            ("Chapter 2", 0),
            ("notes.txt", 0),
            ("video.mkv", 0),
            ("Chapter 10", 1),
            ("intro.mp4", 1),
            ("readme.md", 2),
            ("slides.pdf", 2),
        ]
    );
}

#[test]
fn given_empty_directory_when_flattening_then_only_root() {
    let temp = TempDir::new().unwrap();

    let entries = flatten(temp.path());

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].depth, 0);
    assert_eq!(entries[0].parent_id, None);
}

#[test]
fn given_missing_root_when_flattening_then_single_error_then_exhausted() {
    let source = DirectorySource::default();
    let mut walk = TreeBuilder::flatten(&source, PathBuf::from("/nonexistent/seltree/root"));

    assert!(matches!(
        walk.next(),
        Some(Err(DomainError::SourceUnavailable { .. }))
    ));
    assert!(walk.next().is_none());
    assert!(walk.next().is_none());
}

#[test]
fn given_hidden_entries_when_excluded_then_not_emitted() {
    let temp = course_dir();
    touch(temp.path(), ".cache/blob");
    touch(temp.path(), ".hidden");

    let entries: Vec<FlatEntry> =
        TreeBuilder::flatten(&DirectorySource::new(false, false), temp.path().to_path_buf())
            .collect::<Result<_, _>>()
            .unwrap();

    assert!(entries.iter().all(|e| !e.name.starts_with('.')));
    assert_eq!(entries.len(), 8);
    assert_eq!(flatten(temp.path()).len(), 11);
}

#[cfg(unix)]
mod symlinks {
    use super::*;
    use std::os::unix::fs::symlink;

    fn flatten_following(dir: &Path) -> Vec<(String, usize, EntryKind)> {
        TreeBuilder::flatten(&DirectorySource::new(true, true), dir.to_path_buf())
            .map(|e| e.map(|e| (e.name, e.depth, e.kind)))
            .collect::<Result<Vec<_>, _>>()
            .expect("flatten following links")
    }

    #[test]
    fn given_link_back_to_root_when_following_links_then_walk_terminates() {
        init_test_setup();
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "ch1/intro.mp4");
        symlink(temp.path(), temp.path().join("ch1/back")).unwrap();

        let entries = flatten_following(temp.path());

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[1], ("ch1".to_string(), 1, EntryKind::Container));
        assert_eq!(entries[2], ("back".to_string(), 2, EntryKind::Leaf));
        assert_eq!(entries[3], ("intro.mp4".to_string(), 2, EntryKind::Leaf));
    }

    #[test]
    fn given_cycle_through_outside_directory_when_following_links_then_walk_terminates() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("ch2")).unwrap();
        symlink(outside.path(), temp.path().join("ch2/ext")).unwrap();
        symlink(temp.path(), outside.path().join("up")).unwrap();

        let entries = flatten_following(temp.path());

        let names: Vec<&str> = entries.iter().skip(1).map(|e| e.0.as_str()).collect();
        assert_eq!(names, vec!["ch2", "ext", "up"]);
        assert_eq!(entries[2].2, EntryKind::Container);
        assert_eq!(entries[3].2, EntryKind::Leaf);
    }

    #[test]
    fn given_link_to_outside_directory_when_following_then_descends_else_leaf() {
        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(outside.path(), "clip.mp4");
        fs::create_dir(temp.path().join("ch1")).unwrap();
        symlink(outside.path(), temp.path().join("ch1/media")).unwrap();

        let followed = flatten_following(temp.path());
        let not_followed = flatten(temp.path());

        assert_eq!(followed[2], ("media".to_string(), 2, EntryKind::Container));
        assert_eq!(followed[3], ("clip.mp4".to_string(), 3, EntryKind::Leaf));
        assert_eq!(not_followed.len(), 3);
        assert_eq!(not_followed[2].kind, EntryKind::Leaf);
    }
}

#[test]
fn given_numbered_files_when_flattening_then_natural_order() {
    let temp = TempDir::new().unwrap();
    for name in ["file10.txt", "file2.txt", "File1.txt", "file02b.txt"] {
        touch(temp.path(), name);
    }

    let names: Vec<String> = flatten(temp.path())
        .into_iter()
        .skip(1)
        .map(|e| e.name)
        .collect();

    assert_eq!(names, vec!["File1.txt", "file2.txt", "file02b.txt", "file10.txt"]);
}

#[rstest]
#[case("a2", "a10")]
#[case("Lecture 9", "lecture 10")]
#[case("x01", "x1b")]
#[case("1", "a")]
#[case("ABC", "abc")]
fn given_pair_when_natural_comparing_then_left_sorts_first(#[case] left: &str, #[case] right: &str) {
    assert_eq!(natural_cmp(left, right), std::cmp::Ordering::Less);
    assert_eq!(natural_cmp(right, left), std::cmp::Ordering::Greater);
}
