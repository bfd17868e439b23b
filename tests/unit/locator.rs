//! Entry-point discovery over realistic release layouts.

use gamelaunch_cli::locator::{EntryPredicate, ExecutableLocator, ExtensionMatch, SkipBundles, find_first};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::DirEntry;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

fn mkdir(root: &Path, relative: &str) {
    fs::create_dir_all(root.join(relative)).unwrap();
}

#[test]
fn crash_handlers_are_never_returned() {
    let layouts: &[&[&str]] = &[
        &["CrashReporter.exe"],
        &["Game/UnityCrashHandler64.exe", "Game/crash_dump.exe"],
        &["bin/CRASHPAD.exe", "bin/sub/crash.exe"],
        &["a/b/c/d/SentryCrash.exe"],
    ];

    for layout in layouts {
        let temp = TempDir::new().unwrap();
        for file in *layout {
            touch(temp.path(), file);
        }
        assert_eq!(ExecutableLocator::find(temp.path(), ".exe"), None, "layout {layout:?}");
    }
}

#[test]
fn real_exe_found_beside_crash_handler() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "ProjectAlpha/UnityCrashHandler64.exe");
    touch(temp.path(), "ProjectAlpha/ProjectAlpha.exe");
    touch(temp.path(), "ProjectAlpha/UnityPlayer.dll");

    let found = ExecutableLocator::find(temp.path(), ".exe").unwrap();

    assert_eq!(found, temp.path().join("ProjectAlpha/ProjectAlpha.exe"));
}

#[test]
fn exe_inside_bundle_is_not_found() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "Game.app/Contents/MacOS/Game.exe");

    assert_eq!(ExecutableLocator::find(temp.path(), ".exe"), None);
}

#[test]
fn bundle_is_returned_as_leaf() {
    let temp = TempDir::new().unwrap();
    mkdir(temp.path(), "build/Outer.app/Contents/Resources/Inner.app");

    let found = ExecutableLocator::find(temp.path(), ".app").unwrap();

    assert_eq!(found, temp.path().join("build/Outer.app"));
}

#[test]
fn crash_filter_applies_only_to_exe() {
    let temp = TempDir::new().unwrap();
    mkdir(temp.path(), "CrashTest.app/Contents/MacOS");

    assert_eq!(
        ExecutableLocator::find(temp.path(), ".app"),
        Some(temp.path().join("CrashTest.app"))
    );
}

#[test]
fn missing_root_is_none() {
    let temp = TempDir::new().unwrap();
    assert_eq!(ExecutableLocator::find(&temp.path().join("nope"), ".exe"), None);
}

#[test]
fn custom_predicates_drive_the_walk() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "skip/target.txt");
    touch(temp.path(), "keep/target.txt");

    let is_match = |e: &DirEntry| e.file_name() == "target.txt";
    let descend = |e: &DirEntry| e.file_name() != "skip";

    assert_eq!(
        find_first(temp.path(), &is_match, &descend),
        Some(temp.path().join("keep/target.txt"))
    );
}

#[test]
fn predicate_instances_are_usable_directly() {
    let temp = TempDir::new().unwrap();
    mkdir(temp.path(), "Game.app");
    touch(temp.path(), "Game.exe");

    let entries: Vec<DirEntry> = walkdir::WalkDir::new(temp.path())
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(Result::unwrap)
        .collect();
    let bundle = &entries[0];
    let exe = &entries[1];

    assert!(!SkipBundles.test(bundle));
    assert!(SkipBundles.test(exe));
    assert!(ExtensionMatch::for_extension(".exe").test(exe));
    assert!(!ExtensionMatch::for_extension(".exe").test(bundle));
}
