//! Entry-point discovery inside an arbitrary install root.
//!
//! Release archives do not follow a fixed layout: the executable may sit at the
//! top level, inside a versioned folder, or next to helper binaries. The
//! locator therefore walks the whole tree depth-first and returns the first
//! entry that satisfies a match predicate, descending only into directories
//! accepted by a second predicate.
//!
//! The two concrete rules the launcher needs are expressed as predicate
//! instances rather than inlined conditionals:
//!
//! - [`ExtensionMatch`] accepts names ending in an extension and, for `.exe`,
//!   rejects anything whose name contains `crash` (bundled crash reporters often
//!   sit beside the real entry point and would otherwise be found first).
//! - [`SkipBundles`] refuses to descend into `.app` directories, so a bundle is
//!   always a leaf: returned as a whole when it matches, never searched inside.
//!
//! Traversal order is the native directory-listing order of the host.

use crate::constants::{CRASH_HANDLER_MARKER, MACOS_BUNDLE_EXTENSION, WINDOWS_EXECUTABLE_EXTENSION};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// A test applied to a directory entry during the walk.
pub trait EntryPredicate {
    /// Evaluate the predicate for `entry`.
    fn test(&self, entry: &DirEntry) -> bool;
}

impl<F> EntryPredicate for F
where
    F: Fn(&DirEntry) -> bool,
{
    fn test(&self, entry: &DirEntry) -> bool {
        self(entry)
    }
}

fn entry_name(entry: &DirEntry) -> std::borrow::Cow<'_, str> {
    entry.file_name().to_string_lossy()
}

/// Matches entries whose name ends with an extension.
#[derive(Debug, Clone)]
pub struct ExtensionMatch {
    extension: String,
    reject_containing: Option<String>,
}

impl ExtensionMatch {
    /// Match `extension`, applying the crash-handler filter when it is `.exe`.
    #[must_use]
    pub fn for_extension(extension: &str) -> Self {
        let reject_containing = extension
            .eq_ignore_ascii_case(WINDOWS_EXECUTABLE_EXTENSION)
            .then(|| CRASH_HANDLER_MARKER.to_string());

        Self {
            extension: extension.to_string(),
            reject_containing,
        }
    }
}

impl ExtensionMatch {
    /// Whether `entry` has the extension but carries the rejected marker.
    #[must_use]
    pub fn rejects(&self, entry: &DirEntry) -> bool {
        let name = entry_name(entry);
        name.ends_with(&self.extension)
            && self
                .reject_containing
                .as_ref()
                .is_some_and(|marker| name.to_lowercase().contains(marker.as_str()))
    }
}

impl EntryPredicate for ExtensionMatch {
    fn test(&self, entry: &DirEntry) -> bool {
        if !entry_name(entry).ends_with(&self.extension) {
            return false;
        }
        if self.rejects(entry) {
            debug!("Skipping crash handler candidate {}", entry.path().display());
            return false;
        }
        true
    }
}

/// Descends into every directory except application bundles.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipBundles;

impl EntryPredicate for SkipBundles {
    fn test(&self, entry: &DirEntry) -> bool {
        !entry_name(entry).ends_with(MACOS_BUNDLE_EXTENSION)
    }
}

/// Depth-first search for the first entry under `root` accepted by `is_match`.
///
/// `root` itself is never a candidate. Directories are entered only when
/// `should_descend` accepts them. Unreadable entries and a missing root are
/// logged and skipped, never reported as errors.
pub fn find_first<M, D>(root: &Path, is_match: &M, should_descend: &D) -> Option<PathBuf>
where
    M: EntryPredicate + ?Sized,
    D: EntryPredicate + ?Sized,
{
    let mut walker = WalkDir::new(root).min_depth(1).into_iter();

    while let Some(next) = walker.next() {
        let entry = match next {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if is_match.test(&entry) {
            return Some(entry.into_path());
        }

        if entry.file_type().is_dir() && !should_descend.test(&entry) {
            walker.skip_current_dir();
        }
    }

    None
}

/// Finds the runnable entry point of an installed application.
///
/// # Examples
///
/// ```rust,no_run
/// use gamelaunch_cli::locator::ExecutableLocator;
/// use std::path::Path;
///
/// if let Some(exe) = ExecutableLocator::find(Path::new("Game"), ".exe") {
///     println!("entry point: {}", exe.display());
/// }
/// ```
pub struct ExecutableLocator;

impl ExecutableLocator {
    /// Return the first entry under `root` whose name ends with `extension`.
    ///
    /// Returns `None` (not an error) when nothing matches.
    #[must_use]
    pub fn find(root: &Path, extension: &str) -> Option<PathBuf> {
        let matcher = ExtensionMatch::for_extension(extension);
        // Rejected candidates are never entered either
        let descend = |entry: &DirEntry| SkipBundles.test(entry) && !matcher.rejects(entry);
        let found = find_first(root, &matcher, &descend);
        match &found {
            Some(path) => debug!("Located '{}' entry point at {}", extension, path.display()),
            None => debug!("No '{}' entry point under {}", extension, root.display()),
        }
        found
    }
}
