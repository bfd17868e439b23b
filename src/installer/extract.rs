//! Zip extraction into the freshly emptied install root.

use crate::core::LauncherError;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

fn failed(archive: &Path, reason: impl ToString) -> LauncherError {
    LauncherError::ExtractionFailed {
        archive: archive.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Extract every entry of `archive` into `dest`. Blocking.
///
/// Entries whose names would escape `dest` (absolute paths, `..`) abort the
/// extraction, as do symlinks pointing outside `dest`. Unix modes stored in the
/// archive are applied on unix hosts; directory modes are applied last so a
/// restrictive directory never blocks its own children. Returns the number of
/// entries written.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<usize, LauncherError> {
    let file = File::open(archive).map_err(|e| failed(archive, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| failed(archive, e))?;
    let mut dir_modes: Vec<(PathBuf, u32)> = Vec::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| failed(archive, e))?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(failed(archive, format!("unsafe entry name '{}'", entry.name())));
        };
        let out_path = dest.join(&relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| failed(archive, e))?;
            if let Some(mode) = entry.unix_mode() {
                dir_modes.push((out_path, mode));
            }
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| failed(archive, e))?;
        }

        if entry.is_symlink() {
            let mut target = String::new();
            entry.read_to_string(&mut target).map_err(|e| failed(archive, e))?;
            if !link_stays_inside(&relative, Path::new(&target)) {
                return Err(failed(
                    archive,
                    format!("symlink '{}' points outside the install root", entry.name()),
                ));
            }
            write_symlink(&target, &out_path).map_err(|e| failed(archive, e))?;
            continue;
        }

        let mut out = File::create(&out_path).map_err(|e| failed(archive, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| failed(archive, e))?;
        if let Some(mode) = entry.unix_mode() {
            set_mode(&out_path, mode).map_err(|e| failed(archive, e))?;
        }
    }

    // Deepest first
    for (path, mode) in dir_modes.iter().rev() {
        set_mode(path, *mode).map_err(|e| failed(archive, e))?;
    }

    debug!("Extracted {} entries from {} into {}", zip.len(), archive.display(), dest.display());
    Ok(zip.len())
}

/// Whether `target`, resolved from the directory holding `link`, stays under the root.
fn link_stays_inside(link: &Path, target: &Path) -> bool {
    let mut depth = link.components().count().saturating_sub(1);
    for component in target.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

#[cfg(unix)]
fn write_symlink(target: &str, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn write_symlink(target: &str, link: &Path) -> io::Result<()> {
    std::fs::write(link, target)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
